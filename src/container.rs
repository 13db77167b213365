//! Hierarchical containers (groups, datasets and attributes).
//!
//! A container is a tree of named groups and datasets, each carrying string-keyed attributes.
//! This is the model of an HDF5 file, and the only view of a file that the decoders rely on.
//!
//! This module defines the abstract container interfaces:
//!  - [`ReadableContainerTraits`]: node kinds, attributes and dataset contents,
//!  - [`ListableContainerTraits`]: the members of a group, and
//!  - [`WritableContainerTraits`]: building a container (used by the in-memory container).
//!
//! It also includes the [`store`]s implementing them, the dataset [`filter`]s and the
//! [`UsageLogContainerAdapter`].

pub mod filter;
pub mod store;

mod container_handle;
mod container_path;
mod usage_log;

use thiserror::Error;

use crate::array::{ArrayShapeError, ArrayValue, DataType, UnsupportedDataTypeError};

pub use container_handle::ContainerHandle;
pub use container_path::{ContainerPath, ContainerPathError};
pub use filter::{DatasetFilter, FilterError};
pub use usage_log::UsageLogContainerAdapter;

/// The kind of a container node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A group, holding named members and attributes.
    Group,
    /// A dataset, holding a typed n-dimensional array and attributes.
    Dataset,
}

/// The shape and data type of a dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetInfo {
    shape: Vec<usize>,
    data_type: DataType,
}

impl DatasetInfo {
    /// Create new dataset info.
    #[must_use]
    pub const fn new(shape: Vec<usize>, data_type: DataType) -> Self {
        Self { shape, data_type }
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the data type.
    #[must_use]
    pub const fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

/// A container error.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container could not be opened.
    #[error("unable to open container {location}: {reason}")]
    Open {
        /// The container location.
        location: String,
        /// The reason.
        reason: String,
    },
    /// A node does not exist.
    #[error("{0} does not exist")]
    NotFound(ContainerPath),
    /// A node exists but is not a group.
    #[error("{0} is not a group")]
    NotAGroup(ContainerPath),
    /// A node exists but is not a dataset.
    #[error("{0} is not a dataset")]
    NotADataset(ContainerPath),
    /// A node already exists.
    #[error("{0} already exists")]
    AlreadyExists(ContainerPath),
    /// A stored data type cannot be represented.
    #[error(transparent)]
    UnsupportedDataType(#[from] UnsupportedDataTypeError),
    /// A dataset filter failed.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// An invalid container path.
    #[error(transparent)]
    PathError(#[from] ContainerPathError),
    /// An array shape does not match its elements.
    #[error(transparent)]
    ShapeError(#[from] ArrayShapeError),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl From<&str> for ContainerError {
    fn from(err: &str) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<String> for ContainerError {
    fn from(err: String) -> Self {
        Self::Other(err)
    }
}

/// Readable container traits.
pub trait ReadableContainerTraits {
    /// Returns the kind of the node at `path`, or [`None`] if there is no node at `path`.
    ///
    /// # Errors
    /// Returns a [`ContainerError`] if there is an underlying error with the container.
    fn node_kind(&self, path: &ContainerPath) -> Result<Option<NodeKind>, ContainerError>;

    /// Returns the sorted attribute names of the node at `path`.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] if there is no node at `path`.
    fn attribute_names(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError>;

    /// Read the attribute `name` of the node at `path`, or [`None`] if it does not exist.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] if there is no node at `path`, or another [`ContainerError`] if the attribute cannot be read.
    fn attribute(
        &self,
        path: &ContainerPath,
        name: &str,
    ) -> Result<Option<ArrayValue>, ContainerError>;

    /// Returns the shape and data type of the dataset at `path`.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] or [`ContainerError::NotADataset`] if there is no dataset at `path`.
    fn dataset_info(&self, path: &ContainerPath) -> Result<DatasetInfo, ContainerError>;

    /// Read the contents of the dataset at `path`.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] or [`ContainerError::NotADataset`] if there is no dataset at `path`, or another [`ContainerError`] if it cannot be read or decompressed.
    fn read_dataset(&self, path: &ContainerPath) -> Result<ArrayValue, ContainerError>;

    /// Returns true if there is a node at `path`.
    ///
    /// # Errors
    /// Returns a [`ContainerError`] if there is an underlying error with the container.
    fn exists(&self, path: &ContainerPath) -> Result<bool, ContainerError> {
        Ok(self.node_kind(path)?.is_some())
    }
}

/// Listable container traits.
pub trait ListableContainerTraits {
    /// Returns the sorted member names of the group at `path`.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] or [`ContainerError::NotAGroup`] if there is no group at `path`.
    fn children(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError>;
}

/// A supertrait of [`ReadableContainerTraits`] and [`ListableContainerTraits`].
pub trait ReadableListableContainerTraits: ReadableContainerTraits + ListableContainerTraits {}

impl<T> ReadableListableContainerTraits for T where
    T: ReadableContainerTraits + ListableContainerTraits + ?Sized
{
}

/// Writable container traits.
pub trait WritableContainerTraits {
    /// Create a group at `path`.
    ///
    /// The parent group is created if it does not exist.
    ///
    /// # Errors
    /// Returns [`ContainerError::AlreadyExists`] if there is already a node at `path`, or [`ContainerError::NotAGroup`] if an ancestor is a dataset.
    fn create_group(&self, path: &ContainerPath) -> Result<(), ContainerError>;

    /// Create a dataset at `path` holding `value`, stored through `filters`.
    ///
    /// The parent group is created if it does not exist.
    ///
    /// # Errors
    /// Returns [`ContainerError::AlreadyExists`] if there is already a node at `path`, or another [`ContainerError`] if a filter fails.
    fn create_dataset(
        &self,
        path: &ContainerPath,
        value: &ArrayValue,
        filters: &[DatasetFilter],
    ) -> Result<(), ContainerError>;

    /// Set the attribute `name` of the node at `path` to `value`.
    ///
    /// # Errors
    /// Returns [`ContainerError::NotFound`] if there is no node at `path`.
    fn set_attribute(
        &self,
        path: &ContainerPath,
        name: &str,
        value: ArrayValue,
    ) -> Result<(), ContainerError>;
}

/// Returns the string attribute `name` of the node at `path`, or [`None`] if it is absent or not a single string.
///
/// # Errors
/// Returns a [`ContainerError`] if the attribute cannot be read.
pub fn string_attribute<TContainer: ?Sized + ReadableContainerTraits>(
    container: &TContainer,
    path: &ContainerPath,
    name: &str,
) -> Result<Option<String>, ContainerError> {
    Ok(container
        .attribute(path, name)?
        .and_then(|value| value.as_str().map(str::to_string)))
}
