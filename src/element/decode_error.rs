use thiserror::Error;

use crate::{
    container::{ContainerError, ContainerPath},
    encoding::EncodingMetadata,
    plugin::PluginCreateError,
};

/// A decode error.
///
/// Every variant names the container-internal path of the offending element.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container, or an element of it, could not be read.
    ///
    /// Decompression failures surface as this error.
    #[error("unable to read {path}: {source}")]
    ContainerOpen {
        /// The path of the element being read.
        path: ContainerPath,
        /// The container error.
        source: ContainerError,
    },
    /// A required element is absent.
    #[error("required element {path} does not exist")]
    NotFound {
        /// The path of the missing element.
        path: ContainerPath,
    },
    /// The `encoding-type` of an element is not supported.
    #[error("unsupported encoding {encoding_type} (version {encoding_version}) at {path}")]
    UnsupportedEncoding {
        /// The path of the element.
        path: ContainerPath,
        /// The declared `encoding-type`.
        encoding_type: String,
        /// The declared `encoding-version`.
        encoding_version: String,
    },
    /// The `encoding-version` of an element differs from the implemented version and its layout is incompatible.
    #[error("{encoding_type} version {found} at {path} is incompatible with implemented version {implemented}: {reason}")]
    VersionMismatch {
        /// The path of the element.
        path: ContainerPath,
        /// The `encoding-type`.
        encoding_type: String,
        /// The declared `encoding-version`.
        found: String,
        /// The implemented `encoding-version`.
        implemented: String,
        /// The layout incompatibility.
        reason: String,
    },
    /// The index dataset of a dataframe does not exist.
    #[error("dataframe {path} index dataset {index} does not exist")]
    MissingIndex {
        /// The path of the dataframe.
        path: ContainerPath,
        /// The name of the index dataset.
        index: String,
    },
    /// A dataframe column length differs from the index length.
    #[error("dataframe {path} column {column} has length {found}, expected {expected}")]
    ColumnLengthMismatch {
        /// The path of the dataframe.
        path: ContainerPath,
        /// The column name.
        column: String,
        /// The index length.
        expected: usize,
        /// The column length.
        found: usize,
    },
    /// A sparse matrix is structurally invalid.
    #[error("malformed sparse matrix {path}: {reason}")]
    MalformedSparseMatrix {
        /// The path of the sparse matrix.
        path: ContainerPath,
        /// The violated constraint.
        reason: String,
    },
    /// A member of an aligned collection does not have the shape required by the dataset dimensions.
    #[error("{collection} member {member} has shape {found:?}, expected {expected}")]
    ShapeMismatch {
        /// The collection (`obsm`, `varm`, `obsp`, `varp`, `layers`) or `X`.
        collection: String,
        /// The member name.
        member: String,
        /// The expected shape, with `*` for unconstrained dimensions.
        expected: String,
        /// The shape found.
        found: Vec<usize>,
    },
    /// An element cannot represent what its encoding declares.
    #[error("invalid element {path}: {reason}")]
    InvalidElement {
        /// The path of the element.
        path: ContainerPath,
        /// The reason.
        reason: String,
    },
}

impl DecodeError {
    /// Create a decode error for a container error raised while reading `path`.
    ///
    /// A missing node is a [`DecodeError::NotFound`], anything else a [`DecodeError::ContainerOpen`].
    #[must_use]
    pub fn from_container(path: &ContainerPath, err: ContainerError) -> Self {
        match err {
            ContainerError::NotFound(path) => Self::NotFound { path },
            source => Self::ContainerOpen {
                path: path.clone(),
                source,
            },
        }
    }

    /// Create a decode error for a plugin creation error for the element at `path`.
    #[must_use]
    pub fn from_plugin(
        path: &ContainerPath,
        metadata: &EncodingMetadata,
        err: PluginCreateError,
    ) -> Self {
        match err {
            PluginCreateError::Unsupported(_) => Self::UnsupportedEncoding {
                path: path.clone(),
                encoding_type: metadata.encoding_type().to_string(),
                encoding_version: metadata
                    .encoding_version()
                    .unwrap_or("unspecified")
                    .to_string(),
            },
            PluginCreateError::VersionMismatch(err) => Self::VersionMismatch {
                path: path.clone(),
                encoding_type: err.identifier().to_string(),
                found: err.version().to_string(),
                implemented: err.implemented().to_string(),
                reason: err.reason().to_string(),
            },
            PluginCreateError::Other(reason) => Self::InvalidElement {
                path: path.clone(),
                reason,
            },
        }
    }

    /// Create an [`DecodeError::InvalidElement`] error.
    #[must_use]
    pub fn invalid(path: &ContainerPath, reason: impl Into<String>) -> Self {
        Self::InvalidElement {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error is an unsupported or incompatible encoding.
    #[must_use]
    pub fn is_unsupported_encoding(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedEncoding { .. } | Self::VersionMismatch { .. }
        )
    }
}

/// Attach an element path to container errors.
pub(crate) trait ContainerResultExt<T> {
    /// Convert a container error raised while reading `path` into a [`DecodeError`].
    fn with_path(self, path: &ContainerPath) -> Result<T, DecodeError>;
}

impl<T> ContainerResultExt<T> for Result<T, ContainerError> {
    fn with_path(self, path: &ContainerPath) -> Result<T, DecodeError> {
        self.map_err(|err| DecodeError::from_container(path, err))
    }
}
