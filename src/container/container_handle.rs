use crate::array::ArrayValue;

use super::{
    ContainerError, ContainerPath, DatasetInfo, ListableContainerTraits, NodeKind,
    ReadableContainerTraits, ReadableListableContainerTraits,
};

/// An owned handle to an open container.
///
/// The handle owns the container backend for the duration of a decode.
/// The backend (and any file it holds open) is released when the handle is dropped, on every
/// exit path of the decode.
pub struct ContainerHandle {
    location: String,
    container: Box<dyn ReadableListableContainerTraits>,
}

impl ContainerHandle {
    /// Create a new container handle for the container at `location`.
    pub fn new(
        location: impl Into<String>,
        container: Box<dyn ReadableListableContainerTraits>,
    ) -> Self {
        let location = location.into();
        tracing::debug!(location = %location, "opened container");
        Self {
            location,
            container,
        }
    }

    /// Returns the location of the container.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl core::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "container handle {}", self.location)
    }
}

impl Drop for ContainerHandle {
    fn drop(&mut self) {
        tracing::debug!(location = %self.location, "released container");
    }
}

impl ReadableContainerTraits for ContainerHandle {
    fn node_kind(&self, path: &ContainerPath) -> Result<Option<NodeKind>, ContainerError> {
        self.container.node_kind(path)
    }

    fn attribute_names(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        self.container.attribute_names(path)
    }

    fn attribute(
        &self,
        path: &ContainerPath,
        name: &str,
    ) -> Result<Option<ArrayValue>, ContainerError> {
        self.container.attribute(path, name)
    }

    fn dataset_info(&self, path: &ContainerPath) -> Result<DatasetInfo, ContainerError> {
        self.container.dataset_info(path)
    }

    fn read_dataset(&self, path: &ContainerPath) -> Result<ArrayValue, ContainerError> {
        self.container.read_dataset(path)
    }
}

impl ListableContainerTraits for ContainerHandle {
    fn children(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        self.container.children(path)
    }
}
