//! A container adapter which logs container calls.

use std::{io::Write, sync::Arc};

use itertools::Itertools;
use parking_lot::Mutex;

use crate::array::ArrayValue;

use super::{
    ContainerError, ContainerPath, DatasetInfo, ListableContainerTraits, NodeKind,
    ReadableContainerTraits,
};

/// The usage log container adapter. Logs container method calls.
///
/// It is intended to aid in debugging and optimising decoding by revealing container access patterns.
///
/// ### Example (log to stdout)
/// ```rust
/// # use std::sync::Arc;
/// # use parking_lot::Mutex;
/// # use h5ad::container::{store::MemoryContainer, UsageLogContainerAdapter};
/// let container = Arc::new(MemoryContainer::new());
/// let log_writer = Arc::new(Mutex::new(std::io::stdout()));
/// let container = UsageLogContainerAdapter::new(container, log_writer, || "[h5ad] ".to_string());
/// ```
///
/// Decoding through the above adapter prints outputs like:
/// ```text
/// [h5ad] attribute(/obs, encoding-type) -> Ok(Some("dataframe"))
/// [h5ad] children(/obs) -> Ok([_index, cell_type, n_genes])
/// [h5ad] read_dataset(/obs/_index) -> Ok(shape=[20])
/// ```
pub struct UsageLogContainerAdapter<TContainer: ?Sized> {
    container: Arc<TContainer>,
    handle: Arc<Mutex<dyn Write + Send + Sync>>,
    prefix_func: fn() -> String,
}

impl<TContainer: ?Sized> core::fmt::Debug for UsageLogContainerAdapter<TContainer> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "usage log")
    }
}

impl<TContainer: ?Sized> UsageLogContainerAdapter<TContainer> {
    /// Create a new usage log container adapter.
    pub fn new(
        container: Arc<TContainer>,
        handle: Arc<Mutex<dyn Write + Send + Sync>>,
        prefix_func: fn() -> String,
    ) -> Self {
        Self {
            container,
            handle,
            prefix_func,
        }
    }

    fn log(&self, message: core::fmt::Arguments) -> Result<(), ContainerError> {
        writeln!(self.handle.lock(), "{}{message}", (self.prefix_func)())?;
        Ok(())
    }
}

impl<TContainer: ?Sized + ReadableContainerTraits> ReadableContainerTraits
    for UsageLogContainerAdapter<TContainer>
{
    fn node_kind(&self, path: &ContainerPath) -> Result<Option<NodeKind>, ContainerError> {
        let result = self.container.node_kind(path);
        self.log(format_args!("node_kind({path}) -> {result:?}"))?;
        result
    }

    fn attribute_names(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        let result = self.container.attribute_names(path);
        self.log(format_args!(
            "attribute_names({path}) -> {:?}",
            result.as_ref().map(|names| format!("[{}]", names.iter().format(", ")))
        ))?;
        result
    }

    fn attribute(
        &self,
        path: &ContainerPath,
        name: &str,
    ) -> Result<Option<ArrayValue>, ContainerError> {
        let result = self.container.attribute(path, name);
        self.log(format_args!(
            "attribute({path}, {name}) -> {:?}",
            result.as_ref().map(|value| value
                .as_ref()
                .map(|value| value.data().preview(4)))
        ))?;
        result
    }

    fn dataset_info(&self, path: &ContainerPath) -> Result<DatasetInfo, ContainerError> {
        let result = self.container.dataset_info(path);
        self.log(format_args!(
            "dataset_info({path}) -> {:?}",
            result
                .as_ref()
                .map(|info| format!("shape={:?}, data_type={}", info.shape(), info.data_type()))
        ))?;
        result
    }

    fn read_dataset(&self, path: &ContainerPath) -> Result<ArrayValue, ContainerError> {
        let result = self.container.read_dataset(path);
        self.log(format_args!(
            "read_dataset({path}) -> {:?}",
            result
                .as_ref()
                .map(|value| format!("shape={:?}", value.shape()))
        ))?;
        result
    }
}

impl<TContainer: ?Sized + ListableContainerTraits> ListableContainerTraits
    for UsageLogContainerAdapter<TContainer>
{
    fn children(&self, path: &ContainerPath) -> Result<Vec<String>, ContainerError> {
        let result = self.container.children(path);
        self.log(format_args!(
            "children({path}) -> {:?}",
            result
                .as_ref()
                .map(|children| format!("[{}]", children.iter().format(", ")))
        ))?;
        result
    }
}
