//! The encoding registry and type resolver.
//!
//! Every element of an `.h5ad` container declares how it is stored with an `encoding-type` / `encoding-version` attribute pair.
//! The pair and the layout of the node carrying it form the [`EncodingMetadata`] of an element, which selects a registered
//! [`EncodingPlugin`] creating an [element decoder](ElementDecoderTraits).
//!
//! | `encoding-type` | implemented version | node |
//! |---|---|---|
//! | `array` | 0.2.0 | dataset |
//! | `string-array` | 0.2.0 | dataset |
//! | `csr_matrix`, `csc_matrix` | 0.1.0 | group: `data`, `indices`, `indptr` |
//! | `dataframe` | 0.2.0 | group |
//! | `categorical` | 0.2.0 | group: `codes`, `categories` |
//! | `nullable-integer`, `nullable-boolean`, `nullable-string-array` | 0.1.0 | group: `values`, `mask` |
//! | `numeric-scalar`, `string` | 0.2.0 | rank-0 dataset |
//! | `dict` | 0.1.0 | group |
//! | `rec-array` | 0.2.0 | compound dataset |
//!
//! Elements without an `encoding-type` attribute are resolved from their layout:
//!  - a dataset is an `array` (`string-array` for strings, `rec-array` for compounds, `numeric-scalar` or `string` if rank-0),
//!  - a group is a `dataframe` if it has an `_index` attribute, otherwise a `dict`.
//!
//! A declared version that differs from the implemented version is accepted if the layout of the node is compatible,
//! and rejected with [`DecodeError::VersionMismatch`] otherwise.

use crate::{
    array::DataType,
    config::DecodeOptions,
    container::{
        string_attribute, ContainerPath, NodeKind, ReadableContainerTraits,
        ReadableListableContainerTraits,
    },
    element::{ContainerResultExt, DecodeError, Element},
    plugin::{Plugin, PluginCreateError, PluginUnsupportedError, PluginVersionMismatchError},
};

/// The `encoding-type` attribute name.
pub const ENCODING_TYPE: &str = "encoding-type";
/// The `encoding-version` attribute name.
pub const ENCODING_VERSION: &str = "encoding-version";

/// Dense array.
pub const ARRAY: &str = "array";
/// Array of strings.
pub const STRING_ARRAY: &str = "string-array";
/// Compressed sparse row matrix.
pub const CSR_MATRIX: &str = "csr_matrix";
/// Compressed sparse column matrix.
pub const CSC_MATRIX: &str = "csc_matrix";
/// Dataframe.
pub const DATAFRAME: &str = "dataframe";
/// Categorical array.
pub const CATEGORICAL: &str = "categorical";
/// Nullable integer array.
pub const NULLABLE_INTEGER: &str = "nullable-integer";
/// Nullable boolean array.
pub const NULLABLE_BOOLEAN: &str = "nullable-boolean";
/// Nullable string array.
pub const NULLABLE_STRING_ARRAY: &str = "nullable-string-array";
/// Numeric scalar.
pub const NUMERIC_SCALAR: &str = "numeric-scalar";
/// String scalar.
pub const STRING: &str = "string";
/// Mapping.
pub const DICT: &str = "dict";
/// Record (structured) array.
pub const REC_ARRAY: &str = "rec-array";
/// The root group of an `AnnData` container.
pub const ANNDATA: &str = "anndata";

/// The layout of a container node: its kind, members and attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeLayout {
    kind: NodeKind,
    children: Vec<String>,
    attributes: Vec<String>,
    data_type: Option<DataType>,
    ndim: Option<usize>,
}

impl NodeLayout {
    /// Create a new node layout.
    ///
    /// `data_type` and `ndim` describe a dataset and are [`None`] for a group.
    #[must_use]
    pub fn new(
        kind: NodeKind,
        children: Vec<String>,
        attributes: Vec<String>,
        dataset: Option<(DataType, usize)>,
    ) -> Self {
        let (data_type, ndim) = dataset.unzip();
        Self {
            kind,
            children,
            attributes,
            data_type,
            ndim,
        }
    }

    /// Read the layout of the node at `path`.
    ///
    /// # Errors
    /// Returns [`DecodeError::NotFound`] if there is no node at `path`, or [`DecodeError::ContainerOpen`] if it cannot be read.
    pub fn read(
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
    ) -> Result<Self, DecodeError> {
        let kind = container
            .node_kind(path)
            .with_path(path)?
            .ok_or_else(|| DecodeError::NotFound { path: path.clone() })?;
        let attributes = container.attribute_names(path).with_path(path)?;
        Ok(match kind {
            NodeKind::Group => Self::new(
                kind,
                container.children(path).with_path(path)?,
                attributes,
                None,
            ),
            NodeKind::Dataset => {
                let info = container.dataset_info(path).with_path(path)?;
                Self::new(
                    kind,
                    vec![],
                    attributes,
                    Some((info.data_type().clone(), info.ndim())),
                )
            }
        })
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the member names of a group.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Returns the attribute names.
    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Returns the data type of a dataset.
    #[must_use]
    pub const fn data_type(&self) -> Option<&DataType> {
        self.data_type.as_ref()
    }

    /// Returns the number of dimensions of a dataset.
    #[must_use]
    pub const fn ndim(&self) -> Option<usize> {
        self.ndim
    }

    /// Returns true if the node has a member `name`.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|child| child == name)
    }

    /// Returns true if the node has an attribute `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute == name)
    }

    /// Check the node is of `kind`.
    ///
    /// # Errors
    /// Returns a description of the difference if it is not.
    pub fn require_kind(&self, kind: NodeKind) -> Result<(), String> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(format!("expected a {kind:?}, found a {:?}", self.kind).to_lowercase())
        }
    }

    /// Check the node is a group holding all of `children`.
    ///
    /// # Errors
    /// Returns a description of the first missing member if it is not.
    pub fn require_children(&self, children: &[&str]) -> Result<(), String> {
        self.require_kind(NodeKind::Group)?;
        match children.iter().find(|child| !self.has_child(child)) {
            Some(child) => Err(format!("missing member {child}")),
            None => Ok(()),
        }
    }
}

/// The encoding of a container element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingMetadata {
    encoding_type: String,
    encoding_version: Option<String>,
    layout: NodeLayout,
}

impl EncodingMetadata {
    /// Create new encoding metadata.
    ///
    /// An `encoding_version` of [`None`] is compatible with any implemented version.
    #[must_use]
    pub fn new(
        encoding_type: impl Into<String>,
        encoding_version: Option<&str>,
        layout: NodeLayout,
    ) -> Self {
        Self {
            encoding_type: encoding_type.into(),
            encoding_version: encoding_version.map(str::to_string),
            layout,
        }
    }

    /// Read the encoding metadata of the element at `path`.
    ///
    /// If the element has no `encoding-type` attribute, the encoding is resolved from the node layout.
    ///
    /// # Errors
    /// Returns [`DecodeError::NotFound`] if there is no node at `path`, or [`DecodeError::ContainerOpen`] if it cannot be read.
    pub fn read(
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
    ) -> Result<Self, DecodeError> {
        let layout = NodeLayout::read(container, path)?;
        let encoding_type = if layout.has_attribute(ENCODING_TYPE) {
            string_attribute(container, path, ENCODING_TYPE).with_path(path)?
        } else {
            None
        };
        let encoding_version = if layout.has_attribute(ENCODING_VERSION) {
            string_attribute(container, path, ENCODING_VERSION).with_path(path)?
        } else {
            None
        };
        let metadata = match encoding_type {
            Some(encoding_type) => Self {
                encoding_type,
                encoding_version,
                layout,
            },
            None => {
                let encoding_type = infer_encoding_type(&layout);
                tracing::trace!(path = %path, encoding_type, "resolved encoding from layout");
                Self::new(encoding_type, None, layout)
            }
        };
        Ok(metadata)
    }

    /// Returns the `encoding-type`.
    #[must_use]
    pub fn encoding_type(&self) -> &str {
        &self.encoding_type
    }

    /// Returns the `encoding-version`, or [`None`] if it was not declared.
    #[must_use]
    pub fn encoding_version(&self) -> Option<&str> {
        self.encoding_version.as_deref()
    }

    /// Returns the node layout.
    #[must_use]
    pub const fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    /// Check that the declared version can be decoded by an implementation of `implemented`.
    ///
    /// A version differing from `implemented` is accepted if `layout_check` accepts the node layout.
    ///
    /// # Errors
    /// Returns [`PluginCreateError::VersionMismatch`] if the version differs and the layout is incompatible.
    pub fn check_version(
        &self,
        identifier: &'static str,
        implemented: &'static str,
        layout_check: impl FnOnce(&NodeLayout) -> Result<(), String>,
    ) -> Result<(), PluginCreateError> {
        match self.encoding_version() {
            None => Ok(()),
            Some(version) if version == implemented => Ok(()),
            Some(version) => match layout_check(&self.layout) {
                Ok(()) => {
                    tracing::debug!(
                        encoding_type = identifier,
                        version,
                        implemented,
                        "accepting compatible encoding version"
                    );
                    Ok(())
                }
                Err(reason) => Err(PluginVersionMismatchError::new(
                    identifier,
                    version.to_string(),
                    implemented,
                    reason,
                )
                .into()),
            },
        }
    }
}

fn infer_encoding_type(layout: &NodeLayout) -> &'static str {
    match (layout.kind(), layout.data_type(), layout.ndim()) {
        (NodeKind::Group, _, _) if layout.has_attribute("_index") => DATAFRAME,
        (NodeKind::Group, _, _) => DICT,
        (NodeKind::Dataset, Some(DataType::Compound(_)), _) => REC_ARRAY,
        (NodeKind::Dataset, Some(DataType::String), Some(0)) => STRING,
        (NodeKind::Dataset, _, Some(0)) => NUMERIC_SCALAR,
        (NodeKind::Dataset, Some(DataType::String), _) => STRING_ARRAY,
        (NodeKind::Dataset, _, _) => ARRAY,
    }
}

/// Element decoder traits.
pub trait ElementDecoderTraits {
    /// Decode the element at `path`.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if the element is missing, malformed or cannot be read.
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        options: &DecodeOptions,
    ) -> Result<Element, DecodeError>;
}

/// A boxed element decoder.
pub type ElementDecoder = Box<dyn ElementDecoderTraits>;

/// An encoding plugin.
pub type EncodingPlugin = Plugin<ElementDecoder>;
inventory::collect!(EncodingPlugin);

/// Create an element decoder from encoding metadata.
///
/// # Errors
/// Returns [`PluginCreateError::Unsupported`] if no registered plugin matches the `encoding-type`,
/// or the plugin error if the matching plugin rejects the metadata.
pub fn element_decoder(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    for plugin in inventory::iter::<EncodingPlugin> {
        if plugin.match_name(metadata.encoding_type()) {
            return plugin.create(metadata);
        }
    }
    Err(PluginUnsupportedError::new(
        metadata.encoding_type().to_string(),
        metadata.encoding_version().unwrap_or("unspecified").to_string(),
        "encoding".to_string(),
    )
    .into())
}

/// Decode the element at `path` through the registry.
///
/// # Errors
/// Returns a [`DecodeError`] if the element encoding is unsupported or the element cannot be decoded.
pub fn decode_element(
    container: &dyn ReadableListableContainerTraits,
    path: &ContainerPath,
    options: &DecodeOptions,
) -> Result<Element, DecodeError> {
    let metadata = EncodingMetadata::read(container, path)?;
    let decoder =
        element_decoder(&metadata).map_err(|err| DecodeError::from_plugin(path, &metadata, err))?;
    tracing::debug!(
        path = %path,
        encoding_type = metadata.encoding_type(),
        encoding_version = metadata.encoding_version(),
        "decoding element"
    );
    decoder.decode(container, path, options)
}

/// Returns the path of member `name` of the group at `path`.
pub(crate) fn member_path(path: &ContainerPath, name: &str) -> Result<ContainerPath, DecodeError> {
    path.join(name)
        .map_err(|err| DecodeError::invalid(path, err.to_string()))
}
