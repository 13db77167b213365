//! The annotation tree.
//!
//! `uns` is a free-form tree of `dict` groups whose leaves are scalars, arrays, record arrays,
//! or any other registered element. Mappings are decoded recursively with no depth limit.

mod record_array;

pub use record_array::RecordArray;

use std::collections::BTreeMap;

use crate::{
    array::DataType,
    config::DecodeOptions,
    container::{ContainerPath, NodeKind, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        decode_element, member_path, ElementDecoder, ElementDecoderTraits, EncodingMetadata,
        EncodingPlugin, NodeLayout, DICT, NUMERIC_SCALAR, STRING,
    },
    plugin::PluginCreateError,
};

const DICT_VERSION: &str = "0.1.0";
const SCALAR_VERSION: &str = "0.2.0";

// Register the mapping and scalar decoders.
inventory::submit! {
    EncodingPlugin::new(DICT, is_name_dict, create_decoder_dict)
}
inventory::submit! {
    EncodingPlugin::new(NUMERIC_SCALAR, is_name_numeric_scalar, create_decoder_numeric_scalar)
}
inventory::submit! {
    EncodingPlugin::new(STRING, is_name_string, create_decoder_string)
}

fn is_name_dict(name: &str) -> bool {
    name.eq(DICT)
}

fn is_name_numeric_scalar(name: &str) -> bool {
    name.eq(NUMERIC_SCALAR)
}

fn is_name_string(name: &str) -> bool {
    name.eq(STRING)
}

fn dict_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_kind(NodeKind::Group)
}

fn scalar_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_kind(NodeKind::Dataset)?;
    match layout.ndim() {
        Some(0) => Ok(()),
        ndim => Err(format!("expected a rank-0 dataset, found rank {}", ndim.unwrap_or(0))),
    }
}

fn create_decoder_dict(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(DICT, DICT_VERSION, dict_layout)?;
    dict_layout(metadata.layout())?;
    Ok(Box::new(MappingDecoder))
}

fn create_decoder_numeric_scalar(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(NUMERIC_SCALAR, SCALAR_VERSION, scalar_layout)?;
    scalar_layout(metadata.layout())?;
    match metadata.layout().data_type() {
        Some(data_type) if data_type.is_numeric() || *data_type == DataType::Bool => {
            Ok(Box::new(ScalarDecoder))
        }
        Some(data_type) => Err(format!("numeric-scalar has data type {data_type}").into()),
        None => Err("numeric-scalar is not a dataset".into()),
    }
}

fn create_decoder_string(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(STRING, SCALAR_VERSION, scalar_layout)?;
    scalar_layout(metadata.layout())?;
    match metadata.layout().data_type() {
        Some(DataType::String) => Ok(Box::new(ScalarDecoder)),
        Some(data_type) => Err(format!("string has data type {data_type}").into()),
        None => Err("string is not a dataset".into()),
    }
}

/// The decoder of rank-0 `numeric-scalar` and `string` datasets.
#[derive(Debug)]
struct ScalarDecoder;

impl ElementDecoderTraits for ScalarDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        _options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        let value = container.read_dataset(path).with_path(path)?;
        value
            .as_scalar()
            .map(Element::Scalar)
            .ok_or_else(|| DecodeError::invalid(path, "scalar dataset holds no value"))
    }
}

/// The decoder of `dict` groups.
#[derive(Debug)]
struct MappingDecoder;

impl ElementDecoderTraits for MappingDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        decode_mapping(container, path, options).map(Element::Mapping)
    }
}

/// Decode every member of the group at `path` through the registry.
///
/// If [`DecodeOptions::skip_unsupported_uns_entries`] is enabled, members with an unsupported or incompatible encoding are logged and omitted.
/// [`AnnData::from_container`](crate::AnnData::from_container) only enables it below `uns`.
///
/// # Errors
/// Returns the [`DecodeError`] of the first member that cannot be decoded.
pub fn decode_mapping(
    container: &dyn ReadableListableContainerTraits,
    path: &ContainerPath,
    options: &DecodeOptions,
) -> Result<BTreeMap<String, Element>, DecodeError> {
    let mut mapping = BTreeMap::new();
    for name in container.children(path).with_path(path)? {
        let member = member_path(path, &name)?;
        match decode_element(container, &member, options) {
            Ok(element) => {
                mapping.insert(name, element);
            }
            Err(err) if err.is_unsupported_encoding() && options.skip_unsupported_uns_entries() => {
                tracing::warn!(path = %member, error = %err, "skipping unsupported element");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(mapping)
}
