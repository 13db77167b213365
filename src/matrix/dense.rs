//! Dense arrays.

use crate::{
    array::DataType,
    config::DecodeOptions,
    container::{ContainerPath, NodeKind, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        ElementDecoder, ElementDecoderTraits, EncodingMetadata, EncodingPlugin, NodeLayout, ARRAY,
        STRING_ARRAY,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.2.0";

// Register the dense array decoders.
inventory::submit! {
    EncodingPlugin::new(ARRAY, is_name_array, create_decoder_array)
}
inventory::submit! {
    EncodingPlugin::new(STRING_ARRAY, is_name_string_array, create_decoder_string_array)
}

fn is_name_array(name: &str) -> bool {
    name.eq(ARRAY)
}

fn is_name_string_array(name: &str) -> bool {
    name.eq(STRING_ARRAY)
}

fn dataset_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_kind(NodeKind::Dataset)
}

fn create_decoder_array(metadata: &EncodingMetadata) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(ARRAY, IMPLEMENTED_VERSION, dataset_layout)?;
    dataset_layout(metadata.layout())?;
    Ok(Box::new(DenseArrayDecoder))
}

fn create_decoder_string_array(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(STRING_ARRAY, IMPLEMENTED_VERSION, dataset_layout)?;
    dataset_layout(metadata.layout())?;
    match metadata.layout().data_type() {
        Some(DataType::String) => Ok(Box::new(DenseArrayDecoder)),
        Some(data_type) => Err(format!("string-array has data type {data_type}").into()),
        None => Err("string-array is not a dataset".into()),
    }
}

/// The decoder of `array` and `string-array` datasets.
#[derive(Debug)]
struct DenseArrayDecoder;

impl ElementDecoderTraits for DenseArrayDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        _options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        let array = container.read_dataset(path).with_path(path)?;
        Ok(Element::Array(array))
    }
}
