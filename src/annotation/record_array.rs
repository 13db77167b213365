use crate::{
    array::{ArrayData, CompoundData, DataType, ScalarValue},
    config::DecodeOptions,
    container::{ContainerPath, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        ElementDecoder, ElementDecoderTraits, EncodingMetadata, EncodingPlugin, NodeLayout,
        REC_ARRAY,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.2.0";

// Register the record array decoder.
inventory::submit! {
    EncodingPlugin::new(REC_ARRAY, is_name_rec_array, create_decoder_rec_array)
}

fn is_name_rec_array(name: &str) -> bool {
    name.eq(REC_ARRAY)
}

fn rec_array_layout(layout: &NodeLayout) -> Result<(), String> {
    match layout.data_type() {
        Some(DataType::Compound(_)) => Ok(()),
        Some(data_type) => Err(format!("expected a compound dataset, found {data_type}")),
        None => Err("expected a compound dataset, found a group".to_string()),
    }
}

fn create_decoder_rec_array(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(REC_ARRAY, IMPLEMENTED_VERSION, rec_array_layout)?;
    rec_array_layout(metadata.layout())?;
    Ok(Box::new(RecordArrayDecoder))
}

/// A structured array of records with named, independently typed fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordArray {
    data: CompoundData,
}

impl RecordArray {
    /// Create a new record array.
    #[must_use]
    pub const fn new(data: CompoundData) -> Self {
        Self { data }
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.data.fields().iter().map(|(name, _)| name.as_str())
    }

    /// Returns the values of field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ArrayData> {
        self.data.field(name)
    }

    /// Returns record `index` as `(field, value)` pairs in field order, or [`None`] if out of bounds.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<Vec<(&str, ScalarValue)>> {
        if index >= self.len() {
            return None;
        }
        self.data
            .fields()
            .iter()
            .map(|(name, data)| Some((name.as_str(), data.get(index)?)))
            .collect()
    }

    /// Returns the field-major compound data.
    #[must_use]
    pub const fn data(&self) -> &CompoundData {
        &self.data
    }
}

/// The decoder of `rec-array` datasets.
#[derive(Debug)]
struct RecordArrayDecoder;

impl ElementDecoderTraits for RecordArrayDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        _options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        let value = container.read_dataset(path).with_path(path)?;
        if value.ndim() != 1 {
            return Err(DecodeError::invalid(
                path,
                format!("record array has shape {:?}, expected one dimension", value.shape()),
            ));
        }
        match value.into_data() {
            ArrayData::Compound(data) => Ok(Element::Records(RecordArray::new(data))),
            data => Err(DecodeError::invalid(
                path,
                format!("record array has data type {}", data.data_type()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_array_records() {
        let data = CompoundData::new(
            2,
            vec![
                (
                    "name".to_string(),
                    ArrayData::from(vec!["item_0".to_string(), "item_1".to_string()]),
                ),
                ("value".to_string(), ArrayData::from(vec![0.0f32, 2.0])),
                ("count".to_string(), ArrayData::from(vec![0i32, 1])),
            ],
        )
        .unwrap();
        let records = RecordArray::new(data);
        assert_eq!(records.len(), 2);
        assert_eq!(
            records.field_names().collect::<Vec<_>>(),
            vec!["name", "value", "count"]
        );
        assert_eq!(
            records.record(1).unwrap(),
            vec![
                ("name", ScalarValue::from("item_1")),
                ("value", ScalarValue::Float(2.0)),
                ("count", ScalarValue::Int(1)),
            ]
        );
        assert!(records.record(2).is_none());
        assert_eq!(
            records.field("count"),
            Some(&ArrayData::from(vec![0i32, 1]))
        );
    }
}
