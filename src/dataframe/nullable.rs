use derive_more::Display;

use crate::{
    array::{ArrayData, ScalarValue},
    config::DecodeOptions,
    container::{ContainerPath, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        member_path, ElementDecoder, ElementDecoderTraits, EncodingMetadata, EncodingPlugin,
        NodeLayout, NULLABLE_BOOLEAN, NULLABLE_INTEGER, NULLABLE_STRING_ARRAY,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.1.0";

// Register the nullable array decoders.
inventory::submit! {
    EncodingPlugin::new(NULLABLE_INTEGER, is_name_nullable_integer, create_decoder_nullable_integer)
}
inventory::submit! {
    EncodingPlugin::new(NULLABLE_BOOLEAN, is_name_nullable_boolean, create_decoder_nullable_boolean)
}
inventory::submit! {
    EncodingPlugin::new(NULLABLE_STRING_ARRAY, is_name_nullable_string_array, create_decoder_nullable_string_array)
}

fn is_name_nullable_integer(name: &str) -> bool {
    name.eq(NULLABLE_INTEGER)
}

fn is_name_nullable_boolean(name: &str) -> bool {
    name.eq(NULLABLE_BOOLEAN)
}

fn is_name_nullable_string_array(name: &str) -> bool {
    name.eq(NULLABLE_STRING_ARRAY)
}

fn nullable_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_children(&["values", "mask"])
}

fn create_decoder(
    metadata: &EncodingMetadata,
    identifier: &'static str,
    kind: NullableKind,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(identifier, IMPLEMENTED_VERSION, nullable_layout)?;
    nullable_layout(metadata.layout())?;
    Ok(Box::new(NullableDecoder { kind }))
}

fn create_decoder_nullable_integer(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    create_decoder(metadata, NULLABLE_INTEGER, NullableKind::Integer)
}

fn create_decoder_nullable_boolean(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    create_decoder(metadata, NULLABLE_BOOLEAN, NullableKind::Boolean)
}

fn create_decoder_nullable_string_array(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    create_decoder(metadata, NULLABLE_STRING_ARRAY, NullableKind::String)
}

/// The element kind of a [`NullableArray`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum NullableKind {
    /// Integers.
    #[display("nullable-integer")]
    Integer,
    /// Booleans.
    #[display("nullable-boolean")]
    Boolean,
    /// Strings.
    #[display("nullable-string-array")]
    String,
}

/// An array with a missing-value mask.
///
/// A `true` mask entry marks the element as missing, whatever its stored value.
#[derive(Clone, Debug, PartialEq)]
pub struct NullableArray {
    kind: NullableKind,
    values: ArrayData,
    mask: Vec<bool>,
}

impl NullableArray {
    /// Create a new nullable array.
    ///
    /// Integer values stored for a [`NullableKind::Boolean`] array are converted to booleans.
    ///
    /// # Errors
    /// Returns a description of the problem if `values` and `mask` differ in length or `values` do not match `kind`.
    pub fn new(kind: NullableKind, values: ArrayData, mask: Vec<bool>) -> Result<Self, String> {
        if values.len() != mask.len() {
            return Err(format!(
                "values has length {}, but mask has length {}",
                values.len(),
                mask.len()
            ));
        }
        let data_type = values.data_type();
        let values = match kind {
            NullableKind::Integer if data_type.is_integer() => Some(values),
            NullableKind::Boolean => values.to_bool_vec().map(ArrayData::Bool),
            NullableKind::String => values.as_strings().is_some().then_some(values),
            NullableKind::Integer => None,
        }
        .ok_or_else(|| format!("{kind} values have data type {data_type}"))?;
        Ok(Self { kind, values, mask })
    }

    /// Returns the element kind.
    #[must_use]
    pub const fn kind(&self) -> NullableKind {
        self.kind
    }

    /// Returns the stored values, including those at masked positions.
    #[must_use]
    pub const fn values(&self) -> &ArrayData {
        &self.values
    }

    /// Returns the mask.
    #[must_use]
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Returns the number of missing elements.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.mask.iter().filter(|missing| **missing).count()
    }

    /// Returns true if element `index` is missing.
    #[must_use]
    pub fn is_missing(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Returns element `index`, or [`None`] if it is missing or out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        if self.is_missing(index) {
            None
        } else {
            self.values.get(index)
        }
    }
}

/// The decoder of nullable array groups.
#[derive(Debug)]
struct NullableDecoder {
    kind: NullableKind,
}

impl ElementDecoderTraits for NullableDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        _options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        let values_path = member_path(path, "values")?;
        let values = container
            .read_dataset(&values_path)
            .with_path(&values_path)?
            .into_data();
        let mask_path = member_path(path, "mask")?;
        let mask = container.read_dataset(&mask_path).with_path(&mask_path)?;
        let mask = mask.data().to_bool_vec().ok_or_else(|| {
            DecodeError::invalid(
                &mask_path,
                format!("mask has data type {}", mask.data_type()),
            )
        })?;
        NullableArray::new(self.kind, values, mask)
            .map(Element::Nullable)
            .map_err(|reason| DecodeError::invalid(path, reason))
    }
}
