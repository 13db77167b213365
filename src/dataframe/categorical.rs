use num::ToPrimitive;

use crate::{
    array::{ArrayData, ScalarValue},
    config::DecodeOptions,
    container::{ContainerPath, ReadableListableContainerTraits},
    element::{ContainerResultExt, DecodeError, Element},
    encoding::{
        decode_element, member_path, ElementDecoder, ElementDecoderTraits, EncodingMetadata,
        EncodingPlugin, NodeLayout, CATEGORICAL,
    },
    plugin::PluginCreateError,
};

const IMPLEMENTED_VERSION: &str = "0.2.0";

// Register the categorical decoder.
inventory::submit! {
    EncodingPlugin::new(CATEGORICAL, is_name_categorical, create_decoder_categorical)
}

fn is_name_categorical(name: &str) -> bool {
    name.eq(CATEGORICAL)
}

fn categorical_layout(layout: &NodeLayout) -> Result<(), String> {
    layout.require_children(&["codes", "categories"])
}

fn create_decoder_categorical(
    metadata: &EncodingMetadata,
) -> Result<ElementDecoder, PluginCreateError> {
    metadata.check_version(CATEGORICAL, IMPLEMENTED_VERSION, categorical_layout)?;
    categorical_layout(metadata.layout())?;
    Ok(Box::new(CategoricalDecoder))
}

/// A categorical array: integer codes into a list of categories.
///
/// A code of `-1` is a missing value.
#[derive(Clone, Debug, PartialEq)]
pub struct Categorical {
    codes: Vec<i64>,
    categories: ArrayData,
    ordered: bool,
}

impl Categorical {
    /// Create a new categorical array.
    ///
    /// # Errors
    /// Returns a description of the first code that is neither `-1` nor a valid category position.
    pub fn new(codes: Vec<i64>, categories: ArrayData, ordered: bool) -> Result<Self, String> {
        let n_categories = categories.len();
        if let Some(code) = codes
            .iter()
            .find(|code| **code < -1 || code.to_usize().is_some_and(|i| i >= n_categories))
        {
            return Err(format!(
                "code {code} is out of range for {n_categories} categories"
            ));
        }
        Ok(Self {
            codes,
            categories,
            ordered,
        })
    }

    /// Returns the codes.
    #[must_use]
    pub fn codes(&self) -> &[i64] {
        &self.codes
    }

    /// Returns the categories.
    #[must_use]
    pub const fn categories(&self) -> &ArrayData {
        &self.categories
    }

    /// Returns true if the categories are ordered.
    #[must_use]
    pub const fn ordered(&self) -> bool {
        self.ordered
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns the category of element `index`, or [`None`] if it is missing or out of bounds.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<ScalarValue> {
        let code = self.codes.get(index)?.to_usize()?;
        self.categories.get(code)
    }

    /// Returns the category of every element, with [`None`] for missing elements.
    #[must_use]
    pub fn labels(&self) -> Vec<Option<ScalarValue>> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }
}

/// The decoder of `categorical` groups.
#[derive(Debug)]
struct CategoricalDecoder;

impl ElementDecoderTraits for CategoricalDecoder {
    fn decode(
        &self,
        container: &dyn ReadableListableContainerTraits,
        path: &ContainerPath,
        options: &DecodeOptions,
    ) -> Result<Element, DecodeError> {
        let codes_path = member_path(path, "codes")?;
        let codes = container.read_dataset(&codes_path).with_path(&codes_path)?;
        let codes = codes.data().to_i64_vec().ok_or_else(|| {
            DecodeError::invalid(
                &codes_path,
                format!("categorical codes have data type {}", codes.data_type()),
            )
        })?;

        let categories_path = member_path(path, "categories")?;
        let categories = match decode_element(container, &categories_path, options)? {
            Element::Array(array) if array.ndim() == 1 => array.into_data(),
            other => {
                return Err(DecodeError::invalid(
                    &categories_path,
                    format!("expected one-dimensional categories, found a {}", other.kind()),
                ))
            }
        };

        let ordered = match container.attribute(path, "ordered").with_path(path)? {
            Some(ordered) => ordered
                .as_scalar()
                .and_then(|ordered| ordered.as_bool())
                .ok_or_else(|| DecodeError::invalid(path, "ordered attribute is not a boolean"))?,
            None => false,
        };

        Categorical::new(codes, categories, ordered)
            .map(Element::Categorical)
            .map_err(|reason| DecodeError::invalid(path, reason))
    }
}
