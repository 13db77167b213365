use itertools::Itertools;

use crate::{
    array::{ArrayData, DataType, ScalarValue},
    container::ContainerPath,
    element::{DecodeError, Element},
};

use super::{Categorical, NullableArray};

/// A dataframe column.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// A plain typed array.
    Array(ArrayData),
    /// A categorical array.
    Categorical(Categorical),
    /// An array with a missing-value mask.
    Nullable(NullableArray),
}

impl Column {
    /// Create a column from a decoded element.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidElement`] if `element` is not a one-dimensional array, a categorical or a nullable array.
    pub fn try_from_element(element: Element, path: &ContainerPath) -> Result<Self, DecodeError> {
        match element {
            Element::Array(array) if array.ndim() == 1 => Ok(Self::Array(array.into_data())),
            Element::Array(array) => Err(DecodeError::invalid(
                path,
                format!("column has shape {:?}, expected one dimension", array.shape()),
            )),
            Element::Categorical(categorical) => Ok(Self::Categorical(categorical)),
            Element::Nullable(nullable) => Ok(Self::Nullable(nullable)),
            other => Err(DecodeError::invalid(
                path,
                format!("a {} cannot be a dataframe column", other.kind()),
            )),
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Array(data) => data.len(),
            Self::Categorical(categorical) => categorical.len(),
            Self::Nullable(nullable) => nullable.len(),
        }
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the data type of the values, which for a categorical column is the data type of the categories.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Array(data) => data.data_type(),
            Self::Categorical(categorical) => categorical.categories().data_type(),
            Self::Nullable(nullable) => nullable.values().data_type(),
        }
    }

    /// Returns element `index`, or [`None`] if it is missing or out of bounds.
    ///
    /// The element of a categorical column is its category.
    #[must_use]
    pub fn value(&self, index: usize) -> Option<ScalarValue> {
        match self {
            Self::Array(data) => data.get(index),
            Self::Categorical(categorical) => categorical.label(index),
            Self::Nullable(nullable) => nullable.get(index),
        }
    }

    /// Returns the distinct elements in order of first appearance.
    ///
    /// Missing elements are included once as [`None`].
    /// The elements of a categorical column are its labels, so categories without any element are not included.
    #[must_use]
    pub fn unique(&self) -> Vec<Option<ScalarValue>> {
        (0..self.len())
            .map(|i| self.value(i))
            .unique_by(|value| value.as_ref().map(ScalarValue::key))
            .collect()
    }

    /// Returns the number of distinct elements, counting missing elements as one.
    #[must_use]
    pub fn n_unique(&self) -> usize {
        self.unique().len()
    }

    /// Returns the categorical array of a [`Column::Categorical`].
    #[must_use]
    pub const fn as_categorical(&self) -> Option<&Categorical> {
        if let Self::Categorical(categorical) = self {
            Some(categorical)
        } else {
            None
        }
    }

    /// Returns the nullable array of a [`Column::Nullable`].
    #[must_use]
    pub const fn as_nullable(&self) -> Option<&NullableArray> {
        if let Self::Nullable(nullable) = self {
            Some(nullable)
        } else {
            None
        }
    }
}
