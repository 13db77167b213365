//! Typed n-dimensional array values.
//!
//! An [`ArrayValue`] is what a container hands back for a dataset or an attribute: a shape and
//! the elements in row-major order as [`ArrayData`].
//! A rank-0 array (empty shape) holds exactly one element and represents a scalar.

mod array_data;
mod data_type;
mod scalar;

pub use array_data::{ArrayData, CompoundData, CompoundDataError};
pub use data_type::{CompoundField, DataType, UnsupportedDataTypeError};
pub use scalar::ScalarValue;

use thiserror::Error;

/// An array shape error.
#[derive(Debug, Error)]
#[error("array shape {shape:?} holds {expected} elements, but {found} were provided")]
pub struct ArrayShapeError {
    shape: Vec<usize>,
    expected: usize,
    found: usize,
}

/// A typed n-dimensional array in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    shape: Vec<usize>,
    data: ArrayData,
}

impl ArrayValue {
    /// Create a new array value with `shape`.
    ///
    /// # Errors
    /// Returns an [`ArrayShapeError`] if the number of elements in `data` does not match `shape`.
    pub fn new(shape: Vec<usize>, data: ArrayData) -> Result<Self, ArrayShapeError> {
        let expected = shape.iter().product::<usize>();
        if expected == data.len() {
            Ok(Self { shape, data })
        } else {
            Err(ArrayShapeError {
                shape,
                expected,
                found: data.len(),
            })
        }
    }

    /// Create a rank-0 array holding `value`.
    #[must_use]
    pub fn new_scalar(value: impl Into<ScalarValue>) -> Self {
        let data = match value.into() {
            ScalarValue::Bool(value) => ArrayData::Bool(vec![value]),
            ScalarValue::Int(value) => ArrayData::Int64(vec![value]),
            ScalarValue::UInt(value) => ArrayData::UInt64(vec![value]),
            ScalarValue::Float(value) => ArrayData::Float64(vec![value]),
            ScalarValue::String(value) => ArrayData::String(vec![value]),
        };
        Self {
            shape: vec![],
            data,
        }
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the data type of the elements.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    /// Returns the elements.
    #[must_use]
    pub const fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Consume the array and return its elements.
    #[must_use]
    pub fn into_data(self) -> ArrayData {
        self.data
    }

    /// Returns the element at the multi-dimensional `indices`, or [`None`] if out of bounds.
    #[must_use]
    pub fn get(&self, indices: &[usize]) -> Option<ScalarValue> {
        if indices.len() != self.shape.len()
            || indices.iter().zip(&self.shape).any(|(i, n)| i >= n)
        {
            return None;
        }
        let offset = indices
            .iter()
            .zip(&self.shape)
            .fold(0, |offset, (i, n)| offset * n + i);
        self.data.get(offset)
    }

    /// Returns the single element of a rank-0 or single element array.
    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarValue> {
        if self.data.len() == 1 {
            self.data.get(0)
        } else {
            None
        }
    }

    /// Returns the single element as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.data.as_strings()? {
            [value] => Some(value),
            _ => None,
        }
    }

    /// Returns the elements as a list of strings.
    ///
    /// A single string is a one element list.
    /// An empty numeric array is an empty list, since `h5py` stores empty lists as `float64`.
    #[must_use]
    pub fn to_string_list(&self) -> Option<Vec<String>> {
        match &self.data {
            ArrayData::String(values) => Some(values.clone()),
            data if data.is_empty() && data.data_type().is_numeric() => Some(vec![]),
            _ => None,
        }
    }
}

impl From<ArrayData> for ArrayValue {
    /// Create a one-dimensional array.
    fn from(data: ArrayData) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }
}

impl From<ScalarValue> for ArrayValue {
    fn from(value: ScalarValue) -> Self {
        Self::new_scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_value_shape() {
        let array = ArrayValue::new(vec![2, 3], ArrayData::from(vec![0i32, 1, 2, 3, 4, 5])).unwrap();
        assert_eq!(array.ndim(), 2);
        assert_eq!(array.len(), 6);
        assert_eq!(array.get(&[1, 0]), Some(ScalarValue::Int(3)));
        assert_eq!(array.get(&[1, 2]), Some(ScalarValue::Int(5)));
        assert_eq!(array.get(&[2, 0]), None);
        assert_eq!(array.get(&[0]), None);
        assert!(ArrayValue::new(vec![2, 2], ArrayData::from(vec![0i32])).is_err());
        assert!(ArrayValue::new(vec![0, 4], ArrayData::from(Vec::<f32>::new())).is_ok());
    }

    #[test]
    fn array_value_scalar() {
        let scalar = ArrayValue::new_scalar("dataframe");
        assert_eq!(scalar.ndim(), 0);
        assert_eq!(scalar.as_str(), Some("dataframe"));
        assert_eq!(scalar.get(&[]), Some(ScalarValue::from("dataframe")));
        assert_eq!(
            ArrayValue::new_scalar(true).as_scalar(),
            Some(ScalarValue::Bool(true))
        );
        assert_eq!(ArrayValue::new_scalar(1.5).as_str(), None);
    }

    #[test]
    fn array_value_string_list() {
        let list = ArrayValue::from(ArrayData::from(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(
            list.to_string_list(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        let empty = ArrayValue::from(ArrayData::from(Vec::<f64>::new()));
        assert_eq!(empty.to_string_list(), Some(vec![]));
        let numbers = ArrayValue::from(ArrayData::from(vec![1.0f64]));
        assert_eq!(numbers.to_string_list(), None);
    }
}
