//! Decoded container elements.
//!
//! An [`Element`] is the decoded form of a single container node, whatever its encoding.
//! It is what the [element decoders](crate::encoding::ElementDecoderTraits) of the encoding registry produce,
//! and the node type of the `uns` metadata tree.

mod decode_error;

use std::collections::BTreeMap;

use derive_more::From;
use serde_json::{Map, Value};

pub use decode_error::DecodeError;
pub(crate) use decode_error::ContainerResultExt;

use crate::{
    annotation::RecordArray,
    array::{ArrayData, ArrayValue, ScalarValue},
    dataframe::{Categorical, DataFrame, NullableArray},
    matrix::SparseMatrix,
};

/// A decoded element.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Element {
    /// A rank-0 `numeric-scalar` or `string`.
    Scalar(ScalarValue),
    /// A dense `array` or `string-array` of any rank.
    Array(ArrayValue),
    /// A `csr_matrix` or `csc_matrix`.
    Sparse(SparseMatrix),
    /// A `dataframe`.
    DataFrame(DataFrame),
    /// A `categorical` array.
    Categorical(Categorical),
    /// A `nullable-integer`, `nullable-boolean` or `nullable-string-array`.
    Nullable(NullableArray),
    /// A `rec-array`.
    Records(RecordArray),
    /// A `dict`, with members in name order.
    Mapping(BTreeMap<String, Element>),
}

impl Element {
    /// Returns a short name of the element kind, such as `sparse` or `mapping`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Sparse(_) => "sparse",
            Self::DataFrame(_) => "dataframe",
            Self::Categorical(_) => "categorical",
            Self::Nullable(_) => "nullable",
            Self::Records(_) => "records",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Returns the shape of the element, or [`None`] for a mapping.
    ///
    /// A scalar has shape `[]`, a dataframe `[rows, columns]`, and one-dimensional elements `[len]`.
    #[must_use]
    pub fn shape(&self) -> Option<Vec<usize>> {
        match self {
            Self::Scalar(_) => Some(vec![]),
            Self::Array(array) => Some(array.shape().to_vec()),
            Self::Sparse(matrix) => Some(matrix.shape().to_vec()),
            Self::DataFrame(df) => Some(vec![df.n_rows(), df.n_columns()]),
            Self::Categorical(categorical) => Some(vec![categorical.len()]),
            Self::Nullable(nullable) => Some(vec![nullable.len()]),
            Self::Records(records) => Some(vec![records.len()]),
            Self::Mapping(_) => None,
        }
    }

    /// Returns the scalar value of a [`Element::Scalar`].
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&ScalarValue> {
        if let Self::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns the array of an [`Element::Array`].
    #[must_use]
    pub const fn as_array(&self) -> Option<&ArrayValue> {
        if let Self::Array(array) = self {
            Some(array)
        } else {
            None
        }
    }

    /// Returns the dataframe of an [`Element::DataFrame`].
    #[must_use]
    pub const fn as_dataframe(&self) -> Option<&DataFrame> {
        if let Self::DataFrame(df) = self {
            Some(df)
        } else {
            None
        }
    }

    /// Returns the members of an [`Element::Mapping`].
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&BTreeMap<String, Element>> {
        if let Self::Mapping(mapping) = self {
            Some(mapping)
        } else {
            None
        }
    }

    /// Returns the member `key` of a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.as_mapping()?.get(key)
    }

    /// Returns the nested member at the `/` separated `path` of a mapping, such as `nested/level1/level2`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|key| !key.is_empty())
            .try_fold(self, |element, key| element.get(key))
    }

    /// Convert the element to JSON.
    ///
    /// Arrays become nested lists following their shape, missing values of nullable and categorical arrays become `null`,
    /// record arrays become lists of objects, and mappings become objects.
    /// Sparse matrices and dataframes become objects describing their parts.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(value) => value.into(),
            Self::Array(array) => array_to_json(array.shape(), array.data()),
            Self::Sparse(matrix) => {
                let mut object = Map::new();
                object.insert("format".to_string(), matrix.format().to_string().into());
                object.insert("shape".to_string(), matrix.shape().to_vec().into());
                object.insert(
                    "dtype".to_string(),
                    serde_json::to_value(matrix.data().data_type()).unwrap_or_default(),
                );
                object.insert("indptr".to_string(), matrix.indptr().to_vec().into());
                object.insert("indices".to_string(), matrix.indices().to_vec().into());
                object.insert(
                    "data".to_string(),
                    array_to_json(&[matrix.nnz()], matrix.data()),
                );
                Value::Object(object)
            }
            Self::DataFrame(df) => {
                let mut columns = Map::new();
                for (name, column) in df.columns() {
                    let values = (0..column.len())
                        .map(|i| option_to_json(column.value(i).as_ref()))
                        .collect();
                    columns.insert(name.clone(), values);
                }
                let mut object = Map::new();
                object.insert(
                    "index".to_string(),
                    array_to_json(&[df.n_rows()], df.index().labels()),
                );
                object.insert("columns".to_string(), Value::Object(columns));
                Value::Object(object)
            }
            Self::Categorical(categorical) => (0..categorical.len())
                .map(|i| option_to_json(categorical.label(i).as_ref()))
                .collect(),
            Self::Nullable(nullable) => (0..nullable.len())
                .map(|i| option_to_json(nullable.get(i).as_ref()))
                .collect(),
            Self::Records(records) => (0..records.len())
                .filter_map(|i| records.record(i))
                .map(|record| {
                    Value::Object(
                        record
                            .into_iter()
                            .map(|(name, value)| (name.to_string(), Value::from(&value)))
                            .collect(),
                    )
                })
                .collect(),
            Self::Mapping(mapping) => Value::Object(
                mapping
                    .iter()
                    .map(|(key, element)| (key.clone(), element.to_json()))
                    .collect(),
            ),
        }
    }
}

fn option_to_json(value: Option<&ScalarValue>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn array_to_json(shape: &[usize], data: &ArrayData) -> Value {
    fn nest(shape: &[usize], data: &ArrayData, offset: usize) -> Value {
        match shape {
            [] => option_to_json(data.get(offset).as_ref()),
            [len, inner @ ..] => {
                let stride: usize = inner.iter().product();
                (0..*len)
                    .map(|i| nest(inner, data, offset + i * stride))
                    .collect()
            }
        }
    }
    nest(shape, data, 0)
}
