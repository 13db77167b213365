use derive_more::From;
use itertools::Itertools;

use super::{CompoundField, DataType, ScalarValue};

/// The elements of a one-dimensional typed array.
#[derive(Clone, Debug, PartialEq, From)]
pub enum ArrayData {
    /// Booleans.
    Bool(Vec<bool>),
    /// 8-bit signed integers.
    Int8(Vec<i8>),
    /// 16-bit signed integers.
    Int16(Vec<i16>),
    /// 32-bit signed integers.
    Int32(Vec<i32>),
    /// 64-bit signed integers.
    Int64(Vec<i64>),
    /// 8-bit unsigned integers.
    UInt8(Vec<u8>),
    /// 16-bit unsigned integers.
    UInt16(Vec<u16>),
    /// 32-bit unsigned integers.
    UInt32(Vec<u32>),
    /// 64-bit unsigned integers.
    UInt64(Vec<u64>),
    /// Single precision floats.
    Float32(Vec<f32>),
    /// Double precision floats.
    Float64(Vec<f64>),
    /// UTF-8 strings.
    String(Vec<String>),
    /// Records with named fields, stored field-major.
    Compound(CompoundData),
}

/// Field-major storage of compound (record) elements.
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundData {
    len: usize,
    fields: Vec<(String, ArrayData)>,
}

/// A compound data error.
#[derive(Debug, thiserror::Error)]
#[error("compound field {field} has {found} elements, expected {expected}")]
pub struct CompoundDataError {
    field: String,
    expected: usize,
    found: usize,
}

impl CompoundData {
    /// Create compound data with `len` records from its fields.
    ///
    /// # Errors
    /// Returns a [`CompoundDataError`] if any field does not have `len` elements.
    pub fn new(len: usize, fields: Vec<(String, ArrayData)>) -> Result<Self, CompoundDataError> {
        if let Some((field, data)) = fields.iter().find(|(_, data)| data.len() != len) {
            return Err(CompoundDataError {
                field: field.clone(),
                expected: len,
                found: data.len(),
            });
        }
        Ok(Self { len, fields })
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(String, ArrayData)] {
        &self.fields
    }

    /// Returns the data of the field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ArrayData> {
        self.fields
            .iter()
            .find_map(|(field, data)| (field == name).then_some(data))
    }
}

macro_rules! dispatch {
    ($self:expr, $v:ident => $body:expr, $compound:ident => $compound_body:expr) => {
        match $self {
            ArrayData::Bool($v) => $body,
            ArrayData::Int8($v) => $body,
            ArrayData::Int16($v) => $body,
            ArrayData::Int32($v) => $body,
            ArrayData::Int64($v) => $body,
            ArrayData::UInt8($v) => $body,
            ArrayData::UInt16($v) => $body,
            ArrayData::UInt32($v) => $body,
            ArrayData::UInt64($v) => $body,
            ArrayData::Float32($v) => $body,
            ArrayData::Float64($v) => $body,
            ArrayData::String($v) => $body,
            ArrayData::Compound($compound) => $compound_body,
        }
    };
}

macro_rules! numeric_vec {
    ($self:expr, $convert:expr) => {{
        let convert = $convert;
        match $self {
            ArrayData::Int8(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            ArrayData::Int16(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            ArrayData::Int32(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            ArrayData::Int64(v) => Some(v.iter().map(|x| convert(*x)).collect()),
            ArrayData::UInt8(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            ArrayData::UInt16(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            ArrayData::UInt32(v) => Some(v.iter().map(|x| convert(i64::from(*x))).collect()),
            _ => None,
        }
    }};
}

impl ArrayData {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len(), c => c.len())
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the data type of the elements.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt8(_) => DataType::UInt8,
            Self::UInt16(_) => DataType::UInt16,
            Self::UInt32(_) => DataType::UInt32,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::String(_) => DataType::String,
            Self::Compound(compound) => DataType::Compound(
                compound
                    .fields()
                    .iter()
                    .map(|(name, data)| CompoundField::new(name.clone(), data.data_type()))
                    .collect(),
            ),
        }
    }

    /// Returns the element at `index`, or [`None`] if out of bounds or compound.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ScalarValue> {
        dispatch!(self, v => v.get(index).cloned().map(ScalarValue::from), _c => None)
    }

    /// Returns the elements as `f64`, or [`None`] if the elements are not numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            Self::UInt64(v) => Some(v.iter().map(|x| *x as f64).collect()),
            Self::Float32(v) => Some(v.iter().copied().map(f64::from).collect()),
            Self::Float64(v) => Some(v.clone()),
            other => numeric_vec!(other, |x: i64| x as f64),
        }
    }

    /// Returns the elements as `i64`, or [`None`] if the elements are not integers representable as `i64`.
    #[must_use]
    pub fn to_i64_vec(&self) -> Option<Vec<i64>> {
        match self {
            Self::UInt64(v) => v.iter().map(|x| i64::try_from(*x).ok()).collect(),
            other => numeric_vec!(other, |x: i64| x),
        }
    }

    /// Returns the elements as `usize`, or [`None`] if the elements are not non-negative integers.
    ///
    /// Used for sparse index arrays, which `scipy` writes as `int32` or `int64`.
    #[must_use]
    pub fn to_usize_vec(&self) -> Option<Vec<usize>> {
        match self {
            Self::UInt64(v) => v.iter().map(|x| usize::try_from(*x).ok()).collect(),
            other => other
                .to_i64_vec()?
                .into_iter()
                .map(|x| usize::try_from(x).ok())
                .collect(),
        }
    }

    /// Returns the elements as booleans, or [`None`] if the elements are not booleans or integers.
    ///
    /// Integer elements are interpreted as non-zero is true.
    #[must_use]
    pub fn to_bool_vec(&self) -> Option<Vec<bool>> {
        match self {
            Self::Bool(v) => Some(v.clone()),
            Self::UInt64(v) => Some(v.iter().map(|x| *x != 0).collect()),
            other => Some(other.to_i64_vec()?.into_iter().map(|x| x != 0).collect()),
        }
    }

    /// Returns the elements as string slices, or [`None`] if the elements are not strings.
    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        if let Self::String(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Returns a short human readable preview of the elements, such as `[a, b, c, ...]`.
    #[must_use]
    pub fn preview(&self, max: usize) -> String {
        let mut items = (0..self.len().min(max))
            .filter_map(|i| self.get(i))
            .map(|value| value.to_string())
            .collect_vec();
        if self.len() > max {
            items.push("...".to_string());
        }
        format!("[{}]", items.join(", "))
    }
}
