//! Element data types of container arrays.

use derive_more::Display;
use serde::Serialize;
use thiserror::Error;

/// A data type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
#[rustfmt::skip]
pub enum DataType {
    /// `bool` Boolean.
    #[display("bool")]
    Bool,
    /// `int8` Integer in `[-2^7, 2^7-1]`.
    #[display("int8")]
    Int8,
    /// `int16` Integer in `[-2^15, 2^15-1]`.
    #[display("int16")]
    Int16,
    /// `int32` Integer in `[-2^31, 2^31-1]`.
    #[display("int32")]
    Int32,
    /// `int64` Integer in `[-2^63, 2^63-1]`.
    #[display("int64")]
    Int64,
    /// `uint8` Integer in `[0, 2^8-1]`.
    #[display("uint8")]
    UInt8,
    /// `uint16` Integer in `[0, 2^16-1]`.
    #[display("uint16")]
    UInt16,
    /// `uint32` Integer in `[0, 2^32-1]`.
    #[display("uint32")]
    UInt32,
    /// `uint64` Integer in `[0, 2^64-1]`.
    #[display("uint64")]
    UInt64,
    /// `float32` IEEE 754 single-precision floating point.
    #[display("float32")]
    Float32,
    /// `float64` IEEE 754 double-precision floating point.
    #[display("float64")]
    Float64,
    /// `string` A variable-length UTF-8 encoded string.
    #[display("string")]
    String,
    /// `compound` A record of named, independently typed fields.
    #[display("compound")]
    Compound(Vec<CompoundField>),
}

/// A named field of a [`DataType::Compound`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CompoundField {
    /// The field name.
    pub name: String,
    /// The field data type.
    pub data_type: DataType,
}

impl CompoundField {
    /// Create a new compound field.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An unsupported data type error.
#[derive(Debug, Error)]
#[error("unsupported data type {0}")]
pub struct UnsupportedDataTypeError(String);

impl UnsupportedDataTypeError {
    /// Create a new unsupported data type error from a description of the type.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

impl DataType {
    /// Returns the name of the data type.
    #[must_use]
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Returns the size in bytes of a fixed-size data type.
    ///
    /// Returns [`None`] for variable sized data types (strings and compounds).
    #[must_use]
    pub const fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64 | Self::UInt64 | Self::Float64 => Some(8),
            Self::String | Self::Compound(_) => None,
        }
    }

    /// Returns true if the data type is a signed or unsigned integer.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Returns true if the data type is an integer or floating point number.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Float32 | Self::Float64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_names() {
        assert_eq!(DataType::UInt8.name(), "uint8");
        assert_eq!(DataType::Float32.to_string(), "float32");
        assert_eq!(
            DataType::Compound(vec![CompoundField::new("name", DataType::String)]).name(),
            "compound"
        );
        assert_eq!(
            serde_json::to_string(&DataType::Int16).unwrap(),
            r#""int16""#
        );
    }

    #[test]
    fn data_type_sizes() {
        assert_eq!(DataType::Bool.fixed_size(), Some(1));
        assert_eq!(DataType::Int64.fixed_size(), Some(8));
        assert_eq!(DataType::String.fixed_size(), None);
        assert!(DataType::UInt16.is_integer());
        assert!(!DataType::Float64.is_integer());
        assert!(DataType::Float64.is_numeric());
        assert!(!DataType::Bool.is_numeric());
    }
}
