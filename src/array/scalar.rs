use derive_more::Display;

/// A single decoded value.
///
/// Integers are widened to 64 bits, floats to `f64`.
#[derive(Clone, Debug, PartialEq, Display)]
pub enum ScalarValue {
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
}

impl ScalarValue {
    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Returns the value as an `f64` if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::UInt(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Bool(_) | Self::String(_) => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer representable as `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::UInt(value) => i64::try_from(*value).ok(),
            Self::Bool(_) | Self::Float(_) | Self::String(_) => None,
        }
    }

    /// Returns the value as a `bool`.
    ///
    /// Integers are interpreted as booleans (non-zero is true), as written by some `h5py` versions.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::UInt(value) => Some(*value != 0),
            Self::Float(_) | Self::String(_) => None,
        }
    }
}

/// The hashable identity of a [`ScalarValue`].
///
/// Floats are keyed by their bits, with `-0.0` folded into `0.0` and every NaN into one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ScalarKey {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    String(String),
}

impl ScalarValue {
    pub(crate) fn key(&self) -> ScalarKey {
        match self {
            Self::Bool(value) => ScalarKey::Bool(*value),
            Self::Int(value) => ScalarKey::Int(*value),
            Self::UInt(value) => ScalarKey::UInt(*value),
            Self::Float(value) if value.is_nan() => ScalarKey::Float(f64::NAN.to_bits()),
            // adding zero turns -0.0 into 0.0
            Self::Float(value) => ScalarKey::Float((value + 0.0).to_bits()),
            Self::String(value) => ScalarKey::String(value.clone()),
        }
    }
}

impl From<&ScalarValue> for serde_json::Value {
    fn from(value: &ScalarValue) -> Self {
        match value {
            ScalarValue::Bool(value) => Self::Bool(*value),
            ScalarValue::Int(value) => Self::from(*value),
            ScalarValue::UInt(value) => Self::from(*value),
            ScalarValue::Float(value) => serde_json::Number::from_f64(*value)
                .map_or(Self::Null, Self::Number),
            ScalarValue::String(value) => Self::String(value.clone()),
        }
    }
}

macro_rules! impl_scalar_from {
    ($variant:ident, $wide:ty, $($t:ty),*) => {
        $(
            impl From<$t> for ScalarValue {
                fn from(value: $t) -> Self {
                    Self::$variant(<$wide>::from(value))
                }
            }
        )*
    };
}

impl_scalar_from!(Int, i64, i8, i16, i32, i64);
impl_scalar_from!(UInt, u64, u8, u16, u32, u64);
impl_scalar_from!(Float, f64, f32, f64);

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
