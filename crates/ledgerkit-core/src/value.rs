//! The in-memory CBOR value tree.
//!
//! [`CborValue`] is what the primitive codec produces and consumes. It is
//! ephemeral: rebuilt on every decode, never persisted, and carries no
//! knowledge of whether the wire form used definite or indefinite lengths.
//! Length and key-order choices belong to the [`Profile`](crate::Profile)
//! used at encode time.

use std::fmt;

use ciborium::value::{Integer as CiboriumInteger, Value as CiboriumValue};
use thiserror::Error;

use crate::error::CodecError;

/// An integer in the native CBOR range `[-2^64, 2^64 - 1]`.
///
/// Stored the way the wire stores it: a sign (major type 0 or 1) and the
/// 64-bit argument. Negative values have argument `-(n + 1)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CborInt {
    negative: bool,
    argument: u64,
}

/// An `i128` outside the native CBOR integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("integer {0} is outside the native CBOR range")]
pub struct IntOutOfRange(pub i128);

impl CborInt {
    /// Smallest native value, `-2^64`.
    pub const MIN: Self = Self::from_negative_argument(u64::MAX);
    /// Largest native value, `2^64 - 1`.
    pub const MAX: Self = Self::from_u64(u64::MAX);

    /// A non-negative integer (major type 0).
    pub const fn from_u64(value: u64) -> Self {
        Self {
            negative: false,
            argument: value,
        }
    }

    /// A negative integer from its wire argument: the value is `-1 - argument`.
    pub const fn from_negative_argument(argument: u64) -> Self {
        Self {
            negative: true,
            argument,
        }
    }

    /// Whether this is a major-type-1 integer.
    pub const fn is_negative(self) -> bool {
        self.negative
    }

    /// The wire argument.
    pub const fn argument(self) -> u64 {
        self.argument
    }

    /// The value as `i128` (always fits).
    pub fn to_i128(self) -> i128 {
        if self.negative {
            -1 - i128::from(self.argument)
        } else {
            i128::from(self.argument)
        }
    }

    /// The value as `u64`, if non-negative.
    pub const fn as_u64(self) -> Option<u64> {
        if self.negative {
            None
        } else {
            Some(self.argument)
        }
    }

    /// The value as `i64`, if it fits.
    pub fn as_i64(self) -> Option<i64> {
        i64::try_from(self.to_i128()).ok()
    }
}

impl fmt::Debug for CborInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i128())
    }
}

impl fmt::Display for CborInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i128())
    }
}

impl TryFrom<i128> for CborInt {
    type Error = IntOutOfRange;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        if value >= 0 {
            u64::try_from(value)
                .map(Self::from_u64)
                .map_err(|_| IntOutOfRange(value))
        } else {
            u64::try_from(-1 - value)
                .map(Self::from_negative_argument)
                .map_err(|_| IntOutOfRange(value))
        }
    }
}

macro_rules! cbor_int_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for CborInt {
            fn from(value: $t) -> Self {
                Self::from_u64(u64::from(value))
            }
        }
    )*};
}

macro_rules! cbor_int_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for CborInt {
            fn from(value: $t) -> Self {
                let wide = i128::from(value);
                if wide >= 0 {
                    Self::from_u64(wide as u64)
                } else {
                    Self::from_negative_argument((-1 - wide) as u64)
                }
            }
        }
    )*};
}

cbor_int_from_unsigned!(u8, u16, u32, u64);
cbor_int_from_signed!(i8, i16, i32, i64);

/// A CBOR data item.
///
/// Maps keep their entries in insertion order; whether that order survives
/// encoding is a profile decision. Equality is structural and
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CborValue {
    /// Major types 0 and 1.
    Integer(CborInt),
    /// Major type 2.
    Bytes(Vec<u8>),
    /// Major type 3.
    Text(String),
    /// Major type 4.
    Array(Vec<CborValue>),
    /// Major type 5.
    Map(Vec<(CborValue, CborValue)>),
    /// Major type 6: a tag number wrapping exactly one item.
    Tag(u64, Box<CborValue>),
    /// Major type 7, simple values 20 and 21.
    Bool(bool),
}

impl CborValue {
    /// An unsigned integer.
    pub const fn uint(value: u64) -> Self {
        Self::Integer(CborInt::from_u64(value))
    }

    /// A tagged item.
    pub fn tag(tag: u64, inner: CborValue) -> Self {
        Self::Tag(tag, Box::new(inner))
    }

    /// Short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Bytes(_) => "byte string",
            Self::Text(_) => "text string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Tag(..) => "tag",
            Self::Bool(_) => "bool",
        }
    }

    pub fn as_integer(&self) -> Option<CborInt> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_integer().and_then(CborInt::as_u64)
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(CborValue, CborValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// The tag number and inner item, if this is a tag.
    pub fn as_tag(&self) -> Option<(u64, &CborValue)> {
        match self {
            Self::Tag(tag, inner) => Some((*tag, inner)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<CborInt> for CborValue {
    fn from(value: CborInt) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for CborValue {
    fn from(value: u64) -> Self {
        Self::uint(value)
    }
}

impl From<i64> for CborValue {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<Vec<u8>> for CborValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for CborValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<String> for CborValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CborValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for CborValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ciborium interop
// ─────────────────────────────────────────────────────────────────────────────

impl From<&CborValue> for CiboriumValue {
    fn from(value: &CborValue) -> Self {
        match value {
            CborValue::Integer(i) => {
                // The native range is exactly ciborium's integer range.
                let wide = i.to_i128();
                match CiboriumInteger::try_from(wide) {
                    Ok(int) => CiboriumValue::Integer(int),
                    Err(_) => unreachable!("native CBOR integer {wide} rejected by ciborium"),
                }
            }
            CborValue::Bytes(b) => CiboriumValue::Bytes(b.clone()),
            CborValue::Text(s) => CiboriumValue::Text(s.clone()),
            CborValue::Array(items) => {
                CiboriumValue::Array(items.iter().map(CiboriumValue::from).collect())
            }
            CborValue::Map(entries) => CiboriumValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (CiboriumValue::from(k), CiboriumValue::from(v)))
                    .collect(),
            ),
            CborValue::Tag(tag, inner) => {
                CiboriumValue::Tag(*tag, Box::new(CiboriumValue::from(inner.as_ref())))
            }
            CborValue::Bool(b) => CiboriumValue::Bool(*b),
        }
    }
}

impl TryFrom<&CiboriumValue> for CborValue {
    type Error = CodecError;

    /// Fails with `TypeMismatch` for items outside this dialect (floats, null).
    fn try_from(value: &CiboriumValue) -> Result<Self, Self::Error> {
        Ok(match value {
            CiboriumValue::Integer(i) => {
                let wide = i128::from(*i);
                CborValue::Integer(
                    CborInt::try_from(wide).map_err(|_| CodecError::mismatch("native integer"))?,
                )
            }
            CiboriumValue::Bytes(b) => CborValue::Bytes(b.clone()),
            CiboriumValue::Text(s) => CborValue::Text(s.clone()),
            CiboriumValue::Bool(b) => CborValue::Bool(*b),
            CiboriumValue::Array(items) => CborValue::Array(
                items
                    .iter()
                    .map(CborValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            CiboriumValue::Map(entries) => CborValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((CborValue::try_from(k)?, CborValue::try_from(v)?)))
                    .collect::<Result<_, CodecError>>()?,
            ),
            CiboriumValue::Tag(tag, inner) => {
                CborValue::Tag(*tag, Box::new(CborValue::try_from(inner.as_ref())?))
            }
            _ => return Err(CodecError::mismatch("integer, bytes, text, array, map, tag or bool")),
        })
    }
}
