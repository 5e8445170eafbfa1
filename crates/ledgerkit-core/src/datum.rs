//! Script datum values and their CBOR mapping.
//!
//! A [`ScriptDatum`] is the recursive data algebra smart contracts consume.
//! It maps onto the CBOR value tree as follows:
//!
//! | datum                | CBOR                                                        |
//! |----------------------|-------------------------------------------------------------|
//! | `Constr(0..=6, f)`   | tag `121 + index` wrapping the field array                  |
//! | `Constr(7..=127, f)` | tag `1280 + (index - 7)` wrapping the field array           |
//! | `Constr(n, f)`       | tag `102` wrapping `[n, fields]`                            |
//! | `Map`                | map, entries in caller order                                |
//! | `List`               | array                                                       |
//! | `Int`                | native integer, or tag 2 / tag 3 bignum outside the range   |
//! | `Bytes`              | byte string                                                 |
//!
//! Datums are always written with [`Profile::Datum`]: non-empty arrays and
//! maps use indefinite lengths.

use num_bigint::{BigInt, Sign};
use num_traits::{One, ToPrimitive};

use crate::decode::MAX_DEPTH_CEILING;
use crate::error::{CodecError, ErrorKind, PipelineError};
use crate::pipeline::CborRecord;
use crate::profile::Profile;
use crate::tags::{
    TAG_CONSTR_COMPACT, TAG_CONSTR_EXTENDED, TAG_CONSTR_GENERAL, TAG_NEGATIVE_BIGNUM,
    TAG_POSITIVE_BIGNUM,
};
use crate::value::{CborInt, CborValue};

/// Highest constructor index with a compact tag (121..=127).
const COMPACT_MAX_INDEX: u64 = 6;
/// Highest constructor index with an extended tag (1280..=1400).
const EXTENDED_MAX_INDEX: u64 = 127;

/// A script datum.
#[derive(Debug, Clone)]
pub enum ScriptDatum {
    /// Tagged constructor: an index and its ordered fields.
    Constr { index: u64, fields: Vec<ScriptDatum> },
    /// Key/value pairs in caller order. Keys may repeat.
    Map(Vec<(ScriptDatum, ScriptDatum)>),
    List(Vec<ScriptDatum>),
    Int(BigInt),
    Bytes(Vec<u8>),
}

impl ScriptDatum {
    pub fn constr(index: u64, fields: Vec<ScriptDatum>) -> Self {
        Self::Constr { index, fields }
    }

    /// The unit value, `Constr(0, [])`.
    pub fn unit() -> Self {
        Self::constr(0, Vec::new())
    }

    /// Booleans are nullary constructors: `False = Constr(0, [])`, `True = Constr(1, [])`.
    pub fn bool(value: bool) -> Self {
        Self::constr(u64::from(value), Vec::new())
    }

    pub fn int(value: impl Into<BigInt>) -> Self {
        Self::Int(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(value.into())
    }

    /// Read a nullary constructor 0 or 1 back as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Constr { index: 0, fields } if fields.is_empty() => Some(false),
            Self::Constr { index: 1, fields } if fields.is_empty() => Some(true),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// Map this datum onto the CBOR value tree.
    pub fn to_cbor_value(&self) -> CborValue {
        match self {
            Self::Constr { index, fields } => {
                let fields = CborValue::Array(fields.iter().map(Self::to_cbor_value).collect());
                match constr_tag(*index) {
                    (tag, false) => CborValue::tag(tag, fields),
                    (tag, true) => {
                        CborValue::tag(tag, CborValue::Array(vec![CborValue::uint(*index), fields]))
                    }
                }
            }
            Self::Map(entries) => CborValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_cbor_value(), v.to_cbor_value()))
                    .collect(),
            ),
            Self::List(items) => CborValue::Array(items.iter().map(Self::to_cbor_value).collect()),
            Self::Int(value) => int_to_cbor(value),
            Self::Bytes(value) => CborValue::Bytes(value.clone()),
        }
    }

    /// Map a CBOR value tree back to a datum, failing with
    /// `DepthBudgetExceeded` past `max_depth` nested constructors, lists and maps.
    pub fn from_cbor_with_depth(value: &CborValue, max_depth: usize) -> Result<Self, CodecError> {
        from_cbor_value(value, max_depth)
    }
}

/// Tag for constructor `index`, and whether it needs the general `[index, fields]` form.
pub const fn constr_tag(index: u64) -> (u64, bool) {
    if index <= COMPACT_MAX_INDEX {
        (TAG_CONSTR_COMPACT + index, false)
    } else if index <= EXTENDED_MAX_INDEX {
        (TAG_CONSTR_EXTENDED + (index - (COMPACT_MAX_INDEX + 1)), false)
    } else {
        (TAG_CONSTR_GENERAL, true)
    }
}

/// Constructor index carried by a compact or extended tag.
pub const fn constr_index(tag: u64) -> Option<u64> {
    let compact_end = TAG_CONSTR_COMPACT + COMPACT_MAX_INDEX;
    let extended_end = TAG_CONSTR_EXTENDED + (EXTENDED_MAX_INDEX - COMPACT_MAX_INDEX - 1);
    if tag >= TAG_CONSTR_COMPACT && tag <= compact_end {
        Some(tag - TAG_CONSTR_COMPACT)
    } else if tag >= TAG_CONSTR_EXTENDED && tag <= extended_end {
        Some(tag - TAG_CONSTR_EXTENDED + COMPACT_MAX_INDEX + 1)
    } else {
        None
    }
}

fn int_to_cbor(value: &BigInt) -> CborValue {
    if let Some(n) = value.to_u64() {
        return CborValue::uint(n);
    }
    if value.sign() == Sign::Minus {
        // Stored magnitude is -value - 1.
        let magnitude = -value - BigInt::one();
        match magnitude.to_u64() {
            Some(arg) if arg < u64::MAX => {
                CborValue::Integer(CborInt::from_negative_argument(arg))
            }
            _ => CborValue::tag(
                TAG_NEGATIVE_BIGNUM,
                CborValue::Bytes(magnitude.magnitude().to_bytes_be()),
            ),
        }
    } else {
        CborValue::tag(
            TAG_POSITIVE_BIGNUM,
            CborValue::Bytes(value.magnitude().to_bytes_be()),
        )
    }
}

fn bignum_from_cbor(tag: u64, inner: &CborValue) -> Result<BigInt, CodecError> {
    let bytes = inner
        .as_bytes()
        .ok_or(CodecError::mismatch("bignum magnitude byte string"))?;
    // Empty, or a redundant leading zero.
    if matches!(bytes.first(), None | Some(0)) {
        return Err(CodecError::new(ErrorKind::MalformedBignum, 0));
    }
    let magnitude = BigInt::from_bytes_be(Sign::Plus, bytes);
    if tag == TAG_NEGATIVE_BIGNUM {
        Ok(-magnitude - BigInt::one())
    } else {
        Ok(magnitude)
    }
}

fn from_cbor_value(value: &CborValue, depth_left: usize) -> Result<ScriptDatum, CodecError> {
    match value {
        CborValue::Integer(i) => Ok(ScriptDatum::Int(BigInt::from(i.to_i128()))),
        CborValue::Bytes(b) => Ok(ScriptDatum::Bytes(b.clone())),
        CborValue::Array(items) => {
            let depth_left = descend(depth_left)?;
            Ok(ScriptDatum::List(list_from_cbor(items, depth_left)?))
        }
        CborValue::Map(entries) => {
            let depth_left = descend(depth_left)?;
            let entries = entries
                .iter()
                .map(|(k, v)| Ok((from_cbor_value(k, depth_left)?, from_cbor_value(v, depth_left)?)))
                .collect::<Result<_, CodecError>>()?;
            Ok(ScriptDatum::Map(entries))
        }
        CborValue::Tag(tag, inner) => {
            if let Some(index) = constr_index(*tag) {
                let depth_left = descend(depth_left)?;
                let fields = inner
                    .as_array()
                    .ok_or(CodecError::mismatch("constructor field array"))?;
                return Ok(ScriptDatum::constr(index, list_from_cbor(fields, depth_left)?));
            }
            match *tag {
                TAG_CONSTR_GENERAL => {
                    let depth_left = descend(depth_left)?;
                    general_constr(inner, depth_left)
                }
                TAG_POSITIVE_BIGNUM | TAG_NEGATIVE_BIGNUM => {
                    bignum_from_cbor(*tag, inner).map(ScriptDatum::Int)
                }
                _ => Err(CodecError::new(ErrorKind::UnknownTag, 0)),
            }
        }
        CborValue::Text(_) | CborValue::Bool(_) => Err(CodecError::mismatch(
            "script datum (constructor, map, list, integer or bytes)",
        )),
    }
}

fn descend(depth_left: usize) -> Result<usize, CodecError> {
    depth_left
        .checked_sub(1)
        .ok_or(CodecError::new(ErrorKind::DepthBudgetExceeded, 0))
}

fn list_from_cbor(items: &[CborValue], depth_left: usize) -> Result<Vec<ScriptDatum>, CodecError> {
    items
        .iter()
        .map(|item| from_cbor_value(item, depth_left))
        .collect()
}

/// Tag 102 payload: exactly `[index, fields]`.
fn general_constr(inner: &CborValue, depth_left: usize) -> Result<ScriptDatum, CodecError> {
    const EXPECTED: &str = "[constructor index, field array]";
    match inner.as_array() {
        Some([index, fields]) => {
            let index = index.as_u64().ok_or(CodecError::mismatch(EXPECTED))?;
            let fields = fields.as_array().ok_or(CodecError::mismatch(EXPECTED))?;
            Ok(ScriptDatum::constr(index, list_from_cbor(fields, depth_left)?))
        }
        _ => Err(CodecError::mismatch(EXPECTED)),
    }
}

impl CborRecord for ScriptDatum {
    const PROFILE: Profile = Profile::Datum;

    fn to_cbor(&self) -> CborValue {
        self.to_cbor_value()
    }

    /// The tree was already bounded by the CBOR stage's budget, so only the
    /// hard ceiling applies here.
    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        from_cbor_value(value, MAX_DEPTH_CEILING).map_err(PipelineError::shape)
    }
}

impl PartialEq for ScriptDatum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Constr { index: a, fields: fa },
                Self::Constr { index: b, fields: fb },
            ) => a == b && fa == fb,
            (Self::Map(a), Self::Map(b)) => same_entries(a, b),
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScriptDatum {}

/// Multiset equality of map entries: order is ignored, multiplicity is not.
fn same_entries(a: &[(ScriptDatum, ScriptDatum)], b: &[(ScriptDatum, ScriptDatum)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for pair in a {
        for (slot, candidate) in used.iter_mut().zip(b) {
            if !*slot && candidate == pair {
                *slot = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

impl From<BigInt> for ScriptDatum {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for ScriptDatum {
    fn from(value: i64) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for ScriptDatum {
    fn from(value: u64) -> Self {
        Self::Int(value.into())
    }
}

impl From<Vec<u8>> for ScriptDatum {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for ScriptDatum {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<bool> for ScriptDatum {
    fn from(value: bool) -> Self {
        Self::bool(value)
    }
}

impl From<Vec<ScriptDatum>> for ScriptDatum {
    fn from(value: Vec<ScriptDatum>) -> Self {
        Self::List(value)
    }
}
