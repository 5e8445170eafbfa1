//! Tag numbers with a meaning on the ledger, and the small wrappers built
//! on them.

use crate::error::{CodecError, ErrorKind, PipelineError};
use crate::pipeline::CborRecord;
use crate::profile::Profile;
use crate::shape::{expect_bytes, expect_record, expect_tag, ArrayReader};
use crate::value::CborValue;

/// Non-negative bignum: big-endian magnitude.
pub const TAG_POSITIVE_BIGNUM: u64 = 2;
/// Negative bignum: big-endian `-value - 1`.
pub const TAG_NEGATIVE_BIGNUM: u64 = 3;
/// Byte string holding one encoded CBOR item.
pub const TAG_EMBEDDED_CBOR: u64 = 24;
/// Rational number `[numerator, denominator]`.
pub const TAG_RATIONAL: u64 = 30;
/// General constructor `[index, fields]`.
pub const TAG_CONSTR_GENERAL: u64 = 102;
/// First compact constructor tag (indices 0..=6 use 121..=127).
pub const TAG_CONSTR_COMPACT: u64 = 121;
/// First extended constructor tag (indices 7..=127 use 1280..=1400).
pub const TAG_CONSTR_EXTENDED: u64 = 1280;
/// Set with at least one element.
pub const TAG_SET: u64 = 258;
/// Map-form auxiliary data.
pub const TAG_AUXILIARY_DATA: u64 = 259;

/// `#6.24(bytes .cbor T)`: an encoded item carried as an opaque byte string.
///
/// The bytes are kept exactly as received so hashes over them stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbeddedCbor(Vec<u8>);

impl EmbeddedCbor {
    /// Embed already-encoded bytes.
    pub fn from_raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode `record` under its own profile and embed the result.
    pub fn wrap<T: CborRecord>(record: &T) -> Self {
        Self(record.to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decode the embedded bytes as `T`.
    pub fn decode<T: CborRecord>(&self) -> Result<T, PipelineError> {
        T::from_bytes(&self.0)
    }
}

impl CborRecord for EmbeddedCbor {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::tag(TAG_EMBEDDED_CBOR, CborValue::Bytes(self.0.clone()))
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let inner = expect_tag(value, TAG_EMBEDDED_CBOR, "tag 24 embedded CBOR")?;
        Ok(Self(expect_bytes(inner, "embedded")?.to_vec()))
    }
}

/// `#6.30([numerator, denominator])` with a non-zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: u64,
    denominator: u64,
}

impl Rational {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, CodecError> {
        if denominator == 0 {
            return Err(CodecError::new(ErrorKind::TypeMismatch, 0).expecting("non-zero denominator"));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    pub const fn denominator(&self) -> u64 {
        self.denominator
    }
}

impl CborRecord for Rational {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::tag(
            TAG_RATIONAL,
            CborValue::Array(vec![
                CborValue::uint(self.numerator),
                CborValue::uint(self.denominator),
            ]),
        )
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let inner = expect_tag(value, TAG_RATIONAL, "tag 30 rational")?;
        let mut fields = ArrayReader::exact(inner, 2, "[numerator, denominator]")?;
        let numerator = fields.uint("numerator")?;
        let denominator = fields.uint("denominator")?;
        Rational::new(numerator, denominator)
            .map_err(|e| PipelineError::domain(e).at_field("denominator"))
    }
}

/// `#6.258([+ T])`. The untagged array form is accepted on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptySet<T>(Vec<T>);

impl<T> NonEmptySet<T> {
    pub fn new(items: Vec<T>) -> Result<Self, CodecError> {
        if items.is_empty() {
            return Err(CodecError::new(ErrorKind::TypeMismatch, 0).expecting("non-empty set"));
        }
        Ok(Self(items))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: CborRecord> CborRecord for NonEmptySet<T> {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::tag(
            TAG_SET,
            CborValue::Array(self.0.iter().map(CborRecord::to_cbor).collect()),
        )
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let array = match value.as_tag() {
            Some((TAG_SET, inner)) => inner,
            Some(_) => return Err(PipelineError::shape(CodecError::mismatch("tag 258 set"))),
            None => value,
        };
        let items = array
            .as_array()
            .ok_or_else(|| PipelineError::shape(CodecError::mismatch("set array")))?;
        let items = items
            .iter()
            .map(|item| expect_record(item, "element"))
            .collect::<Result<Vec<T>, _>>()?;
        NonEmptySet::new(items).map_err(PipelineError::domain)
    }
}

impl<'a, T> IntoIterator for &'a NonEmptySet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
