//! Typed field extraction for record decoders.
//!
//! Records are arrays (`[a, b, c]`) or integer-keyed maps (`{0: a, 1: b}`).
//! The readers here pull fields out in order or by key and report
//! `TypeMismatch` with the offending field name attached.

use crate::error::{CodecError, PipelineError};
use crate::pipeline::CborRecord;
use crate::value::CborValue;

fn mismatch(expected: &'static str, field: &'static str) -> PipelineError {
    PipelineError::shape(CodecError::mismatch(expected)).at_field(field)
}

/// Read a `u64` field.
pub fn expect_uint(value: &CborValue, field: &'static str) -> Result<u64, PipelineError> {
    value.as_u64().ok_or_else(|| mismatch("unsigned integer", field))
}

/// Read a byte string field.
pub fn expect_bytes<'a>(value: &'a CborValue, field: &'static str) -> Result<&'a [u8], PipelineError> {
    value.as_bytes().ok_or_else(|| mismatch("byte string", field))
}

/// Decode a nested record field, tagging any failure with `field`.
pub fn expect_record<T: CborRecord>(value: &CborValue, field: &'static str) -> Result<T, PipelineError> {
    T::from_cbor(value).map_err(|e| e.at_field(field))
}

/// Unwrap `tag(n, inner)`.
pub fn expect_tag<'a>(
    value: &'a CborValue,
    tag: u64,
    expected: &'static str,
) -> Result<&'a CborValue, PipelineError> {
    match value.as_tag() {
        Some((t, inner)) if t == tag => Ok(inner),
        _ => Err(PipelineError::shape(CodecError::mismatch(expected))),
    }
}

/// Sequential reader over an array-shaped record.
#[derive(Debug)]
pub struct ArrayReader<'a> {
    items: &'a [CborValue],
    next: usize,
    expected: &'static str,
}

impl<'a> ArrayReader<'a> {
    /// Start reading `value`, which must be an array.
    pub fn new(value: &'a CborValue, expected: &'static str) -> Result<Self, PipelineError> {
        let items = value
            .as_array()
            .ok_or_else(|| PipelineError::shape(CodecError::mismatch(expected)))?;
        Ok(Self {
            items,
            next: 0,
            expected,
        })
    }

    /// Like [`ArrayReader::new`] but the array must hold exactly `len` items.
    pub fn exact(value: &'a CborValue, len: usize, expected: &'static str) -> Result<Self, PipelineError> {
        let reader = Self::new(value, expected)?;
        if reader.items.len() != len {
            return Err(PipelineError::shape(CodecError::mismatch(expected)));
        }
        Ok(reader)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The next raw item.
    pub fn field(&mut self, field: &'static str) -> Result<&'a CborValue, PipelineError> {
        let item = self
            .items
            .get(self.next)
            .ok_or_else(|| mismatch(self.expected, field))?;
        self.next += 1;
        Ok(item)
    }

    pub fn uint(&mut self, field: &'static str) -> Result<u64, PipelineError> {
        expect_uint(self.field(field)?, field)
    }

    pub fn bytes(&mut self, field: &'static str) -> Result<&'a [u8], PipelineError> {
        expect_bytes(self.field(field)?, field)
    }

    pub fn record<T: CborRecord>(&mut self, field: &'static str) -> Result<T, PipelineError> {
        expect_record(self.field(field)?, field)
    }

    /// Decode every remaining item as `T`.
    pub fn records<T: CborRecord>(&mut self, field: &'static str) -> Result<Vec<T>, PipelineError> {
        let rest = &self.items[self.next..];
        self.next = self.items.len();
        rest.iter().map(|item| expect_record(item, field)).collect()
    }

    /// Fail if items remain.
    pub fn finish(self) -> Result<(), PipelineError> {
        if self.next != self.items.len() {
            return Err(PipelineError::shape(CodecError::mismatch(self.expected)));
        }
        Ok(())
    }
}

/// Keyed reader over a map-shaped record with unsigned integer keys.
#[derive(Debug)]
pub struct MapReader<'a> {
    entries: &'a [(CborValue, CborValue)],
}

impl<'a> MapReader<'a> {
    /// Start reading `value`, which must be a map.
    pub fn new(value: &'a CborValue, expected: &'static str) -> Result<Self, PipelineError> {
        let entries = value
            .as_map()
            .ok_or_else(|| PipelineError::shape(CodecError::mismatch(expected)))?;
        Ok(Self { entries })
    }

    /// The value under `key`, if present.
    pub fn optional(&self, key: u64) -> Option<&'a CborValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_u64() == Some(key))
            .map(|(_, v)| v)
    }

    /// The value under `key`. Missing keys are a `TypeMismatch` on `field`.
    pub fn required(&self, key: u64, field: &'static str) -> Result<&'a CborValue, PipelineError> {
        self.optional(key)
            .ok_or_else(|| mismatch("required map key", field))
    }

    pub fn uint(&self, key: u64, field: &'static str) -> Result<u64, PipelineError> {
        expect_uint(self.required(key, field)?, field)
    }

    pub fn optional_uint(&self, key: u64, field: &'static str) -> Result<Option<u64>, PipelineError> {
        self.optional(key).map(|v| expect_uint(v, field)).transpose()
    }

    pub fn record<T: CborRecord>(&self, key: u64, field: &'static str) -> Result<T, PipelineError> {
        expect_record(self.required(key, field)?, field)
    }

    pub fn optional_record<T: CborRecord>(
        &self,
        key: u64,
        field: &'static str,
    ) -> Result<Option<T>, PipelineError> {
        self.optional(key)
            .map(|v| expect_record(v, field))
            .transpose()
    }

    /// Fail if any key is not one of `known`.
    pub fn only_keys(&self, known: &[u64], expected: &'static str) -> Result<(), PipelineError> {
        let all_known = self
            .entries
            .iter()
            .all(|(k, _)| k.as_u64().is_some_and(|k| known.contains(&k)));
        if !all_known {
            return Err(PipelineError::shape(CodecError::mismatch(expected)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_array_reader_fields() {
        let value = CborValue::Array(vec![CborValue::Bytes(vec![1, 2]), CborValue::uint(7)]);
        let mut reader = ArrayReader::exact(&value, 2, "pair").unwrap();
        assert_eq!(reader.bytes("id").unwrap(), &[1, 2]);
        assert_eq!(reader.uint("index").unwrap(), 7);
        reader.finish().unwrap();
    }

    #[test]
    fn test_array_reader_errors_carry_field() {
        let value = CborValue::Array(vec![CborValue::from("x")]);
        let mut reader = ArrayReader::new(&value, "pair").unwrap();
        let err = reader.uint("index").unwrap_err();
        assert_eq!(err.field, Some("index"));
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = reader.field("missing").unwrap_err();
        assert_eq!(err.field, Some("missing"));

        assert!(ArrayReader::exact(&value, 2, "pair").is_err());
        assert!(ArrayReader::new(&CborValue::uint(1), "pair").is_err());
    }

    #[test]
    fn test_array_reader_rejects_leftovers() {
        let value = CborValue::Array(vec![CborValue::uint(1), CborValue::uint(2)]);
        let mut reader = ArrayReader::new(&value, "single").unwrap();
        reader.uint("a").unwrap();
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_map_reader() {
        let value = CborValue::Map(vec![
            (CborValue::uint(2), CborValue::uint(200)),
            (CborValue::uint(0), CborValue::uint(0)),
        ]);
        let reader = MapReader::new(&value, "body").unwrap();
        assert_eq!(reader.uint(2, "fee").unwrap(), 200);
        assert_eq!(reader.optional_uint(3, "ttl").unwrap(), None);
        let err = reader.uint(1, "outputs").unwrap_err();
        assert_eq!(err.field, Some("outputs"));
        reader.only_keys(&[0, 2], "body").unwrap();
        assert!(reader.only_keys(&[0], "body").is_err());
    }
}
