//! Primitive CBOR decoder.
//!
//! Converts raw bytes into a [`CborValue`] tree. The decoder carries an
//! explicit nesting budget ([`DecodeLimits::max_depth`]) so hostile inputs
//! fail with `DepthBudgetExceeded` instead of exhausting the stack.

use std::collections::HashSet;

use crate::error::{CodecError, ErrorKind};
use crate::value::{CborInt, CborValue};
use crate::wire::{
    len_to_usize, split_head, Argument, Cursor, BREAK, FALSE, MAJOR_ARRAY, MAJOR_BYTES,
    MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UNSIGNED, TRUE,
};

/// Default nesting budget.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Nesting budgets above this are clamped to it.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Decode-time limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum container nesting. Arrays, maps and tags each count one
    /// level on entry, empty ones included.
    pub max_depth: usize,
    /// Fail with `DuplicateMapKey` when a map repeats a key.
    pub reject_duplicate_keys: bool,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_duplicate_keys: true,
        }
    }
}

impl DecodeLimits {
    /// Replace the nesting budget.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Toggle duplicate-key rejection.
    #[must_use]
    pub const fn with_duplicate_keys_rejected(mut self, reject: bool) -> Self {
        self.reject_duplicate_keys = reject;
        self
    }

    /// The budget actually enforced.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_DEPTH_CEILING)
    }
}

/// Decode one item starting at `offset`.
///
/// Returns the value and the number of bytes it occupied. Bytes after the
/// item are left alone.
pub fn decode(
    bytes: &[u8],
    offset: usize,
    limits: DecodeLimits,
) -> Result<(CborValue, usize), CodecError> {
    let mut decoder = Decoder {
        cursor: Cursor::new(bytes, offset),
        max_depth: limits.effective_max_depth(),
        reject_duplicate_keys: limits.reject_duplicate_keys,
    };
    let value = decoder.item(0)?;
    Ok((value, decoder.cursor.position() - offset))
}

/// Decode `bytes` as exactly one item.
pub fn decode_exact(bytes: &[u8], limits: DecodeLimits) -> Result<CborValue, CodecError> {
    let (value, consumed) = decode(bytes, 0, limits)?;
    if consumed != bytes.len() {
        return Err(CodecError::new(ErrorKind::TrailingBytes, consumed));
    }
    Ok(value)
}

struct Decoder<'a> {
    cursor: Cursor<'a>,
    max_depth: usize,
    reject_duplicate_keys: bool,
}

impl<'a> Decoder<'a> {
    fn item(&mut self, depth: usize) -> Result<CborValue, CodecError> {
        let head = self.cursor.position();
        let byte = self.cursor.read_u8()?;
        let (major, ai) = split_head(byte);

        if major == MAJOR_SIMPLE {
            return match byte {
                FALSE => Ok(CborValue::Bool(false)),
                TRUE => Ok(CborValue::Bool(true)),
                _ if (28..=30).contains(&ai) => {
                    Err(CodecError::new(ErrorKind::ReservedAdditionalInfo, head))
                }
                _ => Err(CodecError::new(ErrorKind::InvalidLeadingByte, head)),
            };
        }

        let argument = self.cursor.read_argument(ai, head)?;
        match (major, argument) {
            (MAJOR_UNSIGNED, Argument::Definite(n)) => {
                Ok(CborValue::Integer(CborInt::from_u64(n)))
            }
            (MAJOR_NEGATIVE, Argument::Definite(n)) => {
                Ok(CborValue::Integer(CborInt::from_negative_argument(n)))
            }
            (MAJOR_BYTES, Argument::Definite(len)) => {
                let len = len_to_usize(len, head)?;
                Ok(CborValue::Bytes(self.cursor.read_exact(len)?.to_vec()))
            }
            (MAJOR_BYTES, Argument::Indefinite) => self.chunked_bytes(head).map(CborValue::Bytes),
            (MAJOR_TEXT, Argument::Definite(len)) => {
                let len = len_to_usize(len, head)?;
                let raw = self.cursor.read_exact(len)?;
                let text = std::str::from_utf8(raw).map_err(|_| {
                    CodecError::new(ErrorKind::TypeMismatch, head).expecting("UTF-8 text")
                })?;
                Ok(CborValue::Text(text.to_string()))
            }
            (MAJOR_ARRAY, argument) => {
                let depth = self.enter(depth, head)?;
                self.array(argument, depth, head).map(CborValue::Array)
            }
            (MAJOR_MAP, argument) => {
                let depth = self.enter(depth, head)?;
                self.map(argument, depth, head).map(CborValue::Map)
            }
            (MAJOR_TAG, Argument::Definite(tag)) => {
                let depth = self.enter(depth, head)?;
                let inner = self.item(depth)?;
                Ok(CborValue::Tag(tag, Box::new(inner)))
            }
            // Indefinite integers, text strings and tags.
            _ => Err(CodecError::new(ErrorKind::InvalidLeadingByte, head)),
        }
    }

    fn enter(&self, depth: usize, head: usize) -> Result<usize, CodecError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(CodecError::new(ErrorKind::DepthBudgetExceeded, head));
        }
        Ok(depth)
    }

    /// True when the next byte is a break. Consumes it.
    fn at_break(&mut self, head: usize) -> Result<bool, CodecError> {
        if self.cursor.remaining() == 0 {
            return Err(CodecError::new(ErrorKind::UnterminatedIndefiniteItem, head));
        }
        if self.cursor.peek_u8()? == BREAK {
            self.cursor.read_u8()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn chunked_bytes(&mut self, head: usize) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        while !self.at_break(head)? {
            let chunk_head = self.cursor.position();
            let (major, ai) = split_head(self.cursor.read_u8()?);
            if major != MAJOR_BYTES {
                return Err(CodecError::new(ErrorKind::TypeMismatch, chunk_head)
                    .expecting("definite byte string chunk"));
            }
            match self.cursor.read_argument(ai, chunk_head)? {
                Argument::Definite(len) => {
                    let len = len_to_usize(len, chunk_head)?;
                    out.extend_from_slice(self.cursor.read_exact(len)?);
                }
                Argument::Indefinite => {
                    return Err(CodecError::new(ErrorKind::TypeMismatch, chunk_head)
                        .expecting("definite byte string chunk"));
                }
            }
        }
        Ok(out)
    }

    fn array(
        &mut self,
        argument: Argument,
        depth: usize,
        head: usize,
    ) -> Result<Vec<CborValue>, CodecError> {
        match argument {
            Argument::Definite(count) => {
                let count = len_to_usize(count, head)?;
                // Every item takes at least one byte.
                let mut items = Vec::with_capacity(count.min(self.cursor.remaining()));
                for _ in 0..count {
                    items.push(self.item(depth)?);
                }
                Ok(items)
            }
            Argument::Indefinite => {
                let mut items = Vec::new();
                while !self.at_break(head)? {
                    items.push(self.item(depth)?);
                }
                Ok(items)
            }
        }
    }

    fn map(
        &mut self,
        argument: Argument,
        depth: usize,
        head: usize,
    ) -> Result<Vec<(CborValue, CborValue)>, CodecError> {
        let mut entries = Vec::new();
        let mut key_offsets = Vec::new();
        match argument {
            Argument::Definite(count) => {
                let count = len_to_usize(count, head)?;
                let hint = count.min(self.cursor.remaining() / 2);
                entries.reserve(hint);
                key_offsets.reserve(hint);
                for _ in 0..count {
                    key_offsets.push(self.cursor.position());
                    let key = self.item(depth)?;
                    let value = self.item(depth)?;
                    entries.push((key, value));
                }
            }
            Argument::Indefinite => {
                while !self.at_break(head)? {
                    key_offsets.push(self.cursor.position());
                    let key = self.item(depth)?;
                    let value = self.item(depth)?;
                    entries.push((key, value));
                }
            }
        }

        if self.reject_duplicate_keys {
            let mut seen = HashSet::with_capacity(entries.len());
            for ((key, _), offset) in entries.iter().zip(&key_offsets) {
                if !seen.insert(key) {
                    return Err(CodecError::new(ErrorKind::DuplicateMapKey, *offset));
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_hex(s: &str) -> Result<CborValue, CodecError> {
        decode_exact(&hex::decode(s).unwrap(), DecodeLimits::default())
    }

    fn kind_of(s: &str) -> ErrorKind {
        decode_hex(s).unwrap_err().kind
    }

    #[test]
    fn test_decode_integers() {
        assert_eq!(decode_hex("00").unwrap(), CborValue::uint(0));
        assert_eq!(decode_hex("17").unwrap(), CborValue::uint(23));
        assert_eq!(decode_hex("1818").unwrap(), CborValue::uint(24));
        assert_eq!(decode_hex("1903e8").unwrap(), CborValue::uint(1000));
        assert_eq!(
            decode_hex("1bffffffffffffffff").unwrap(),
            CborValue::Integer(CborInt::MAX)
        );
        assert_eq!(decode_hex("20").unwrap(), CborValue::from(-1i64));
        assert_eq!(decode_hex("3863").unwrap(), CborValue::from(-100i64));
        assert_eq!(
            decode_hex("3bffffffffffffffff").unwrap(),
            CborValue::Integer(CborInt::MIN)
        );
    }

    #[test]
    fn test_decode_strings_and_bools() {
        assert_eq!(
            decode_hex("44deadbeef").unwrap(),
            CborValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert_eq!(decode_hex("6568656c6c6f").unwrap(), CborValue::from("hello"));
        assert_eq!(decode_hex("f4").unwrap(), CborValue::Bool(false));
        assert_eq!(decode_hex("f5").unwrap(), CborValue::Bool(true));
    }

    #[test]
    fn test_decode_chunked_bytes() {
        assert_eq!(
            decode_hex("5f42010243030405ff").unwrap(),
            CborValue::Bytes(vec![1, 2, 3, 4, 5])
        );
        assert_eq!(decode_hex("5fff").unwrap(), CborValue::Bytes(vec![]));
        assert_eq!(kind_of("5f01ff"), ErrorKind::TypeMismatch);
        assert_eq!(kind_of("5f5f4101ffff"), ErrorKind::TypeMismatch);
        assert_eq!(kind_of("5f4101"), ErrorKind::UnterminatedIndefiniteItem);
    }

    #[test]
    fn test_decode_containers() {
        assert_eq!(
            decode_hex("8301820203820405").unwrap(),
            CborValue::Array(vec![
                CborValue::uint(1),
                CborValue::Array(vec![CborValue::uint(2), CborValue::uint(3)]),
                CborValue::Array(vec![CborValue::uint(4), CborValue::uint(5)]),
            ])
        );
        assert_eq!(
            decode_hex("9f0102ff").unwrap(),
            CborValue::Array(vec![CborValue::uint(1), CborValue::uint(2)])
        );
        assert_eq!(
            decode_hex("bf0102ff").unwrap(),
            CborValue::Map(vec![(CborValue::uint(1), CborValue::uint(2))])
        );
        assert_eq!(
            decode_hex("d90102820102").unwrap(),
            CborValue::tag(
                258,
                CborValue::Array(vec![CborValue::uint(1), CborValue::uint(2)])
            )
        );
    }

    #[test]
    fn test_map_preserves_wire_order() {
        let value = decode_hex("a203040102").unwrap();
        assert_eq!(
            value,
            CborValue::Map(vec![
                (CborValue::uint(3), CborValue::uint(4)),
                (CborValue::uint(1), CborValue::uint(2)),
            ])
        );
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(kind_of(""), ErrorKind::BufferUnderrun);
        assert_eq!(kind_of("1901"), ErrorKind::BufferUnderrun);
        assert_eq!(kind_of("1c"), ErrorKind::ReservedAdditionalInfo);
        assert_eq!(kind_of("fc"), ErrorKind::ReservedAdditionalInfo);
        assert_eq!(kind_of("ff"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("f6"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("f93c00"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("7f6161ff"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("3f"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("df"), ErrorKind::InvalidLeadingByte);
        assert_eq!(kind_of("9f01"), ErrorKind::UnterminatedIndefiniteItem);
        assert_eq!(kind_of("bf01"), ErrorKind::BufferUnderrun);
        assert_eq!(kind_of("5bffffffffffffffff"), ErrorKind::LengthOverflow);
        assert_eq!(kind_of("5a7fffffff"), ErrorKind::BufferUnderrun);
        assert_eq!(kind_of("0101"), ErrorKind::TrailingBytes);
        assert_eq!(kind_of("a201020103"), ErrorKind::DuplicateMapKey);
    }

    #[test]
    fn test_truncated_indefinite_items() {
        // Input ending between children: the container is unterminated.
        for hex in ["9f01", "bf0102", "5f4101"] {
            let err = decode_hex(hex).unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnterminatedIndefiniteItem, "{hex}");
            assert_eq!(err.offset, 0, "{hex}");
        }
        // Input ending inside a child: the child underruns.
        for (hex, offset) in [("bf01", 2), ("9f8201", 3), ("5f41", 2)] {
            let err = decode_hex(hex).unwrap_err();
            assert_eq!(err.kind, ErrorKind::BufferUnderrun, "{hex}");
            assert_eq!(err.offset, offset, "{hex}");
        }
    }

    #[test]
    fn test_error_offsets() {
        let err = decode_hex("8201ff").unwrap_err();
        assert_eq!(err, CodecError::new(ErrorKind::InvalidLeadingByte, 2));

        let err = decode_hex("a201020103").unwrap_err();
        assert_eq!(err, CodecError::new(ErrorKind::DuplicateMapKey, 3));

        let err = decode_hex("0101").unwrap_err();
        assert_eq!(err, CodecError::new(ErrorKind::TrailingBytes, 1));
    }

    #[test]
    fn test_duplicate_keys_allowed_when_configured() {
        let bytes = hex::decode("a201020103").unwrap();
        let limits = DecodeLimits::default().with_duplicate_keys_rejected(false);
        let value = decode_exact(&bytes, limits).unwrap();
        assert_eq!(value.as_map().unwrap().len(), 2);
    }

    #[test]
    fn test_decode_at_offset_reports_consumed() {
        let bytes = hex::decode("ff8201021903e8").unwrap();
        let (value, consumed) = decode(&bytes, 1, DecodeLimits::default()).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(value.as_array().unwrap().len(), 2);

        let (value, consumed) = decode(&bytes, 4, DecodeLimits::default()).unwrap();
        assert_eq!((value, consumed), (CborValue::uint(1000), 3));
    }

    #[test]
    fn test_depth_budget() {
        let limits = DecodeLimits::default().with_max_depth(3);
        let ok = hex::decode("81818180").unwrap();
        assert!(decode_exact(&ok, limits.with_max_depth(4)).is_ok());
        let err = decode_exact(&ok, limits).unwrap_err();
        assert_eq!(err, CodecError::new(ErrorKind::DepthBudgetExceeded, 3));

        // Empty containers count.
        let err = decode_exact(&[0x80], limits.with_max_depth(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthBudgetExceeded);

        // Tags count.
        let tagged = hex::decode("d818d81801").unwrap();
        assert!(decode_exact(&tagged, limits.with_max_depth(2)).is_ok());
        assert!(decode_exact(&tagged, limits.with_max_depth(1)).is_err());
    }

    #[test]
    fn test_depth_budget_default_on_hostile_input() {
        let mut bytes = vec![0x81; 100_000];
        bytes.push(0x00);
        let err = decode_exact(&bytes, DecodeLimits::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthBudgetExceeded);
        assert_eq!(err.offset, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_depth_budget_is_clamped() {
        let mut bytes = vec![0x81; MAX_DEPTH_CEILING + 1];
        bytes.push(0x00);
        let limits = DecodeLimits::default().with_max_depth(usize::MAX);
        assert_eq!(limits.effective_max_depth(), MAX_DEPTH_CEILING);
        let err = decode_exact(&bytes, limits).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthBudgetExceeded);
    }
}
