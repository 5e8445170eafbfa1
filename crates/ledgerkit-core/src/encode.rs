//! Primitive CBOR encoder.
//!
//! Encoding never fails: every [`CborValue`] has a representation. The
//! [`CodecOptions`] decide the two choices the wire leaves open:
//! - Arrays and maps: definite, or indefinite with a trailing break
//!   (empty collections are always definite `0x80` / `0xa0`)
//! - Map entries: insertion order, or sorted by encoded key bytes
//!
//! Integers and lengths always use the smallest argument width. Byte and
//! text strings are always definite and never chunked.

use crate::profile::{CodecOptions, LengthMode, MapKeyOrder};
use crate::value::CborValue;
use crate::wire::{
    BREAK, FALSE, INDEFINITE, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_TAG,
    MAJOR_TEXT, MAJOR_UNSIGNED, TRUE,
};

/// Encode a value to bytes.
pub fn encode(value: &CborValue, options: CodecOptions) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(&mut buf, value, options);
    buf
}

/// Append the encoding of `value` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, value: &CborValue, options: CodecOptions) {
    match value {
        CborValue::Integer(i) => {
            let major = if i.is_negative() {
                MAJOR_NEGATIVE
            } else {
                MAJOR_UNSIGNED
            };
            encode_head(buf, major, i.argument());
        }
        CborValue::Bytes(b) => {
            encode_head(buf, MAJOR_BYTES, b.len() as u64);
            buf.extend_from_slice(b);
        }
        CborValue::Text(s) => {
            encode_head(buf, MAJOR_TEXT, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        CborValue::Array(items) => encode_array(buf, items, options),
        CborValue::Map(entries) => match options.map_key_order() {
            MapKeyOrder::Insertion => encode_map_in_order(buf, entries, options),
            MapKeyOrder::CanonicalByteOrder => encode_map_canonical(buf, entries, options),
        },
        CborValue::Tag(tag, inner) => {
            encode_head(buf, MAJOR_TAG, *tag);
            encode_into(buf, inner, options);
        }
        CborValue::Bool(b) => buf.push(if *b { TRUE } else { FALSE }),
    }
}

/// Write an item head with the smallest argument width.
pub(crate) fn encode_head(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Open a collection of `len` items. Returns true if a break must follow.
fn open_collection(buf: &mut Vec<u8>, major: u8, len: usize, options: CodecOptions) -> bool {
    let indefinite = len > 0 && options.length_mode() == LengthMode::IndefiniteExceptEmpty;
    if indefinite {
        buf.push((major << 5) | INDEFINITE);
    } else {
        encode_head(buf, major, len as u64);
    }
    indefinite
}

fn encode_array(buf: &mut Vec<u8>, items: &[CborValue], options: CodecOptions) {
    let indefinite = open_collection(buf, MAJOR_ARRAY, items.len(), options);
    for item in items {
        encode_into(buf, item, options);
    }
    if indefinite {
        buf.push(BREAK);
    }
}

fn encode_map_in_order(buf: &mut Vec<u8>, entries: &[(CborValue, CborValue)], options: CodecOptions) {
    let indefinite = open_collection(buf, MAJOR_MAP, entries.len(), options);
    for (k, v) in entries {
        encode_into(buf, k, options);
        encode_into(buf, v, options);
    }
    if indefinite {
        buf.push(BREAK);
    }
}

/// Encode a map with entries sorted by their encoded key bytes.
fn encode_map_canonical(
    buf: &mut Vec<u8>,
    entries: &[(CborValue, CborValue)],
    options: CodecOptions,
) {
    let mut encoded: Vec<(Vec<u8>, &CborValue)> = entries
        .iter()
        .map(|(k, v)| (encode(k, options), v))
        .collect();

    // Lexicographic over the encoded bytes; shorter heads sort first.
    encoded.sort_by(|a, b| a.0.cmp(&b.0));

    let indefinite = open_collection(buf, MAJOR_MAP, encoded.len(), options);
    for (key_bytes, v) in encoded {
        buf.extend_from_slice(&key_bytes);
        encode_into(buf, v, options);
    }
    if indefinite {
        buf.push(BREAK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::CborInt;

    fn ledger_hex(value: &CborValue) -> String {
        hex::encode(encode(value, CodecOptions::LEDGER))
    }

    fn datum_hex(value: &CborValue) -> String {
        hex::encode(encode(value, CodecOptions::DATUM))
    }

    #[test]
    fn test_integer_width_boundaries() {
        let cases: [(u64, &str); 9] = [
            (0, "00"),
            (23, "17"),
            (24, "1818"),
            (255, "18ff"),
            (256, "190100"),
            (65535, "19ffff"),
            (65536, "1a00010000"),
            (4_294_967_296, "1b0000000100000000"),
            (u64::MAX, "1bffffffffffffffff"),
        ];
        for (n, expected) in cases {
            assert_eq!(ledger_hex(&CborValue::uint(n)), expected, "n = {n}");
        }
    }

    #[test]
    fn test_negative_integers() {
        assert_eq!(ledger_hex(&CborValue::from(-1i64)), "20");
        assert_eq!(ledger_hex(&CborValue::from(-24i64)), "37");
        assert_eq!(ledger_hex(&CborValue::from(-25i64)), "3818");
        assert_eq!(ledger_hex(&CborValue::from(-1000i64)), "3903e7");
        assert_eq!(
            ledger_hex(&CborValue::Integer(CborInt::MIN)),
            "3bffffffffffffffff"
        );
    }

    #[test]
    fn test_strings_are_definite_in_both_profiles() {
        let value = CborValue::Array(vec![
            CborValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]),
            CborValue::from("hi"),
        ]);
        assert_eq!(ledger_hex(&value), "8244deadbeef626869");
        assert_eq!(datum_hex(&value), "9f44deadbeef626869ff");
    }

    #[test]
    fn test_empty_collections_always_definite() {
        assert_eq!(datum_hex(&CborValue::Array(vec![])), "80");
        assert_eq!(datum_hex(&CborValue::Map(vec![])), "a0");
        assert_eq!(ledger_hex(&CborValue::Array(vec![])), "80");
        assert_eq!(ledger_hex(&CborValue::Map(vec![])), "a0");
    }

    #[test]
    fn test_map_key_ordering() {
        // Same entries in different insertion order.
        let a = CborValue::Map(vec![
            (CborValue::from("b"), CborValue::uint(2)),
            (CborValue::from("a"), CborValue::uint(1)),
            (CborValue::uint(10), CborValue::uint(3)),
        ]);
        let b = CborValue::Map(vec![
            (CborValue::uint(10), CborValue::uint(3)),
            (CborValue::from("a"), CborValue::uint(1)),
            (CborValue::from("b"), CborValue::uint(2)),
        ]);
        assert_eq!(ledger_hex(&a), ledger_hex(&b));
        // 0x0a < 0x61 0x61 < 0x61 0x62
        assert_eq!(ledger_hex(&a), "a30a03616101616202");
    }

    #[test]
    fn test_shorter_key_encoding_sorts_first() {
        let map = CborValue::Map(vec![
            (CborValue::uint(256), CborValue::uint(0)),
            (CborValue::uint(24), CborValue::uint(0)),
            (CborValue::uint(1), CborValue::uint(0)),
        ]);
        assert_eq!(ledger_hex(&map), "a3010018180019010000");
    }

    #[test]
    fn test_datum_map_keeps_insertion_order() {
        let map = CborValue::Map(vec![
            (CborValue::uint(2), CborValue::uint(0)),
            (CborValue::uint(1), CborValue::uint(0)),
        ]);
        assert_eq!(datum_hex(&map), "bf02000100ff");
    }

    #[test]
    fn test_tag_and_bool() {
        let value = CborValue::tag(258, CborValue::Array(vec![CborValue::Bool(true)]));
        assert_eq!(ledger_hex(&value), "d9010281f5");
    }
}
