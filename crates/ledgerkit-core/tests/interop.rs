//! Cross-checks against an independent CBOR implementation.
//!
//! For definite-length items with already-sorted map keys, the ledger
//! profile must produce exactly what `ciborium` produces, and each side
//! must read the other's output.

use ciborium::value::Value;
use ledgerkit_core::{decode_exact, CborInt, CborValue, DecodeLimits, Profile};

fn ciborium_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).unwrap();
    out
}

fn samples() -> Vec<CborValue> {
    vec![
        CborValue::uint(0),
        CborValue::uint(23),
        CborValue::uint(24),
        CborValue::uint(65_536),
        CborValue::uint(u64::MAX),
        CborValue::from(-1i64),
        CborValue::from(-500i64),
        CborValue::from(i64::MIN),
        CborValue::Bytes(vec![]),
        CborValue::Bytes(vec![0xab; 300]),
        CborValue::from("ledger"),
        CborValue::Bool(true),
        CborValue::Array(vec![]),
        CborValue::Array((0..30).map(CborValue::uint).collect()),
        CborValue::Map(vec![
            (CborValue::uint(0), CborValue::Bytes(vec![1; 32])),
            (CborValue::uint(1), CborValue::uint(1_000_000)),
            (CborValue::uint(2), CborValue::uint(170_000)),
        ]),
        CborValue::tag(
            258,
            CborValue::Array(vec![CborValue::Array(vec![
                CborValue::Bytes(vec![0xaa; 32]),
                CborValue::uint(1),
            ])]),
        ),
        CborValue::tag(24, CborValue::Bytes(vec![0xd8, 0x79, 0x80])),
        CborValue::tag(30, CborValue::Array(vec![CborValue::uint(1), CborValue::uint(3)])),
    ]
}

#[test]
fn test_ledger_encoding_matches_ciborium() {
    for value in samples() {
        let ours = Profile::Ledger.encode(&value);
        let theirs = ciborium_bytes(&Value::from(&value));
        assert_eq!(hex::encode(&ours), hex::encode(&theirs), "{value:?}");
    }
}

#[test]
fn test_we_read_ciborium_output() {
    for value in samples() {
        let theirs = ciborium_bytes(&Value::from(&value));
        let decoded = decode_exact(&theirs, DecodeLimits::default()).unwrap();
        assert_eq!(decoded, value);
    }
}

#[test]
fn test_ciborium_reads_our_output() {
    for profile in [Profile::Ledger, Profile::Datum] {
        for value in samples() {
            let ours = profile.encode(&value);
            let theirs: Value = ciborium::de::from_reader(ours.as_slice()).unwrap();
            assert_eq!(CborValue::try_from(&theirs).unwrap(), value, "{profile}");
        }
    }
}

#[test]
fn test_negative_native_extreme_matches_ciborium() {
    // -2^64 is the most negative native integer.
    let value = CborValue::Integer(CborInt::MIN);
    let ours = Profile::Ledger.encode(&value);
    assert_eq!(hex::encode(&ours), "3bffffffffffffffff");
    let theirs: Value = ciborium::de::from_reader(ours.as_slice()).unwrap();
    assert_eq!(CborValue::try_from(&theirs).unwrap(), value);
}
