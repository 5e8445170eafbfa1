//! Proptest generators for property-based testing.

use num_bigint::{BigInt, Sign};
use proptest::prelude::*;

use ledgerkit::{
    Certificate, Credential, DatumOption, TransactionBody, TransactionInput, TransactionOutput,
};
use ledgerkit_core::{CborInt, CborValue, Hash28, Hash32, ScriptDatum};

/// Generate a random 28-byte hash.
pub fn hash28() -> impl Strategy<Value = Hash28> {
    any::<[u8; 28]>().prop_map(Hash28::new)
}

/// Generate a random 32-byte hash.
pub fn hash32() -> impl Strategy<Value = Hash32> {
    any::<[u8; 32]>().prop_map(Hash32::new)
}

/// Generate an integer over the full wire range, `-2^64 ..= 2^64 - 1`.
pub fn cbor_int() -> impl Strategy<Value = CborInt> {
    prop_oneof![
        any::<u64>().prop_map(CborInt::from_u64),
        any::<u64>().prop_map(CborInt::from_negative_argument),
        (0u64..=30).prop_map(CborInt::from_u64),
    ]
}

/// Generate a datum integer: mostly small, sometimes past 64 bits.
pub fn datum_int() -> impl Strategy<Value = BigInt> {
    prop_oneof![
        3 => any::<i64>().prop_map(BigInt::from),
        1 => (any::<bool>(), prop::collection::vec(any::<u8>(), 1..24)).prop_map(|(negative, magnitude)| {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            BigInt::from_bytes_be(sign, &magnitude)
        }),
    ]
}

/// Generate a constructor index, weighted toward each tag range.
pub fn constr_index() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..=6, 7u64..=127, 128u64..=u64::MAX]
}

/// Generate an arbitrary script datum.
pub fn script_datum() -> impl Strategy<Value = ScriptDatum> {
    let leaf = prop_oneof![
        datum_int().prop_map(ScriptDatum::Int),
        prop::collection::vec(any::<u8>(), 0..48).prop_map(ScriptDatum::Bytes),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            (constr_index(), prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(index, fields)| ScriptDatum::constr(index, fields)),
            prop::collection::vec(inner.clone(), 0..6).prop_map(ScriptDatum::List),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(ScriptDatum::Map),
        ]
    })
}

/// Generate a CBOR value tree of the supported dialect.
///
/// Map keys are unique. Tags 2 and 3 are left out since other decoders
/// fold them into integers.
pub fn cbor_value() -> impl Strategy<Value = CborValue> {
    let leaf = prop_oneof![
        cbor_int().prop_map(CborValue::Integer),
        prop::collection::vec(any::<u8>(), 0..40).prop_map(CborValue::Bytes),
        "[a-z0-9 ]{0,12}".prop_map(CborValue::Text),
        any::<bool>().prop_map(CborValue::Bool),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(CborValue::Array),
            prop::collection::hash_map(inner.clone(), inner.clone(), 0..5)
                .prop_map(|entries| CborValue::Map(entries.into_iter().collect())),
            (4u64..=100_000, inner).prop_map(|(tag, value)| CborValue::tag(tag, value)),
        ]
    })
}

/// Generate map entries with unique unsigned keys, paired with a shuffled
/// copy of the same entries.
pub fn shuffled_map() -> impl Strategy<Value = (Vec<(CborValue, CborValue)>, Vec<(CborValue, CborValue)>)> {
    prop::collection::btree_map(any::<u64>(), cbor_value(), 0..8)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (CborValue::uint(k), v))
                .collect::<Vec<_>>()
        })
        .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
}

/// Generate a transaction input.
pub fn transaction_input() -> impl Strategy<Value = TransactionInput> {
    (hash32(), 0u64..=1024).prop_map(|(id, index)| TransactionInput::new(id, index))
}

/// Generate a stake credential.
pub fn credential() -> impl Strategy<Value = Credential> {
    prop_oneof![
        hash28().prop_map(Credential::KeyHash),
        hash28().prop_map(Credential::ScriptHash),
    ]
}

/// Generate a stake certificate.
pub fn certificate() -> impl Strategy<Value = Certificate> {
    prop_oneof![
        credential().prop_map(Certificate::StakeRegistration),
        credential().prop_map(Certificate::StakeDeregistration),
        (credential(), hash28())
            .prop_map(|(credential, pool)| Certificate::StakeDelegation { credential, pool }),
    ]
}

/// Generate an optional datum attachment.
pub fn datum_option() -> impl Strategy<Value = Option<DatumOption>> {
    prop_oneof![
        Just(None),
        hash32().prop_map(|h| Some(DatumOption::Hash(h))),
        script_datum().prop_map(|d| Some(DatumOption::inline(&d))),
    ]
}

/// Generate a transaction output.
pub fn transaction_output() -> impl Strategy<Value = TransactionOutput> {
    (
        prop::collection::vec(any::<u8>(), 1..=57),
        any::<u64>(),
        datum_option(),
    )
        .prop_filter_map("address is non-empty", |(address, coin, datum)| {
            let output = TransactionOutput::new(address, coin).ok()?;
            Some(match datum {
                Some(datum) => output.with_datum(datum),
                None => output,
            })
        })
}

/// Parameters for generating a transaction body.
#[derive(Debug, Clone)]
pub struct BodyParams {
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub fee: u64,
    pub ttl: Option<u64>,
    pub certificates: Vec<Certificate>,
}

impl Arbitrary for BodyParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(transaction_input(), 1..4),
            prop::collection::vec(transaction_output(), 0..4),
            any::<u64>(),
            any::<Option<u64>>(),
            prop::collection::vec(certificate(), 0..3),
        )
            .prop_map(|(inputs, outputs, fee, ttl, certificates)| BodyParams {
                inputs,
                outputs,
                fee,
                ttl,
                certificates,
            })
            .boxed()
    }
}

/// Build a transaction body from parameters.
pub fn body_from_params(params: &BodyParams) -> Option<TransactionBody> {
    let body = TransactionBody::new(params.inputs.clone(), params.outputs.clone(), params.fee)
        .ok()?
        .with_certificates(params.certificates.clone());
    Some(match params.ttl {
        Some(ttl) => body.with_ttl(ttl),
        None => body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkit::LedgerRecord;
    use ledgerkit_core::{CborRecord, Profile};

    fn via_ciborium(bytes: &[u8]) -> Vec<u8> {
        let value: ciborium::Value = ciborium::from_reader(bytes).unwrap();
        let mut out = Vec::new();
        ciborium::into_writer(&value, &mut out).unwrap();
        out
    }

    proptest! {
        #[test]
        fn test_datum_roundtrip(datum in script_datum()) {
            let bytes = datum.to_bytes();
            let back = ScriptDatum::from_bytes(&bytes).unwrap();
            prop_assert_eq!(&back, &datum);
            prop_assert_eq!(back.to_bytes(), bytes);
        }

        #[test]
        fn test_ledger_encoding_is_stable(value in cbor_value()) {
            let bytes = Profile::Ledger.encode(&value);
            let back = Profile::Ledger.decode(&bytes).unwrap();
            prop_assert_eq!(Profile::Ledger.encode(&back), bytes);
        }

        #[test]
        fn test_datum_profile_preserves_values(value in cbor_value()) {
            let bytes = Profile::Datum.encode(&value);
            prop_assert_eq!(Profile::Datum.decode(&bytes).unwrap(), value);
        }

        #[test]
        fn test_map_order_does_not_change_ledger_bytes((entries, shuffled) in shuffled_map()) {
            let a = Profile::Ledger.encode(&CborValue::Map(entries));
            let b = Profile::Ledger.encode(&CborValue::Map(shuffled));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn test_ciborium_agrees_with_ledger_bytes(value in cbor_value()) {
            let bytes = Profile::Ledger.encode(&value);
            prop_assert_eq!(via_ciborium(&bytes), bytes);
        }

        #[test]
        fn test_body_roundtrip(params: BodyParams) {
            let body = body_from_params(&params).unwrap();
            let bytes = body.encode();
            let back = TransactionBody::decode(&bytes).unwrap();
            prop_assert_eq!(&back, &body);
            prop_assert_eq!(back.encode(), bytes);
        }

        #[test]
        fn test_certificate_roundtrip(cert in certificate()) {
            prop_assert_eq!(Certificate::decode(&cert.encode()).unwrap(), cert);
        }
    }
}
