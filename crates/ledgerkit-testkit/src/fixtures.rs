//! Test fixtures and helpers.
//!
//! Deterministic records and pathological inputs for integration tests and
//! benchmarks.

use ledgerkit::{
    AuxiliaryData, Certificate, Credential, DatumOption, TransactionBody, TransactionInput,
    TransactionOutput,
};
use ledgerkit_core::{CborValue, Hash28, Hash32, ScriptDatum};

/// Builds records whose hashes are derived from a one-byte seed, so two
/// fixtures with the same seed produce identical bytes.
#[derive(Debug, Clone, Copy)]
pub struct TestFixture {
    pub seed: u8,
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_seed(0x42)
    }

    pub fn with_seed(seed: u8) -> Self {
        Self { seed }
    }

    /// The `n`th 28-byte hash of this fixture.
    pub fn hash28(&self, n: u8) -> Hash28 {
        let mut bytes = [self.seed; 28];
        bytes[0] = n;
        Hash28::new(bytes)
    }

    /// The `n`th 32-byte hash of this fixture.
    pub fn hash32(&self, n: u8) -> Hash32 {
        let mut bytes = [self.seed; 32];
        bytes[0] = n;
        Hash32::new(bytes)
    }

    /// An enterprise-style address: header byte plus a key hash.
    pub fn address(&self, n: u8) -> Vec<u8> {
        let mut address = vec![0x61];
        address.extend_from_slice(self.hash28(n).as_bytes());
        address
    }

    pub fn input(&self, n: u8, index: u64) -> TransactionInput {
        TransactionInput::new(self.hash32(n), index)
    }

    pub fn output(&self, n: u8, coin: u64) -> TransactionOutput {
        TransactionOutput::new(self.address(n), coin)
            .expect("fixture addresses are non-empty")
    }

    /// An output carrying [`sample_datum`] inline.
    pub fn output_with_datum(&self, n: u8, coin: u64) -> TransactionOutput {
        self.output(n, coin)
            .with_datum(DatumOption::inline(&sample_datum()))
    }

    pub fn delegation(&self, n: u8) -> Certificate {
        Certificate::StakeDelegation {
            credential: Credential::KeyHash(self.hash28(n)),
            pool: self.hash28(n.wrapping_add(1)),
        }
    }

    /// A body with `inputs` inputs, `outputs` outputs, a TTL and one
    /// delegation certificate.
    pub fn body(&self, inputs: u8, outputs: u8) -> TransactionBody {
        let ins = (0..inputs.max(1)).map(|n| self.input(n, u64::from(n))).collect();
        let outs = (0..outputs)
            .map(|n| {
                if n % 2 == 0 {
                    self.output(n, 1_000_000 + u64::from(n))
                } else {
                    self.output_with_datum(n, 2_000_000)
                }
            })
            .collect();
        TransactionBody::new(ins, outs, 170_000)
            .expect("fixture bodies have inputs")
            .with_ttl(90_000_000)
            .with_certificates(vec![self.delegation(0)])
    }

    pub fn auxiliary_data(&self) -> AuxiliaryData {
        let mut aux = AuxiliaryData::new();
        aux.insert(
            674,
            CborValue::Map(vec![(
                CborValue::from("msg"),
                CborValue::Array(vec![CborValue::from("fixture")]),
            )]),
        )
        .expect("text metadata is valid");
        aux
    }
}

/// A small datum exercising every constructor tag range.
pub fn sample_datum() -> ScriptDatum {
    ScriptDatum::constr(
        0,
        vec![
            ScriptDatum::int(42),
            ScriptDatum::bytes(b"fixture".to_vec()),
            ScriptDatum::constr(7, vec![ScriptDatum::unit()]),
            ScriptDatum::constr(500, vec![]),
            ScriptDatum::Map(vec![(ScriptDatum::int(1), ScriptDatum::bool(true))]),
        ],
    )
}

/// `depth` nested single-element definite arrays around `0`.
pub fn deep_array(depth: usize) -> Vec<u8> {
    let mut bytes = vec![0x81; depth];
    bytes.push(0x00);
    bytes
}

/// `depth` nested single-element datum lists around `0`.
pub fn deep_datum(depth: usize) -> ScriptDatum {
    (0..depth).fold(ScriptDatum::int(0), |inner, _| ScriptDatum::List(vec![inner]))
}

/// A datum list of `len` integers.
pub fn wide_datum(len: usize) -> ScriptDatum {
    ScriptDatum::List((0..len as i64).map(ScriptDatum::int).collect())
}
