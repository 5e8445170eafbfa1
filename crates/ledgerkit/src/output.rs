//! Transaction outputs and the datums attached to them.
//!
//! ```text
//! datum_option = [0, hash32] / [1, #6.24(bytes .cbor plutus_data)]
//! output       = { 0: address, 1: coin, ? 2: datum_option }
//! ```

use ledgerkit_core::shape::expect_bytes;
use ledgerkit_core::{
    ArrayReader, CborRecord, CborValue, CodecError, EmbeddedCbor, ErrorKind, Hash32,
    MapReader, PipelineError, Profile, ScriptDatum,
};

use crate::error::{LedgerError, Result};
use crate::record::LedgerRecord;

mod keys {
    pub const ADDRESS: u64 = 0;
    pub const COIN: u64 = 1;
    pub const DATUM: u64 = 2;

    pub const ALL: &[u64] = &[ADDRESS, COIN, DATUM];
}

/// A datum attached to an output: by hash, or inline.
///
/// Inline datums keep the exact bytes they arrived with, so re-encoding an
/// output never changes its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatumOption {
    Hash(Hash32),
    Inline(EmbeddedCbor),
}

impl DatumOption {
    /// Inline `datum`, encoded with the datum profile.
    pub fn inline(datum: &ScriptDatum) -> Self {
        Self::Inline(EmbeddedCbor::wrap(datum))
    }

    /// The inline datum, decoded.
    pub fn datum(&self) -> Option<std::result::Result<ScriptDatum, PipelineError>> {
        match self {
            Self::Hash(_) => None,
            Self::Inline(embedded) => Some(embedded.decode()),
        }
    }
}

impl CborRecord for DatumOption {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        match self {
            Self::Hash(h) => CborValue::Array(vec![CborValue::uint(0), h.to_cbor()]),
            Self::Inline(embedded) => CborValue::Array(vec![CborValue::uint(1), embedded.to_cbor()]),
        }
    }

    fn from_cbor(value: &CborValue) -> std::result::Result<Self, PipelineError> {
        let mut fields = ArrayReader::exact(value, 2, "[datum kind, datum]")?;
        match fields.uint("kind")? {
            0 => Ok(Self::Hash(fields.record("hash")?)),
            1 => {
                let embedded: EmbeddedCbor = fields.record("datum")?;
                // Inline bytes must hold a datum.
                embedded
                    .decode::<ScriptDatum>()
                    .map_err(|e| e.at_field("datum"))?;
                Ok(Self::Inline(embedded))
            }
            _ => Err(PipelineError::shape(CodecError::mismatch("datum kind 0 or 1")).at_field("kind")),
        }
    }
}

impl LedgerRecord for DatumOption {
    const NAME: &'static str = "DatumOption";
}

/// A post-Alonzo (map form) transaction output.
///
/// Addresses are carried as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    address: Vec<u8>,
    coin: u64,
    datum: Option<DatumOption>,
}

impl TransactionOutput {
    /// Fails if `address` is empty.
    pub fn new(address: Vec<u8>, coin: u64) -> Result<Self> {
        if address.is_empty() {
            return Err(LedgerError::Invalid {
                record: Self::NAME,
                source: CodecError::new(ErrorKind::TypeMismatch, 0).expecting("non-empty address"),
            });
        }
        Ok(Self {
            address,
            coin,
            datum: None,
        })
    }

    #[must_use]
    pub fn with_datum(mut self, datum: DatumOption) -> Self {
        self.datum = Some(datum);
        self
    }

    pub fn address(&self) -> &[u8] {
        &self.address
    }

    pub fn coin(&self) -> u64 {
        self.coin
    }

    pub fn datum(&self) -> Option<&DatumOption> {
        self.datum.as_ref()
    }
}

impl CborRecord for TransactionOutput {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        let mut entries = vec![
            (CborValue::uint(keys::ADDRESS), CborValue::Bytes(self.address.clone())),
            (CborValue::uint(keys::COIN), CborValue::uint(self.coin)),
        ];
        if let Some(datum) = &self.datum {
            entries.push((CborValue::uint(keys::DATUM), datum.to_cbor()));
        }
        CborValue::Map(entries)
    }

    fn from_cbor(value: &CborValue) -> std::result::Result<Self, PipelineError> {
        let fields = MapReader::new(value, "transaction output map")?;
        fields.only_keys(keys::ALL, "transaction output keys 0..=2")?;

        let address = expect_bytes(fields.required(keys::ADDRESS, "address")?, "address")?;
        if address.is_empty() {
            return Err(PipelineError::domain(CodecError::mismatch("non-empty address")).at_field("address"));
        }
        Ok(Self {
            address: address.to_vec(),
            coin: fields.uint(keys::COIN, "coin")?,
            datum: fields.optional_record(keys::DATUM, "datum_option")?,
        })
    }
}

impl LedgerRecord for TransactionOutput {
    const NAME: &'static str = "TransactionOutput";
}
