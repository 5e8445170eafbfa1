//! Stake credentials: `[0, addr_keyhash] / [1, script_hash]`.

use ledgerkit_core::{ArrayReader, CborRecord, CborValue, CodecError, Hash28, PipelineError, Profile};

use crate::record::LedgerRecord;

/// Who controls a stake address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Credential {
    KeyHash(Hash28),
    ScriptHash(Hash28),
}

impl Credential {
    pub fn hash(&self) -> &Hash28 {
        match self {
            Self::KeyHash(h) | Self::ScriptHash(h) => h,
        }
    }
}

impl CborRecord for Credential {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        let (kind, hash) = match self {
            Self::KeyHash(h) => (0, h),
            Self::ScriptHash(h) => (1, h),
        };
        CborValue::Array(vec![CborValue::uint(kind), hash.to_cbor()])
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let mut fields = ArrayReader::exact(value, 2, "[credential kind, hash]")?;
        let kind = fields.uint("kind")?;
        let hash = fields.record("hash")?;
        match kind {
            0 => Ok(Self::KeyHash(hash)),
            1 => Ok(Self::ScriptHash(hash)),
            _ => Err(PipelineError::shape(CodecError::mismatch("credential kind 0 or 1")).at_field("kind")),
        }
    }
}

impl LedgerRecord for Credential {
    const NAME: &'static str = "Credential";
}
