//! Transaction inputs: `[transaction_id, index]`.

use std::fmt;

use ledgerkit_core::{ArrayReader, CborRecord, CborValue, Hash32, PipelineError, Profile};

use crate::record::LedgerRecord;

/// A reference to an output of an earlier transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionInput {
    pub transaction_id: Hash32,
    pub index: u64,
}

impl TransactionInput {
    pub const fn new(transaction_id: Hash32, index: u64) -> Self {
        Self {
            transaction_id,
            index,
        }
    }
}

impl fmt::Debug for TransactionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionInput({:?}#{})", self.transaction_id, self.index)
    }
}

impl fmt::Display for TransactionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.transaction_id, self.index)
    }
}

impl CborRecord for TransactionInput {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::Array(vec![self.transaction_id.to_cbor(), CborValue::uint(self.index)])
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let mut fields = ArrayReader::exact(value, 2, "[transaction_id, index]")?;
        let transaction_id = fields.record("transaction_id")?;
        let index = fields.uint("index")?;
        Ok(Self::new(transaction_id, index))
    }
}

impl LedgerRecord for TransactionInput {
    const NAME: &'static str = "TransactionInput";
}
