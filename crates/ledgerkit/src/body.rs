//! Transaction bodies.
//!
//! ```text
//! transaction_body = {
//!     0 : set<transaction_input>,
//!     1 : [* transaction_output],
//!     2 : coin,                     ; fee
//!   ? 3 : uint,                     ; time to live
//!   ? 4 : nonempty_set<certificate>,
//! }
//! ```

use ledgerkit_core::{
    ArrayReader, CborRecord, CborValue, MapReader, NonEmptySet, PipelineError, Profile,
};

use crate::certificate::Certificate;
use crate::error::{LedgerError, Result};
use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::record::LedgerRecord;

mod keys {
    pub const INPUTS: u64 = 0;
    pub const OUTPUTS: u64 = 1;
    pub const FEE: u64 = 2;
    pub const TTL: u64 = 3;
    pub const CERTIFICATES: u64 = 4;

    pub const ALL: &[u64] = &[INPUTS, OUTPUTS, FEE, TTL, CERTIFICATES];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
    inputs: NonEmptySet<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    fee: u64,
    ttl: Option<u64>,
    certificates: Option<NonEmptySet<Certificate>>,
}

impl TransactionBody {
    /// Fails if `inputs` is empty.
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        fee: u64,
    ) -> Result<Self> {
        let inputs = NonEmptySet::new(inputs).map_err(|source| LedgerError::Invalid {
            record: Self::NAME,
            source,
        })?;
        Ok(Self {
            inputs,
            outputs,
            fee,
            ttl: None,
            certificates: None,
        })
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Attach certificates. An empty list clears them.
    #[must_use]
    pub fn with_certificates(mut self, certificates: Vec<Certificate>) -> Self {
        self.certificates = NonEmptySet::new(certificates).ok();
        self
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        self.inputs.as_slice()
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn ttl(&self) -> Option<u64> {
        self.ttl
    }

    pub fn certificates(&self) -> &[Certificate] {
        self.certificates
            .as_ref()
            .map(NonEmptySet::as_slice)
            .unwrap_or_default()
    }
}

impl CborRecord for TransactionBody {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        let mut entries = vec![
            (CborValue::uint(keys::INPUTS), self.inputs.to_cbor()),
            (
                CborValue::uint(keys::OUTPUTS),
                CborValue::Array(self.outputs.iter().map(CborRecord::to_cbor).collect()),
            ),
            (CborValue::uint(keys::FEE), CborValue::uint(self.fee)),
        ];
        if let Some(ttl) = self.ttl {
            entries.push((CborValue::uint(keys::TTL), CborValue::uint(ttl)));
        }
        if let Some(certificates) = &self.certificates {
            entries.push((CborValue::uint(keys::CERTIFICATES), certificates.to_cbor()));
        }
        CborValue::Map(entries)
    }

    fn from_cbor(value: &CborValue) -> std::result::Result<Self, PipelineError> {
        let fields = MapReader::new(value, "transaction body map")?;
        fields.only_keys(keys::ALL, "transaction body keys 0..=4")?;

        let outputs = ArrayReader::new(fields.required(keys::OUTPUTS, "outputs")?, "output array")
            .map_err(|e| e.at_field("outputs"))?
            .records("outputs")?;

        Ok(Self {
            inputs: fields.record(keys::INPUTS, "inputs")?,
            outputs,
            fee: fields.uint(keys::FEE, "fee")?,
            ttl: fields.optional_uint(keys::TTL, "ttl")?,
            certificates: fields.optional_record(keys::CERTIFICATES, "certificates")?,
        })
    }
}

impl LedgerRecord for TransactionBody {
    const NAME: &'static str = "TransactionBody";
}
