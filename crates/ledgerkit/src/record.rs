//! The entry point every ledger record shares.

use ledgerkit_core::{CborRecord, PipelineError};
use tracing::{debug, trace};

use crate::error::{LedgerError, Result};

/// A named ledger record.
///
/// Records describe their field layout through [`CborRecord`]; this trait
/// adds the record name to errors and logs decode outcomes.
pub trait LedgerRecord: CborRecord {
    /// Record name used in errors and logs.
    const NAME: &'static str;

    /// Decode a record from its canonical bytes.
    fn decode(bytes: &[u8]) -> Result<Self> {
        let result = Self::from_bytes(bytes);
        log_outcome::<Self>(bytes.len(), result)
    }

    /// Decode a record from hex.
    fn decode_hex(hex: &str) -> Result<Self> {
        let result = Self::from_hex(hex);
        log_outcome::<Self>(hex.len() / 2, result)
    }

    /// Encode to bytes under the ledger profile.
    fn encode(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

fn log_outcome<T: LedgerRecord>(
    len: usize,
    result: std::result::Result<T, PipelineError>,
) -> Result<T> {
    match result {
        Ok(record) => {
            trace!(record = T::NAME, len, "decoded record");
            Ok(record)
        }
        Err(source) => {
            debug!(
                record = T::NAME,
                stage = %source.stage,
                field = source.field.unwrap_or("-"),
                error = %source.source,
                "record decode failed"
            );
            Err(LedgerError::Decode {
                record: T::NAME,
                source,
            })
        }
    }
}
