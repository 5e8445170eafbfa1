//! Error types for ledger records.

use ledgerkit_core::{CodecError, ErrorKind, PipelineError, Stage};
use thiserror::Error;

/// Errors surfaced by ledger record operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A record failed to decode.
    #[error("{record}: {source}")]
    Decode {
        record: &'static str,
        #[source]
        source: PipelineError,
    },

    /// A validating constructor rejected its arguments.
    #[error("invalid {record}: {source}")]
    Invalid {
        record: &'static str,
        #[source]
        source: CodecError,
    },
}

impl LedgerError {
    /// The record type involved.
    pub fn record(&self) -> &'static str {
        match self {
            Self::Decode { record, .. } | Self::Invalid { record, .. } => record,
        }
    }

    /// The underlying codec error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { source, .. } => source.kind(),
            Self::Invalid { source, .. } => source.kind,
        }
    }

    /// The pipeline stage that failed, for decode errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Decode { source, .. } => Some(source.stage),
            Self::Invalid { .. } => None,
        }
    }

    /// The innermost field being decoded, if known.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Decode { source, .. } => source.field,
            Self::Invalid { .. } => None,
        }
    }
}

/// Result type for ledger record operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
