//! # ledgerkit
//!
//! Ledger records over the ledgerkit codec core.
//!
//! Each record supplies only its field layout (a [`CborRecord`] impl) and
//! gets bytes, hex and error context from the shared pipeline. Records are
//! always encoded with the ledger profile: definite lengths and map keys
//! sorted by their encoded bytes, so equal records hash equally.
//!
//! ## Usage
//!
//! ```rust
//! use ledgerkit::{Hash32, LedgerRecord, TransactionInput};
//!
//! let input = TransactionInput::new(Hash32::new([0xaa; 32]), 1);
//! let bytes = input.encode();
//! assert_eq!(TransactionInput::decode(&bytes).unwrap(), input);
//! ```
//!
//! ## Re-exports
//!
//! `ledgerkit::core` is the codec core (`ledgerkit-core`); its common types
//! are also re-exported at the crate root.

pub mod auxiliary;
pub mod body;
pub mod certificate;
pub mod credential;
pub mod error;
pub mod input;
pub mod output;
pub mod params;
pub mod record;

pub use ledgerkit_core as core;

pub use error::{LedgerError, Result};
pub use record::LedgerRecord;

pub use auxiliary::AuxiliaryData;
pub use body::TransactionBody;
pub use certificate::Certificate;
pub use credential::Credential;
pub use input::TransactionInput;
pub use output::{DatumOption, TransactionOutput};
pub use params::ExUnitPrices;

pub use ledgerkit_core::{
    CborRecord, CborValue, CodecError, EmbeddedCbor, ErrorKind, Hash28, Hash32, NonEmptySet,
    PipelineError, Profile, Rational, ScriptDatum, Stage,
};
