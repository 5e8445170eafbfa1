//! # ledgerkit core
//!
//! The binary serialization core of ledgerkit: a codec for the restricted
//! CBOR dialect the ledger speaks, its two canonicalization profiles, and
//! the script datum algebra built on top.
//!
//! This crate does no I/O and holds no state. Every function is pure and
//! safe to call concurrently.
//!
//! ## Layers
//!
//! - [`decode`] / [`encode`]: raw bytes ↔ [`CborValue`]
//! - [`Profile`]: the ledger and datum presets that parameterize the codec
//! - [`ScriptDatum`]: smart-contract data and its tag mapping
//! - [`pipeline`]: the bytes ↔ hex ↔ value ↔ record chain every record uses
//!
//! ## Usage
//!
//! ```rust
//! use ledgerkit_core::{CborRecord, ScriptDatum};
//!
//! let datum = ScriptDatum::constr(0, vec![ScriptDatum::int(1000)]);
//! assert_eq!(datum.to_hex(), "d8799f1903e8ff");
//! assert_eq!(ScriptDatum::from_hex("d8799f1903e8ff").unwrap(), datum);
//! ```

pub mod datum;
pub mod decode;
pub mod encode;
pub mod error;
pub mod hash;
pub mod pipeline;
pub mod profile;
pub mod shape;
pub mod tags;
pub mod value;

mod wire;

pub use datum::ScriptDatum;
pub use decode::{decode, decode_exact, DecodeLimits, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
pub use encode::{encode, encode_into};
pub use error::{CodecError, ErrorKind, PipelineError, Stage};
pub use hash::{Hash, Hash28, Hash32};
pub use pipeline::{CborRecord, CborStage, Chain, HexStage, RecordStage, Transform};
pub use profile::{CodecOptions, LengthMode, MapKeyOrder, Profile};
pub use shape::{ArrayReader, MapReader};
pub use tags::{EmbeddedCbor, NonEmptySet, Rational};
pub use value::{CborInt, CborValue, IntOutOfRange};
