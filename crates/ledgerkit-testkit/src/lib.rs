//! # ledgerkit testkit
//!
//! Testing utilities for ledgerkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: CBOR inputs with their canonical re-encodings or
//!   expected error kinds, shared as JSON across implementations
//! - **Generators**: Proptest strategies for values, datums and records
//! - **Fixtures**: Deterministic records and pathological inputs
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerkit_testkit::vectors::verify_all_vectors;
//!
//! for (name, err) in verify_all_vectors() {
//!     println!("{name}: {err:#}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerkit_core::{CborRecord, ScriptDatum};
//! use ledgerkit_testkit::generators::script_datum;
//!
//! proptest! {
//!     #[test]
//!     fn datum_roundtrip(datum in script_datum()) {
//!         let back = ScriptDatum::from_bytes(&datum.to_bytes()).unwrap();
//!         prop_assert_eq!(back, datum);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use ledgerkit::LedgerRecord;
//! use ledgerkit_testkit::fixtures::TestFixture;
//!
//! let body = TestFixture::new().body(2, 2);
//! assert!(!body.encode().is_empty());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{deep_array, deep_datum, sample_datum, TestFixture};
pub use generators::{body_from_params, script_datum, BodyParams};
pub use vectors::{all_vectors, load_vectors, verify_all_vectors, CborVector, Target};
