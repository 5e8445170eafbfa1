//! Error types for the ledgerkit codec core.
//!
//! The codec reports failures through one flat taxonomy ([`ErrorKind`]).
//! Nothing here recovers internally: a single malformed node fails the
//! whole decode, and the error says where.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a codec operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input ended before the current item was complete.
    BufferUnderrun,
    /// Leading byte is outside the supported dialect (floats, null, stray break, ...).
    InvalidLeadingByte,
    /// Additional-info values 28..=30 are reserved.
    ReservedAdditionalInfo,
    /// A length argument cannot be addressed on this platform.
    LengthOverflow,
    /// Input ended where an indefinite-length item expected its next child
    /// or its break byte. Input that ends partway through a child is a
    /// [`ErrorKind::BufferUnderrun`] of that child instead.
    UnterminatedIndefiniteItem,
    /// A tag number this dialect does not assign a meaning to.
    UnknownTag,
    /// Bignum magnitude is empty or carries a leading zero byte.
    MalformedBignum,
    /// The decoded shape differs from the one the caller expected.
    TypeMismatch,
    /// Nesting exceeded the decode depth budget.
    DepthBudgetExceeded,
    /// A ledger map repeats a key.
    DuplicateMapKey,
    /// Bytes remain after the single expected item.
    TrailingBytes,
    /// Hex text is not an even-length run of hex digits.
    InvalidHex,
}

impl ErrorKind {
    /// Stable, human-readable description of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BufferUnderrun => "buffer underrun",
            Self::InvalidLeadingByte => "invalid leading byte",
            Self::ReservedAdditionalInfo => "reserved additional info",
            Self::LengthOverflow => "length overflow",
            Self::UnterminatedIndefiniteItem => "unterminated indefinite-length item",
            Self::UnknownTag => "unknown tag",
            Self::MalformedBignum => "malformed bignum",
            Self::TypeMismatch => "type mismatch",
            Self::DepthBudgetExceeded => "depth budget exceeded",
            Self::DuplicateMapKey => "duplicate map key",
            Self::TrailingBytes => "trailing bytes",
            Self::InvalidHex => "invalid hex",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A codec failure: what went wrong and where.
///
/// `offset` is the byte position in the input where the primitive decoder
/// detected the problem. Failures found while walking an already-decoded
/// value tree (datum mapping, record shapes) report offset `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}{}", describe_expected(.expected))]
pub struct CodecError {
    /// The error kind.
    pub kind: ErrorKind,
    /// Byte offset into the input.
    pub offset: usize,
    /// Description of the expected shape, for `TypeMismatch` and friends.
    pub expected: Option<&'static str>,
}

fn describe_expected(expected: &Option<&'static str>) -> String {
    match expected {
        Some(what) => format!(": expected {what}"),
        None => String::new(),
    }
}

impl CodecError {
    /// Construct an error of `kind` at `offset`.
    pub const fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            offset,
            expected: None,
        }
    }

    /// A `TypeMismatch` naming the shape that was expected.
    pub const fn mismatch(expected: &'static str) -> Self {
        Self {
            kind: ErrorKind::TypeMismatch,
            offset: 0,
            expected: Some(expected),
        }
    }

    /// Attach a description of the expected shape.
    pub const fn expecting(mut self, expected: &'static str) -> Self {
        self.expected = Some(expected);
        self
    }
}

/// Which stage of the transform pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// hex text ↔ raw bytes
    Hex,
    /// raw bytes ↔ CBOR value tree
    Cbor,
    /// CBOR value tree ↔ record field tuple
    Shape,
    /// record field tuple ↔ domain type (validating constructors)
    Domain,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hex => "hex",
            Self::Cbor => "cbor",
            Self::Shape => "shape",
            Self::Domain => "domain",
        })
    }
}

/// A codec error tagged with the pipeline stage (and field, if known) that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{stage} stage failed{}: {source}", describe_field(.field))]
pub struct PipelineError {
    /// The stage that failed.
    pub stage: Stage,
    /// Record field being decoded when the failure happened.
    pub field: Option<&'static str>,
    /// The underlying codec error.
    #[source]
    pub source: CodecError,
}

fn describe_field(field: &Option<&'static str>) -> String {
    match field {
        Some(name) => format!(" at field `{name}`"),
        None => String::new(),
    }
}

impl PipelineError {
    /// Tag `source` with `stage`.
    pub const fn new(stage: Stage, source: CodecError) -> Self {
        Self {
            stage,
            field: None,
            source,
        }
    }

    /// A hex-stage failure.
    pub const fn hex(source: CodecError) -> Self {
        Self::new(Stage::Hex, source)
    }

    /// A cbor-stage failure.
    pub const fn cbor(source: CodecError) -> Self {
        Self::new(Stage::Cbor, source)
    }

    /// A shape-stage failure.
    pub const fn shape(source: CodecError) -> Self {
        Self::new(Stage::Shape, source)
    }

    /// A domain-stage failure.
    pub const fn domain(source: CodecError) -> Self {
        Self::new(Stage::Domain, source)
    }

    /// Record the field being decoded. The innermost field wins.
    pub const fn at_field(mut self, field: &'static str) -> Self {
        if self.field.is_none() {
            self.field = Some(field);
        }
        self
    }

    /// The underlying error kind.
    pub const fn kind(&self) -> ErrorKind {
        self.source.kind
    }
}

/// Raw codec errors surfacing inside record decoders are shape failures
/// unless a stage says otherwise.
impl From<CodecError> for PipelineError {
    fn from(source: CodecError) -> Self {
        Self::shape(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset_and_expectation() {
        let err = CodecError::new(ErrorKind::BufferUnderrun, 7);
        assert_eq!(err.to_string(), "buffer underrun at offset 7");

        let err = CodecError::mismatch("array");
        assert_eq!(err.to_string(), "type mismatch at offset 0: expected array");
    }

    #[test]
    fn test_pipeline_error_keeps_innermost_field() {
        let err = PipelineError::shape(CodecError::mismatch("uint"))
            .at_field("index")
            .at_field("input");
        assert_eq!(err.field, Some("index"));
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "shape stage failed at field `index`: type mismatch at offset 0: expected uint"
        );
    }
}
