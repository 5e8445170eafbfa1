//! The bytes ↔ hex ↔ CBOR value ↔ domain type transform chain.
//!
//! Every stage is a pure bidirectional [`Transform`]. Stages compose with
//! [`Transform::then`]; composition is associative, so a record can be
//! decoded straight from bytes without going through hex.
//!
//! ```text
//!   HexStage          CborStage             RecordStage<T>
//! String <-> Vec<u8> <-> CborValue <-> T
//! ```
//!
//! A failure anywhere short-circuits and is tagged with the [`Stage`] that
//! produced it.
//!
//! [`Stage`]: crate::error::Stage

use std::marker::PhantomData;

use crate::decode::{decode_exact, DecodeLimits};
use crate::error::{CodecError, ErrorKind, PipelineError};
use crate::profile::Profile;
use crate::value::CborValue;

/// A pure bidirectional transform between an encoded and a decoded form.
pub trait Transform {
    type Encoded;
    type Decoded;

    fn decode(&self, input: &Self::Encoded) -> Result<Self::Decoded, PipelineError>;

    fn encode(&self, value: &Self::Decoded) -> Result<Self::Encoded, PipelineError>;

    /// Feed this stage's decoded output into `next`.
    fn then<B>(self, next: B) -> Chain<Self, B>
    where
        Self: Sized,
        B: Transform<Encoded = Self::Decoded>,
    {
        Chain { first: self, second: next }
    }
}

/// Two transforms run back to back.
#[derive(Debug, Clone, Copy)]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Transform for Chain<A, B>
where
    A: Transform,
    B: Transform<Encoded = A::Decoded>,
{
    type Encoded = A::Encoded;
    type Decoded = B::Decoded;

    fn decode(&self, input: &Self::Encoded) -> Result<Self::Decoded, PipelineError> {
        let middle = self.first.decode(input)?;
        self.second.decode(&middle)
    }

    fn encode(&self, value: &Self::Decoded) -> Result<Self::Encoded, PipelineError> {
        let middle = self.second.encode(value)?;
        self.first.encode(&middle)
    }
}

/// Lowercase hex text ↔ raw bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexStage;

impl HexStage {
    pub fn decode_str(&self, input: &str) -> Result<Vec<u8>, PipelineError> {
        hex::decode(input).map_err(|e| {
            let offset = match e {
                hex::FromHexError::InvalidHexCharacter { index, .. } => index,
                _ => input.len(),
            };
            PipelineError::hex(CodecError::new(ErrorKind::InvalidHex, offset))
        })
    }
}

impl Transform for HexStage {
    type Encoded = String;
    type Decoded = Vec<u8>;

    fn decode(&self, input: &String) -> Result<Vec<u8>, PipelineError> {
        self.decode_str(input)
    }

    fn encode(&self, value: &Vec<u8>) -> Result<String, PipelineError> {
        Ok(hex::encode(value))
    }
}

/// Raw bytes ↔ CBOR value tree under a profile.
#[derive(Debug, Clone, Copy)]
pub struct CborStage {
    profile: Profile,
    limits: DecodeLimits,
}

impl CborStage {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            limits: profile.decode_limits(),
        }
    }

    /// Override the nesting budget.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits = self.limits.with_max_depth(max_depth);
        self
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn decode_slice(&self, input: &[u8]) -> Result<CborValue, PipelineError> {
        decode_exact(input, self.limits).map_err(PipelineError::cbor)
    }
}

impl Transform for CborStage {
    type Encoded = Vec<u8>;
    type Decoded = CborValue;

    fn decode(&self, input: &Vec<u8>) -> Result<CborValue, PipelineError> {
        self.decode_slice(input)
    }

    fn encode(&self, value: &CborValue) -> Result<Vec<u8>, PipelineError> {
        Ok(self.profile.encode(value))
    }
}

/// CBOR value tree ↔ a record type.
pub struct RecordStage<T>(PhantomData<fn() -> T>);

impl<T> RecordStage<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for RecordStage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordStage<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RecordStage<T> {}

impl<T> std::fmt::Debug for RecordStage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecordStage<{}>", std::any::type_name::<T>())
    }
}

impl<T: CborRecord> Transform for RecordStage<T> {
    type Encoded = CborValue;
    type Decoded = T;

    fn decode(&self, input: &CborValue) -> Result<T, PipelineError> {
        T::from_cbor(input)
    }

    fn encode(&self, value: &T) -> Result<CborValue, PipelineError> {
        Ok(value.to_cbor())
    }
}

/// A type with a fixed CBOR shape under one profile.
///
/// Implementors describe only their field layout (`to_cbor` / `from_cbor`);
/// the byte and hex forms come from the pipeline.
pub trait CborRecord: Sized {
    /// The profile this record is always encoded with.
    const PROFILE: Profile;

    /// Build the CBOR value tree.
    fn to_cbor(&self) -> CborValue;

    /// Read the record back from a value tree.
    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError>;

    /// Bytes ↔ record.
    fn bytes_pipeline() -> Chain<CborStage, RecordStage<Self>> {
        CborStage::new(Self::PROFILE).then(RecordStage::new())
    }

    /// Hex ↔ record.
    fn hex_pipeline() -> Chain<HexStage, Chain<CborStage, RecordStage<Self>>> {
        HexStage.then(Self::bytes_pipeline())
    }

    fn to_bytes(&self) -> Vec<u8> {
        Self::PROFILE.encode(&self.to_cbor())
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, PipelineError> {
        let value = CborStage::new(Self::PROFILE).decode_slice(bytes)?;
        Self::from_cbor(&value)
    }

    fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    fn from_hex(hex: &str) -> Result<Self, PipelineError> {
        let bytes = HexStage.decode_str(hex)?;
        Self::from_bytes(&bytes)
    }
}
