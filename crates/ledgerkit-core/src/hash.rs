//! Fixed-length byte strings, branded by length.
//!
//! A 28-byte key hash and a 32-byte transaction id are different types.
//! Length is checked once, at construction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, ErrorKind, PipelineError};
use crate::pipeline::CborRecord;
use crate::profile::Profile;
use crate::value::CborValue;

/// An `N`-byte hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash<const N: usize>([u8; N]);

/// Key and script hashes.
pub type Hash28 = Hash<28>;
/// Transaction ids, datum hashes, block hashes.
pub type Hash32 = Hash<32>;

impl<const N: usize> Hash<N> {
    pub const LEN: usize = N;

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Fails with `TypeMismatch` unless `slice` is exactly `N` bytes.
    pub fn from_slice(slice: &[u8]) -> Result<Self, CodecError> {
        let bytes: [u8; N] = slice
            .try_into()
            .map_err(|_| CodecError::new(ErrorKind::TypeMismatch, 0).expecting(length_name(N)))?;
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(s).map_err(|_| CodecError::new(ErrorKind::InvalidHex, 0))?;
        Self::from_slice(&bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn length_name(n: usize) -> &'static str {
    match n {
        28 => "28-byte hash",
        32 => "32-byte hash",
        _ => "fixed-length hash",
    }
}

impl<const N: usize> fmt::Debug for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Hash{}({})", N, &hex[..hex.len().min(16)])
    }
}

impl<const N: usize> fmt::Display for Hash<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> AsRef<[u8]> for Hash<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for Hash<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> TryFrom<&[u8]> for Hash<N> {
    type Error = CodecError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(slice)
    }
}

impl<const N: usize> std::str::FromStr for Hash<N> {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl<const N: usize> Serialize for Hash<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Hash<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl<const N: usize> CborRecord for Hash<N> {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::Bytes(self.0.to_vec())
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| PipelineError::shape(CodecError::mismatch(length_name(N))))?;
        Self::from_slice(bytes).map_err(PipelineError::domain)
    }
}
