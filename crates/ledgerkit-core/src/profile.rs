//! Canonicalization profiles.
//!
//! Exactly two presets exist. Both drive the same primitive codec and differ
//! only in the [`CodecOptions`] they pass to it:
//!
//! | profile | arrays / maps                 | map keys              | duplicate keys on decode |
//! |---------|-------------------------------|-----------------------|--------------------------|
//! | ledger  | definite                      | sorted by key bytes   | rejected                 |
//! | datum   | indefinite unless empty       | insertion order       | kept                     |

use serde::{Deserialize, Serialize};

use crate::decode::{decode_exact, DecodeLimits};
use crate::encode::encode;
use crate::error::CodecError;
use crate::value::CborValue;

/// How arrays and maps announce their length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthMode {
    /// Count in the head.
    Definite,
    /// `0x9f` / `0xbf` ... `0xff`, except empty collections which stay definite.
    IndefiniteExceptEmpty,
}

/// How map entries are ordered on encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKeyOrder {
    /// As given by the caller.
    Insertion,
    /// Lexicographic by each key's encoded bytes.
    CanonicalByteOrder,
}

/// Encoder options. Only obtainable from a [`Profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecOptions {
    length_mode: LengthMode,
    map_key_order: MapKeyOrder,
}

impl CodecOptions {
    /// Options of [`Profile::Ledger`].
    pub const LEDGER: Self = Self {
        length_mode: LengthMode::Definite,
        map_key_order: MapKeyOrder::CanonicalByteOrder,
    };

    /// Options of [`Profile::Datum`].
    pub const DATUM: Self = Self {
        length_mode: LengthMode::IndefiniteExceptEmpty,
        map_key_order: MapKeyOrder::Insertion,
    };

    pub const fn length_mode(&self) -> LengthMode {
        self.length_mode
    }

    pub const fn map_key_order(&self) -> MapKeyOrder {
        self.map_key_order
    }
}

/// A named canonicalization preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Every ledger record: transactions, certificates, parameters, ...
    Ledger,
    /// Script datum values only.
    Datum,
}

impl Profile {
    /// The encoder options of this profile.
    pub const fn options(self) -> CodecOptions {
        match self {
            Self::Ledger => CodecOptions::LEDGER,
            Self::Datum => CodecOptions::DATUM,
        }
    }

    /// The decoder limits of this profile.
    ///
    /// Datum maps keep duplicate and unsorted keys for compatibility with
    /// peers that produce them.
    pub fn decode_limits(self) -> DecodeLimits {
        match self {
            Self::Ledger => DecodeLimits::default(),
            Self::Datum => DecodeLimits::default().with_duplicate_keys_rejected(false),
        }
    }

    /// Encode `value` under this profile.
    pub fn encode(self, value: &CborValue) -> Vec<u8> {
        encode(value, self.options())
    }

    /// Decode exactly one item under this profile.
    pub fn decode(self, bytes: &[u8]) -> Result<CborValue, CodecError> {
        decode_exact(bytes, self.decode_limits())
    }

    /// Decode exactly one item with a caller-chosen nesting budget.
    pub fn decode_with_depth(self, bytes: &[u8], max_depth: usize) -> Result<CborValue, CodecError> {
        decode_exact(bytes, self.decode_limits().with_max_depth(max_depth))
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ledger => "ledger",
            Self::Datum => "datum",
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_profiles_differ_only_in_options() {
        let value = CborValue::Array(vec![CborValue::uint(1), CborValue::uint(2)]);
        assert_eq!(hex::encode(Profile::Ledger.encode(&value)), "820102");
        assert_eq!(hex::encode(Profile::Datum.encode(&value)), "9f0102ff");

        // Either profile reads either length form.
        for profile in [Profile::Ledger, Profile::Datum] {
            assert_eq!(profile.decode(&hex::decode("820102").unwrap()).unwrap(), value);
            assert_eq!(profile.decode(&hex::decode("9f0102ff").unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn test_duplicate_keys_per_profile() {
        let bytes = hex::decode("a201020103").unwrap();
        let err = Profile::Ledger.decode(&bytes).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateMapKey);

        let value = Profile::Datum.decode(&bytes).unwrap();
        assert_eq!(
            value,
            CborValue::Map(vec![
                (CborValue::uint(1), CborValue::uint(2)),
                (CborValue::uint(1), CborValue::uint(3)),
            ])
        );
        // Datum re-encoding keeps both entries in order.
        assert_eq!(hex::encode(Profile::Datum.encode(&value)), "bf01020103ff");
    }

    #[test]
    fn test_ledger_reencode_is_canonical() {
        let bytes = hex::decode("a203040102").unwrap();
        let value = Profile::Ledger.decode(&bytes).unwrap();
        assert_eq!(hex::encode(Profile::Ledger.encode(&value)), "a201020304");
    }

    #[test]
    fn test_decode_with_depth() {
        let mut bytes = vec![0x81; 300];
        bytes.push(0x00);
        let err = Profile::Ledger.decode(&bytes).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthBudgetExceeded);
        assert!(Profile::Ledger.decode_with_depth(&bytes, 300).is_ok());

        let err = Profile::Datum.decode_with_depth(&bytes, 299).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthBudgetExceeded);
        assert_eq!(err.offset, 299);

        // Budgets above the ceiling are clamped.
        let mut deeper = vec![0x81; 1025];
        deeper.push(0x00);
        assert!(Profile::Ledger.decode_with_depth(&deeper, usize::MAX).is_err());
    }

    #[test]
    fn test_profile_serde_names() {
        assert_eq!(serde_json::to_string(&Profile::Ledger).unwrap(), "\"ledger\"");
        let p: Profile = serde_json::from_str("\"datum\"").unwrap();
        assert_eq!(p, Profile::Datum);
        assert_eq!(Profile::Datum.to_string(), "datum");
    }
}
