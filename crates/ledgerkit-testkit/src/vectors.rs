//! Golden CBOR vectors.
//!
//! The built-in set lives in `vectors/cbor.json` and is shared with other
//! implementations. Each vector is decoded, re-encoded, and compared with
//! its canonical form, or must fail with the named error kind.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

use ledgerkit_core::{
    CborRecord, CborStage, ErrorKind, HexStage, PipelineError, Profile, ScriptDatum, Transform,
};

const BUILTIN: &str = include_str!("../vectors/cbor.json");

/// What a vector decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// A raw CBOR value under the vector's profile.
    Value,
    /// A script datum.
    Datum,
}

/// A single golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CborVector {
    pub name: String,
    /// Input, as hex.
    pub hex: String,
    pub profile: Profile,
    pub target: Target,
    /// Expected re-encoding. Absent means the input is already canonical.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Expected failure. Absent means the input must decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

/// On-disk layout of a vector file.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorFile {
    pub version: u32,
    pub vectors: Vec<CborVector>,
}

/// The built-in vectors.
pub fn all_vectors() -> Vec<CborVector> {
    parse_vectors(BUILTIN)
        .expect("built-in vector file is valid")
        .vectors
}

/// Parse a vector file from JSON text.
pub fn parse_vectors(json: &str) -> Result<VectorFile> {
    let file: VectorFile = serde_json::from_str(json).context("parsing vector file")?;
    ensure!(file.version == 1, "unsupported vector file version {}", file.version);
    Ok(file)
}

/// Load a vector file from disk.
pub fn load_vectors(path: impl AsRef<Path>) -> Result<Vec<CborVector>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let file = parse_vectors(&json).with_context(|| format!("loading {}", path.display()))?;
    Ok(file.vectors)
}

/// Run one vector: decode then re-encode.
fn roundtrip(vector: &CborVector) -> std::result::Result<String, PipelineError> {
    match vector.target {
        Target::Value => {
            let pipeline = HexStage.then(CborStage::new(vector.profile));
            let value = pipeline.decode(&vector.hex)?;
            pipeline.encode(&value)
        }
        Target::Datum => Ok(ScriptDatum::from_hex(&vector.hex)?.to_hex()),
    }
}

/// Check one vector against the codec.
pub fn verify_vector(vector: &CborVector) -> Result<()> {
    let outcome = roundtrip(vector);
    match (&vector.error, outcome) {
        (None, Ok(hex)) => {
            let expected = vector.canonical.as_deref().unwrap_or(&vector.hex);
            ensure!(hex == expected, "re-encoded to {hex}, expected {expected}");
        }
        (None, Err(e)) => bail!("unexpected failure: {e}"),
        (Some(kind), Ok(hex)) => bail!("expected {kind}, decoded and re-encoded to {hex}"),
        (Some(kind), Err(e)) => {
            ensure!(e.kind() == *kind, "expected {kind}, got {}", e.kind());
        }
    }
    Ok(())
}

/// Check every vector and collect the failures, keyed by vector name.
pub fn verify_all(vectors: &[CborVector]) -> Vec<(String, anyhow::Error)> {
    vectors
        .iter()
        .filter_map(|v| {
            verify_vector(v)
                .with_context(|| format!("{} ({} {:?})", v.name, v.profile, v.target))
                .err()
                .map(|e| (v.name.clone(), e))
        })
        .collect()
}

/// Check the built-in vectors.
pub fn verify_all_vectors() -> Vec<(String, anyhow::Error)> {
    verify_all(&all_vectors())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_vectors_parse() {
        let file = parse_vectors(BUILTIN).unwrap();
        assert!(file.vectors.len() > 40);
        assert!(file.vectors.iter().any(|v| v.error.is_some()));
        assert!(file.vectors.iter().any(|v| v.target == Target::Datum));
    }

    #[test]
    fn test_builtin_vectors_pass() {
        let failures = verify_all_vectors();
        for (name, err) in &failures {
            eprintln!("{name}: {err:#}");
        }
        assert!(failures.is_empty(), "{} vectors failed", failures.len());
    }

    #[test]
    fn test_wrong_expectation_is_reported() {
        let vector = CborVector {
            name: "mislabelled".into(),
            hex: "00".into(),
            profile: Profile::Ledger,
            target: Target::Value,
            canonical: Some("01".into()),
            error: None,
        };
        assert!(verify_vector(&vector).is_err());

        let vector = CborVector {
            canonical: None,
            error: Some(ErrorKind::TrailingBytes),
            ..vector
        };
        assert!(verify_vector(&vector).is_err());
    }

    #[test]
    fn test_malformed_vector_file_is_an_error() {
        assert!(parse_vectors("{\"version\": 1, \"vectors\": [").is_err());
        assert!(parse_vectors(r#"{"version": 1, "vectors": [{"name": "x"}]}"#).is_err());
        assert_eq!(all_vectors().len(), parse_vectors(BUILTIN).unwrap().vectors.len());
    }

    #[test]
    fn test_unsupported_version() {
        let err = parse_vectors(r#"{"version": 2, "vectors": []}"#).unwrap_err();
        assert!(format!("{err:#}").contains("version 2"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_vectors("/nonexistent/cbor.json").unwrap_err();
        assert!(format!("{err:#}").contains("reading /nonexistent/cbor.json"));
    }
}
