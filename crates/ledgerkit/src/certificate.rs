//! Stake certificates.
//!
//! ```text
//! certificate = [0, stake_credential]              ; registration
//!             / [1, stake_credential]              ; deregistration
//!             / [2, stake_credential, pool_keyhash] ; delegation
//! ```

use ledgerkit_core::{ArrayReader, CborRecord, CborValue, CodecError, Hash28, PipelineError, Profile};

use crate::credential::Credential;
use crate::record::LedgerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Certificate {
    StakeRegistration(Credential),
    StakeDeregistration(Credential),
    StakeDelegation { credential: Credential, pool: Hash28 },
}

impl Certificate {
    /// The credential the certificate acts on.
    pub fn credential(&self) -> &Credential {
        match self {
            Self::StakeRegistration(c) | Self::StakeDeregistration(c) => c,
            Self::StakeDelegation { credential, .. } => credential,
        }
    }
}

impl CborRecord for Certificate {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        match self {
            Self::StakeRegistration(c) => CborValue::Array(vec![CborValue::uint(0), c.to_cbor()]),
            Self::StakeDeregistration(c) => CborValue::Array(vec![CborValue::uint(1), c.to_cbor()]),
            Self::StakeDelegation { credential, pool } => CborValue::Array(vec![
                CborValue::uint(2),
                credential.to_cbor(),
                pool.to_cbor(),
            ]),
        }
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let mut fields = ArrayReader::new(value, "certificate")?;
        let cert = match fields.uint("kind")? {
            0 => Self::StakeRegistration(fields.record("credential")?),
            1 => Self::StakeDeregistration(fields.record("credential")?),
            2 => Self::StakeDelegation {
                credential: fields.record("credential")?,
                pool: fields.record("pool")?,
            },
            _ => {
                return Err(
                    PipelineError::shape(CodecError::mismatch("certificate kind 0, 1 or 2"))
                        .at_field("kind"),
                )
            }
        };
        fields.finish()?;
        Ok(cert)
    }
}

impl LedgerRecord for Certificate {
    const NAME: &'static str = "Certificate";
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerkit_core::ErrorKind;

    fn key() -> Credential {
        Credential::KeyHash(Hash28::new([0x11; 28]))
    }

    #[test]
    fn test_registration_encoding() {
        let cert = Certificate::StakeRegistration(key());
        assert_eq!(cert.to_hex(), format!("82008200581c{}", "11".repeat(28)));
    }

    #[test]
    fn test_delegation_roundtrip() {
        let cert = Certificate::StakeDelegation {
            credential: key(),
            pool: Hash28::new([0x33; 28]),
        };
        let hex = cert.to_hex();
        assert_eq!(
            hex,
            format!("83028200581c{}581c{}", "11".repeat(28), "33".repeat(28))
        );
        assert_eq!(Certificate::decode_hex(&hex).unwrap(), cert);
        assert_eq!(cert.credential(), &key());
    }

    #[test]
    fn test_certificate_errors() {
        let err = Certificate::decode_hex(&format!("83008200581c{}00", "11".repeat(28))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = Certificate::decode_hex("8109").unwrap_err();
        assert_eq!(err.field(), Some("kind"));

        // Nested failure keeps the innermost field.
        let err = Certificate::decode_hex(&format!("82008205581c{}", "11".repeat(28))).unwrap_err();
        assert_eq!(err.field(), Some("kind"));
    }
}
