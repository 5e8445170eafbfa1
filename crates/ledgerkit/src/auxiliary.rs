//! Auxiliary data in its tagged map form: `#6.259({ ? 0: metadata })`.
//!
//! Metadata labels are unsigned integers; metadatum values are integers,
//! byte strings, text strings, and lists or maps of those.

use std::collections::BTreeMap;

use ledgerkit_core::shape::expect_tag;
use ledgerkit_core::tags::TAG_AUXILIARY_DATA;
use ledgerkit_core::{CborRecord, CborValue, CodecError, MapReader, PipelineError, Profile};

use crate::record::LedgerRecord;

mod keys {
    pub const METADATA: u64 = 0;
}

/// Key 0 may be absent or present and empty; the two encode differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxiliaryData {
    metadata: Option<BTreeMap<u64, CborValue>>,
}

impl AuxiliaryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `label`. Tags and booleans are not metadata.
    pub fn insert(&mut self, label: u64, value: CborValue) -> Result<(), CodecError> {
        check_metadatum(&value)?;
        self.metadata.get_or_insert_with(BTreeMap::new).insert(label, value);
        Ok(())
    }

    pub fn get(&self, label: u64) -> Option<&CborValue> {
        self.metadata.as_ref()?.get(&label)
    }

    /// The metadata map, if key 0 is present.
    pub fn metadata(&self) -> Option<&BTreeMap<u64, CborValue>> {
        self.metadata.as_ref()
    }
}

fn check_metadatum(value: &CborValue) -> Result<(), CodecError> {
    match value {
        CborValue::Integer(_) | CborValue::Bytes(_) | CborValue::Text(_) => Ok(()),
        CborValue::Array(items) => items.iter().try_for_each(check_metadatum),
        CborValue::Map(entries) => entries.iter().try_for_each(|(k, v)| {
            check_metadatum(k)?;
            check_metadatum(v)
        }),
        CborValue::Tag(..) | CborValue::Bool(_) => Err(CodecError::mismatch(
            "metadatum (integer, bytes, text, list or map)",
        )),
    }
}

impl CborRecord for AuxiliaryData {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        let entries = self
            .metadata
            .iter()
            .map(|metadata| {
                let labels = metadata
                    .iter()
                    .map(|(label, value)| (CborValue::uint(*label), value.clone()))
                    .collect();
                (CborValue::uint(keys::METADATA), CborValue::Map(labels))
            })
            .collect();
        CborValue::tag(TAG_AUXILIARY_DATA, CborValue::Map(entries))
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let inner = expect_tag(value, TAG_AUXILIARY_DATA, "tag 259 auxiliary data")?;
        let fields = MapReader::new(inner, "auxiliary data map")?;
        fields.only_keys(&[keys::METADATA], "auxiliary data key 0")?;

        let Some(map) = fields.optional(keys::METADATA) else {
            return Ok(Self { metadata: None });
        };
        let mut metadata = BTreeMap::new();
        let entries = map.as_map().ok_or_else(|| {
            PipelineError::shape(CodecError::mismatch("metadata map")).at_field("metadata")
        })?;
        for (label, value) in entries {
            let label = label.as_u64().ok_or_else(|| {
                PipelineError::shape(CodecError::mismatch("unsigned metadata label"))
                    .at_field("label")
            })?;
            check_metadatum(value).map_err(|e| PipelineError::shape(e).at_field("metadatum"))?;
            metadata.insert(label, value.clone());
        }
        Ok(Self {
            metadata: Some(metadata),
        })
    }
}

impl LedgerRecord for AuxiliaryData {
    const NAME: &'static str = "AuxiliaryData";
}
