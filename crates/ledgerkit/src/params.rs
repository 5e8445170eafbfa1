//! Protocol parameter fragments.

use ledgerkit_core::{ArrayReader, CborRecord, CborValue, PipelineError, Profile, Rational};

use crate::record::LedgerRecord;

/// Script execution prices: `[mem_price, step_price]`, both tag-30 rationals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExUnitPrices {
    pub mem_price: Rational,
    pub step_price: Rational,
}

impl CborRecord for ExUnitPrices {
    const PROFILE: Profile = Profile::Ledger;

    fn to_cbor(&self) -> CborValue {
        CborValue::Array(vec![self.mem_price.to_cbor(), self.step_price.to_cbor()])
    }

    fn from_cbor(value: &CborValue) -> Result<Self, PipelineError> {
        let mut fields = ArrayReader::exact(value, 2, "[mem_price, step_price]")?;
        Ok(Self {
            mem_price: fields.record("mem_price")?,
            step_price: fields.record("step_price")?,
        })
    }
}

impl LedgerRecord for ExUnitPrices {
    const NAME: &'static str = "ExUnitPrices";
}
