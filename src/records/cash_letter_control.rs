//! Cash letter control record (type `90`).

use super::bundle_control::CREDIT_TOTAL_INDICATORS;
use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::FieldRules;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const NAME: &str = "CashLetterControl";

/// Closes a cash letter with totals over its bundles.
///
/// The counts and amount are derived by `create`. The institution name and
/// settlement date are not derivable, which is why `create` requires the
/// record to exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashLetterControl {
    /// Number of bundles.
    pub cash_letter_bundle_count: u32,
    /// Number of checks or returns across all bundles.
    pub cash_letter_items_count: u32,
    /// Sum of item amounts in cents.
    pub cash_letter_total_amount: u64,
    /// Number of image view detail records.
    pub cash_letter_images_count: u32,
    /// Name of the institution that created the cash letter.
    #[serde(rename = "eceInstitutionName")]
    pub ece_institution_name: String,
    /// Date the cash letter settles.
    #[serde(with = "crate::json::date")]
    pub settlement_date: Option<NaiveDate>,
    /// Whether credits are included in the totals.
    pub credit_total_indicator: u8,
}

impl IclRecord for CashLetterControl {
    fn record_type(&self) -> RecordType {
        RecordType::CashLetterControl
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let control = CashLetterControl {
            cash_letter_bundle_count: r.numeric("CashLetterBundleCount", 6)?,
            cash_letter_items_count: r.numeric("CashLetterItemsCount", 8)?,
            cash_letter_total_amount: r.numeric("CashLetterTotalAmount", 14)?,
            cash_letter_images_count: r.numeric("CashLetterImagesCount", 9)?,
            ece_institution_name: r.alpha("ECEInstitutionName", 18)?,
            settlement_date: r.date("SettlementDate")?,
            credit_total_indicator: r.numeric("CreditTotalIndicator", 1)?,
        };
        r.skip(14)?;
        Ok(control)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(
            NAME,
            RecordType::CashLetterControl.code(),
            RECORD_LENGTH,
            encoding,
        );
        w.numeric("CashLetterBundleCount", self.cash_letter_bundle_count.into(), 6)?;
        w.numeric("CashLetterItemsCount", self.cash_letter_items_count.into(), 8)?;
        w.numeric("CashLetterTotalAmount", self.cash_letter_total_amount, 14)?;
        w.numeric("CashLetterImagesCount", self.cash_letter_images_count.into(), 9)?;
        w.alpha(&self.ece_institution_name, 18);
        w.date(self.settlement_date);
        w.numeric("CreditTotalIndicator", self.credit_total_indicator.into(), 1)?;
        w.reserved(14);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.alphanumeric_special("ECEInstitutionName", &self.ece_institution_name)?;
        rules.digit_in(
            "CreditTotalIndicator",
            self.credit_total_indicator,
            CREDIT_TOTAL_INDICATORS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] =
        b"900000010000000400000000400000000000004Citadel           201810240              ";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), RECORD_LENGTH);
        let control = CashLetterControl::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(control.cash_letter_bundle_count, 1);
        assert_eq!(control.cash_letter_items_count, 4);
        assert_eq!(control.cash_letter_total_amount, 400_000);
        assert_eq!(control.cash_letter_images_count, 4);
        assert_eq!(control.ece_institution_name, "Citadel");
        assert_eq!(control.settlement_date, NaiveDate::from_ymd_opt(2018, 10, 24));
        assert!(control.validate().is_ok());
        assert_eq!(control.to_bytes(Encoding::Ascii).unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn test_absent_settlement_date_is_blank() {
        let control = CashLetterControl::default();
        let bytes = control.to_bytes(Encoding::Ascii).unwrap();
        assert_eq!(&bytes[57..65], b"        ");
        assert_eq!(CashLetterControl::parse(&bytes, Encoding::Ascii).unwrap(), control);
    }
}
