//! File control record (type `99`).

use super::bundle_control::CREDIT_TOTAL_INDICATORS;
use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::FieldRules;
use serde::{Deserialize, Serialize};

const NAME: &str = "FileControl";

/// Closes the file with totals over every cash letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileControl {
    /// Number of cash letters.
    pub cash_letter_count: u32,
    /// Every physical record in the file, this one and the header included.
    pub total_record_count: u32,
    /// Number of checks and returns.
    pub total_item_count: u32,
    /// Sum of item amounts in cents.
    pub file_total_amount: u64,
    /// Contact at the immediate origin.
    pub immediate_origin_contact_name: String,
    /// Contact phone at the immediate origin.
    pub immediate_origin_contact_phone_number: String,
    /// Whether credits are included in the totals.
    pub credit_total_indicator: u8,
}

impl IclRecord for FileControl {
    fn record_type(&self) -> RecordType {
        RecordType::FileControl
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let control = FileControl {
            cash_letter_count: r.numeric("CashLetterCount", 6)?,
            total_record_count: r.numeric("TotalRecordCount", 8)?,
            total_item_count: r.numeric("TotalItemCount", 8)?,
            file_total_amount: r.numeric("FileTotalAmount", 16)?,
            immediate_origin_contact_name: r.alpha("ImmediateOriginContactName", 14)?,
            immediate_origin_contact_phone_number: r
                .alpha("ImmediateOriginContactPhoneNumber", 10)?,
            credit_total_indicator: r.numeric("CreditTotalIndicator", 1)?,
        };
        r.skip(15)?;
        Ok(control)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(NAME, RecordType::FileControl.code(), RECORD_LENGTH, encoding);
        w.numeric("CashLetterCount", self.cash_letter_count.into(), 6)?;
        w.numeric("TotalRecordCount", self.total_record_count.into(), 8)?;
        w.numeric("TotalItemCount", self.total_item_count.into(), 8)?;
        w.numeric("FileTotalAmount", self.file_total_amount, 16)?;
        w.alpha(&self.immediate_origin_contact_name, 14);
        w.alpha(&self.immediate_origin_contact_phone_number, 10);
        w.numeric("CreditTotalIndicator", self.credit_total_indicator.into(), 1)?;
        w.reserved(15);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        if self.total_record_count == 0 {
            return Err(rules.error("TotalRecordCount", 0, "is a mandatory field"));
        }
        rules.alphanumeric_special(
            "ImmediateOriginContactName",
            &self.immediate_origin_contact_name,
        )?;
        rules.alphanumeric_special(
            "ImmediateOriginContactPhoneNumber",
            &self.immediate_origin_contact_phone_number,
        )?;
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
        b"9900000100000016000000040000000000400000Contact Name  55586755520               ";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), RECORD_LENGTH);
        let control = FileControl::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(control.cash_letter_count, 1);
        assert_eq!(control.total_record_count, 16);
        assert_eq!(control.total_item_count, 4);
        assert_eq!(control.file_total_amount, 400_000);
        assert_eq!(control.immediate_origin_contact_name, "Contact Name");
        assert_eq!(control.immediate_origin_contact_phone_number, "5558675552");
        assert!(control.validate().is_ok());
        assert_eq!(control.to_bytes(Encoding::Ascii).unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn test_total_record_count_is_mandatory() {
        let control = FileControl::default();
        let err = control.validate().unwrap_err();
        assert!(err.to_string().contains("TotalRecordCount"));
    }
}
