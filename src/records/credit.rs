//! Credit records carried at cash letter level.
//!
//! Two layouts exist: the 100-byte credit item (`61`) and the 80-byte
//! credit (`62`). Both describe a deposit credit offsetting the debits in
//! the cash letter, and neither counts toward bundle or cash letter totals.

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{FieldRules, DOCUMENTATION_TYPE_INDICATORS};
use serde::{Deserialize, Serialize};

/// Width of a credit item record.
pub const CREDIT_ITEM_LENGTH: usize = 100;

/// Kind of account credited.
pub const ACCOUNT_TYPE_CODES: &[&str] = &["0", "1", "2", "3", "4", "5"];

/// Debit or credit.
pub const DEBIT_CREDIT_INDICATORS: &[&str] = &["D", "C"];

fn check_amount(rules: &FieldRules<'_>, amount: u64) -> Result<()> {
    if amount == 0 && !rules.opts().allow_zero_credit_amounts {
        return Err(rules.error("ItemAmount", amount, "must be greater than zero"));
    }
    Ok(())
}

/// Credit item (`61`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditItem {
    /// Caller-assigned identifier.
    pub id: String,
    /// Auxiliary on-us field of the MICR line.
    pub auxiliary_on_us: String,
    /// External processing code of the MICR line.
    pub external_processing_code: String,
    /// Institution the credit posts to.
    pub posting_bank_routing_number: String,
    /// On-us field of the MICR line.
    pub on_us: String,
    /// Amount in cents.
    pub item_amount: u64,
    /// Sequence number assigned by the creator.
    pub credit_item_sequence_number: String,
    /// Kind of document.
    pub documentation_type_indicator: String,
    /// Kind of account credited.
    pub type_of_account_code: String,
    /// Source of the work.
    pub source_work_code: String,
    /// Free-form.
    pub user_field: String,
}

impl IclRecord for CreditItem {
    fn record_type(&self) -> RecordType {
        RecordType::CreditItem
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed("CreditItem", bytes, CREDIT_ITEM_LENGTH, encoding)?;
        let item = CreditItem {
            auxiliary_on_us: r.numeric_blank("AuxiliaryOnUs", 15)?,
            external_processing_code: r.alpha("ExternalProcessingCode", 1)?,
            posting_bank_routing_number: r.numeric_string("PostingBankRoutingNumber", 9)?,
            on_us: r.numeric_blank("OnUs", 20)?,
            item_amount: r.numeric("ItemAmount", 14)?,
            credit_item_sequence_number: r.numeric_string("CreditItemSequenceNumber", 15)?,
            documentation_type_indicator: r.alpha("DocumentationTypeIndicator", 1)?,
            type_of_account_code: r.alpha("TypeOfAccountCode", 1)?,
            source_work_code: r.numeric_string("SourceWorkCode", 2)?,
            user_field: r.alpha("UserField", 16)?,
            ..Default::default()
        };
        r.skip(4)?;
        Ok(item)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(
            "CreditItem",
            RecordType::CreditItem.code(),
            CREDIT_ITEM_LENGTH,
            encoding,
        );
        w.numeric_blank(&self.auxiliary_on_us, 15);
        w.alpha(&self.external_processing_code, 1);
        w.numeric_string(
            "PostingBankRoutingNumber",
            &self.posting_bank_routing_number,
            9,
        )?;
        w.numeric_blank(&self.on_us, 20);
        w.numeric("ItemAmount", self.item_amount, 14)?;
        w.numeric_string(
            "CreditItemSequenceNumber",
            &self.credit_item_sequence_number,
            15,
        )?;
        w.alpha(&self.documentation_type_indicator, 1);
        w.alpha(&self.type_of_account_code, 1);
        w.numeric_string("SourceWorkCode", &self.source_work_code, 2)?;
        w.alpha(&self.user_field, 16);
        w.reserved(4);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new("CreditItem", opts);
        rules.numeric_blank_special("AuxiliaryOnUs", &self.auxiliary_on_us)?;
        rules.alphanumeric_special("ExternalProcessingCode", &self.external_processing_code)?;
        rules.routing_number("PostingBankRoutingNumber", &self.posting_bank_routing_number)?;
        rules.numeric_blank_special("OnUs", &self.on_us)?;
        check_amount(&rules, self.item_amount)?;
        rules.mandatory("CreditItemSequenceNumber", &self.credit_item_sequence_number)?;
        rules.numeric("CreditItemSequenceNumber", &self.credit_item_sequence_number)?;
        rules.optional_one_of(
            "DocumentationTypeIndicator",
            &self.documentation_type_indicator,
            DOCUMENTATION_TYPE_INDICATORS,
        )?;
        rules.optional_one_of(
            "TypeOfAccountCode",
            &self.type_of_account_code,
            ACCOUNT_TYPE_CODES,
        )?;
        rules.numeric("SourceWorkCode", &self.source_work_code)?;
        rules.alphanumeric_special("UserField", &self.user_field)?;
        Ok(())
    }
}

/// Credit (`62`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Credit {
    pub id: String,
    pub auxiliary_on_us: String,
    pub external_processing_code: String,
    pub payor_bank_routing_number: String,
    pub credit_account_number_on_us: String,
    /// Amount in cents.
    pub item_amount: u64,
    #[serde(rename = "eceInstitutionItemSequenceNumber")]
    pub ece_institution_item_sequence_number: String,
    pub documentation_type_indicator: String,
    pub account_type_code: String,
    pub source_work_code: String,
    pub work_type: String,
    pub debit_credit_indicator: String,
}

impl IclRecord for Credit {
    fn record_type(&self) -> RecordType {
        RecordType::Credit
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed("Credit", bytes, RECORD_LENGTH, encoding)?;
        let credit = Credit {
            auxiliary_on_us: r.numeric_blank("AuxiliaryOnUs", 15)?,
            external_processing_code: r.alpha("ExternalProcessingCode", 1)?,
            payor_bank_routing_number: r.numeric_string("PayorBankRoutingNumber", 9)?,
            credit_account_number_on_us: r.numeric_blank("CreditAccountNumberOnUs", 20)?,
            item_amount: r.numeric("ItemAmount", 10)?,
            ece_institution_item_sequence_number: r
                .numeric_string("ECEInstitutionItemSequenceNumber", 15)?,
            documentation_type_indicator: r.alpha("DocumentationTypeIndicator", 1)?,
            account_type_code: r.alpha("AccountTypeCode", 1)?,
            source_work_code: r.numeric_string("SourceWorkCode", 2)?,
            work_type: r.alpha("WorkType", 1)?,
            debit_credit_indicator: r.alpha("DebitCreditIndicator", 1)?,
            ..Default::default()
        };
        r.skip(2)?;
        Ok(credit)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new("Credit", RecordType::Credit.code(), RECORD_LENGTH, encoding);
        w.numeric_blank(&self.auxiliary_on_us, 15);
        w.alpha(&self.external_processing_code, 1);
        w.numeric_string("PayorBankRoutingNumber", &self.payor_bank_routing_number, 9)?;
        w.numeric_blank(&self.credit_account_number_on_us, 20);
        w.numeric("ItemAmount", self.item_amount, 10)?;
        w.numeric_string(
            "ECEInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
            15,
        )?;
        w.alpha(&self.documentation_type_indicator, 1);
        w.alpha(&self.account_type_code, 1);
        w.numeric_string("SourceWorkCode", &self.source_work_code, 2)?;
        w.alpha(&self.work_type, 1);
        w.alpha(&self.debit_credit_indicator, 1);
        w.reserved(2);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new("Credit", opts);
        rules.numeric_blank_special("AuxiliaryOnUs", &self.auxiliary_on_us)?;
        rules.alphanumeric_special("ExternalProcessingCode", &self.external_processing_code)?;
        rules.routing_number("PayorBankRoutingNumber", &self.payor_bank_routing_number)?;
        rules.numeric_blank_special("CreditAccountNumberOnUs", &self.credit_account_number_on_us)?;
        check_amount(&rules, self.item_amount)?;
        rules.numeric(
            "ECEInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.optional_one_of(
            "DocumentationTypeIndicator",
            &self.documentation_type_indicator,
            DOCUMENTATION_TYPE_INDICATORS,
        )?;
        rules.optional_one_of("AccountTypeCode", &self.account_type_code, ACCOUNT_TYPE_CODES)?;
        rules.numeric("SourceWorkCode", &self.source_work_code)?;
        rules.alphanumeric("WorkType", &self.work_type)?;
        rules.optional_one_of(
            "DebitCreditIndicator",
            &self.debit_credit_indicator,
            DEBIT_CREDIT_INDICATORS,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREDIT_ITEM: &[u8] = b"61                031300012             555888100000000100000000000000000001G101                    ";
    const CREDIT: &[u8] =
        b"62                031300012             55588810000100000000000000000001G101 C  ";

    #[test]
    fn test_credit_item_is_100_bytes() {
        assert_eq!(CREDIT_ITEM.len(), CREDIT_ITEM_LENGTH);
        let item = CreditItem::parse(CREDIT_ITEM, Encoding::Ascii).unwrap();
        assert_eq!(item.posting_bank_routing_number, "031300012");
        assert_eq!(item.on_us, "5558881");
        assert_eq!(item.item_amount, 100_000);
        assert_eq!(item.credit_item_sequence_number, "000000000000001");
        assert_eq!(item.source_work_code, "01");
        assert!(item.validate().is_ok());
        assert_eq!(item.to_bytes(Encoding::Ascii).unwrap(), CREDIT_ITEM.to_vec());
    }

    #[test]
    fn test_credit_item_rejects_80_bytes() {
        assert!(CreditItem::parse(&CREDIT_ITEM[..80], Encoding::Ascii).is_err());
    }

    #[test]
    fn test_credit_round_trip() {
        assert_eq!(CREDIT.len(), RECORD_LENGTH);
        let credit = Credit::parse(CREDIT, Encoding::Ascii).unwrap();
        assert_eq!(credit.credit_account_number_on_us, "5558881");
        assert_eq!(credit.item_amount, 100_000);
        assert_eq!(credit.debit_credit_indicator, "C");
        assert!(credit.validate().is_ok());
        assert_eq!(credit.to_bytes(Encoding::Ascii).unwrap(), CREDIT.to_vec());
    }

    #[test]
    fn test_zero_amount_needs_option() {
        let mut credit = Credit::parse(CREDIT, Encoding::Ascii).unwrap();
        credit.item_amount = 0;
        let err = credit.validate().unwrap_err();
        assert!(err.to_string().contains("ItemAmount"));

        let opts = ValidateOpts::new().with_allow_zero_credit_amounts(true);
        assert!(credit.validate_with(&opts).is_ok());

        let mut item = CreditItem::parse(CREDIT_ITEM, Encoding::Ascii).unwrap();
        item.item_amount = 0;
        assert!(item.validate().is_err());
        assert!(item.validate_with(&opts).is_ok());
    }
}
