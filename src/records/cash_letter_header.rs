//! Cash letter header record (type `10`).

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{FieldRules, COLLECTION_TYPE_INDICATORS, DOCUMENTATION_TYPE_INDICATORS};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const NAME: &str = "CashLetterHeader";

/// `N` no images, `E` electronic images, `I` images for some items, `F` image exchange.
pub const RECORD_TYPE_INDICATORS: &[&str] = &["N", "E", "I", "F"];

/// Kinds of returns a returns cash letter carries.
pub const RETURNS_INDICATORS: &[&str] = &["E", "R", "J", "N"];

/// Opens a cash letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashLetterHeader {
    /// Kind of cash letter (`01` forward presentment, `03` return, ...).
    pub collection_type_indicator: String,
    /// Institution the cash letter is sent to.
    pub destination_routing_number: String,
    /// Institution that created the cash letter.
    #[serde(rename = "eceInstitutionRoutingNumber")]
    pub ece_institution_routing_number: String,
    /// Business day the cash letter belongs to.
    #[serde(with = "crate::json::date")]
    pub cash_letter_business_date: Option<NaiveDate>,
    /// Date the cash letter was created.
    #[serde(with = "crate::json::date")]
    pub cash_letter_creation_date: Option<NaiveDate>,
    /// Time the cash letter was created.
    #[serde(with = "crate::json::time")]
    pub cash_letter_creation_time: Option<NaiveTime>,
    /// Whether the cash letter carries images.
    pub record_type_indicator: String,
    /// Default documentation type of the items.
    pub documentation_type_indicator: String,
    /// Identifier chosen by the creator.
    #[serde(rename = "cashLetterID")]
    pub cash_letter_id: String,
    /// Contact at the originator.
    pub originator_contact_name: String,
    /// Contact phone at the originator.
    pub originator_contact_phone_number: String,
    /// Federal Reserve work type.
    pub fed_work_type: String,
    /// Kind of returns carried, blank for forward presentment.
    pub returns_indicator: String,
    /// Free-form.
    pub user_field: String,
}

impl IclRecord for CashLetterHeader {
    fn record_type(&self) -> RecordType {
        RecordType::CashLetterHeader
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let header = CashLetterHeader {
            collection_type_indicator: r.numeric_string("CollectionTypeIndicator", 2)?,
            destination_routing_number: r.numeric_string("DestinationRoutingNumber", 9)?,
            ece_institution_routing_number: r.numeric_string("ECEInstitutionRoutingNumber", 9)?,
            cash_letter_business_date: r.date("CashLetterBusinessDate")?,
            cash_letter_creation_date: r.date("CashLetterCreationDate")?,
            cash_letter_creation_time: r.time("CashLetterCreationTime")?,
            record_type_indicator: r.alpha("RecordTypeIndicator", 1)?,
            documentation_type_indicator: r.alpha("DocumentationTypeIndicator", 1)?,
            cash_letter_id: r.alpha("CashLetterID", 8)?,
            originator_contact_name: r.alpha("OriginatorContactName", 14)?,
            originator_contact_phone_number: r.alpha("OriginatorContactPhoneNumber", 10)?,
            fed_work_type: r.alpha("FedWorkType", 1)?,
            returns_indicator: r.alpha("ReturnsIndicator", 1)?,
            user_field: r.alpha("UserField", 1)?,
        };
        r.skip(1)?;
        Ok(header)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w =
            FieldWriter::new(NAME, RecordType::CashLetterHeader.code(), RECORD_LENGTH, encoding);
        w.numeric_string("CollectionTypeIndicator", &self.collection_type_indicator, 2)?;
        w.numeric_string("DestinationRoutingNumber", &self.destination_routing_number, 9)?;
        w.numeric_string(
            "ECEInstitutionRoutingNumber",
            &self.ece_institution_routing_number,
            9,
        )?;
        w.date(self.cash_letter_business_date);
        w.date(self.cash_letter_creation_date);
        w.time(self.cash_letter_creation_time);
        w.alpha(&self.record_type_indicator, 1);
        w.alpha(&self.documentation_type_indicator, 1);
        w.alpha(&self.cash_letter_id, 8);
        w.alpha(&self.originator_contact_name, 14);
        w.alpha(&self.originator_contact_phone_number, 10);
        w.alpha(&self.fed_work_type, 1);
        w.alpha(&self.returns_indicator, 1);
        w.alpha(&self.user_field, 1);
        w.reserved(1);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.one_of(
            "CollectionTypeIndicator",
            &self.collection_type_indicator,
            COLLECTION_TYPE_INDICATORS,
        )?;
        rules.routing_number("DestinationRoutingNumber", &self.destination_routing_number)?;
        rules.routing_number(
            "ECEInstitutionRoutingNumber",
            &self.ece_institution_routing_number,
        )?;
        rules.mandatory_date("CashLetterBusinessDate", self.cash_letter_business_date)?;
        rules.mandatory_date("CashLetterCreationDate", self.cash_letter_creation_date)?;
        rules.mandatory_time("CashLetterCreationTime", self.cash_letter_creation_time)?;
        rules.one_of(
            "RecordTypeIndicator",
            &self.record_type_indicator,
            RECORD_TYPE_INDICATORS,
        )?;
        rules.optional_one_of(
            "DocumentationTypeIndicator",
            &self.documentation_type_indicator,
            DOCUMENTATION_TYPE_INDICATORS,
        )?;
        rules.mandatory("CashLetterID", &self.cash_letter_id)?;
        rules.alphanumeric("CashLetterID", &self.cash_letter_id)?;
        rules.alphanumeric_special("OriginatorContactName", &self.originator_contact_name)?;
        rules.alphanumeric_special(
            "OriginatorContactPhoneNumber",
            &self.originator_contact_phone_number,
        )?;
        rules.alphanumeric("FedWorkType", &self.fed_work_type)?;
        rules.optional_one_of("ReturnsIndicator", &self.returns_indicator, RETURNS_INDICATORS)?;
        rules.alphanumeric_special("UserField", &self.user_field)?;
        Ok(())
    }
}
