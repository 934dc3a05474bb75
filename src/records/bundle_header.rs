//! Bundle header record (type `20`).

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{FieldRules, COLLECTION_TYPE_INDICATORS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const NAME: &str = "BundleHeader";

/// Opens a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleHeader {
    /// Kind of items in the bundle.
    pub collection_type_indicator: String,
    /// Institution the bundle is sent to.
    pub destination_routing_number: String,
    /// Institution that created the bundle.
    #[serde(rename = "eceInstitutionRoutingNumber")]
    pub ece_institution_routing_number: String,
    /// Business day the bundle belongs to.
    #[serde(with = "crate::json::date")]
    pub bundle_business_date: Option<NaiveDate>,
    /// Date the bundle was created.
    #[serde(with = "crate::json::date")]
    pub bundle_creation_date: Option<NaiveDate>,
    /// Identifier chosen by the creator.
    #[serde(rename = "bundleID")]
    pub bundle_id: String,
    /// Position of the bundle within its cash letter, assigned by `create`.
    pub bundle_sequence_number: String,
    /// Presentment cycle.
    pub cycle_number: String,
    /// Free-form.
    pub user_field: String,
}

impl BundleHeader {
    /// The sequence number as an integer, if it is one.
    #[must_use]
    pub fn sequence_number(&self) -> Option<u32> {
        self.bundle_sequence_number.parse().ok()
    }
}

impl IclRecord for BundleHeader {
    fn record_type(&self) -> RecordType {
        RecordType::BundleHeader
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let header = BundleHeader {
            collection_type_indicator: r.numeric_string("CollectionTypeIndicator", 2)?,
            destination_routing_number: r.numeric_string("DestinationRoutingNumber", 9)?,
            ece_institution_routing_number: r.numeric_string("ECEInstitutionRoutingNumber", 9)?,
            bundle_business_date: r.date("BundleBusinessDate")?,
            bundle_creation_date: r.date("BundleCreationDate")?,
            bundle_id: r.alpha("BundleID", 10)?,
            bundle_sequence_number: r.numeric_string("BundleSequenceNumber", 4)?,
            cycle_number: r.alpha("CycleNumber", 2)?,
            user_field: {
                r.skip(9)?;
                r.alpha("UserField", 5)?
            },
        };
        r.skip(12)?;
        Ok(header)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w =
            FieldWriter::new(NAME, RecordType::BundleHeader.code(), RECORD_LENGTH, encoding);
        w.numeric_string("CollectionTypeIndicator", &self.collection_type_indicator, 2)?;
        w.numeric_string("DestinationRoutingNumber", &self.destination_routing_number, 9)?;
        w.numeric_string(
            "ECEInstitutionRoutingNumber",
            &self.ece_institution_routing_number,
            9,
        )?;
        w.date(self.bundle_business_date);
        w.date(self.bundle_creation_date);
        w.alpha(&self.bundle_id, 10);
        w.numeric_string("BundleSequenceNumber", &self.bundle_sequence_number, 4)?;
        w.alpha(&self.cycle_number, 2);
        w.reserved(9);
        w.alpha(&self.user_field, 5);
        w.reserved(12);
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
        rules.mandatory_date("BundleBusinessDate", self.bundle_business_date)?;
        rules.mandatory_date("BundleCreationDate", self.bundle_creation_date)?;
        rules.alphanumeric("BundleID", &self.bundle_id)?;
        rules.mandatory("BundleSequenceNumber", &self.bundle_sequence_number)?;
        rules.numeric("BundleSequenceNumber", &self.bundle_sequence_number)?;
        rules.alphanumeric("CycleNumber", &self.cycle_number)?;
        rules.alphanumeric_special("UserField", &self.user_field)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] =
        b"200123138010406100014620181024201810249999      000101                          ";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), RECORD_LENGTH);
        let header = BundleHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(header.collection_type_indicator, "01");
        assert_eq!(header.bundle_id, "9999");
        assert_eq!(header.bundle_sequence_number, "0001");
        assert_eq!(header.sequence_number(), Some(1));
        assert_eq!(header.cycle_number, "01");
        assert!(header.validate().is_ok());
        assert_eq!(header.to_bytes(Encoding::Ascii).unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn test_sequence_number_must_be_numeric() {
        let mut header = BundleHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        header.bundle_sequence_number = "1A".to_string();
        let err = header.validate().unwrap_err();
        assert!(err.to_string().contains("BundleSequenceNumber"));
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(BundleHeader::parse(&SAMPLE[..79], Encoding::Ascii).is_err());
    }
}
