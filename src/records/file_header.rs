//! File header record (type `01`).

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{FieldRules, YES_NO};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const NAME: &str = "FileHeader";

/// Standard levels the writer may declare.
pub const STANDARD_LEVELS: &[&str] = &["03", "30", "35"];

/// Test (`T`) or production (`P`).
pub const TEST_FILE_INDICATORS: &[&str] = &["T", "P"];

/// The first record of every file: who is sending to whom, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileHeader {
    /// Version of the standard the file follows.
    pub standard_level: String,
    /// `T` for test files, `P` for production.
    pub test_file_indicator: String,
    /// Routing number of the receiving institution.
    pub immediate_destination: String,
    /// Routing number of the sending institution.
    pub immediate_origin: String,
    /// Date the file was created.
    #[serde(with = "crate::json::date")]
    pub file_creation_date: Option<NaiveDate>,
    /// Time the file was created.
    #[serde(with = "crate::json::time")]
    pub file_creation_time: Option<NaiveTime>,
    /// `Y` if the file is being resent.
    pub resend_indicator: String,
    /// Name of the receiving institution.
    pub immediate_destination_name: String,
    /// Name of the sending institution.
    pub immediate_origin_name: String,
    /// Distinguishes files created on the same date.
    #[serde(rename = "fileIDModifier")]
    pub file_id_modifier: String,
    /// ISO country code.
    pub country_code: String,
    /// Free-form.
    pub user_field: String,
    /// Companion document indicator.
    pub companion_document_indicator: String,
}

impl FileHeader {
    /// A header with standard level `35`, production, not resent.
    #[must_use]
    pub fn new() -> Self {
        FileHeader {
            standard_level: "35".to_string(),
            test_file_indicator: "P".to_string(),
            resend_indicator: "N".to_string(),
            ..Default::default()
        }
    }
}

impl IclRecord for FileHeader {
    fn record_type(&self) -> RecordType {
        RecordType::FileHeader
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        Ok(FileHeader {
            standard_level: r.numeric_string("StandardLevel", 2)?,
            test_file_indicator: r.alpha("TestFileIndicator", 1)?,
            immediate_destination: r.numeric_string("ImmediateDestination", 9)?,
            immediate_origin: r.numeric_string("ImmediateOrigin", 9)?,
            file_creation_date: r.date("FileCreationDate")?,
            file_creation_time: r.time("FileCreationTime")?,
            resend_indicator: r.alpha("ResendIndicator", 1)?,
            immediate_destination_name: r.alpha("ImmediateDestinationName", 18)?,
            immediate_origin_name: r.alpha("ImmediateOriginName", 18)?,
            file_id_modifier: r.alpha("FileIDModifier", 1)?,
            country_code: r.alpha("CountryCode", 2)?,
            user_field: r.alpha("UserField", 4)?,
            companion_document_indicator: r.alpha("CompanionDocumentIndicator", 1)?,
        })
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(NAME, RecordType::FileHeader.code(), RECORD_LENGTH, encoding);
        w.numeric_string("StandardLevel", &self.standard_level, 2)?;
        w.alpha(&self.test_file_indicator, 1);
        w.numeric_string("ImmediateDestination", &self.immediate_destination, 9)?;
        w.numeric_string("ImmediateOrigin", &self.immediate_origin, 9)?;
        w.date(self.file_creation_date);
        w.time(self.file_creation_time);
        w.alpha(&self.resend_indicator, 1);
        w.alpha(&self.immediate_destination_name, 18);
        w.alpha(&self.immediate_origin_name, 18);
        w.alpha(&self.file_id_modifier, 1);
        w.alpha(&self.country_code, 2);
        w.alpha(&self.user_field, 4);
        w.alpha(&self.companion_document_indicator, 1);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.one_of("StandardLevel", &self.standard_level, STANDARD_LEVELS)?;
        rules.one_of("TestFileIndicator", &self.test_file_indicator, TEST_FILE_INDICATORS)?;
        rules.routing_number("ImmediateDestination", &self.immediate_destination)?;
        rules.routing_number("ImmediateOrigin", &self.immediate_origin)?;
        rules.mandatory_date("FileCreationDate", self.file_creation_date)?;
        rules.mandatory_time("FileCreationTime", self.file_creation_time)?;
        rules.one_of("ResendIndicator", &self.resend_indicator, YES_NO)?;
        rules.alphanumeric_special("ImmediateDestinationName", &self.immediate_destination_name)?;
        rules.alphanumeric_special("ImmediateOriginName", &self.immediate_origin_name)?;
        rules.alphanumeric("FileIDModifier", &self.file_id_modifier)?;
        rules.alphanumeric("CountryCode", &self.country_code)?;
        rules.alphanumeric_special("UserField", &self.user_field)?;
        rules.alphanumeric("CompanionDocumentIndicator", &self.companion_document_indicator)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] =
        b"0135T061000146231380104201810241530NWave Money        Citadel           AUS     ";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), RECORD_LENGTH);
        let header = FileHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(header.standard_level, "35");
        assert_eq!(header.test_file_indicator, "T");
        assert_eq!(header.immediate_destination, "061000146");
        assert_eq!(header.immediate_origin, "231380104");
        assert_eq!(
            header.file_creation_date,
            NaiveDate::from_ymd_opt(2018, 10, 24)
        );
        assert_eq!(header.immediate_destination_name, "Wave Money");
        assert_eq!(header.immediate_origin_name, "Citadel");
        assert_eq!(header.file_id_modifier, "A");
        assert_eq!(header.country_code, "US");
        assert_eq!(header.user_field, "");
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_bytes_are_reproduced() {
        let header = FileHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(header.to_bytes(Encoding::Ascii).unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn test_standard_level_enumeration() {
        let mut header = FileHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        header.standard_level = "01".to_string();
        let err = header.validate().unwrap_err();
        assert!(err.to_string().contains("StandardLevel"));
    }

    #[test]
    fn test_missing_creation_date_is_reported() {
        let mut header = FileHeader::parse(SAMPLE, Encoding::Ascii).unwrap();
        header.file_creation_date = None;
        let err = header.validate().unwrap_err();
        assert!(err.to_string().contains("FileCreationDate"));
        assert!(header.validate_with(&ValidateOpts::skip_all()).is_ok());
    }
}
