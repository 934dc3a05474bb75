//! User record (type `68`): institution-defined data attached to an item.

use super::{IclRecord, RecordType};
use crate::config::ValidateOpts;
use crate::encoding::{text_len, Encoding};
use crate::error::{IclError, Result};
use crate::field::{peek_length, FieldReader, FieldWriter};
use crate::validation::FieldRules;
use serde::{Deserialize, Serialize};

const NAME: &str = "UserRecord";

/// Length of a user record with no data.
pub const USER_RECORD_MIN_LENGTH: usize = 45;

const LENGTH_USER_DATA_OFFSET: usize = 38;

/// Who assigned [`UserRecord::owner_identifier`]: `0` unused, `1`..`3`
/// routing numbers of various parties, `4` a DUNS number.
pub const OWNER_IDENTIFIER_INDICATORS: &[u8] = &[0, 1, 2, 3, 4];

/// A user record. Only the general format is modelled; the payload is
/// kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct UserRecord {
    pub owner_identifier_indicator: u8,
    pub owner_identifier: String,
    pub owner_identifier_modifier: String,
    /// `001` for the general format.
    pub user_record_format_type: String,
    pub format_type_version_level: String,
    /// Length of [`user_data`](Self::user_data); rewritten by `create`.
    pub length_user_data: u32,
    pub user_data: String,
}

impl UserRecord {
    /// Set the length field from the payload.
    pub fn sync_lengths(&mut self) {
        self.length_user_data = u32::try_from(text_len(&self.user_data)).unwrap_or(u32::MAX);
    }

    /// Total record length implied by the length field in `bytes`, or the
    /// number of bytes needed to find out.
    #[must_use]
    pub fn framed_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
        let need = LENGTH_USER_DATA_OFFSET + 7;
        if bytes.len() < need {
            return Some(need);
        }
        let data = peek_length(bytes, LENGTH_USER_DATA_OFFSET, 7, encoding)?;
        Some(USER_RECORD_MIN_LENGTH + data)
    }
}

impl IclRecord for UserRecord {
    fn record_type(&self) -> RecordType {
        RecordType::UserRecord
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::variable(NAME, bytes, USER_RECORD_MIN_LENGTH, encoding)?;
        let mut record = UserRecord {
            owner_identifier_indicator: r.numeric("OwnerIdentifierIndicator", 1)?,
            owner_identifier: r.alpha("OwnerIdentifier", 9)?,
            owner_identifier_modifier: r.alpha("OwnerIdentifierModifier", 20)?,
            user_record_format_type: r.numeric_string("UserRecordFormatType", 3)?,
            format_type_version_level: r.numeric_string("FormatTypeVersionLevel", 3)?,
            length_user_data: r.numeric("LengthUserData", 7)?,
            ..Default::default()
        };
        record.user_data = r.variable_text("UserData", record.length_user_data as usize)?;
        if r.remaining() != 0 {
            return Err(IclError::RecordWrongLength {
                expected: bytes.len() - r.remaining(),
                length: bytes.len(),
            });
        }
        Ok(record)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(
            NAME,
            RecordType::UserRecord.code(),
            USER_RECORD_MIN_LENGTH + text_len(&self.user_data),
            encoding,
        );
        w.numeric(
            "OwnerIdentifierIndicator",
            self.owner_identifier_indicator.into(),
            1,
        )?;
        w.alpha(&self.owner_identifier, 9);
        w.alpha(&self.owner_identifier_modifier, 20);
        w.numeric_string("UserRecordFormatType", &self.user_record_format_type, 3)?;
        w.numeric_string("FormatTypeVersionLevel", &self.format_type_version_level, 3)?;
        w.numeric("LengthUserData", text_len(&self.user_data) as u64, 7)?;
        w.variable_text(&self.user_data);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.digit_in(
            "OwnerIdentifierIndicator",
            self.owner_identifier_indicator,
            OWNER_IDENTIFIER_INDICATORS,
        )?;
        rules.alphanumeric_special("OwnerIdentifier", &self.owner_identifier)?;
        rules.alphanumeric_special("OwnerIdentifierModifier", &self.owner_identifier_modifier)?;
        rules.mandatory("UserRecordFormatType", &self.user_record_format_type)?;
        rules.numeric("UserRecordFormatType", &self.user_record_format_type)?;
        rules.numeric("FormatTypeVersionLevel", &self.format_type_version_level)?;
        if self.length_user_data as usize != text_len(&self.user_data) {
            return Err(rules.error(
                "LengthUserData",
                self.length_user_data,
                "does not match the length of UserData",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserRecord {
        UserRecord {
            owner_identifier_indicator: 3,
            owner_identifier: "231380104".to_string(),
            owner_identifier_modifier: "Modifier".to_string(),
            user_record_format_type: "001".to_string(),
            format_type_version_level: "1".to_string(),
            length_user_data: 12,
            user_data: "general data".to_string(),
        }
    }

    #[test]
    fn test_round_trip_with_payload() {
        let record = sample();
        let bytes = record.to_bytes(Encoding::Ascii).unwrap();
        assert_eq!(bytes.len(), USER_RECORD_MIN_LENGTH + 12);
        assert_eq!(&bytes[..2], b"68");
        assert_eq!(&bytes[38..45], b"0000012");
        assert_eq!(UserRecord::framed_length(&bytes, Encoding::Ascii), Some(bytes.len()));

        let parsed = UserRecord::parse(&bytes, Encoding::Ascii).unwrap();
        assert_eq!(parsed.format_type_version_level, "001");
        assert_eq!(parsed.user_data, "general data");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_framed_length_of_short_prefix() {
        assert_eq!(UserRecord::framed_length(b"68", Encoding::Ascii), Some(45));
    }

    #[test]
    fn test_stale_length_fails_until_synced() {
        let mut record = sample();
        record.user_data.push_str(" and more");
        let err = record.validate().unwrap_err();
        assert!(err.to_string().contains("LengthUserData"));
        record.sync_lengths();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = sample().to_bytes(Encoding::Ascii).unwrap();
        bytes.push(b' ');
        assert!(matches!(
            UserRecord::parse(&bytes, Encoding::Ascii),
            Err(IclError::RecordWrongLength { .. })
        ));
    }

    #[test]
    fn test_owner_identifier_indicator_range() {
        let mut record = sample();
        record.owner_identifier_indicator = 7;
        assert!(record.validate().is_err());
    }
}
