//! Check and return detail addenda (types `26`-`28` and `32`-`35`).
//!
//! Check and return addenda share three layouts: the BOFD endorsement
//! (`26`/`32`), the image reference (`27`/`34`), and the subsequent
//! endorsement (`28`/`35`). Each layout is stamped out once per record kind
//! so that the two kinds stay distinct types with their own codes.

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::{text_len, Encoding};
use crate::error::{IclError, Result};
use crate::field::{peek_length, FieldReader, FieldWriter};
use crate::validation::{FieldRules, CONVERSION_INDICATORS, CORRECTION_INDICATORS, YES_NO};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed part of an image reference addendum.
pub const IMAGE_REFERENCE_MIN_LENGTH: usize = 46;

const IMAGE_REFERENCE_KEY_LENGTH_OFFSET: usize = 18;

/// Identifies the endorsing bank on subsequent endorsements: `0` depository,
/// `1` other collecting, `2` other returning, `3` payor.
pub const ENDORSING_BANK_IDENTIFIERS: &[u8] = &[0, 1, 2, 3];

macro_rules! bofd_endorsement_addendum {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            /// Position among the item's addenda of this kind, assigned by `create`.
            pub record_number: u8,
            /// Where returns should be sent.
            pub return_location_routing_number: String,
            /// Date of the BOFD endorsement.
            #[serde(rename = "bofdEndorsementDate", with = "crate::json::date")]
            pub bofd_endorsement_date: Option<NaiveDate>,
            /// BOFD's sequence number for the item.
            #[serde(rename = "bofdItemSequenceNumber")]
            pub bofd_item_sequence_number: String,
            /// Depositor's account at the BOFD.
            #[serde(rename = "bofdAccountNumber")]
            pub bofd_account_number: String,
            /// BOFD branch.
            #[serde(rename = "bofdBranchCode")]
            pub bofd_branch_code: String,
            /// Payee named on the item.
            pub payee_name: String,
            /// `Y` if the item was truncated.
            pub truncation_indicator: String,
            /// How the BOFD converted the item.
            #[serde(rename = "bofdConversionIndicator")]
            pub bofd_conversion_indicator: String,
            /// Whether the BOFD corrected the MICR line.
            #[serde(rename = "bofdCorrectionIndicator")]
            pub bofd_correction_indicator: u8,
            /// Free-form.
            pub user_field: String,
        }

        impl IclRecord for $name {
            fn record_type(&self) -> RecordType {
                RecordType::$name
            }

            fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
                let mut r = FieldReader::fixed(stringify!($name), bytes, RECORD_LENGTH, encoding)?;
                let addendum = $name {
                    record_number: r.numeric("RecordNumber", 1)?,
                    return_location_routing_number: r
                        .numeric_string("ReturnLocationRoutingNumber", 9)?,
                    bofd_endorsement_date: r.date("BOFDEndorsementDate")?,
                    bofd_item_sequence_number: r.numeric_string("BOFDItemSequenceNumber", 15)?,
                    bofd_account_number: r.alpha("BOFDAccountNumber", 18)?,
                    bofd_branch_code: r.alpha("BOFDBranchCode", 5)?,
                    payee_name: r.alpha("PayeeName", 15)?,
                    truncation_indicator: r.alpha("TruncationIndicator", 1)?,
                    bofd_conversion_indicator: r.alpha("BOFDConversionIndicator", 1)?,
                    bofd_correction_indicator: r.numeric("BOFDCorrectionIndicator", 1)?,
                    user_field: r.alpha("UserField", 1)?,
                };
                r.skip(3)?;
                Ok(addendum)
            }

            fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
                let mut w = FieldWriter::new(
                    stringify!($name),
                    RecordType::$name.code(),
                    RECORD_LENGTH,
                    encoding,
                );
                w.numeric("RecordNumber", self.record_number.into(), 1)?;
                w.numeric_string(
                    "ReturnLocationRoutingNumber",
                    &self.return_location_routing_number,
                    9,
                )?;
                w.date(self.bofd_endorsement_date);
                w.numeric_string("BOFDItemSequenceNumber", &self.bofd_item_sequence_number, 15)?;
                w.alpha(&self.bofd_account_number, 18);
                w.alpha(&self.bofd_branch_code, 5);
                w.alpha(&self.payee_name, 15);
                w.alpha(&self.truncation_indicator, 1);
                w.alpha(&self.bofd_conversion_indicator, 1);
                w.numeric(
                    "BOFDCorrectionIndicator",
                    self.bofd_correction_indicator.into(),
                    1,
                )?;
                w.alpha(&self.user_field, 1);
                w.reserved(3);
                Ok(w.finish())
            }

            fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
                if opts.skip_all {
                    return Ok(());
                }
                let rules = FieldRules::new(stringify!($name), opts);
                if self.record_number == 0 {
                    return Err(rules.error("RecordNumber", 0, "is a mandatory field"));
                }
                rules.routing_number(
                    "ReturnLocationRoutingNumber",
                    &self.return_location_routing_number,
                )?;
                rules.mandatory_date("BOFDEndorsementDate", self.bofd_endorsement_date)?;
                rules.mandatory("BOFDItemSequenceNumber", &self.bofd_item_sequence_number)?;
                rules.numeric("BOFDItemSequenceNumber", &self.bofd_item_sequence_number)?;
                rules.alphanumeric_special("BOFDAccountNumber", &self.bofd_account_number)?;
                rules.alphanumeric_special("BOFDBranchCode", &self.bofd_branch_code)?;
                rules.alphanumeric_special("PayeeName", &self.payee_name)?;
                rules.one_of("TruncationIndicator", &self.truncation_indicator, YES_NO)?;
                rules.optional_one_of(
                    "BOFDConversionIndicator",
                    &self.bofd_conversion_indicator,
                    CONVERSION_INDICATORS,
                )?;
                rules.digit_in(
                    "BOFDCorrectionIndicator",
                    self.bofd_correction_indicator,
                    CORRECTION_INDICATORS,
                )?;
                rules.alphanumeric_special("UserField", &self.user_field)?;
                Ok(())
            }
        }
    };
}

macro_rules! image_reference_addendum {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            /// `0` no image reference, `1` image reference present.
            pub image_reference_key_indicator: u8,
            /// Archive sequence number of the microfilm copy.
            pub microfilm_archive_sequence_number: String,
            /// Length of [`image_reference_key`](Self::image_reference_key).
            pub length_image_reference_key: u32,
            /// Key for retrieving the image from an archive.
            pub image_reference_key: String,
            /// Free text.
            pub description: String,
            /// Free-form.
            pub user_field: String,
        }

        impl $name {
            /// Set the key length from the key.
            pub fn sync_lengths(&mut self) {
                self.length_image_reference_key =
                    u32::try_from(text_len(&self.image_reference_key)).unwrap_or(u32::MAX);
            }

            /// Total record length implied by the key length in `bytes`.
            #[must_use]
            pub fn framed_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
                image_reference_framed_length(bytes, encoding)
            }
        }

        impl IclRecord for $name {
            fn record_type(&self) -> RecordType {
                RecordType::$name
            }

            fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
                let mut r = FieldReader::variable(
                    stringify!($name),
                    bytes,
                    IMAGE_REFERENCE_MIN_LENGTH,
                    encoding,
                )?;
                let mut addendum = $name {
                    image_reference_key_indicator: r.numeric("ImageReferenceKeyIndicator", 1)?,
                    microfilm_archive_sequence_number: r
                        .alpha("MicrofilmArchiveSequenceNumber", 15)?,
                    length_image_reference_key: r.numeric("LengthImageReferenceKey", 4)?,
                    ..Default::default()
                };
                addendum.image_reference_key = r.variable_text(
                    "ImageReferenceKey",
                    addendum.length_image_reference_key as usize,
                )?;
                addendum.description = r.alpha("Description", 15)?;
                addendum.user_field = r.alpha("UserField", 4)?;
                r.skip(5)?;
                if r.remaining() != 0 {
                    return Err(IclError::RecordWrongLength {
                        expected: bytes.len() - r.remaining(),
                        length: bytes.len(),
                    });
                }
                Ok(addendum)
            }

            fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
                let mut w = FieldWriter::new(
                    stringify!($name),
                    RecordType::$name.code(),
                    IMAGE_REFERENCE_MIN_LENGTH + text_len(&self.image_reference_key),
                    encoding,
                );
                w.numeric(
                    "ImageReferenceKeyIndicator",
                    self.image_reference_key_indicator.into(),
                    1,
                )?;
                w.alpha(&self.microfilm_archive_sequence_number, 15);
                w.numeric(
                    "LengthImageReferenceKey",
                    text_len(&self.image_reference_key) as u64,
                    4,
                )?;
                w.variable_text(&self.image_reference_key);
                w.alpha(&self.description, 15);
                w.alpha(&self.user_field, 4);
                w.reserved(5);
                Ok(w.finish())
            }

            fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
                if opts.skip_all {
                    return Ok(());
                }
                let rules = FieldRules::new(stringify!($name), opts);
                rules.digit_in(
                    "ImageReferenceKeyIndicator",
                    self.image_reference_key_indicator,
                    &[0, 1],
                )?;
                rules.alphanumeric_special(
                    "MicrofilmArchiveSequenceNumber",
                    &self.microfilm_archive_sequence_number,
                )?;
                if (self.length_image_reference_key > 0) == self.image_reference_key.is_empty() {
                    return Err(rules.error(
                        "ImageReferenceKey",
                        &self.image_reference_key,
                        "must be present exactly when LengthImageReferenceKey is greater than zero",
                    ));
                }
                if self.length_image_reference_key as usize != text_len(&self.image_reference_key) {
                    return Err(rules.error(
                        "LengthImageReferenceKey",
                        self.length_image_reference_key,
                        "does not match the length of ImageReferenceKey",
                    ));
                }
                rules.alphanumeric_special("ImageReferenceKey", &self.image_reference_key)?;
                rules.alphanumeric_special("Description", &self.description)?;
                rules.alphanumeric_special("UserField", &self.user_field)?;
                Ok(())
            }
        }
    };
}

macro_rules! subsequent_endorsement_addendum {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            /// Position among the item's addenda of this kind, assigned by `create`.
            pub record_number: u8,
            /// Endorsing bank.
            pub endorsing_bank_routing_number: String,
            /// Business date of the endorsement.
            #[serde(rename = "bofdEndorsementBusinessDate", with = "crate::json::date")]
            pub bofd_endorsement_business_date: Option<NaiveDate>,
            /// Endorsing bank's sequence number for the item.
            pub endorsing_bank_item_sequence_number: String,
            /// `Y` if the item was truncated.
            pub truncation_indicator: String,
            /// How the endorsing bank converted the item.
            pub endorsing_bank_conversion_indicator: String,
            /// Whether the endorsing bank corrected the MICR line.
            pub endorsing_bank_correction_indicator: u8,
            /// Return reason, for returned items.
            pub return_reason: String,
            /// Free-form.
            pub user_field: String,
            /// Role of the endorsing bank.
            pub endorsing_bank_identifier: u8,
        }

        impl IclRecord for $name {
            fn record_type(&self) -> RecordType {
                RecordType::$name
            }

            fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
                let mut r = FieldReader::fixed(stringify!($name), bytes, RECORD_LENGTH, encoding)?;
                let addendum = $name {
                    record_number: r.numeric("RecordNumber", 2)?,
                    endorsing_bank_routing_number: r
                        .numeric_string("EndorsingBankRoutingNumber", 9)?,
                    bofd_endorsement_business_date: r.date("BOFDEndorsementBusinessDate")?,
                    endorsing_bank_item_sequence_number: r
                        .numeric_string("EndorsingBankItemSequenceNumber", 15)?,
                    truncation_indicator: r.alpha("TruncationIndicator", 1)?,
                    endorsing_bank_conversion_indicator: r
                        .alpha("EndorsingBankConversionIndicator", 1)?,
                    endorsing_bank_correction_indicator: r
                        .numeric("EndorsingBankCorrectionIndicator", 1)?,
                    return_reason: r.alpha("ReturnReason", 1)?,
                    user_field: r.alpha("UserField", 15)?,
                    endorsing_bank_identifier: r.numeric("EndorsingBankIdentifier", 1)?,
                };
                r.skip(24)?;
                Ok(addendum)
            }

            fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
                let mut w = FieldWriter::new(
                    stringify!($name),
                    RecordType::$name.code(),
                    RECORD_LENGTH,
                    encoding,
                );
                w.numeric("RecordNumber", self.record_number.into(), 2)?;
                w.numeric_string(
                    "EndorsingBankRoutingNumber",
                    &self.endorsing_bank_routing_number,
                    9,
                )?;
                w.date(self.bofd_endorsement_business_date);
                w.numeric_string(
                    "EndorsingBankItemSequenceNumber",
                    &self.endorsing_bank_item_sequence_number,
                    15,
                )?;
                w.alpha(&self.truncation_indicator, 1);
                w.alpha(&self.endorsing_bank_conversion_indicator, 1);
                w.numeric(
                    "EndorsingBankCorrectionIndicator",
                    self.endorsing_bank_correction_indicator.into(),
                    1,
                )?;
                w.alpha(&self.return_reason, 1);
                w.alpha(&self.user_field, 15);
                w.numeric(
                    "EndorsingBankIdentifier",
                    self.endorsing_bank_identifier.into(),
                    1,
                )?;
                w.reserved(24);
                Ok(w.finish())
            }

            fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
                if opts.skip_all {
                    return Ok(());
                }
                let rules = FieldRules::new(stringify!($name), opts);
                if self.record_number == 0 {
                    return Err(rules.error("RecordNumber", 0, "is a mandatory field"));
                }
                rules.routing_number(
                    "EndorsingBankRoutingNumber",
                    &self.endorsing_bank_routing_number,
                )?;
                rules.mandatory_date(
                    "BOFDEndorsementBusinessDate",
                    self.bofd_endorsement_business_date,
                )?;
                rules.mandatory(
                    "EndorsingBankItemSequenceNumber",
                    &self.endorsing_bank_item_sequence_number,
                )?;
                rules.numeric(
                    "EndorsingBankItemSequenceNumber",
                    &self.endorsing_bank_item_sequence_number,
                )?;
                rules.one_of("TruncationIndicator", &self.truncation_indicator, YES_NO)?;
                rules.optional_one_of(
                    "EndorsingBankConversionIndicator",
                    &self.endorsing_bank_conversion_indicator,
                    CONVERSION_INDICATORS,
                )?;
                rules.digit_in(
                    "EndorsingBankCorrectionIndicator",
                    self.endorsing_bank_correction_indicator,
                    CORRECTION_INDICATORS,
                )?;
                rules.alphanumeric("ReturnReason", &self.return_reason)?;
                rules.alphanumeric_special("UserField", &self.user_field)?;
                rules.digit_in(
                    "EndorsingBankIdentifier",
                    self.endorsing_bank_identifier,
                    ENDORSING_BANK_IDENTIFIERS,
                )?;
                Ok(())
            }
        }
    };
}

fn image_reference_framed_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
    let need = IMAGE_REFERENCE_KEY_LENGTH_OFFSET + 4;
    if bytes.len() < need {
        return Some(need);
    }
    let key = peek_length(bytes, IMAGE_REFERENCE_KEY_LENGTH_OFFSET, 4, encoding)?;
    Some(IMAGE_REFERENCE_MIN_LENGTH + key)
}

bofd_endorsement_addendum!(
    /// Check detail addendum A (`26`): the bank of first deposit's endorsement.
    CheckDetailAddendumA
);

image_reference_addendum!(
    /// Check detail addendum B (`27`): archive reference for the item image.
    CheckDetailAddendumB
);

subsequent_endorsement_addendum!(
    /// Check detail addendum C (`28`): a subsequent bank's endorsement.
    CheckDetailAddendumC
);

bofd_endorsement_addendum!(
    /// Return detail addendum A (`32`): the bank of first deposit's endorsement.
    ReturnDetailAddendumA
);

image_reference_addendum!(
    /// Return detail addendum C (`34`): archive reference for the item image.
    ReturnDetailAddendumC
);

subsequent_endorsement_addendum!(
    /// Return detail addendum D (`35`): a subsequent bank's endorsement.
    ReturnDetailAddendumD
);

const RETURN_B: &str = "ReturnDetailAddendumB";

/// Return detail addendum B (`33`): the paying bank's view of the item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnDetailAddendumB {
    /// Name of the paying bank.
    pub payor_bank_name: String,
    /// Auxiliary on-us field of the MICR line.
    pub auxiliary_on_us: String,
    /// Paying bank's sequence number for the item.
    pub payor_bank_sequence_number: String,
    /// Business date at the paying bank.
    #[serde(with = "crate::json::date")]
    pub payor_bank_business_date: Option<NaiveDate>,
    /// Name on the paying account.
    pub payor_account_name: String,
}

impl IclRecord for ReturnDetailAddendumB {
    fn record_type(&self) -> RecordType {
        RecordType::ReturnDetailAddendumB
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(RETURN_B, bytes, RECORD_LENGTH, encoding)?;
        Ok(ReturnDetailAddendumB {
            payor_bank_name: r.alpha("PayorBankName", 18)?,
            auxiliary_on_us: r.numeric_blank("AuxiliaryOnUs", 15)?,
            payor_bank_sequence_number: r.numeric_string("PayorBankSequenceNumber", 15)?,
            payor_bank_business_date: r.date("PayorBankBusinessDate")?,
            payor_account_name: r.alpha("PayorAccountName", 22)?,
        })
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(
            RETURN_B,
            RecordType::ReturnDetailAddendumB.code(),
            RECORD_LENGTH,
            encoding,
        );
        w.alpha(&self.payor_bank_name, 18);
        w.numeric_blank(&self.auxiliary_on_us, 15);
        w.numeric_string(
            "PayorBankSequenceNumber",
            &self.payor_bank_sequence_number,
            15,
        )?;
        w.date(self.payor_bank_business_date);
        w.alpha(&self.payor_account_name, 22);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(RETURN_B, opts);
        rules.alphanumeric_special("PayorBankName", &self.payor_bank_name)?;
        rules.numeric_blank_special("AuxiliaryOnUs", &self.auxiliary_on_us)?;
        rules.mandatory("PayorBankSequenceNumber", &self.payor_bank_sequence_number)?;
        rules.numeric("PayorBankSequenceNumber", &self.payor_bank_sequence_number)?;
        rules.mandatory_date("PayorBankBusinessDate", self.payor_bank_business_date)?;
        rules.alphanumeric_special("PayorAccountName", &self.payor_account_name)?;
        Ok(())
    }
}
