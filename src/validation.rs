//! Field-level validation rules for ICL records.
//!
//! This module holds the character classes, enumerations, and ABA routing
//! number arithmetic that every record's `validate` uses. A [`FieldRules`]
//! value binds the rules to one record kind so that each violation is
//! reported with the record, field, and value attached.

use crate::config::ValidateOpts;
use crate::error::{IclError, Result};
use chrono::{NaiveDate, NaiveTime};

/// Collection type indicators on cash letter and bundle headers.
pub const COLLECTION_TYPE_INDICATORS: &[&str] =
    &["00", "01", "02", "03", "04", "05", "06", "07", "08", "09"];

/// Documentation type indicators on headers and items.
pub const DOCUMENTATION_TYPE_INDICATORS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Z",
];

/// Archive type indicators on items.
pub const ARCHIVE_TYPE_INDICATORS: &[&str] = &["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];

/// Image quality test results.
pub const IMAGE_QUALITY_VALUES: &[u8] = &[0, 1, 2];

/// Image usability results.
pub const IMAGE_USABILITY_VALUES: &[u8] = &[0, 1, 2, 3, 4, 5];

/// Conversion indicators on endorsement addenda.
pub const CONVERSION_INDICATORS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Correction indicators on items and addenda.
pub const CORRECTION_INDICATORS: &[u8] = &[0, 1, 2, 3, 4];

/// Yes/no flags.
pub const YES_NO: &[&str] = &["Y", "N"];

/// Whether every byte is an ASCII digit.
#[must_use]
pub fn is_numeric(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit())
}

/// Whether every byte is a letter, digit, or space.
#[must_use]
pub fn is_alphanumeric(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b' ')
}

/// Whether every byte is printable ASCII.
#[must_use]
pub fn is_alphanumeric_special(value: &str) -> bool {
    value.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Whether every byte may appear in MICR text (digits, blank, `*`, `-`, `/`).
#[must_use]
pub fn is_numeric_blank_special(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b' ' | b'*' | b'-' | b'/'))
}

/// Compute the ABA check digit for the first eight digits of a routing number.
///
/// Weights 3, 7, 1 repeat across the digits; the check digit brings the
/// weighted sum up to a multiple of ten.
///
/// Returns `None` if `prefix` is not exactly eight digits.
#[must_use]
pub fn aba_check_digit(prefix: &str) -> Option<u8> {
    if prefix.len() != 8 || !is_numeric(prefix) {
        return None;
    }
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = prefix
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    #[allow(clippy::cast_possible_truncation)]
    let digit = ((10 - sum % 10) % 10) as u8;
    Some(digit)
}

/// Whether a nine-digit routing number carries a correct ABA check digit.
#[must_use]
pub fn is_valid_aba(routing: &str) -> bool {
    if routing.len() != 9 || !is_numeric(routing) {
        return false;
    }
    aba_check_digit(&routing[..8]) == Some(routing.as_bytes()[8] - b'0')
}

/// Validation rules bound to one record kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules<'o> {
    record: &'static str,
    opts: &'o ValidateOpts,
}

impl<'o> FieldRules<'o> {
    /// Bind the rules to a record kind and a set of options.
    #[must_use]
    pub fn new(record: &'static str, opts: &'o ValidateOpts) -> Self {
        FieldRules { record, opts }
    }

    /// The options these rules were built with.
    #[must_use]
    pub fn opts(&self) -> &'o ValidateOpts {
        self.opts
    }

    /// Build a field error for this record.
    #[must_use]
    pub fn error(&self, field: &'static str, value: impl ToString, msg: &str) -> IclError {
        IclError::field(self.record, field, value, msg)
    }

    /// The field must not be blank.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if `value` is empty or all blanks.
    pub fn mandatory(&self, field: &'static str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(self.error(field, value, "is a mandatory field"));
        }
        Ok(())
    }

    /// The date must be present.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if `value` is `None`.
    pub fn mandatory_date(&self, field: &'static str, value: Option<NaiveDate>) -> Result<()> {
        if value.is_none() {
            return Err(self.error(field, "", "is a mandatory field"));
        }
        Ok(())
    }

    /// The time must be present.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if `value` is `None`.
    pub fn mandatory_time(&self, field: &'static str, value: Option<NaiveTime>) -> Result<()> {
        if value.is_none() {
            return Err(self.error(field, "", "is a mandatory field"));
        }
        Ok(())
    }

    /// Letters, digits, and spaces only.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] on any other character.
    pub fn alphanumeric(&self, field: &'static str, value: &str) -> Result<()> {
        if !is_alphanumeric(value) {
            return Err(self.error(field, value, "has non alphanumeric characters"));
        }
        Ok(())
    }

    /// Printable ASCII only.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] on any other character.
    pub fn alphanumeric_special(&self, field: &'static str, value: &str) -> Result<()> {
        if !is_alphanumeric_special(value) {
            return Err(self.error(field, value, "has non printable characters"));
        }
        Ok(())
    }

    /// Digits only; blank is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] on any other character.
    pub fn numeric(&self, field: &'static str, value: &str) -> Result<()> {
        if !is_numeric(value) {
            return Err(self.error(field, value, "is not numeric"));
        }
        Ok(())
    }

    /// MICR characters only.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] on any other character.
    pub fn numeric_blank_special(&self, field: &'static str, value: &str) -> Result<()> {
        if !is_numeric_blank_special(value) {
            return Err(self.error(field, value, "has characters not allowed in MICR data"));
        }
        Ok(())
    }

    /// The value must be one of `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] naming the value if it is not allowed.
    pub fn one_of(&self, field: &'static str, value: &str, allowed: &[&str]) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(self.error(field, value, "is not a valid value"));
        }
        Ok(())
    }

    /// The value must be blank or one of `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] naming the value if it is not allowed.
    pub fn optional_one_of(
        &self,
        field: &'static str,
        value: &str,
        allowed: &[&str],
    ) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.one_of(field, value, allowed)
    }

    /// The numeric code must be one of `allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] naming the value if it is not allowed.
    pub fn digit_in(&self, field: &'static str, value: u8, allowed: &[u8]) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(self.error(field, value, "is not a valid value"));
        }
        Ok(())
    }

    /// A mandatory nine-digit routing number with a valid ABA check digit.
    ///
    /// The check digit test is skipped under `allow_invalid_routing_number`
    /// or `allow_invalid_check_digit`.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the value is blank, not nine digits, or
    /// fails the check digit test.
    pub fn routing_number(&self, field: &'static str, value: &str) -> Result<()> {
        self.mandatory(field, value)?;
        if value.len() != 9 || !is_numeric(value) {
            return Err(self.error(field, value, "must be a 9 digit routing number"));
        }
        if self.opts.allow_invalid_routing_number || self.opts.allow_invalid_check_digit {
            return Ok(());
        }
        if !is_valid_aba(value) {
            return Err(self.error(field, value, "has an invalid ABA check digit"));
        }
        Ok(())
    }

    /// A routing number that may be blank.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] for a non-blank invalid routing number.
    pub fn optional_routing_number(&self, field: &'static str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.routing_number(field, value)
    }

    /// The eight-digit routing prefix carried by item records, and its
    /// separate check digit.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the prefix is not eight digits or the
    /// check digit does not match (unless `allow_invalid_check_digit`).
    pub fn routing_prefix(
        &self,
        field: &'static str,
        prefix: &str,
        check_field: &'static str,
        check_digit: &str,
    ) -> Result<()> {
        self.mandatory(field, prefix)?;
        if prefix.len() != 8 || !is_numeric(prefix) {
            return Err(self.error(field, prefix, "must be an 8 digit routing number"));
        }
        self.mandatory(check_field, check_digit)?;
        self.numeric(check_field, check_digit)?;
        if self.opts.allow_invalid_check_digit {
            return Ok(());
        }
        let expected = aba_check_digit(prefix).map(|d| d.to_string());
        if expected.as_deref() != Some(check_digit) {
            return Err(self.error(
                check_field,
                check_digit,
                "does not match the ABA check digit of the routing number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aba_check_digit() {
        assert_eq!(aba_check_digit("06100014"), Some(6));
        assert_eq!(aba_check_digit("23138010"), Some(4));
        assert_eq!(aba_check_digit("1234567"), None);
        assert_eq!(aba_check_digit("1234567A"), None);
    }

    #[test]
    fn test_is_valid_aba() {
        assert!(is_valid_aba("061000146"));
        assert!(is_valid_aba("231380104"));
        assert!(!is_valid_aba("061000147"));
        assert!(!is_valid_aba("06100014"));
    }

    #[test]
    fn test_character_classes() {
        assert!(is_numeric("0123"));
        assert!(!is_numeric("01 3"));
        assert!(is_alphanumeric("Wave Money 1"));
        assert!(!is_alphanumeric("Wave-Money"));
        assert!(is_alphanumeric_special("Wave-Money & Co."));
        assert!(!is_alphanumeric_special("tab\there"));
        assert!(is_numeric_blank_special("5558881/ 12*-"));
        assert!(!is_numeric_blank_special("55A"));
    }

    #[test]
    fn test_routing_number_rules() {
        let opts = ValidateOpts::default();
        let rules = FieldRules::new("FileHeader", &opts);
        assert!(rules.routing_number("ImmediateOrigin", "231380104").is_ok());
        let err = rules
            .routing_number("ImmediateOrigin", "231380105")
            .unwrap_err();
        assert!(err.to_string().contains("ABA check digit"));
        assert!(rules.routing_number("ImmediateOrigin", "").is_err());
        assert!(rules.routing_number("ImmediateOrigin", "12345").is_err());
    }

    #[test]
    fn test_routing_number_opt_outs() {
        let opts = ValidateOpts::default().with_allow_invalid_routing_number(true);
        let rules = FieldRules::new("FileHeader", &opts);
        assert!(rules.routing_number("ImmediateOrigin", "231380105").is_ok());
        // Still has to look like a routing number.
        assert!(rules.routing_number("ImmediateOrigin", "2313801").is_err());
    }

    #[test]
    fn test_routing_prefix_check_digit() {
        let opts = ValidateOpts::default();
        let rules = FieldRules::new("CheckDetail", &opts);
        assert!(rules
            .routing_prefix("PayorBankRoutingNumber", "03130001", "PayorBankCheckDigit", "2")
            .is_ok());
        assert!(rules
            .routing_prefix("PayorBankRoutingNumber", "03130001", "PayorBankCheckDigit", "3")
            .is_err());

        let lenient = ValidateOpts::default().with_allow_invalid_check_digit(true);
        let rules = FieldRules::new("CheckDetail", &lenient);
        assert!(rules
            .routing_prefix("PayorBankRoutingNumber", "03130001", "PayorBankCheckDigit", "3")
            .is_ok());
    }

    #[test]
    fn test_enumerations() {
        let opts = ValidateOpts::default();
        let rules = FieldRules::new("CheckDetail", &opts);
        assert!(rules
            .optional_one_of("DocumentationTypeIndicator", "G", DOCUMENTATION_TYPE_INDICATORS)
            .is_ok());
        assert!(rules
            .optional_one_of("DocumentationTypeIndicator", "", DOCUMENTATION_TYPE_INDICATORS)
            .is_ok());
        let err = rules
            .one_of("DocumentationTypeIndicator", "Q", DOCUMENTATION_TYPE_INDICATORS)
            .unwrap_err();
        assert!(err.to_string().contains("\"Q\""));
        assert!(rules.digit_in("CorrectionIndicator", 5, CORRECTION_INDICATORS).is_err());
    }
}
