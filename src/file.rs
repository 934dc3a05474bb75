//! The root of an ICL tree.
//!
//! A [`File`] owns its header, cash letters, optional root-level bundles, and
//! control record. It is built empty, read from bytes by
//! [`IclReader`](crate::IclReader), or decoded from JSON, and then passes
//! through two phases:
//!
//! - [`File::create`] derives everything derivable: sequence numbers, lengths,
//!   addendum counts, and every control total.
//! - [`File::validate`] checks field rules and cross-record invariants without
//!   changing anything, deepest records first.
//!
//! # Example
//!
//! ```
//! use imagecashletter::records::{CashLetterControl, CashLetterHeader, FileHeader};
//! use imagecashletter::{CashLetter, File, ValidateOpts};
//!
//! let mut file = File::new(FileHeader::new());
//! let mut cash_letter = CashLetter::new(CashLetterHeader::default());
//! cash_letter.set_control(CashLetterControl::default());
//! file.add_cash_letter(cash_letter);
//!
//! // Field rules fail on the blank headers; skip them to see the totals.
//! file.set_validation(ValidateOpts::skip_all());
//! file.create().unwrap();
//! assert_eq!(file.control.as_ref().unwrap().total_record_count, 4);
//! ```

use crate::bundle::{check_total, count, Bundle};
use crate::cash_letter::CashLetter;
use crate::config::ValidateOpts;
use crate::error::{IclError, Result};
use crate::records::{FileControl, FileHeader, IclRecord};
use log::debug;
use serde::{Deserialize, Serialize};

/// An ICL file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct File {
    /// Caller-assigned identifier.
    pub id: String,
    /// Opening record.
    #[serde(rename = "fileHeader")]
    pub header: FileHeader,
    /// Cash letters in write order.
    pub cash_letters: Vec<CashLetter>,
    /// Bundles outside any cash letter, kept for legacy files.
    pub bundles: Vec<Bundle>,
    /// Closing record with the file totals.
    #[serde(rename = "fileControl")]
    pub control: Option<FileControl>,
    #[serde(skip)]
    validate_opts: Option<ValidateOpts>,
}

impl File {
    /// Start an empty file.
    #[must_use]
    pub fn new(header: FileHeader) -> Self {
        File {
            header,
            ..Default::default()
        }
    }

    crate::define_child_accessors!(cash_letters, add_cash_letter, cash_letters, CashLetter);
    crate::define_child_accessors!(bundles, add_bundle, bundles, Bundle);

    /// Options used by [`create`](Self::create) and [`validate`](Self::validate).
    pub fn set_validation(&mut self, opts: ValidateOpts) {
        self.validate_opts = Some(opts);
    }

    /// The options set with [`set_validation`](Self::set_validation), if any.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidateOpts> {
        self.validate_opts.as_ref()
    }

    fn bundles_everywhere(&self) -> impl Iterator<Item = &Bundle> + '_ {
        self.bundles
            .iter()
            .chain(self.cash_letters.iter().flat_map(|cl| cl.bundles.iter()))
    }

    /// Number of checks and returns in the file.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.bundles_everywhere().map(Bundle::item_count).sum()
    }

    /// Sum of item amounts in the file.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.bundles_everywhere()
            .fold(0u64, |sum, bundle| sum.saturating_add(bundle.total_amount()))
    }

    /// Physical records the writer emits for this file, header and control
    /// included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        2 + self.bundles.iter().map(Bundle::record_count).sum::<usize>()
            + self
                .cash_letters
                .iter()
                .map(CashLetter::record_count)
                .sum::<usize>()
    }

    /// Derive sequence numbers, lengths, counts, and every control record,
    /// then validate the result.
    ///
    /// Missing bundle and file controls are built; a missing cash letter
    /// control is an error because its name and settlement date cannot be
    /// derived.
    ///
    /// # Errors
    ///
    /// Returns the first rebuild failure or validation violation. The tree is
    /// left as far as the rebuild got.
    pub fn create(&mut self) -> Result<()> {
        for cash_letter in &mut self.cash_letters {
            cash_letter.create()?;
        }
        for (index, bundle) in self.bundles.iter_mut().enumerate() {
            bundle.bundle_header.bundle_sequence_number = format!("{:04}", index + 1);
            bundle.rebuild();
        }

        let mut control = self.control.take().unwrap_or_default();
        if control.immediate_origin_contact_name.is_empty()
            && control.immediate_origin_contact_phone_number.is_empty()
        {
            if let Some(first) = self.cash_letters.first() {
                let header = &first.cash_letter_header;
                control
                    .immediate_origin_contact_name
                    .clone_from(&header.originator_contact_name);
                control
                    .immediate_origin_contact_phone_number
                    .clone_from(&header.originator_contact_phone_number);
            }
        }
        control.cash_letter_count = count(self.cash_letters.len());
        control.total_record_count = count(self.record_count());
        control.total_item_count = count(self.item_count());
        control.file_total_amount = self.total_amount();
        control.credit_total_indicator = 0;
        debug!(
            "rebuilt file: {} cash letters, {} items, {} records",
            control.cash_letter_count, control.total_item_count, control.total_record_count
        );
        self.control = Some(control);

        self.validate()
    }

    /// Validate with the options set by [`set_validation`](Self::set_validation).
    ///
    /// # Errors
    ///
    /// Returns the deepest violation found first.
    pub fn validate(&self) -> Result<()> {
        let opts = self.validate_opts.unwrap_or_default();
        self.validate_with(&opts)
    }

    /// Validate with explicit options.
    ///
    /// # Errors
    ///
    /// Returns the deepest violation found first.
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        for cash_letter in &self.cash_letters {
            cash_letter.validate_with(opts)?;
        }
        for bundle in &self.bundles {
            bundle.validate_with(opts)?;
        }
        self.header.validate_with(opts)?;

        let Some(control) = &self.control else {
            return Err(IclError::file(
                "FileControl",
                &self.id,
                "FileControl record is mandatory",
            ));
        };
        control.validate_with(opts)?;
        if opts.allow_invalid_amounts {
            return Ok(());
        }
        check_total(
            "CashLetterCount",
            control.cash_letter_count.into(),
            self.cash_letters.len() as u64,
        )?;
        check_total(
            "TotalRecordCount",
            control.total_record_count.into(),
            self.record_count() as u64,
        )?;
        check_total(
            "TotalItemCount",
            control.total_item_count.into(),
            self.item_count() as u64,
        )?;
        check_total("FileTotalAmount", control.file_total_amount, self.total_amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CashLetterControl, CashLetterHeader};

    fn skeleton() -> File {
        let mut file = File::new(FileHeader::new());
        let mut cash_letter = CashLetter::new(CashLetterHeader {
            originator_contact_name: "Contact Name".to_string(),
            originator_contact_phone_number: "5558675552".to_string(),
            ..Default::default()
        });
        cash_letter.add_bundle(Bundle::default());
        cash_letter.set_control(CashLetterControl::default());
        file.add_cash_letter(cash_letter);
        file.set_validation(ValidateOpts::skip_all());
        file
    }

    #[test]
    fn test_create_builds_file_control() {
        let mut file = skeleton();
        file.create().unwrap();
        let control = file.control.as_ref().unwrap();
        assert_eq!(control.cash_letter_count, 1);
        // FH, CLH, BH, BC, CLC, FC
        assert_eq!(control.total_record_count, 6);
        assert_eq!(control.immediate_origin_contact_name, "Contact Name");
        assert!(file.cash_letters[0].bundles[0].bundle_control.is_some());
    }

    #[test]
    fn test_create_fails_without_cash_letter_control() {
        let mut file = skeleton();
        file.cash_letters[0].cash_letter_control = None;
        let err = file.create().unwrap_err();
        assert!(err.to_string().contains("CashLetterControl record is mandatory"));
    }

    #[test]
    fn test_validate_requires_file_control() {
        let file = skeleton();
        let opts = ValidateOpts::new();
        let err = file.validate_with(&opts).unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_root_bundles_are_counted() {
        let mut file = skeleton();
        file.add_bundle(Bundle::default());
        file.create().unwrap();
        assert_eq!(file.control.as_ref().unwrap().total_record_count, 8);
        assert_eq!(file.bundles[0].bundle_header.bundle_sequence_number, "0001");
    }

    #[test]
    fn test_validation_options_are_not_serialized() {
        let file = skeleton();
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("validateOpts").is_none());
        assert!(json.get("fileHeader").is_some());
    }
}
