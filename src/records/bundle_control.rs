//! Bundle control record (type `70`).

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::FieldRules;
use serde::{Deserialize, Serialize};

const NAME: &str = "BundleControl";

/// `0` no credits in the totals, `1` credits included.
pub const CREDIT_TOTAL_INDICATORS: &[u8] = &[0, 1];

/// Closes a bundle with totals over its items.
///
/// `create` derives every total from the bundle's children; only
/// [`user_field`](Self::user_field) survives a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundleControl {
    /// Number of checks or returns in the bundle.
    pub bundle_items_count: u32,
    /// Sum of item amounts in cents.
    pub bundle_total_amount: u64,
    /// Sum of the amounts whose MICR line was read without error.
    pub micr_valid_total_amount: u64,
    /// Number of image view detail records in the bundle.
    pub bundle_images_count: u32,
    /// Free-form.
    pub user_field: String,
    /// Whether credits are included in the totals.
    pub credit_total_indicator: u8,
}

impl IclRecord for BundleControl {
    fn record_type(&self) -> RecordType {
        RecordType::BundleControl
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let control = BundleControl {
            bundle_items_count: r.numeric("BundleItemsCount", 4)?,
            bundle_total_amount: r.numeric("BundleTotalAmount", 12)?,
            micr_valid_total_amount: r.numeric("MICRValidTotalAmount", 12)?,
            bundle_images_count: r.numeric("BundleImagesCount", 5)?,
            user_field: r.alpha("UserField", 20)?,
            credit_total_indicator: r.numeric("CreditTotalIndicator", 1)?,
        };
        r.skip(24)?;
        Ok(control)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w =
            FieldWriter::new(NAME, RecordType::BundleControl.code(), RECORD_LENGTH, encoding);
        w.numeric("BundleItemsCount", self.bundle_items_count.into(), 4)?;
        w.numeric("BundleTotalAmount", self.bundle_total_amount, 12)?;
        w.numeric("MICRValidTotalAmount", self.micr_valid_total_amount, 12)?;
        w.numeric("BundleImagesCount", self.bundle_images_count.into(), 5)?;
        w.alpha(&self.user_field, 20);
        w.numeric("CreditTotalIndicator", self.credit_total_indicator.into(), 1)?;
        w.reserved(24);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.alphanumeric_special("UserField", &self.user_field)?;
        rules.digit_in(
            "CreditTotalIndicator",
            self.credit_total_indicator,
            CREDIT_TOTAL_INDICATORS,
        )?;
        if !opts.allow_invalid_amounts && self.micr_valid_total_amount > self.bundle_total_amount {
            return Err(rules.error(
                "MICRValidTotalAmount",
                self.micr_valid_total_amount,
                "exceeds BundleTotalAmount",
            ));
        }
        Ok(())
    }
}
