//! Bundles: a header, the checks or returns it groups, and its control.

use crate::config::ValidateOpts;
use crate::error::{IclError, Result};
use crate::records::{
    BundleControl, BundleHeader, CheckDetail, IclRecord, Item, ReturnDetail,
};
use serde::{Deserialize, Serialize};

/// Convert a count to the width used by control records, saturating.
pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// A group of items within a cash letter.
///
/// A bundle holds checks or returns, never both. The control record is
/// derived by [`create`](Self::create); a bundle assembled by hand or read
/// from JSON may leave it out until then.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bundle {
    /// Caller-assigned identifier.
    pub id: String,
    /// Opening record.
    pub bundle_header: BundleHeader,
    /// Forward-presentment items.
    pub checks: Vec<CheckDetail>,
    /// Returned items.
    pub returns: Vec<ReturnDetail>,
    /// Closing record with the bundle totals.
    pub bundle_control: Option<BundleControl>,
}

impl Bundle {
    /// Start an empty bundle.
    #[must_use]
    pub fn new(header: BundleHeader) -> Self {
        Bundle {
            bundle_header: header,
            ..Default::default()
        }
    }

    crate::define_child_accessors!(checks, add_check_detail, checks, CheckDetail);
    crate::define_child_accessors!(returns, add_return_detail, returns, ReturnDetail);

    /// Install a control record.
    pub fn set_control(&mut self, control: BundleControl) {
        self.bundle_control = Some(control);
    }

    /// Every item in write order: checks, then returns.
    pub fn items(&self) -> impl Iterator<Item = &dyn Item> + '_ {
        self.checks
            .iter()
            .map(|check| check as &dyn Item)
            .chain(self.returns.iter().map(|ret| ret as &dyn Item))
    }

    /// Every item in write order, mutably.
    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn Item> + '_ {
        self.checks
            .iter_mut()
            .map(|check| check as &mut dyn Item)
            .chain(self.returns.iter_mut().map(|ret| ret as &mut dyn Item))
    }

    /// Number of checks and returns.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.checks.len() + self.returns.len()
    }

    /// Sum of item amounts.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.items()
            .fold(0u64, |sum, item| sum.saturating_add(item.item_amount()))
    }

    /// Sum of the amounts that count as MICR-valid.
    #[must_use]
    pub fn micr_valid_amount(&self) -> u64 {
        self.items()
            .filter(|item| item.is_micr_valid())
            .fold(0u64, |sum, item| sum.saturating_add(item.item_amount()))
    }

    /// Number of image view detail records.
    #[must_use]
    pub fn images_count(&self) -> usize {
        self.items().map(|item| item.image_view_detail().len()).sum()
    }

    /// Physical records the writer emits for this bundle, header and
    /// control included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        2 + self.items().map(Item::record_count).sum::<usize>()
    }

    /// The control record the current children imply. The user field of an
    /// existing control is kept.
    #[must_use]
    pub fn derived_control(&self) -> BundleControl {
        BundleControl {
            bundle_items_count: count(self.item_count()),
            bundle_total_amount: self.total_amount(),
            micr_valid_total_amount: self.micr_valid_amount(),
            bundle_images_count: count(self.images_count()),
            user_field: self
                .bundle_control
                .as_ref()
                .map(|control| control.user_field.clone())
                .unwrap_or_default(),
            credit_total_indicator: 0,
        }
    }

    /// Rebuild derived fields: addenda numbering and counts, variable
    /// lengths, image business dates, and the control record.
    ///
    /// Sequence numbers are assigned by the enclosing cash letter.
    pub fn rebuild(&mut self) {
        let business_date = self.bundle_header.bundle_business_date;
        for item in self.items_mut() {
            item.rebuild();
            for data in item.image_view_data_mut() {
                if data.bundle_business_date.is_none() {
                    data.bundle_business_date = business_date;
                }
            }
        }
        self.bundle_control = Some(self.derived_control());
    }

    /// Validate every item, the header, and the control totals.
    ///
    /// # Errors
    ///
    /// Returns the deepest violation found first.
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        for item in self.items() {
            item.validate_item(opts)?;
        }
        self.bundle_header.validate_with(opts)?;

        if !self.checks.is_empty() && !self.returns.is_empty() {
            return Err(IclError::file(
                "Bundle",
                &self.bundle_header.bundle_id,
                "a bundle may hold checks or returns, not both",
            ));
        }
        self.validate_item_sequence()?;

        let Some(control) = &self.bundle_control else {
            return Err(IclError::file(
                "BundleControl",
                &self.bundle_header.bundle_id,
                "BundleControl record is mandatory",
            ));
        };
        control.validate_with(opts)?;
        if opts.allow_invalid_amounts {
            return Ok(());
        }

        let expected = self.derived_control();
        check_total(
            "BundleItemsCount",
            control.bundle_items_count.into(),
            expected.bundle_items_count.into(),
        )?;
        check_total(
            "BundleTotalAmount",
            control.bundle_total_amount,
            expected.bundle_total_amount,
        )?;
        check_total(
            "MICRValidTotalAmount",
            control.micr_valid_total_amount,
            expected.micr_valid_total_amount,
        )?;
        check_total(
            "BundleImagesCount",
            control.bundle_images_count.into(),
            expected.bundle_images_count.into(),
        )
    }

    // Item sequence numbers strictly increase in write order.
    fn validate_item_sequence(&self) -> Result<()> {
        let mut previous: Option<u64> = None;
        for item in self.items() {
            let raw = item.ece_institution_item_sequence_number();
            let Ok(current) = raw.trim().parse::<u64>() else {
                return Err(IclError::file(
                    "EceInstitutionItemSequenceNumber",
                    raw,
                    "EceInstitutionItemSequenceNumber is not numeric",
                ));
            };
            if let Some(previous) = previous {
                if current <= previous {
                    return Err(IclError::file(
                        "EceInstitutionItemSequenceNumber",
                        raw,
                        format!("item sequence numbers must be ascending, previous was {previous}"),
                    ));
                }
            }
            previous = Some(current);
        }
        Ok(())
    }
}

/// Compare a control total with the value its children imply.
pub(crate) fn check_total(field: &str, stored: u64, expected: u64) -> Result<()> {
    if stored != expected {
        return Err(IclError::file(
            field,
            stored,
            format!("{field} does not match the calculated value {expected}"),
        ));
    }
    Ok(())
}
