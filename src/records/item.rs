//! Behaviour shared by check and return items.
//!
//! A bundle holds either [`CheckDetail`](super::CheckDetail) or
//! [`ReturnDetail`](super::ReturnDetail) items. Both own addenda, image views,
//! and user records; [`Item`] lets the tree engine, reader, and writer treat
//! them alike.

use super::image_view::validate_image_views;
use super::{IclRecord, ImageViewAnalysis, ImageViewData, ImageViewDetail, UserRecord};
use crate::config::ValidateOpts;
use crate::error::{IclError, Result};

/// A check or return item together with its children.
pub trait Item: IclRecord {
    /// The item's own record, without its children.
    fn as_record(&self) -> &dyn IclRecord;

    /// Amount of the item in cents.
    fn item_amount(&self) -> u64;

    /// Whether the amount counts toward a bundle's MICR-valid total.
    fn is_micr_valid(&self) -> bool;

    /// Sequence number assigned by the institution that created the item.
    fn ece_institution_item_sequence_number(&self) -> &str;

    /// Replace the item sequence number.
    fn set_ece_institution_item_sequence_number(&mut self, value: String);

    /// Number of addenda the record declares.
    fn addendum_count(&self) -> u32;

    /// Number of addenda actually attached.
    fn addendum_total(&self) -> usize;

    /// Visit every addendum in write order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from `visit`.
    fn for_each_addendum(&self, visit: &mut dyn FnMut(&dyn IclRecord) -> Result<()>)
        -> Result<()>;

    /// Image view detail records, co-indexed with data and analysis.
    fn image_view_detail(&self) -> &[ImageViewDetail];

    /// Image view data records.
    fn image_view_data(&self) -> &[ImageViewData];

    /// Image view analysis records.
    fn image_view_analysis(&self) -> &[ImageViewAnalysis];

    /// Mutable image view detail records.
    fn image_view_detail_mut(&mut self) -> &mut Vec<ImageViewDetail>;

    /// Mutable image view data records.
    fn image_view_data_mut(&mut self) -> &mut Vec<ImageViewData>;

    /// Mutable image view analysis records.
    fn image_view_analysis_mut(&mut self) -> &mut Vec<ImageViewAnalysis>;

    /// User records attached to the item.
    fn user_records(&self) -> &[UserRecord];

    /// Mutable user records.
    fn user_records_mut(&mut self) -> &mut Vec<UserRecord>;

    /// Renumber addenda, sync variable lengths, and set the addendum count.
    fn rebuild(&mut self);

    /// Check the record numbers of each numbered addendum list.
    ///
    /// # Errors
    ///
    /// Returns an error for the first list that is not numbered `1..n`.
    fn validate_record_numbers(&self) -> Result<()>;

    /// Physical records the item occupies, itself included.
    fn record_count(&self) -> usize {
        1 + self.addendum_total()
            + self.image_view_detail().len()
            + self.image_view_data().len()
            + self.image_view_analysis().len()
            + self.user_records().len()
    }

    /// Validate the item and everything it owns, deepest records first.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    fn validate_item(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        self.for_each_addendum(&mut |addendum| addendum.validate_with(opts))?;
        validate_image_views(
            self.image_view_detail(),
            self.image_view_data(),
            self.image_view_analysis(),
            opts,
        )?;
        for user in self.user_records() {
            user.validate_with(opts)?;
        }
        self.validate_with(opts)?;

        let name = self.record_type().name();
        if self.addendum_count() as usize != self.addendum_total() {
            return Err(IclError::file(
                format!("{name} AddendumCount"),
                self.addendum_count(),
                format!("does not match the {} attached addenda", self.addendum_total()),
            ));
        }
        self.validate_record_numbers()
    }
}

/// Check that `numbers` run `1..=n` in order.
pub(crate) fn validate_dense(record: &str, numbers: impl Iterator<Item = u8>) -> Result<()> {
    for (expected, actual) in (1u32..).zip(numbers) {
        if u32::from(actual) != expected {
            return Err(IclError::file(
                format!("{record} RecordNumber"),
                actual,
                format!("addenda must be numbered consecutively from 1, expected {expected}"),
            ));
        }
    }
    Ok(())
}

/// Number each addendum `1..=n` in order.
pub(crate) fn renumber<'a, T: 'a>(
    addenda: impl Iterator<Item = &'a mut T>,
    set: impl Fn(&mut T, u8),
) {
    for (index, addendum) in addenda.enumerate() {
        set(addendum, u8::try_from(index + 1).unwrap_or(u8::MAX));
    }
}
