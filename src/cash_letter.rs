//! Cash letters: the bundles exchanged between two institutions, with the
//! summaries, credits, and control that accompany them.

use crate::bundle::{check_total, count, Bundle};
use crate::config::ValidateOpts;
use crate::error::{IclError, Result};
use crate::records::{
    CashLetterControl, CashLetterHeader, Credit, CreditItem, IclRecord, RoutingNumberSummary,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// One cash letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CashLetter {
    /// Caller-assigned identifier.
    pub id: String,
    /// Opening record.
    pub cash_letter_header: CashLetterHeader,
    /// Bundles in write order.
    pub bundles: Vec<Bundle>,
    /// Per-routing-number totals, written after the last bundle.
    pub routing_number_summary: Vec<RoutingNumberSummary>,
    /// Credit items (`61`).
    pub credit_items: Vec<CreditItem>,
    /// Credits (`62`).
    pub credits: Vec<Credit>,
    /// Closing record. Required by [`create`](Self::create).
    pub cash_letter_control: Option<CashLetterControl>,
}

impl CashLetter {
    /// Start an empty cash letter.
    #[must_use]
    pub fn new(header: CashLetterHeader) -> Self {
        CashLetter {
            cash_letter_header: header,
            ..Default::default()
        }
    }

    crate::define_child_accessors!(bundles, add_bundle, bundles, Bundle);
    crate::define_child_accessors!(
        routing_number_summary,
        add_routing_number_summary,
        routing_number_summaries,
        RoutingNumberSummary
    );
    crate::define_child_accessors!(credit_items, add_credit_item, credit_items, CreditItem);
    crate::define_child_accessors!(credits, add_credit, credits, Credit);

    /// Install a control record.
    pub fn set_control(&mut self, control: CashLetterControl) {
        self.cash_letter_control = Some(control);
    }

    /// Number of checks and returns across all bundles.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.bundles.iter().map(Bundle::item_count).sum()
    }

    /// Sum of item amounts across all bundles. Credits are not included.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.bundles
            .iter()
            .fold(0u64, |sum, bundle| sum.saturating_add(bundle.total_amount()))
    }

    /// Number of image view detail records across all bundles.
    #[must_use]
    pub fn images_count(&self) -> usize {
        self.bundles.iter().map(Bundle::images_count).sum()
    }

    /// Physical records the writer emits for this cash letter, header and
    /// control included.
    #[must_use]
    pub fn record_count(&self) -> usize {
        2 + self.bundles.iter().map(Bundle::record_count).sum::<usize>()
            + self.routing_number_summary.len()
            + self.credit_items.len()
            + self.credits.len()
    }

    /// Rebuild derived fields from the children.
    ///
    /// Bundles are numbered `1..n`, blank item sequence numbers are filled
    /// with the item's position in the cash letter, every bundle is rebuilt,
    /// and the control counts and total are recomputed. The control's
    /// institution name and settlement date are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the cash letter has no control record.
    pub fn create(&mut self) -> Result<()> {
        let Some(mut control) = self.cash_letter_control.take() else {
            return Err(IclError::file(
                "CashLetterControl",
                &self.cash_letter_header.cash_letter_id,
                "CashLetterControl record is mandatory",
            ));
        };

        let mut position = 0usize;
        for (index, bundle) in self.bundles.iter_mut().enumerate() {
            bundle.bundle_header.bundle_sequence_number = format!("{:04}", index + 1);
            for item in bundle.items_mut() {
                position += 1;
                if item.ece_institution_item_sequence_number().trim().is_empty() {
                    item.set_ece_institution_item_sequence_number(format!("{position:015}"));
                }
            }
            bundle.rebuild();
        }

        control.cash_letter_bundle_count = count(self.bundles.len());
        control.cash_letter_items_count = count(self.item_count());
        control.cash_letter_total_amount = self.total_amount();
        control.cash_letter_images_count = count(self.images_count());
        control.credit_total_indicator = 0;
        self.cash_letter_control = Some(control);

        debug!(
            "rebuilt cash letter {:?}: {} bundles, {} items",
            self.cash_letter_header.cash_letter_id,
            self.bundles.len(),
            position
        );
        Ok(())
    }

    /// Validate every bundle and record, bundle sequencing, and the control
    /// totals.
    ///
    /// # Errors
    ///
    /// Returns the deepest violation found first.
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        for bundle in &self.bundles {
            bundle.validate_with(opts)?;
        }
        for summary in &self.routing_number_summary {
            summary.validate_with(opts)?;
        }
        for item in &self.credit_items {
            item.validate_with(opts)?;
        }
        for credit in &self.credits {
            credit.validate_with(opts)?;
        }
        self.cash_letter_header.validate_with(opts)?;
        self.validate_bundle_sequence(opts)?;

        let Some(control) = &self.cash_letter_control else {
            return Err(IclError::file(
                "CashLetterControl",
                &self.cash_letter_header.cash_letter_id,
                "CashLetterControl record is mandatory",
            ));
        };
        control.validate_with(opts)?;
        if opts.allow_invalid_amounts {
            return Ok(());
        }
        check_total(
            "CashLetterBundleCount",
            control.cash_letter_bundle_count.into(),
            self.bundles.len() as u64,
        )?;
        check_total(
            "CashLetterItemsCount",
            control.cash_letter_items_count.into(),
            self.item_count() as u64,
        )?;
        check_total(
            "CashLetterTotalAmount",
            control.cash_letter_total_amount,
            self.total_amount(),
        )?;
        check_total(
            "CashLetterImagesCount",
            control.cash_letter_images_count.into(),
            self.images_count() as u64,
        )
    }

    // Strictly increasing, or non-decreasing when duplicates are allowed.
    fn validate_bundle_sequence(&self, opts: &ValidateOpts) -> Result<()> {
        let mut previous: Option<u32> = None;
        for bundle in &self.bundles {
            let raw = &bundle.bundle_header.bundle_sequence_number;
            let Some(current) = bundle.bundle_header.sequence_number() else {
                return Err(IclError::file(
                    "BundleSequenceNumber",
                    raw,
                    "BundleSequenceNumber is not numeric",
                ));
            };
            if let Some(previous) = previous {
                let in_order = if opts.allow_duplicate_bundle_sequence_number {
                    current >= previous
                } else {
                    current > previous
                };
                if !in_order {
                    return Err(IclError::file(
                        "BundleSequenceNumber",
                        raw,
                        format!("BundleSequenceNumber must be ascending, previous was {previous}"),
                    ));
                }
            }
            previous = Some(current);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BundleHeader, CheckDetail};
    use chrono::NaiveDate;

    fn header() -> CashLetterHeader {
        CashLetterHeader {
            collection_type_indicator: "01".to_string(),
            destination_routing_number: "231380104".to_string(),
            ece_institution_routing_number: "061000146".to_string(),
            cash_letter_business_date: NaiveDate::from_ymd_opt(2018, 10, 24),
            cash_letter_creation_date: NaiveDate::from_ymd_opt(2018, 10, 24),
            cash_letter_creation_time: chrono::NaiveTime::from_hms_opt(15, 30, 0),
            record_type_indicator: "I".to_string(),
            documentation_type_indicator: "G".to_string(),
            cash_letter_id: "A1".to_string(),
            ..Default::default()
        }
    }

    fn bundle(amounts: &[u64]) -> Bundle {
        let mut bundle = Bundle::new(BundleHeader {
            collection_type_indicator: "01".to_string(),
            destination_routing_number: "231380104".to_string(),
            ece_institution_routing_number: "061000146".to_string(),
            bundle_business_date: NaiveDate::from_ymd_opt(2018, 10, 24),
            bundle_creation_date: NaiveDate::from_ymd_opt(2018, 10, 24),
            bundle_id: "9999".to_string(),
            ..Default::default()
        });
        for &amount in amounts {
            bundle.add_check_detail(CheckDetail {
                payor_bank_routing_number: "03130001".to_string(),
                payor_bank_check_digit: "2".to_string(),
                item_amount: amount,
                micr_valid_indicator: 1,
                bofd_indicator: "Y".to_string(),
                ..Default::default()
            });
        }
        bundle
    }

    fn cash_letter() -> CashLetter {
        let mut cash_letter = CashLetter::new(header());
        cash_letter.add_bundle(bundle(&[100, 200]));
        cash_letter.add_bundle(bundle(&[300]));
        cash_letter.set_control(CashLetterControl {
            ece_institution_name: "Citadel".to_string(),
            settlement_date: NaiveDate::from_ymd_opt(2018, 10, 25),
            ..Default::default()
        });
        cash_letter
    }

    #[test]
    fn test_create_numbers_and_totals() {
        let mut cash_letter = cash_letter();
        cash_letter.create().unwrap();

        let bundles = cash_letter.bundles();
        assert_eq!(bundles[0].bundle_header.bundle_sequence_number, "0001");
        assert_eq!(bundles[1].bundle_header.bundle_sequence_number, "0002");
        assert_eq!(
            bundles[1].checks()[0].ece_institution_item_sequence_number,
            "000000000000003"
        );

        let control = cash_letter.cash_letter_control.as_ref().unwrap();
        assert_eq!(control.cash_letter_bundle_count, 2);
        assert_eq!(control.cash_letter_items_count, 3);
        assert_eq!(control.cash_letter_total_amount, 600);
        assert_eq!(control.ece_institution_name, "Citadel");
        assert_eq!(control.settlement_date, NaiveDate::from_ymd_opt(2018, 10, 25));
        assert!(cash_letter.validate_with(&ValidateOpts::default()).is_ok());
    }

    #[test]
    fn test_create_requires_control() {
        let mut cash_letter = cash_letter();
        cash_letter.cash_letter_control = None;
        let err = cash_letter.create().unwrap_err();
        assert!(err.to_string().contains("CashLetterControl record is mandatory"));
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut once = cash_letter();
        once.create().unwrap();
        let mut twice = once.clone();
        twice.create().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_bundle_sequence_must_ascend() {
        let mut cash_letter = cash_letter();
        cash_letter.create().unwrap();
        cash_letter.bundles[1].bundle_header.bundle_sequence_number = "0001".to_string();
        let err = cash_letter
            .validate_with(&ValidateOpts::default())
            .unwrap_err();
        assert!(err.to_string().contains("ascending"));

        let opts = ValidateOpts::new().with_allow_duplicate_bundle_sequence_number(true);
        assert!(cash_letter.validate_with(&opts).is_ok());
    }

    #[test]
    fn test_record_count_includes_credits() {
        let mut cash_letter = cash_letter();
        cash_letter.add_credit_item(CreditItem::default());
        cash_letter.add_credit(Credit::default());
        // CLH + (BH + 2 + BC) + (BH + 1 + BC) + 2 credits + CLC
        assert_eq!(cash_letter.record_count(), 11);
    }
}
