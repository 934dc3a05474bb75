//! Return detail record (type `31`) and the item it heads.

use super::item::{renumber, validate_dense, Item};
use super::{
    IclRecord, ImageViewAnalysis, ImageViewData, ImageViewDetail, RecordType,
    ReturnDetailAddendumA, ReturnDetailAddendumB, ReturnDetailAddendumC, ReturnDetailAddendumD,
    UserRecord, RECORD_LENGTH,
};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{FieldRules, ARCHIVE_TYPE_INDICATORS, DOCUMENTATION_TYPE_INDICATORS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const NAME: &str = "ReturnDetail";

/// `1` preliminary notification, `2` final return.
pub const RETURN_NOTIFICATION_INDICATORS: &[&str] = &["1", "2"];

/// How many times the item has been returned.
pub const TIMES_RETURNED: &[&str] = &["0", "1", "2", "3"];

/// One returned item with its addenda and image views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReturnDetail {
    /// Caller-assigned identifier.
    pub id: String,
    /// First eight digits of the paying bank's routing number.
    pub payor_bank_routing_number: String,
    /// Ninth (check) digit of the paying bank's routing number.
    pub payor_bank_check_digit: String,
    /// On-us field of the MICR line.
    pub on_us: String,
    /// Amount in cents.
    pub item_amount: u64,
    /// Why the item is returned.
    pub return_reason: String,
    /// Number of addenda that follow, set by `create`.
    pub addendum_count: u32,
    /// Kind of document.
    pub documentation_type_indicator: String,
    /// Business date of the bundle the item was forwarded in.
    #[serde(with = "crate::json::date")]
    pub forward_bundle_date: Option<NaiveDate>,
    /// Sequence number assigned by the creating institution.
    pub ece_institution_item_sequence_number: String,
    /// External processing code of the MICR line.
    pub external_processing_code: String,
    /// Preliminary or final return.
    pub return_notification_indicator: String,
    /// Kind of archive held.
    pub archive_type_indicator: String,
    /// How many times the item has been returned.
    pub times_returned: String,

    /// BOFD endorsements.
    pub return_detail_addendum_a: SmallVec<[ReturnDetailAddendumA; 2]>,
    /// Paying bank details.
    pub return_detail_addendum_b: SmallVec<[ReturnDetailAddendumB; 1]>,
    /// Image archive references.
    pub return_detail_addendum_c: SmallVec<[ReturnDetailAddendumC; 1]>,
    /// Subsequent endorsements.
    pub return_detail_addendum_d: SmallVec<[ReturnDetailAddendumD; 2]>,
    /// Image view details, co-indexed with data and analysis.
    pub image_view_detail: Vec<ImageViewDetail>,
    /// Image view data.
    pub image_view_data: Vec<ImageViewData>,
    /// Image view analysis.
    pub image_view_analysis: Vec<ImageViewAnalysis>,
    /// User records.
    pub user_records: Vec<UserRecord>,
}

impl ReturnDetail {
    crate::define_child_accessors!(
        return_detail_addendum_a,
        add_return_detail_addendum_a,
        addendum_a,
        ReturnDetailAddendumA
    );
    crate::define_child_accessors!(
        return_detail_addendum_b,
        add_return_detail_addendum_b,
        addendum_b,
        ReturnDetailAddendumB
    );
    crate::define_child_accessors!(
        return_detail_addendum_c,
        add_return_detail_addendum_c,
        addendum_c,
        ReturnDetailAddendumC
    );
    crate::define_child_accessors!(
        return_detail_addendum_d,
        add_return_detail_addendum_d,
        addendum_d,
        ReturnDetailAddendumD
    );

    /// Attach one image view triple.
    pub fn add_image_view(
        &mut self,
        detail: ImageViewDetail,
        data: ImageViewData,
        analysis: ImageViewAnalysis,
    ) {
        self.image_view_detail.push(detail);
        self.image_view_data.push(data);
        self.image_view_analysis.push(analysis);
    }
}

impl IclRecord for ReturnDetail {
    fn record_type(&self) -> RecordType {
        RecordType::ReturnDetail
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        let detail = ReturnDetail {
            payor_bank_routing_number: r.numeric_string("PayorBankRoutingNumber", 8)?,
            payor_bank_check_digit: r.numeric_string("PayorBankCheckDigit", 1)?,
            on_us: r.numeric_blank("OnUs", 20)?,
            item_amount: r.numeric("ItemAmount", 10)?,
            return_reason: r.alpha("ReturnReason", 1)?,
            addendum_count: r.numeric("AddendumCount", 2)?,
            documentation_type_indicator: r.alpha("DocumentationTypeIndicator", 1)?,
            forward_bundle_date: r.date("ForwardBundleDate")?,
            ece_institution_item_sequence_number: r
                .numeric_string("EceInstitutionItemSequenceNumber", 15)?,
            external_processing_code: r.alpha("ExternalProcessingCode", 1)?,
            return_notification_indicator: r.alpha("ReturnNotificationIndicator", 1)?,
            archive_type_indicator: r.alpha("ArchiveTypeIndicator", 1)?,
            times_returned: r.alpha("TimesReturned", 1)?,
            ..Default::default()
        };
        r.skip(8)?;
        Ok(detail)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w =
            FieldWriter::new(NAME, RecordType::ReturnDetail.code(), RECORD_LENGTH, encoding);
        w.numeric_string("PayorBankRoutingNumber", &self.payor_bank_routing_number, 8)?;
        w.numeric_string("PayorBankCheckDigit", &self.payor_bank_check_digit, 1)?;
        w.numeric_blank(&self.on_us, 20);
        w.numeric("ItemAmount", self.item_amount, 10)?;
        w.alpha(&self.return_reason, 1);
        w.numeric("AddendumCount", self.addendum_count.into(), 2)?;
        w.alpha(&self.documentation_type_indicator, 1);
        w.date(self.forward_bundle_date);
        w.numeric_string(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
            15,
        )?;
        w.alpha(&self.external_processing_code, 1);
        w.alpha(&self.return_notification_indicator, 1);
        w.alpha(&self.archive_type_indicator, 1);
        w.alpha(&self.times_returned, 1);
        w.reserved(8);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.routing_prefix(
            "PayorBankRoutingNumber",
            &self.payor_bank_routing_number,
            "PayorBankCheckDigit",
            &self.payor_bank_check_digit,
        )?;
        rules.numeric_blank_special("OnUs", &self.on_us)?;
        rules.mandatory("ReturnReason", &self.return_reason)?;
        rules.alphanumeric("ReturnReason", &self.return_reason)?;
        rules.optional_one_of(
            "DocumentationTypeIndicator",
            &self.documentation_type_indicator,
            DOCUMENTATION_TYPE_INDICATORS,
        )?;
        rules.mandatory(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.numeric(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.alphanumeric_special("ExternalProcessingCode", &self.external_processing_code)?;
        rules.optional_one_of(
            "ReturnNotificationIndicator",
            &self.return_notification_indicator,
            RETURN_NOTIFICATION_INDICATORS,
        )?;
        rules.optional_one_of(
            "ArchiveTypeIndicator",
            &self.archive_type_indicator,
            ARCHIVE_TYPE_INDICATORS,
        )?;
        rules.optional_one_of("TimesReturned", &self.times_returned, TIMES_RETURNED)?;
        Ok(())
    }
}

impl Item for ReturnDetail {
    fn as_record(&self) -> &dyn IclRecord {
        self
    }

    fn item_amount(&self) -> u64 {
        self.item_amount
    }

    // Every returned amount counts toward the MICR-valid total.
    fn is_micr_valid(&self) -> bool {
        true
    }

    fn ece_institution_item_sequence_number(&self) -> &str {
        &self.ece_institution_item_sequence_number
    }

    fn set_ece_institution_item_sequence_number(&mut self, value: String) {
        self.ece_institution_item_sequence_number = value;
    }

    fn addendum_count(&self) -> u32 {
        self.addendum_count
    }

    fn addendum_total(&self) -> usize {
        self.return_detail_addendum_a.len()
            + self.return_detail_addendum_b.len()
            + self.return_detail_addendum_c.len()
            + self.return_detail_addendum_d.len()
    }

    fn for_each_addendum(
        &self,
        visit: &mut dyn FnMut(&dyn IclRecord) -> Result<()>,
    ) -> Result<()> {
        for addendum in &self.return_detail_addendum_a {
            visit(addendum)?;
        }
        for addendum in &self.return_detail_addendum_b {
            visit(addendum)?;
        }
        for addendum in &self.return_detail_addendum_c {
            visit(addendum)?;
        }
        for addendum in &self.return_detail_addendum_d {
            visit(addendum)?;
        }
        Ok(())
    }

    fn image_view_detail(&self) -> &[ImageViewDetail] {
        &self.image_view_detail
    }

    fn image_view_data(&self) -> &[ImageViewData] {
        &self.image_view_data
    }

    fn image_view_analysis(&self) -> &[ImageViewAnalysis] {
        &self.image_view_analysis
    }

    fn image_view_detail_mut(&mut self) -> &mut Vec<ImageViewDetail> {
        &mut self.image_view_detail
    }

    fn image_view_data_mut(&mut self) -> &mut Vec<ImageViewData> {
        &mut self.image_view_data
    }

    fn image_view_analysis_mut(&mut self) -> &mut Vec<ImageViewAnalysis> {
        &mut self.image_view_analysis
    }

    fn user_records(&self) -> &[UserRecord] {
        &self.user_records
    }

    fn user_records_mut(&mut self) -> &mut Vec<UserRecord> {
        &mut self.user_records
    }

    fn rebuild(&mut self) {
        renumber(self.return_detail_addendum_a.iter_mut(), |a, n| {
            a.record_number = n;
        });
        renumber(self.return_detail_addendum_d.iter_mut(), |d, n| {
            d.record_number = n;
        });
        for addendum in &mut self.return_detail_addendum_c {
            addendum.sync_lengths();
        }
        for data in &mut self.image_view_data {
            data.sync_lengths();
        }
        for user in &mut self.user_records {
            user.sync_lengths();
        }
        self.addendum_count = u32::try_from(self.addendum_total()).unwrap_or(u32::MAX);
    }

    fn validate_record_numbers(&self) -> Result<()> {
        validate_dense(
            "ReturnDetailAddendumA",
            self.return_detail_addendum_a.iter().map(|a| a.record_number),
        )?;
        validate_dense(
            "ReturnDetailAddendumD",
            self.return_detail_addendum_d.iter().map(|d| d.record_number),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] =
        b"31031300012             55588810000100000A04G20181024000000000000001 1B0        ";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), RECORD_LENGTH);
        let item = ReturnDetail::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(item.payor_bank_routing_number, "03130001");
        assert_eq!(item.payor_bank_check_digit, "2");
        assert_eq!(item.on_us, "5558881");
        assert_eq!(item.item_amount, 100_000);
        assert_eq!(item.return_reason, "A");
        assert_eq!(item.addendum_count, 4);
        assert_eq!(item.forward_bundle_date, NaiveDate::from_ymd_opt(2018, 10, 24));
        assert_eq!(item.return_notification_indicator, "1");
        assert_eq!(item.times_returned, "0");
        assert!(item.validate().is_ok());
        assert_eq!(item.to_bytes(Encoding::Ascii).unwrap(), SAMPLE.to_vec());
    }

    #[test]
    fn test_return_reason_is_mandatory() {
        let mut item = ReturnDetail::parse(SAMPLE, Encoding::Ascii).unwrap();
        item.return_reason.clear();
        let err = item.validate().unwrap_err();
        assert!(err.to_string().contains("ReturnReason"));
    }

    #[test]
    fn test_every_return_amount_is_micr_valid() {
        let item = ReturnDetail::parse(SAMPLE, Encoding::Ascii).unwrap();
        assert!(item.is_micr_valid());
    }

    #[test]
    fn test_rebuild_counts_all_four_lists() {
        let mut item = ReturnDetail::parse(SAMPLE, Encoding::Ascii).unwrap();
        item.add_return_detail_addendum_a(ReturnDetailAddendumA::default());
        item.add_return_detail_addendum_b(ReturnDetailAddendumB::default());
        item.add_return_detail_addendum_c(ReturnDetailAddendumC::default());
        item.add_return_detail_addendum_d(ReturnDetailAddendumD::default());
        item.add_return_detail_addendum_d(ReturnDetailAddendumD::default());
        item.rebuild();
        assert_eq!(item.addendum_count, 5);
        assert_eq!(item.addendum_d()[1].record_number, 2);
        assert!(item.validate_record_numbers().is_ok());

        let mut seen = Vec::new();
        item.for_each_addendum(&mut |addendum| {
            seen.push(addendum.record_type().code());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["32", "33", "34", "35", "35"]);
    }
}
