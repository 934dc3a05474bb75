//! Check detail record (type `25`) and the item it heads.

use super::item::{renumber, validate_dense, Item};
use super::{
    CheckDetailAddendumA, CheckDetailAddendumB, CheckDetailAddendumC, IclRecord,
    ImageViewAnalysis, ImageViewData, ImageViewDetail, RecordType, UserRecord, RECORD_LENGTH,
};
use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::Result;
use crate::field::{FieldReader, FieldWriter};
use crate::validation::{
    FieldRules, ARCHIVE_TYPE_INDICATORS, CORRECTION_INDICATORS, DOCUMENTATION_TYPE_INDICATORS,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const NAME: &str = "CheckDetail";

/// `Y` BOFD, `N` not BOFD, `U` unknown.
pub const BOFD_INDICATORS: &[&str] = &["Y", "N", "U"];

/// MICR line validity: `1` good, `2`-`4` various defects, `0` not checked.
pub const MICR_VALID_INDICATORS: &[u8] = &[0, 1, 2, 3, 4];

/// One forward-presentment check with its addenda and image views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckDetail {
    /// Caller-assigned identifier.
    pub id: String,
    /// Auxiliary on-us field of the MICR line.
    pub auxiliary_on_us: String,
    /// External processing code (position 44) of the MICR line.
    pub external_processing_code: String,
    /// First eight digits of the paying bank's routing number.
    pub payor_bank_routing_number: String,
    /// Ninth (check) digit of the paying bank's routing number.
    pub payor_bank_check_digit: String,
    /// On-us field of the MICR line.
    pub on_us: String,
    /// Amount in cents.
    pub item_amount: u64,
    /// Sequence number assigned by the creating institution.
    pub ece_institution_item_sequence_number: String,
    /// Kind of document.
    pub documentation_type_indicator: String,
    /// Whether the item may be returned electronically.
    pub return_acceptance_indicator: String,
    /// MICR line validity.
    #[serde(rename = "micrValidIndicator")]
    pub micr_valid_indicator: u8,
    /// Whether the sender is the bank of first deposit.
    #[serde(rename = "bofdIndicator")]
    pub bofd_indicator: String,
    /// Number of addenda that follow, set by `create`.
    pub addendum_count: u32,
    /// Whether the MICR line was repaired.
    pub correction_indicator: u8,
    /// Kind of archive held.
    pub archive_type_indicator: String,

    /// BOFD endorsements.
    pub check_detail_addendum_a: SmallVec<[CheckDetailAddendumA; 2]>,
    /// Image archive references.
    pub check_detail_addendum_b: SmallVec<[CheckDetailAddendumB; 1]>,
    /// Subsequent endorsements.
    pub check_detail_addendum_c: SmallVec<[CheckDetailAddendumC; 2]>,
    /// Image view details, co-indexed with data and analysis.
    pub image_view_detail: Vec<ImageViewDetail>,
    /// Image view data.
    pub image_view_data: Vec<ImageViewData>,
    /// Image view analysis.
    pub image_view_analysis: Vec<ImageViewAnalysis>,
    /// User records.
    pub user_records: Vec<UserRecord>,
}

impl CheckDetail {
    crate::define_child_accessors!(
        check_detail_addendum_a,
        add_check_detail_addendum_a,
        addendum_a,
        CheckDetailAddendumA
    );
    crate::define_child_accessors!(
        check_detail_addendum_b,
        add_check_detail_addendum_b,
        addendum_b,
        CheckDetailAddendumB
    );
    crate::define_child_accessors!(
        check_detail_addendum_c,
        add_check_detail_addendum_c,
        addendum_c,
        CheckDetailAddendumC
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

impl IclRecord for CheckDetail {
    fn record_type(&self) -> RecordType {
        RecordType::CheckDetail
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(NAME, bytes, RECORD_LENGTH, encoding)?;
        Ok(CheckDetail {
            auxiliary_on_us: r.numeric_blank("AuxiliaryOnUs", 15)?,
            external_processing_code: r.alpha("ExternalProcessingCode", 1)?,
            payor_bank_routing_number: r.numeric_string("PayorBankRoutingNumber", 8)?,
            payor_bank_check_digit: r.numeric_string("PayorBankCheckDigit", 1)?,
            on_us: r.numeric_blank("OnUs", 20)?,
            item_amount: r.numeric("ItemAmount", 10)?,
            ece_institution_item_sequence_number: r
                .numeric_string("EceInstitutionItemSequenceNumber", 15)?,
            documentation_type_indicator: r.alpha("DocumentationTypeIndicator", 1)?,
            return_acceptance_indicator: r.alpha("ReturnAcceptanceIndicator", 1)?,
            micr_valid_indicator: r.numeric("MICRValidIndicator", 1)?,
            bofd_indicator: r.alpha("BOFDIndicator", 1)?,
            addendum_count: r.numeric("AddendumCount", 2)?,
            correction_indicator: r.numeric("CorrectionIndicator", 1)?,
            archive_type_indicator: r.alpha("ArchiveTypeIndicator", 1)?,
            ..Default::default()
        })
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(NAME, RecordType::CheckDetail.code(), RECORD_LENGTH, encoding);
        w.numeric_blank(&self.auxiliary_on_us, 15);
        w.alpha(&self.external_processing_code, 1);
        w.numeric_string("PayorBankRoutingNumber", &self.payor_bank_routing_number, 8)?;
        w.numeric_string("PayorBankCheckDigit", &self.payor_bank_check_digit, 1)?;
        w.numeric_blank(&self.on_us, 20);
        w.numeric("ItemAmount", self.item_amount, 10)?;
        w.numeric_string(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
            15,
        )?;
        w.alpha(&self.documentation_type_indicator, 1);
        w.alpha(&self.return_acceptance_indicator, 1);
        w.numeric("MICRValidIndicator", self.micr_valid_indicator.into(), 1)?;
        w.alpha(&self.bofd_indicator, 1);
        w.numeric("AddendumCount", self.addendum_count.into(), 2)?;
        w.numeric("CorrectionIndicator", self.correction_indicator.into(), 1)?;
        w.alpha(&self.archive_type_indicator, 1);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(NAME, opts);
        rules.numeric_blank_special("AuxiliaryOnUs", &self.auxiliary_on_us)?;
        rules.alphanumeric_special("ExternalProcessingCode", &self.external_processing_code)?;
        rules.routing_prefix(
            "PayorBankRoutingNumber",
            &self.payor_bank_routing_number,
            "PayorBankCheckDigit",
            &self.payor_bank_check_digit,
        )?;
        rules.numeric_blank_special("OnUs", &self.on_us)?;
        rules.mandatory(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.numeric(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.optional_one_of(
            "DocumentationTypeIndicator",
            &self.documentation_type_indicator,
            DOCUMENTATION_TYPE_INDICATORS,
        )?;
        rules.alphanumeric("ReturnAcceptanceIndicator", &self.return_acceptance_indicator)?;
        rules.digit_in(
            "MICRValidIndicator",
            self.micr_valid_indicator,
            MICR_VALID_INDICATORS,
        )?;
        rules.one_of("BOFDIndicator", &self.bofd_indicator, BOFD_INDICATORS)?;
        rules.digit_in(
            "CorrectionIndicator",
            self.correction_indicator,
            CORRECTION_INDICATORS,
        )?;
        rules.optional_one_of(
            "ArchiveTypeIndicator",
            &self.archive_type_indicator,
            ARCHIVE_TYPE_INDICATORS,
        )?;
        Ok(())
    }
}

impl Item for CheckDetail {
    fn as_record(&self) -> &dyn IclRecord {
        self
    }

    fn item_amount(&self) -> u64 {
        self.item_amount
    }

    fn is_micr_valid(&self) -> bool {
        self.micr_valid_indicator == 1
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
        self.check_detail_addendum_a.len()
            + self.check_detail_addendum_b.len()
            + self.check_detail_addendum_c.len()
    }

    fn for_each_addendum(
        &self,
        visit: &mut dyn FnMut(&dyn IclRecord) -> Result<()>,
    ) -> Result<()> {
        for addendum in &self.check_detail_addendum_a {
            visit(addendum)?;
        }
        for addendum in &self.check_detail_addendum_b {
            visit(addendum)?;
        }
        for addendum in &self.check_detail_addendum_c {
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
        renumber(self.check_detail_addendum_a.iter_mut(), |a, n| {
            a.record_number = n;
        });
        renumber(self.check_detail_addendum_c.iter_mut(), |c, n| {
            c.record_number = n;
        });
        for addendum in &mut self.check_detail_addendum_b {
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
            "CheckDetailAddendumA",
            self.check_detail_addendum_a.iter().map(|a| a.record_number),
        )?;
        validate_dense(
            "CheckDetailAddendumC",
            self.check_detail_addendum_c.iter().map(|c| c.record_number),
        )
    }
}
