//! Image view records (types `50`, `52`, `54`).
//!
//! One scanned side of an item is described by three co-indexed records: the
//! detail (what the image is), the data (the image bytes themselves), and the
//! analysis (quality and usability test results).

use super::{IclRecord, RecordType, RECORD_LENGTH};
use crate::config::ValidateOpts;
use crate::encoding::{text_len, Encoding};
use crate::error::{IclError, Result};
use crate::field::{peek_length, FieldReader, FieldWriter};
use crate::validation::{FieldRules, IMAGE_QUALITY_VALUES, IMAGE_USABILITY_VALUES};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DETAIL: &str = "ImageViewDetail";
const DATA: &str = "ImageViewData";
const ANALYSIS: &str = "ImageViewAnalysis";

/// Image formats: TIFF 6, IOCA FS 11, PNG, JFIF, SPIFF, JBIG, JPEG 2000.
pub const IMAGE_VIEW_FORMAT_INDICATORS: &[&str] = &["00", "01", "02", "20", "21", "22", "23", "24"];

/// Compression algorithms matching the formats above.
pub const COMPRESSION_ALGORITHMS: &[&str] = &["00", "01", "02", "21", "22", "23", "24"];

/// Which portion of the item the view shows.
pub const VIEW_DESCRIPTORS: &[&str] = &[
    "00", "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14",
];

/// Digital signature methods; `99` is user-defined.
pub const DIGITAL_SIGNATURE_METHODS: &[&str] = &["00", "01", "02", "03", "04", "05", "99"];

/// Width of the fixed part of an [`ImageViewData`] record.
pub const IMAGE_VIEW_DATA_MIN_LENGTH: usize = 117;

const KEY_LENGTH_OFFSET: usize = 101;

/// Describes one image view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageViewDetail {
    /// `0` no image, `1` image present, `2` image present but not retained.
    pub image_indicator: u8,
    /// Institution that captured the image.
    pub image_creator_routing_number: String,
    /// Date the image was captured.
    #[serde(with = "crate::json::date")]
    pub image_creator_date: Option<NaiveDate>,
    /// Image format.
    pub image_view_format_indicator: String,
    /// Compression algorithm.
    pub image_view_compression_algorithm: String,
    /// Legacy size field; lengths come from the data record instead.
    pub image_view_data_size: String,
    /// `0` front, `1` back.
    pub view_side_indicator: u8,
    /// Portion of the item shown.
    pub view_descriptor: String,
    /// `1` if the data record carries a digital signature.
    pub digital_signature_indicator: u8,
    /// Signature algorithm.
    pub digital_signature_method: String,
    /// Length of the signing key in bits.
    pub security_key_size: u32,
    /// Offset of the protected data in the image.
    pub protected_data_start: u32,
    /// Length of the protected data.
    pub protected_data_length: u32,
    /// `0` image cannot be recreated, `1` it can.
    pub image_recreate_indicator: u8,
    /// Free-form.
    pub user_field: String,
    /// Image quality override.
    pub override_indicator: String,
}

impl IclRecord for ImageViewDetail {
    fn record_type(&self) -> RecordType {
        RecordType::ImageViewDetail
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(DETAIL, bytes, RECORD_LENGTH, encoding)?;
        let detail = ImageViewDetail {
            image_indicator: r.numeric("ImageIndicator", 1)?,
            image_creator_routing_number: r.numeric_string("ImageCreatorRoutingNumber", 9)?,
            image_creator_date: r.date("ImageCreatorDate")?,
            image_view_format_indicator: r.numeric_string("ImageViewFormatIndicator", 2)?,
            image_view_compression_algorithm: r
                .numeric_string("ImageViewCompressionAlgorithm", 2)?,
            image_view_data_size: r.numeric_string("ImageViewDataSize", 7)?,
            view_side_indicator: r.numeric("ViewSideIndicator", 1)?,
            view_descriptor: r.numeric_string("ViewDescriptor", 2)?,
            digital_signature_indicator: r.numeric("DigitalSignatureIndicator", 1)?,
            digital_signature_method: r.numeric_string("DigitalSignatureMethod", 2)?,
            security_key_size: r.numeric("SecurityKeySize", 5)?,
            protected_data_start: r.numeric("ProtectedDataStart", 7)?,
            protected_data_length: r.numeric("ProtectedDataLength", 7)?,
            image_recreate_indicator: r.numeric("ImageRecreateIndicator", 1)?,
            user_field: r.alpha("UserField", 8)?,
            override_indicator: {
                r.skip(1)?;
                r.alpha("OverrideIndicator", 1)?
            },
        };
        r.skip(13)?;
        Ok(detail)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w =
            FieldWriter::new(DETAIL, RecordType::ImageViewDetail.code(), RECORD_LENGTH, encoding);
        w.numeric("ImageIndicator", self.image_indicator.into(), 1)?;
        w.numeric_string(
            "ImageCreatorRoutingNumber",
            &self.image_creator_routing_number,
            9,
        )?;
        w.date(self.image_creator_date);
        w.numeric_string("ImageViewFormatIndicator", &self.image_view_format_indicator, 2)?;
        w.numeric_string(
            "ImageViewCompressionAlgorithm",
            &self.image_view_compression_algorithm,
            2,
        )?;
        w.numeric_string("ImageViewDataSize", &self.image_view_data_size, 7)?;
        w.numeric("ViewSideIndicator", self.view_side_indicator.into(), 1)?;
        w.numeric_string("ViewDescriptor", &self.view_descriptor, 2)?;
        w.numeric(
            "DigitalSignatureIndicator",
            self.digital_signature_indicator.into(),
            1,
        )?;
        w.numeric_string("DigitalSignatureMethod", &self.digital_signature_method, 2)?;
        w.numeric("SecurityKeySize", self.security_key_size.into(), 5)?;
        w.numeric("ProtectedDataStart", self.protected_data_start.into(), 7)?;
        w.numeric("ProtectedDataLength", self.protected_data_length.into(), 7)?;
        w.numeric(
            "ImageRecreateIndicator",
            self.image_recreate_indicator.into(),
            1,
        )?;
        w.alpha(&self.user_field, 8);
        w.reserved(1);
        w.alpha(&self.override_indicator, 1);
        w.reserved(13);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(DETAIL, opts);
        rules.digit_in("ImageIndicator", self.image_indicator, &[0, 1, 2])?;
        if self.image_indicator != 0 {
            rules.routing_number(
                "ImageCreatorRoutingNumber",
                &self.image_creator_routing_number,
            )?;
            rules.mandatory_date("ImageCreatorDate", self.image_creator_date)?;
            rules.one_of(
                "ImageViewFormatIndicator",
                &self.image_view_format_indicator,
                IMAGE_VIEW_FORMAT_INDICATORS,
            )?;
            rules.one_of(
                "ImageViewCompressionAlgorithm",
                &self.image_view_compression_algorithm,
                COMPRESSION_ALGORITHMS,
            )?;
            rules.one_of("ViewDescriptor", &self.view_descriptor, VIEW_DESCRIPTORS)?;
        }
        rules.numeric("ImageViewDataSize", &self.image_view_data_size)?;
        rules.digit_in("ViewSideIndicator", self.view_side_indicator, &[0, 1])?;
        rules.digit_in(
            "DigitalSignatureIndicator",
            self.digital_signature_indicator,
            &[0, 1],
        )?;
        if self.digital_signature_indicator == 1 {
            rules.one_of(
                "DigitalSignatureMethod",
                &self.digital_signature_method,
                DIGITAL_SIGNATURE_METHODS,
            )?;
        }
        rules.digit_in("ImageRecreateIndicator", self.image_recreate_indicator, &[0, 1])?;
        rules.alphanumeric_special("UserField", &self.user_field)?;
        rules.alphanumeric("OverrideIndicator", &self.override_indicator)?;
        Ok(())
    }
}

/// Carries the bytes of one image view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageViewData {
    /// Institution that created the item.
    #[serde(rename = "eceInstitutionRoutingNumber")]
    pub ece_institution_routing_number: String,
    /// Business date of the enclosing bundle; filled in by `create` when absent.
    #[serde(with = "crate::json::date")]
    pub bundle_business_date: Option<NaiveDate>,
    /// Presentment cycle.
    pub cycle_number: String,
    /// Sequence number of the item this image belongs to.
    #[serde(rename = "eceInstitutionItemSequenceNumber")]
    pub ece_institution_item_sequence_number: String,
    /// Signer of the image.
    pub security_originator_name: String,
    /// Authenticator of the signature.
    pub security_authenticator_name: String,
    /// Name of the signing key.
    pub security_key_name: String,
    /// Corner the clipping coordinates are relative to; `0` means no clipping.
    pub clipping_origin: u8,
    /// Clipping rectangle, horizontal start.
    pub clipping_coordinate_h1: String,
    /// Clipping rectangle, horizontal end.
    pub clipping_coordinate_h2: String,
    /// Clipping rectangle, vertical start.
    pub clipping_coordinate_v1: String,
    /// Clipping rectangle, vertical end.
    pub clipping_coordinate_v2: String,
    /// Length of [`image_reference_key`](Self::image_reference_key).
    pub length_image_reference_key: u32,
    /// Key for retrieving the image from an archive.
    pub image_reference_key: String,
    /// Length of [`digital_signature`](Self::digital_signature).
    pub length_digital_signature: u32,
    /// Signature bytes, carried verbatim.
    #[serde(with = "crate::json::base64_bytes")]
    pub digital_signature: Vec<u8>,
    /// Length of [`image_data`](Self::image_data).
    pub length_image_data: u32,
    /// Image bytes, carried verbatim.
    #[serde(with = "crate::json::base64_bytes")]
    pub image_data: Vec<u8>,
}

fn length_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl ImageViewData {
    /// Set the three length fields from the variable content.
    pub fn sync_lengths(&mut self) {
        self.length_image_reference_key = length_of(text_len(&self.image_reference_key));
        self.length_digital_signature = length_of(self.digital_signature.len());
        self.length_image_data = length_of(self.image_data.len());
    }

    /// Total record length implied by the length fields present in `bytes`.
    ///
    /// When `bytes` stops short of a length field, the returned size reaches
    /// just past that field so the caller knows to keep reading. Returns
    /// `None` if a length field is not numeric.
    #[must_use]
    pub fn framed_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
        let mut need = KEY_LENGTH_OFFSET + 4;
        if bytes.len() < need {
            return Some(need);
        }
        let key = peek_length(bytes, KEY_LENGTH_OFFSET, 4, encoding)?;
        let signature_at = need + key;
        need = signature_at + 5;
        if bytes.len() < need {
            return Some(need);
        }
        let signature = peek_length(bytes, signature_at, 5, encoding)?;
        let data_at = need + signature;
        need = data_at + 7;
        if bytes.len() < need {
            return Some(need);
        }
        let data = peek_length(bytes, data_at, 7, encoding)?;
        Some(need + data)
    }

    // Blank and zero-filled coordinates both mean no clipping.
    fn has_clipping(&self) -> bool {
        [
            &self.clipping_coordinate_h1,
            &self.clipping_coordinate_h2,
            &self.clipping_coordinate_v1,
            &self.clipping_coordinate_v2,
        ]
        .iter()
        .any(|c| c.trim().bytes().any(|b| b != b'0'))
    }

    fn has_signature_fields(&self) -> bool {
        !self.security_originator_name.is_empty()
            || !self.security_authenticator_name.is_empty()
            || !self.security_key_name.is_empty()
            || !self.digital_signature.is_empty()
    }
}

impl IclRecord for ImageViewData {
    fn record_type(&self) -> RecordType {
        RecordType::ImageViewData
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::variable(DATA, bytes, IMAGE_VIEW_DATA_MIN_LENGTH, encoding)?;
        let mut data = ImageViewData {
            ece_institution_routing_number: r.numeric_string("EceInstitutionRoutingNumber", 9)?,
            bundle_business_date: r.date("BundleBusinessDate")?,
            cycle_number: r.alpha("CycleNumber", 2)?,
            ece_institution_item_sequence_number: r
                .numeric_string("EceInstitutionItemSequenceNumber", 15)?,
            security_originator_name: r.alpha("SecurityOriginatorName", 16)?,
            security_authenticator_name: r.alpha("SecurityAuthenticatorName", 16)?,
            security_key_name: r.alpha("SecurityKeyName", 16)?,
            clipping_origin: r.numeric("ClippingOrigin", 1)?,
            clipping_coordinate_h1: r.numeric_string("ClippingCoordinateH1", 4)?,
            clipping_coordinate_h2: r.numeric_string("ClippingCoordinateH2", 4)?,
            clipping_coordinate_v1: r.numeric_string("ClippingCoordinateV1", 4)?,
            clipping_coordinate_v2: r.numeric_string("ClippingCoordinateV2", 4)?,
            length_image_reference_key: r.numeric("LengthImageReferenceKey", 4)?,
            ..Default::default()
        };
        data.image_reference_key =
            r.variable_text("ImageReferenceKey", data.length_image_reference_key as usize)?;
        data.length_digital_signature = r.numeric("LengthDigitalSignature", 5)?;
        data.digital_signature =
            r.binary("DigitalSignature", data.length_digital_signature as usize)?;
        data.length_image_data = r.numeric("LengthImageData", 7)?;
        data.image_data = r.binary("ImageData", data.length_image_data as usize)?;
        if r.remaining() != 0 {
            return Err(IclError::RecordWrongLength {
                expected: bytes.len() - r.remaining(),
                length: bytes.len(),
            });
        }
        Ok(data)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let capacity = IMAGE_VIEW_DATA_MIN_LENGTH
            + text_len(&self.image_reference_key)
            + self.digital_signature.len()
            + self.image_data.len();
        let mut w = FieldWriter::new(DATA, RecordType::ImageViewData.code(), capacity, encoding);
        w.numeric_string(
            "EceInstitutionRoutingNumber",
            &self.ece_institution_routing_number,
            9,
        )?;
        w.date(self.bundle_business_date);
        w.alpha(&self.cycle_number, 2);
        w.numeric_string(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
            15,
        )?;
        w.alpha(&self.security_originator_name, 16);
        w.alpha(&self.security_authenticator_name, 16);
        w.alpha(&self.security_key_name, 16);
        w.numeric("ClippingOrigin", self.clipping_origin.into(), 1)?;
        w.numeric_string("ClippingCoordinateH1", &self.clipping_coordinate_h1, 4)?;
        w.numeric_string("ClippingCoordinateH2", &self.clipping_coordinate_h2, 4)?;
        w.numeric_string("ClippingCoordinateV1", &self.clipping_coordinate_v1, 4)?;
        w.numeric_string("ClippingCoordinateV2", &self.clipping_coordinate_v2, 4)?;
        // Lengths always follow the content actually written.
        w.numeric(
            "LengthImageReferenceKey",
            text_len(&self.image_reference_key) as u64,
            4,
        )?;
        w.variable_text(&self.image_reference_key);
        w.numeric(
            "LengthDigitalSignature",
            self.digital_signature.len() as u64,
            5,
        )?;
        w.binary(&self.digital_signature);
        w.numeric("LengthImageData", self.image_data.len() as u64, 7)?;
        w.binary(&self.image_data);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(DATA, opts);
        rules.optional_routing_number(
            "EceInstitutionRoutingNumber",
            &self.ece_institution_routing_number,
        )?;
        rules.mandatory_date("BundleBusinessDate", self.bundle_business_date)?;
        rules.alphanumeric("CycleNumber", &self.cycle_number)?;
        rules.numeric(
            "EceInstitutionItemSequenceNumber",
            &self.ece_institution_item_sequence_number,
        )?;
        rules.alphanumeric_special("SecurityOriginatorName", &self.security_originator_name)?;
        rules.alphanumeric_special(
            "SecurityAuthenticatorName",
            &self.security_authenticator_name,
        )?;
        rules.alphanumeric_special("SecurityKeyName", &self.security_key_name)?;
        rules.digit_in("ClippingOrigin", self.clipping_origin, &[0, 1, 2, 3, 4])?;
        rules.numeric("ClippingCoordinateH1", &self.clipping_coordinate_h1)?;
        rules.numeric("ClippingCoordinateH2", &self.clipping_coordinate_h2)?;
        rules.numeric("ClippingCoordinateV1", &self.clipping_coordinate_v1)?;
        rules.numeric("ClippingCoordinateV2", &self.clipping_coordinate_v2)?;
        if (self.length_image_reference_key > 0) == self.image_reference_key.is_empty() {
            return Err(rules.error(
                "ImageReferenceKey",
                &self.image_reference_key,
                "must be present exactly when LengthImageReferenceKey is greater than zero",
            ));
        }
        rules.alphanumeric_special("ImageReferenceKey", &self.image_reference_key)?;
        if self.length_image_reference_key as usize != text_len(&self.image_reference_key) {
            return Err(rules.error(
                "LengthImageReferenceKey",
                self.length_image_reference_key,
                "does not match the length of ImageReferenceKey",
            ));
        }
        if self.length_digital_signature as usize != self.digital_signature.len() {
            return Err(rules.error(
                "LengthDigitalSignature",
                self.length_digital_signature,
                "does not match the length of DigitalSignature",
            ));
        }
        if self.length_image_data as usize != self.image_data.len() {
            return Err(rules.error(
                "LengthImageData",
                self.length_image_data,
                "does not match the length of ImageData",
            ));
        }
        Ok(())
    }
}

/// Quality and usability test results for one image view.
///
/// Each test field holds `0` (not tested), `1` (condition present) or `2`
/// (condition absent); usability fields extend the range up to `5`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct ImageViewAnalysis {
    pub global_image_quality: u8,
    pub global_image_usability: u8,
    pub imaging_bank_specific_test: u8,
    pub partial_image: u8,
    pub excessive_image_skew: u8,
    pub piggyback_image: u8,
    pub too_light_or_too_dark: u8,
    pub streaks_and_or_bands: u8,
    pub below_minimum_image_size: u8,
    pub exceeds_maximum_image_size: u8,
    #[serde(rename = "imageEnabledPOD")]
    pub image_enabled_pod: u8,
    pub source_document_bad: u8,
    pub date_usability: u8,
    pub payee_usability: u8,
    pub convenience_amount_usability: u8,
    pub amount_in_words_usability: u8,
    pub signature_usability: u8,
    pub payor_name_address_usability: u8,
    #[serde(rename = "micrLineUsability")]
    pub micr_line_usability: u8,
    pub memo_line_usability: u8,
    pub payor_bank_name_address_usability: u8,
    pub payee_endorsement_usability: u8,
    #[serde(rename = "bofdEndorsementUsability")]
    pub bofd_endorsement_usability: u8,
    pub transit_endorsement_usability: u8,
    pub user_field: String,
}

impl ImageViewAnalysis {
    fn quality_fields(&self) -> [(&'static str, u8); 11] {
        [
            ("GlobalImageQuality", self.global_image_quality),
            ("ImagingBankSpecificTest", self.imaging_bank_specific_test),
            ("PartialImage", self.partial_image),
            ("ExcessiveImageSkew", self.excessive_image_skew),
            ("PiggybackImage", self.piggyback_image),
            ("TooLightOrTooDark", self.too_light_or_too_dark),
            ("StreaksAndOrBands", self.streaks_and_or_bands),
            ("BelowMinimumImageSize", self.below_minimum_image_size),
            ("ExceedsMaximumImageSize", self.exceeds_maximum_image_size),
            ("ImageEnabledPOD", self.image_enabled_pod),
            ("SourceDocumentBad", self.source_document_bad),
        ]
    }

    fn usability_fields(&self) -> [(&'static str, u8); 13] {
        [
            ("GlobalImageUsability", self.global_image_usability),
            ("DateUsability", self.date_usability),
            ("PayeeUsability", self.payee_usability),
            ("ConvenienceAmountUsability", self.convenience_amount_usability),
            ("AmountInWordsUsability", self.amount_in_words_usability),
            ("SignatureUsability", self.signature_usability),
            ("PayorNameAddressUsability", self.payor_name_address_usability),
            ("MICRLineUsability", self.micr_line_usability),
            ("MemoLineUsability", self.memo_line_usability),
            (
                "PayorBankNameAddressUsability",
                self.payor_bank_name_address_usability,
            ),
            ("PayeeEndorsementUsability", self.payee_endorsement_usability),
            ("BOFDEndorsementUsability", self.bofd_endorsement_usability),
            (
                "TransitEndorsementUsability",
                self.transit_endorsement_usability,
            ),
        ]
    }
}

impl IclRecord for ImageViewAnalysis {
    fn record_type(&self) -> RecordType {
        RecordType::ImageViewAnalysis
    }

    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let mut r = FieldReader::fixed(ANALYSIS, bytes, RECORD_LENGTH, encoding)?;
        let mut analysis = ImageViewAnalysis {
            global_image_quality: r.numeric("GlobalImageQuality", 1)?,
            global_image_usability: r.numeric("GlobalImageUsability", 1)?,
            imaging_bank_specific_test: r.numeric("ImagingBankSpecificTest", 1)?,
            partial_image: r.numeric("PartialImage", 1)?,
            excessive_image_skew: r.numeric("ExcessiveImageSkew", 1)?,
            piggyback_image: r.numeric("PiggybackImage", 1)?,
            too_light_or_too_dark: r.numeric("TooLightOrTooDark", 1)?,
            streaks_and_or_bands: r.numeric("StreaksAndOrBands", 1)?,
            below_minimum_image_size: r.numeric("BelowMinimumImageSize", 1)?,
            exceeds_maximum_image_size: r.numeric("ExceedsMaximumImageSize", 1)?,
            ..Default::default()
        };
        r.skip(13)?;
        analysis.image_enabled_pod = r.numeric("ImageEnabledPOD", 1)?;
        analysis.source_document_bad = r.numeric("SourceDocumentBad", 1)?;
        analysis.date_usability = r.numeric("DateUsability", 1)?;
        analysis.payee_usability = r.numeric("PayeeUsability", 1)?;
        analysis.convenience_amount_usability = r.numeric("ConvenienceAmountUsability", 1)?;
        analysis.amount_in_words_usability = r.numeric("AmountInWordsUsability", 1)?;
        analysis.signature_usability = r.numeric("SignatureUsability", 1)?;
        analysis.payor_name_address_usability = r.numeric("PayorNameAddressUsability", 1)?;
        analysis.micr_line_usability = r.numeric("MICRLineUsability", 1)?;
        analysis.memo_line_usability = r.numeric("MemoLineUsability", 1)?;
        analysis.payor_bank_name_address_usability =
            r.numeric("PayorBankNameAddressUsability", 1)?;
        analysis.payee_endorsement_usability = r.numeric("PayeeEndorsementUsability", 1)?;
        analysis.bofd_endorsement_usability = r.numeric("BOFDEndorsementUsability", 1)?;
        analysis.transit_endorsement_usability = r.numeric("TransitEndorsementUsability", 1)?;
        r.skip(6)?;
        analysis.user_field = r.alpha("UserField", 20)?;
        r.skip(15)?;
        Ok(analysis)
    }

    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        let mut w = FieldWriter::new(
            ANALYSIS,
            RecordType::ImageViewAnalysis.code(),
            RECORD_LENGTH,
            encoding,
        );
        for value in [
            self.global_image_quality,
            self.global_image_usability,
            self.imaging_bank_specific_test,
            self.partial_image,
            self.excessive_image_skew,
            self.piggyback_image,
            self.too_light_or_too_dark,
            self.streaks_and_or_bands,
            self.below_minimum_image_size,
            self.exceeds_maximum_image_size,
        ] {
            w.numeric("ImageQuality", value.into(), 1)?;
        }
        w.reserved(13);
        for value in [
            self.image_enabled_pod,
            self.source_document_bad,
            self.date_usability,
            self.payee_usability,
            self.convenience_amount_usability,
            self.amount_in_words_usability,
            self.signature_usability,
            self.payor_name_address_usability,
            self.micr_line_usability,
            self.memo_line_usability,
            self.payor_bank_name_address_usability,
            self.payee_endorsement_usability,
            self.bofd_endorsement_usability,
            self.transit_endorsement_usability,
        ] {
            w.numeric("ImageUsability", value.into(), 1)?;
        }
        w.reserved(6);
        w.alpha(&self.user_field, 20);
        w.reserved(15);
        Ok(w.finish())
    }

    fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        if opts.skip_all {
            return Ok(());
        }
        let rules = FieldRules::new(ANALYSIS, opts);
        for (field, value) in self.quality_fields() {
            rules.digit_in(field, value, IMAGE_QUALITY_VALUES)?;
        }
        for (field, value) in self.usability_fields() {
            rules.digit_in(field, value, IMAGE_USABILITY_VALUES)?;
        }
        rules.alphanumeric_special("UserField", &self.user_field)?;
        Ok(())
    }
}

/// Validate the image views of one item: every record, the co-indexing of
/// the three lists, and the rules that span a detail and its data record.
pub(crate) fn validate_image_views(
    details: &[ImageViewDetail],
    data: &[ImageViewData],
    analysis: &[ImageViewAnalysis],
    opts: &ValidateOpts,
) -> Result<()> {
    for record in details {
        record.validate_with(opts)?;
    }
    for record in data {
        record.validate_with(opts)?;
    }
    for record in analysis {
        record.validate_with(opts)?;
    }

    if details.len() != data.len() {
        return Err(IclError::file(
            "ImageViewData",
            data.len(),
            format!(
                "item has {} ImageViewDetail records but {} ImageViewData records",
                details.len(),
                data.len()
            ),
        ));
    }
    let analysis_ok = if opts.allow_missing_image_analysis {
        analysis.len() <= details.len()
    } else {
        analysis.len() == details.len()
    };
    if !analysis_ok {
        return Err(IclError::file(
            "ImageViewAnalysis",
            analysis.len(),
            format!(
                "item has {} ImageViewDetail records but {} ImageViewAnalysis records",
                details.len(),
                analysis.len()
            ),
        ));
    }

    let rules = FieldRules::new(DATA, opts);
    for (detail, data) in details.iter().zip(data) {
        let wants_clipping = data.clipping_origin > 0 && detail.image_indicator != 0;
        if wants_clipping != data.has_clipping() {
            return Err(rules.error(
                "ClippingOrigin",
                data.clipping_origin,
                "clipping coordinates must be present exactly when ClippingOrigin is set",
            ));
        }
        let signed = detail.digital_signature_indicator == 1;
        if signed {
            rules.mandatory("SecurityOriginatorName", &data.security_originator_name)?;
            rules.mandatory(
                "SecurityAuthenticatorName",
                &data.security_authenticator_name,
            )?;
            rules.mandatory("SecurityKeyName", &data.security_key_name)?;
            if data.digital_signature.is_empty() {
                return Err(rules.error("DigitalSignature", "", "is a mandatory field"));
            }
        } else if data.has_signature_fields() {
            return Err(rules.error(
                "DigitalSignature",
                "",
                "security fields must be blank when DigitalSignatureIndicator is not 1",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_SAMPLE: &[u8] =
        b"501231380104201810240000000000000000000000000000000000000                       ";
    const ANALYSIS_SAMPLE: &[u8] =
        b"542000000000             00000000000000      Scanner A                          ";

    fn sample_data() -> ImageViewData {
        ImageViewData {
            ece_institution_routing_number: "231380104".to_string(),
            bundle_business_date: NaiveDate::from_ymd_opt(2018, 10, 24),
            ece_institution_item_sequence_number: "000000000000001".to_string(),
            image_data: vec![0x49, 0x49, 0x2A, 0x00, 0x0A, 0xFF],
            ..Default::default()
        }
    }

    #[test]
    fn test_detail_parse_and_format() {
        assert_eq!(DETAIL_SAMPLE.len(), RECORD_LENGTH);
        let detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(detail.image_indicator, 1);
        assert_eq!(detail.image_creator_routing_number, "231380104");
        assert_eq!(detail.image_view_format_indicator, "00");
        assert_eq!(detail.image_view_data_size, "0000000");
        assert_eq!(detail.view_descriptor, "00");
        assert!(detail.validate().is_ok());
        assert_eq!(detail.to_bytes(Encoding::Ascii).unwrap(), DETAIL_SAMPLE.to_vec());
    }

    #[test]
    fn test_detail_rejects_unknown_format() {
        let mut detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        detail.image_view_format_indicator = "07".to_string();
        let err = detail.validate().unwrap_err();
        assert!(err.to_string().contains("ImageViewFormatIndicator"));
    }

    #[test]
    fn test_data_lengths_follow_content() {
        let mut data = sample_data();
        data.image_reference_key = "KEY1".to_string();
        let bytes = data.to_bytes(Encoding::Ascii).unwrap();
        assert_eq!(bytes.len(), IMAGE_VIEW_DATA_MIN_LENGTH + 4 + 6);
        assert_eq!(
            ImageViewData::framed_length(&bytes, Encoding::Ascii),
            Some(bytes.len())
        );

        let parsed = ImageViewData::parse(&bytes, Encoding::Ascii).unwrap();
        assert_eq!(parsed.length_image_reference_key, 4);
        assert_eq!(parsed.length_image_data, 6);
        assert_eq!(parsed.image_data, data.image_data);

        data.sync_lengths();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_data_binary_survives_ebcdic() {
        let mut data = sample_data();
        data.sync_lengths();
        let bytes = data.to_bytes(Encoding::Ebcdic).unwrap();
        assert!(bytes.ends_with(&[0x49, 0x49, 0x2A, 0x00, 0x0A, 0xFF]));
        let parsed = ImageViewData::parse(&bytes, Encoding::Ebcdic).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_framed_length_asks_for_more() {
        let mut data = sample_data();
        data.sync_lengths();
        let bytes = data.to_bytes(Encoding::Ascii).unwrap();
        // Cut inside the image payload: the full size is still known.
        assert_eq!(
            ImageViewData::framed_length(&bytes[..120], Encoding::Ascii),
            Some(bytes.len())
        );
        // Cut before the first length field.
        assert_eq!(
            ImageViewData::framed_length(&bytes[..50], Encoding::Ascii),
            Some(105)
        );
    }

    #[test]
    fn test_data_length_mismatch_is_reported() {
        let mut data = sample_data();
        data.length_image_data = 2;
        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("LengthImageData"));
    }

    #[test]
    fn test_analysis_parse_and_format() {
        assert_eq!(ANALYSIS_SAMPLE.len(), RECORD_LENGTH);
        let analysis = ImageViewAnalysis::parse(ANALYSIS_SAMPLE, Encoding::Ascii).unwrap();
        assert_eq!(analysis.global_image_quality, 2);
        assert_eq!(analysis.user_field, "Scanner A");
        assert!(analysis.validate().is_ok());
        assert_eq!(
            analysis.to_bytes(Encoding::Ascii).unwrap(),
            ANALYSIS_SAMPLE.to_vec()
        );
    }

    #[test]
    fn test_analysis_usability_range() {
        let mut analysis = ImageViewAnalysis {
            signature_usability: 5,
            ..Default::default()
        };
        assert!(analysis.validate().is_ok());
        analysis.partial_image = 3;
        let err = analysis.validate().unwrap_err();
        assert!(err.to_string().contains("PartialImage"));
    }

    #[test]
    fn test_triples_must_line_up() {
        let detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        let mut data = sample_data();
        data.sync_lengths();
        let opts = ValidateOpts::default();

        assert!(validate_image_views(
            &[detail.clone()],
            &[data.clone()],
            &[ImageViewAnalysis::default()],
            &opts
        )
        .is_ok());

        let err = validate_image_views(&[detail.clone()], &[data.clone()], &[], &opts).unwrap_err();
        assert!(err.to_string().contains("ImageViewAnalysis"));

        let lenient = ValidateOpts::default().with_allow_missing_image_analysis(true);
        assert!(validate_image_views(&[detail], &[data], &[], &lenient).is_ok());
    }

    #[test]
    fn test_clipping_requires_origin() {
        let detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        let mut data = sample_data();
        data.sync_lengths();
        data.clipping_origin = 1;
        let analysis = [ImageViewAnalysis::default()];
        let opts = ValidateOpts::default();
        let err = validate_image_views(&[detail.clone()], &[data.clone()], &analysis, &opts)
            .unwrap_err();
        assert!(err.to_string().contains("ClippingOrigin"));

        data.clipping_coordinate_h1 = "0010".to_string();
        data.clipping_coordinate_h2 = "0200".to_string();
        data.clipping_coordinate_v1 = "0010".to_string();
        data.clipping_coordinate_v2 = "0100".to_string();
        assert!(validate_image_views(&[detail], &[data], &analysis, &opts).is_ok());
    }

    #[test]
    fn test_zero_filled_clipping_is_absent() {
        let detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        let mut data = sample_data();
        data.sync_lengths();
        data.clipping_coordinate_h1 = "0000".to_string();
        data.clipping_coordinate_h2 = "0000".to_string();
        data.clipping_coordinate_v1 = "0000".to_string();
        data.clipping_coordinate_v2 = "0000".to_string();
        let analysis = [ImageViewAnalysis::default()];
        let opts = ValidateOpts::default();
        let result = validate_image_views(&[detail.clone()], &[data.clone()], &analysis, &opts);
        assert!(result.is_ok());

        data.clipping_origin = 2;
        let err = validate_image_views(&[detail], &[data], &analysis, &opts).unwrap_err();
        assert!(err.to_string().contains("ClippingOrigin"));
    }

    #[test]
    fn test_signature_fields_follow_indicator() {
        let mut detail = ImageViewDetail::parse(DETAIL_SAMPLE, Encoding::Ascii).unwrap();
        let mut data = sample_data();
        data.sync_lengths();
        let analysis = [ImageViewAnalysis::default()];
        let opts = ValidateOpts::default();

        detail.digital_signature_indicator = 1;
        detail.digital_signature_method = "01".to_string();
        let err = validate_image_views(&[detail.clone()], &[data.clone()], &analysis, &opts)
            .unwrap_err();
        assert!(err.to_string().contains("SecurityOriginatorName"));

        data.security_originator_name = "Originator".to_string();
        data.security_authenticator_name = "Authenticator".to_string();
        data.security_key_name = "Key".to_string();
        data.digital_signature = vec![1, 2, 3];
        data.sync_lengths();
        assert!(validate_image_views(&[detail], &[data], &analysis, &opts).is_ok());
    }
}
