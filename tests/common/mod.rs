//! Common test helpers and utilities shared across test suite.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use imagecashletter::{
    Bundle, BundleHeader, CashLetter, CashLetterControl, CashLetterHeader, CheckDetail,
    CheckDetailAddendumA, CheckDetailAddendumB, CheckDetailAddendumC, File, FileHeader,
    ImageViewAnalysis, ImageViewData, ImageViewDetail,
};
use std::path::PathBuf;

/// Route library logging through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Path of a fixture under `tests/data`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Read a fixture into memory.
pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture(name)).expect("fixture should be readable")
}

pub fn business_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2018, 10, 24)
}

pub fn file_header() -> FileHeader {
    FileHeader {
        test_file_indicator: "T".to_string(),
        immediate_destination: "061000146".to_string(),
        immediate_origin: "231380104".to_string(),
        file_creation_date: business_date(),
        file_creation_time: NaiveTime::from_hms_opt(15, 30, 0),
        immediate_destination_name: "Wave Money".to_string(),
        immediate_origin_name: "Citadel".to_string(),
        file_id_modifier: "A".to_string(),
        country_code: "US".to_string(),
        ..FileHeader::new()
    }
}

pub fn cash_letter_header(id: &str) -> CashLetterHeader {
    CashLetterHeader {
        collection_type_indicator: "01".to_string(),
        destination_routing_number: "231380104".to_string(),
        ece_institution_routing_number: "061000146".to_string(),
        cash_letter_business_date: business_date(),
        cash_letter_creation_date: business_date(),
        cash_letter_creation_time: NaiveTime::from_hms_opt(15, 30, 0),
        record_type_indicator: "I".to_string(),
        documentation_type_indicator: "G".to_string(),
        cash_letter_id: id.to_string(),
        originator_contact_name: "Contact Name".to_string(),
        originator_contact_phone_number: "5558675552".to_string(),
        ..Default::default()
    }
}

pub fn bundle_header(id: &str) -> BundleHeader {
    BundleHeader {
        collection_type_indicator: "01".to_string(),
        destination_routing_number: "231380104".to_string(),
        ece_institution_routing_number: "061000146".to_string(),
        bundle_business_date: business_date(),
        bundle_creation_date: business_date(),
        bundle_id: id.to_string(),
        cycle_number: "01".to_string(),
        ..Default::default()
    }
}

/// A check with one addendum of each kind and one image view triple.
pub fn check(sequence: u64, amount: u64) -> CheckDetail {
    let sequence = format!("{sequence:015}");
    let mut check = CheckDetail {
        auxiliary_on_us: "123456789".to_string(),
        payor_bank_routing_number: "03130001".to_string(),
        payor_bank_check_digit: "2".to_string(),
        on_us: "5558881".to_string(),
        item_amount: amount,
        ece_institution_item_sequence_number: sequence.clone(),
        documentation_type_indicator: "G".to_string(),
        return_acceptance_indicator: "D".to_string(),
        micr_valid_indicator: 1,
        bofd_indicator: "Y".to_string(),
        archive_type_indicator: "B".to_string(),
        ..Default::default()
    };
    check.add_check_detail_addendum_a(CheckDetailAddendumA {
        return_location_routing_number: "231380104".to_string(),
        bofd_endorsement_date: business_date(),
        bofd_item_sequence_number: sequence.clone(),
        bofd_account_number: "1234567890".to_string(),
        payee_name: "Payee Name".to_string(),
        truncation_indicator: "Y".to_string(),
        bofd_conversion_indicator: "2".to_string(),
        ..Default::default()
    });
    check.add_check_detail_addendum_b(CheckDetailAddendumB {
        image_reference_key_indicator: 1,
        microfilm_archive_sequence_number: "1A".to_string(),
        image_reference_key: "0123456789".to_string(),
        description: "Front".to_string(),
        ..Default::default()
    });
    check.add_check_detail_addendum_c(CheckDetailAddendumC {
        endorsing_bank_routing_number: "231380104".to_string(),
        bofd_endorsement_business_date: business_date(),
        endorsing_bank_item_sequence_number: sequence.clone(),
        truncation_indicator: "Y".to_string(),
        endorsing_bank_conversion_indicator: "1".to_string(),
        return_reason: "A".to_string(),
        endorsing_bank_identifier: 1,
        ..Default::default()
    });
    check.add_image_view(
        ImageViewDetail {
            image_indicator: 1,
            image_creator_routing_number: "231380104".to_string(),
            image_creator_date: business_date(),
            image_view_format_indicator: "00".to_string(),
            image_view_compression_algorithm: "00".to_string(),
            view_descriptor: "00".to_string(),
            ..Default::default()
        },
        ImageViewData {
            ece_institution_routing_number: "231380104".to_string(),
            cycle_number: "01".to_string(),
            ece_institution_item_sequence_number: sequence,
            image_data: vec![0x49, 0x49, 0x2A, 0x00, 0x0A, 0x0D, 0x0A, 0xFF],
            ..Default::default()
        },
        ImageViewAnalysis {
            global_image_quality: 2,
            user_field: "Scanner A".to_string(),
            ..Default::default()
        },
    );
    check
}

/// A cash letter of `bundles` bundles holding `checks` checks each, with
/// sequence numbers starting at `first`.
pub fn cash_letter(id: &str, bundles: usize, checks: usize, first: u64) -> CashLetter {
    let mut cash_letter = CashLetter::new(cash_letter_header(id));
    let mut sequence = first;
    for b in 0..bundles {
        let mut bundle = Bundle::new(bundle_header(&format!("B{b}")));
        for _ in 0..checks {
            bundle.add_check_detail(check(sequence, 10_000));
            sequence += 1;
        }
        cash_letter.add_bundle(bundle);
    }
    cash_letter.set_control(CashLetterControl {
        ece_institution_name: "Citadel".to_string(),
        settlement_date: NaiveDate::from_ymd_opt(2018, 10, 25),
        ..Default::default()
    });
    cash_letter
}

/// A file of `cash_letters` cash letters, not yet created.
pub fn synthetic_file(cash_letters: usize, bundles: usize, checks: usize) -> File {
    let mut file = File::new(file_header());
    let per_letter = (bundles * checks) as u64;
    for c in 0..cash_letters {
        file.add_cash_letter(cash_letter(
            &format!("CL{c}"),
            bundles,
            checks,
            1 + c as u64 * per_letter,
        ));
    }
    file
}
