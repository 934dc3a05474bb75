//! Property tests for the field codec and text encodings.

mod common;

use imagecashletter::field::{FieldReader, FieldWriter};
use imagecashletter::{
    CheckDetail, Encoding, IclRecord, ImageViewData, Record, RecordType, ValidateOpts,
};
use proptest::prelude::*;

fn encoding() -> impl Strategy<Value = Encoding> {
    prop_oneof![Just(Encoding::Ascii), Just(Encoding::Ebcdic)]
}

proptest! {
    #[test]
    fn printable_text_survives_ebcdic(text in "[ -~]{0,64}") {
        let wire = Encoding::Ebcdic.encode(text.as_bytes());
        prop_assert_eq!(wire.len(), text.len());
        prop_assert_eq!(Encoding::Ebcdic.decode_to_string(&wire), text);
    }

    #[test]
    fn fields_keep_their_width(
        alpha in "[A-Za-z0-9]{0,10}",
        micr in "[0-9/ -]{0,12}",
        amount in 0u64..10_000_000_000,
        enc in encoding(),
    ) {
        let micr = micr.trim().to_string();
        let mut w = FieldWriter::new("Test", "99", 80, enc);
        w.alpha(&alpha, 10);
        w.numeric_blank(&micr, 12);
        w.numeric("Amount", amount, 10).unwrap();
        w.reserved(46);
        let bytes = w.finish();
        prop_assert_eq!(bytes.len(), 80);

        let mut r = FieldReader::fixed("Test", &bytes, 80, enc).unwrap();
        prop_assert_eq!(r.alpha("Alpha", 10).unwrap(), alpha);
        prop_assert_eq!(r.numeric_blank("Micr", 12).unwrap(), micr);
        prop_assert_eq!(r.numeric::<u64>("Amount", 10).unwrap(), amount);
    }

    #[test]
    fn oversized_amounts_are_rejected(amount in 10_000_000_000u64..u64::MAX) {
        let check = CheckDetail { item_amount: amount, ..Default::default() };
        prop_assert!(check.to_bytes(Encoding::Ascii).is_err());
    }

    #[test]
    fn image_payloads_pass_through_verbatim(
        payload in proptest::collection::vec(any::<u8>(), 0..512),
        enc in encoding(),
    ) {
        let mut data = ImageViewData {
            ece_institution_routing_number: "231380104".to_string(),
            image_data: payload.clone(),
            ..Default::default()
        };
        data.sync_lengths();
        let bytes = data.to_bytes(enc).unwrap();
        prop_assert!(bytes.ends_with(&payload));
        prop_assert_eq!(
            ImageViewData::framed_length(&bytes, enc),
            Some(bytes.len())
        );
        match Record::parse(&bytes, enc).unwrap() {
            Record::ImageViewData(parsed) => prop_assert_eq!(parsed, data),
            other => prop_assert!(false, "unexpected record {:?}", other),
        }
    }

    #[test]
    fn skip_all_accepts_anything(amount in any::<u64>(), indicator in any::<u8>()) {
        let check = CheckDetail {
            item_amount: amount,
            micr_valid_indicator: indicator,
            documentation_type_indicator: "?".to_string(),
            ..Default::default()
        };
        prop_assert!(check.validate_with(&ValidateOpts::skip_all()).is_ok());
    }
}

#[test]
fn test_type_codes_decode_in_both_encodings() {
    common::init_logger();
    for enc in [Encoding::Ascii, Encoding::Ebcdic] {
        let bytes = common::check(1, 100).to_bytes(enc).unwrap();
        assert_eq!(RecordType::of(&bytes, enc).unwrap(), RecordType::CheckDetail);
    }
}
