//! Typed values for every ICL record kind.
//!
//! Each record kind is its own struct implementing [`IclRecord`]: it knows its
//! two-character type code, its byte layout, and its field-level validation.
//! [`Record`] is the tagged union the reader produces and the writer consumes.
//!
//! # Example
//!
//! ```
//! use imagecashletter::records::{IclRecord, Record, RecordType};
//! use imagecashletter::{BundleControl, Encoding};
//!
//! let control = BundleControl {
//!     bundle_items_count: 1,
//!     bundle_total_amount: 10000,
//!     ..Default::default()
//! };
//! let bytes = control.to_bytes(Encoding::Ascii).unwrap();
//! assert_eq!(bytes.len(), 80);
//!
//! let parsed = Record::parse(&bytes, Encoding::Ascii).unwrap();
//! assert_eq!(parsed.record_type(), RecordType::BundleControl);
//! ```

use crate::config::ValidateOpts;
use crate::encoding::Encoding;
use crate::error::{IclError, Result};
use std::fmt;

pub mod addenda;
pub mod bundle_control;
pub mod bundle_header;
pub mod cash_letter_control;
pub mod cash_letter_header;
pub mod check_detail;
pub mod credit;
pub mod file_control;
pub mod file_header;
pub mod image_view;
pub mod item;
pub mod return_detail;
pub mod routing_number_summary;
pub mod user_record;

pub use addenda::{
    CheckDetailAddendumA, CheckDetailAddendumB, CheckDetailAddendumC, ReturnDetailAddendumA,
    ReturnDetailAddendumB, ReturnDetailAddendumC, ReturnDetailAddendumD,
};
pub use bundle_control::BundleControl;
pub use bundle_header::BundleHeader;
pub use cash_letter_control::CashLetterControl;
pub use cash_letter_header::CashLetterHeader;
pub use check_detail::CheckDetail;
pub use credit::{Credit, CreditItem};
pub use file_control::FileControl;
pub use file_header::FileHeader;
pub use image_view::{ImageViewAnalysis, ImageViewData, ImageViewDetail};
pub use item::Item;
pub use return_detail::ReturnDetail;
pub use routing_number_summary::RoutingNumberSummary;
pub use user_record::UserRecord;

/// Width of the standard fixed-length record.
pub const RECORD_LENGTH: usize = 80;

/// The kind of a physical record, keyed by its two-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// `01`
    FileHeader,
    /// `10`
    CashLetterHeader,
    /// `20`
    BundleHeader,
    /// `25`
    CheckDetail,
    /// `26`
    CheckDetailAddendumA,
    /// `27`
    CheckDetailAddendumB,
    /// `28`
    CheckDetailAddendumC,
    /// `31`
    ReturnDetail,
    /// `32`
    ReturnDetailAddendumA,
    /// `33`
    ReturnDetailAddendumB,
    /// `34`
    ReturnDetailAddendumC,
    /// `35`
    ReturnDetailAddendumD,
    /// `50`
    ImageViewDetail,
    /// `52`
    ImageViewData,
    /// `54`
    ImageViewAnalysis,
    /// `61`
    CreditItem,
    /// `62`
    Credit,
    /// `68`
    UserRecord,
    /// `70`
    BundleControl,
    /// `85`
    RoutingNumberSummary,
    /// `90`
    CashLetterControl,
    /// `99`
    FileControl,
    /// A recognised code (`40`, `71`, `75`) that has no typed value.
    Unmodeled(&'static str),
}

impl RecordType {
    /// Look up a two-character code.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::UnknownRecordType`] for codes outside the standard.
    pub fn from_code(code: &str) -> Result<Self> {
        let record_type = match code {
            "01" => Self::FileHeader,
            "10" => Self::CashLetterHeader,
            "20" => Self::BundleHeader,
            "25" => Self::CheckDetail,
            "26" => Self::CheckDetailAddendumA,
            "27" => Self::CheckDetailAddendumB,
            "28" => Self::CheckDetailAddendumC,
            "31" => Self::ReturnDetail,
            "32" => Self::ReturnDetailAddendumA,
            "33" => Self::ReturnDetailAddendumB,
            "34" => Self::ReturnDetailAddendumC,
            "35" => Self::ReturnDetailAddendumD,
            "50" => Self::ImageViewDetail,
            "52" => Self::ImageViewData,
            "54" => Self::ImageViewAnalysis,
            "61" => Self::CreditItem,
            "62" => Self::Credit,
            "68" => Self::UserRecord,
            "70" => Self::BundleControl,
            "85" => Self::RoutingNumberSummary,
            "90" => Self::CashLetterControl,
            "99" => Self::FileControl,
            "40" => Self::Unmodeled("40"),
            "71" => Self::Unmodeled("71"),
            "75" => Self::Unmodeled("75"),
            other => {
                return Err(IclError::UnknownRecordType {
                    code: other.to_string(),
                })
            },
        };
        Ok(record_type)
    }

    /// The two-character code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FileHeader => "01",
            Self::CashLetterHeader => "10",
            Self::BundleHeader => "20",
            Self::CheckDetail => "25",
            Self::CheckDetailAddendumA => "26",
            Self::CheckDetailAddendumB => "27",
            Self::CheckDetailAddendumC => "28",
            Self::ReturnDetail => "31",
            Self::ReturnDetailAddendumA => "32",
            Self::ReturnDetailAddendumB => "33",
            Self::ReturnDetailAddendumC => "34",
            Self::ReturnDetailAddendumD => "35",
            Self::ImageViewDetail => "50",
            Self::ImageViewData => "52",
            Self::ImageViewAnalysis => "54",
            Self::CreditItem => "61",
            Self::Credit => "62",
            Self::UserRecord => "68",
            Self::BundleControl => "70",
            Self::RoutingNumberSummary => "85",
            Self::CashLetterControl => "90",
            Self::FileControl => "99",
            Self::Unmodeled(code) => *code,
        }
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FileHeader => "FileHeader",
            Self::CashLetterHeader => "CashLetterHeader",
            Self::BundleHeader => "BundleHeader",
            Self::CheckDetail => "CheckDetail",
            Self::CheckDetailAddendumA => "CheckDetailAddendumA",
            Self::CheckDetailAddendumB => "CheckDetailAddendumB",
            Self::CheckDetailAddendumC => "CheckDetailAddendumC",
            Self::ReturnDetail => "ReturnDetail",
            Self::ReturnDetailAddendumA => "ReturnDetailAddendumA",
            Self::ReturnDetailAddendumB => "ReturnDetailAddendumB",
            Self::ReturnDetailAddendumC => "ReturnDetailAddendumC",
            Self::ReturnDetailAddendumD => "ReturnDetailAddendumD",
            Self::ImageViewDetail => "ImageViewDetail",
            Self::ImageViewData => "ImageViewData",
            Self::ImageViewAnalysis => "ImageViewAnalysis",
            Self::CreditItem => "CreditItem",
            Self::Credit => "Credit",
            Self::UserRecord => "UserRecord",
            Self::BundleControl => "BundleControl",
            Self::RoutingNumberSummary => "RoutingNumberSummary",
            Self::CashLetterControl => "CashLetterControl",
            Self::FileControl => "FileControl",
            Self::Unmodeled(_) => "Unmodeled",
        }
    }

    /// Read the type code from the front of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is shorter than two bytes or the code is
    /// unknown.
    pub fn of(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(IclError::RecordWrongLength {
                expected: 2,
                length: bytes.len(),
            });
        }
        Self::from_code(&encoding.decode_to_string(&bytes[..2]))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Capabilities shared by every record kind.
pub trait IclRecord: fmt::Debug {
    /// The kind of this record.
    fn record_type(&self) -> RecordType;

    /// Parse a record from its bytes, type code included.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is wrong or a field cannot be parsed.
    fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self>
    where
        Self: Sized;

    /// Format the record as bytes, type code included.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value does not fit its field.
    fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>>;

    /// Check field-level rules, relaxed by `opts`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    fn validate_with(&self, opts: &ValidateOpts) -> Result<()>;

    /// Check field-level rules with every rule enforced.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    fn validate(&self) -> Result<()> {
        self.validate_with(&ValidateOpts::default())
    }
}

/// One physical record of any kind.
///
/// Details carry no children in this form: the reader attaches addenda and
/// image views as it assembles the tree.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Record {
    /// `01`
    FileHeader(FileHeader),
    /// `10`
    CashLetterHeader(CashLetterHeader),
    /// `20`
    BundleHeader(BundleHeader),
    /// `25`
    CheckDetail(CheckDetail),
    /// `26`
    CheckDetailAddendumA(CheckDetailAddendumA),
    /// `27`
    CheckDetailAddendumB(CheckDetailAddendumB),
    /// `28`
    CheckDetailAddendumC(CheckDetailAddendumC),
    /// `31`
    ReturnDetail(ReturnDetail),
    /// `32`
    ReturnDetailAddendumA(ReturnDetailAddendumA),
    /// `33`
    ReturnDetailAddendumB(ReturnDetailAddendumB),
    /// `34`
    ReturnDetailAddendumC(ReturnDetailAddendumC),
    /// `35`
    ReturnDetailAddendumD(ReturnDetailAddendumD),
    /// `50`
    ImageViewDetail(ImageViewDetail),
    /// `52`
    ImageViewData(ImageViewData),
    /// `54`
    ImageViewAnalysis(ImageViewAnalysis),
    /// `61`
    CreditItem(CreditItem),
    /// `62`
    Credit(Credit),
    /// `68`
    UserRecord(UserRecord),
    /// `70`
    BundleControl(BundleControl),
    /// `85`
    RoutingNumberSummary(RoutingNumberSummary),
    /// `90`
    CashLetterControl(CashLetterControl),
    /// `99`
    FileControl(FileControl),
    /// A recognised record with no typed value, kept as raw bytes.
    Unmodeled {
        /// Its code.
        record_type: RecordType,
        /// The record as read.
        bytes: Vec<u8>,
    },
}

macro_rules! dispatch {
    ($self:expr, $rec:ident => $body:expr, $kind:ident => $unmodeled:expr) => {
        match $self {
            Record::FileHeader($rec) => $body,
            Record::CashLetterHeader($rec) => $body,
            Record::BundleHeader($rec) => $body,
            Record::CheckDetail($rec) => $body,
            Record::CheckDetailAddendumA($rec) => $body,
            Record::CheckDetailAddendumB($rec) => $body,
            Record::CheckDetailAddendumC($rec) => $body,
            Record::ReturnDetail($rec) => $body,
            Record::ReturnDetailAddendumA($rec) => $body,
            Record::ReturnDetailAddendumB($rec) => $body,
            Record::ReturnDetailAddendumC($rec) => $body,
            Record::ReturnDetailAddendumD($rec) => $body,
            Record::ImageViewDetail($rec) => $body,
            Record::ImageViewData($rec) => $body,
            Record::ImageViewAnalysis($rec) => $body,
            Record::CreditItem($rec) => $body,
            Record::Credit($rec) => $body,
            Record::UserRecord($rec) => $body,
            Record::BundleControl($rec) => $body,
            Record::RoutingNumberSummary($rec) => $body,
            Record::CashLetterControl($rec) => $body,
            Record::FileControl($rec) => $body,
            Record::Unmodeled {
                record_type: $kind, ..
            } => $unmodeled,
        }
    };
}

impl Record {
    /// Parse any record, dispatching on its type code.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown codes or unparseable fields.
    pub fn parse(bytes: &[u8], encoding: Encoding) -> Result<Self> {
        let record_type = RecordType::of(bytes, encoding)?;
        let record = match record_type {
            RecordType::FileHeader => Self::FileHeader(FileHeader::parse(bytes, encoding)?),
            RecordType::CashLetterHeader => {
                Self::CashLetterHeader(CashLetterHeader::parse(bytes, encoding)?)
            },
            RecordType::BundleHeader => Self::BundleHeader(BundleHeader::parse(bytes, encoding)?),
            RecordType::CheckDetail => Self::CheckDetail(CheckDetail::parse(bytes, encoding)?),
            RecordType::CheckDetailAddendumA => {
                Self::CheckDetailAddendumA(CheckDetailAddendumA::parse(bytes, encoding)?)
            },
            RecordType::CheckDetailAddendumB => {
                Self::CheckDetailAddendumB(CheckDetailAddendumB::parse(bytes, encoding)?)
            },
            RecordType::CheckDetailAddendumC => {
                Self::CheckDetailAddendumC(CheckDetailAddendumC::parse(bytes, encoding)?)
            },
            RecordType::ReturnDetail => Self::ReturnDetail(ReturnDetail::parse(bytes, encoding)?),
            RecordType::ReturnDetailAddendumA => {
                Self::ReturnDetailAddendumA(ReturnDetailAddendumA::parse(bytes, encoding)?)
            },
            RecordType::ReturnDetailAddendumB => {
                Self::ReturnDetailAddendumB(ReturnDetailAddendumB::parse(bytes, encoding)?)
            },
            RecordType::ReturnDetailAddendumC => {
                Self::ReturnDetailAddendumC(ReturnDetailAddendumC::parse(bytes, encoding)?)
            },
            RecordType::ReturnDetailAddendumD => {
                Self::ReturnDetailAddendumD(ReturnDetailAddendumD::parse(bytes, encoding)?)
            },
            RecordType::ImageViewDetail => {
                Self::ImageViewDetail(ImageViewDetail::parse(bytes, encoding)?)
            },
            RecordType::ImageViewData => {
                Self::ImageViewData(ImageViewData::parse(bytes, encoding)?)
            },
            RecordType::ImageViewAnalysis => {
                Self::ImageViewAnalysis(ImageViewAnalysis::parse(bytes, encoding)?)
            },
            RecordType::CreditItem => Self::CreditItem(CreditItem::parse(bytes, encoding)?),
            RecordType::Credit => Self::Credit(Credit::parse(bytes, encoding)?),
            RecordType::UserRecord => Self::UserRecord(UserRecord::parse(bytes, encoding)?),
            RecordType::BundleControl => {
                Self::BundleControl(BundleControl::parse(bytes, encoding)?)
            },
            RecordType::RoutingNumberSummary => {
                Self::RoutingNumberSummary(RoutingNumberSummary::parse(bytes, encoding)?)
            },
            RecordType::CashLetterControl => {
                Self::CashLetterControl(CashLetterControl::parse(bytes, encoding)?)
            },
            RecordType::FileControl => Self::FileControl(FileControl::parse(bytes, encoding)?),
            RecordType::Unmodeled(_) => Self::Unmodeled {
                record_type,
                bytes: bytes.to_vec(),
            },
        };
        Ok(record)
    }

    /// The kind of this record.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        dispatch!(self, r => r.record_type(), kind => *kind)
    }

    /// Format the record as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error for unmodeled records or fields that do not fit.
    pub fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>> {
        dispatch!(self, r => r.to_bytes(encoding), kind => Err(IclError::file(
            "RecordType",
            kind.code(),
            "record type is not written",
        )))
    }

    /// Check field-level rules.
    ///
    /// # Errors
    ///
    /// Returns the first violation found. Unmodeled records always pass.
    pub fn validate_with(&self, opts: &ValidateOpts) -> Result<()> {
        dispatch!(self, r => r.validate_with(opts), _kind => Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_round_trips() {
        for code in [
            "01", "10", "20", "25", "26", "27", "28", "31", "32", "33", "34", "35", "40", "50",
            "52", "54", "61", "62", "68", "70", "71", "75", "85", "90", "99",
        ] {
            let record_type = RecordType::from_code(code).unwrap();
            assert_eq!(record_type.code(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        let err = RecordType::from_code("77").unwrap_err();
        assert!(matches!(err, IclError::UnknownRecordType { ref code } if code == "77"));
    }

    #[test]
    fn test_unmodeled_records_are_kept_raw() {
        let mut bytes = b"40".to_vec();
        bytes.resize(RECORD_LENGTH, b' ');
        let record = Record::parse(&bytes, Encoding::Ascii).unwrap();
        assert_eq!(record.record_type(), RecordType::Unmodeled("40"));
        assert!(record.to_bytes(Encoding::Ascii).is_err());
        assert!(record.validate_with(&ValidateOpts::default()).is_ok());
    }

    #[test]
    fn test_type_code_read_through_ebcdic() {
        let record_type = RecordType::of(&[0xF2, 0xF5], Encoding::Ebcdic).unwrap();
        assert_eq!(record_type, RecordType::CheckDetail);
    }

    #[test]
    fn test_display_names_code() {
        assert_eq!(RecordType::ImageViewData.to_string(), "ImageViewData (52)");
    }
}
