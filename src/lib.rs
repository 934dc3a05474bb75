#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`records`]: Typed values for every record kind and the [`IclRecord`] trait
//! - [`field`]: Fixed-width field reader/writer used by every record
//! - [`encoding`]: ASCII and EBCDIC (code page 037) translation
//! - [`reader`]: Reading ICL files from byte streams
//! - [`writer`]: Writing ICL files to byte streams
//! - [`file`], [`cash_letter`], [`bundle`]: The tree, with `create` and `validate`
//! - [`validation`]: Field rules and enumerations
//! - [`config`]: Reader, writer, and validation options
//! - [`json`]: JSON projection of the tree
//! - [`error`]: Error types and result type
//!
//! ## Framing and encoding
//!
//! - **Fixed**: 80-byte records separated by `\n` (`\r\n` accepted on read)
//! - **Variable**: every record preceded by a 4-byte big-endian length
//! - **ASCII** or **EBCDIC** text; image and signature bytes are never translated

pub mod bundle;
pub mod cash_letter;
pub mod config;
pub mod encoding;
pub mod error;
pub mod field;
pub mod file;
pub mod json;
pub mod macros;
pub mod reader;
pub mod records;
pub mod validation;
pub mod writer;

pub use bundle::Bundle;
pub use cash_letter::CashLetter;
pub use config::{ReaderOptions, ValidateOpts, WriterOptions};
pub use encoding::Encoding;
pub use error::{IclError, Result};
pub use file::File;
pub use reader::IclReader;
pub use records::{
    BundleControl, BundleHeader, CashLetterControl, CashLetterHeader, CheckDetail,
    CheckDetailAddendumA, CheckDetailAddendumB, CheckDetailAddendumC, Credit, CreditItem,
    FileControl, FileHeader, IclRecord, ImageViewAnalysis, ImageViewData, ImageViewDetail, Item,
    Record, RecordType, ReturnDetail, ReturnDetailAddendumA, ReturnDetailAddendumB,
    ReturnDetailAddendumC, ReturnDetailAddendumD, RoutingNumberSummary, UserRecord,
};
pub use writer::IclWriter;
