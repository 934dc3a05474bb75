//! Error types for ICL operations.
//!
//! This module provides the [`IclError`] type for all library operations and the
//! [`Result`] convenience type.

use thiserror::Error;

/// Error type for all ICL library operations.
///
/// Every variant renders as a single human-readable line naming the record,
/// field, offending value, and the rule that was broken.
#[derive(Error, Debug)]
pub enum IclError {
    /// A single field of a record holds an invalid value.
    #[error("{record} {field} {value:?}: {msg}")]
    Field {
        /// Record kind, e.g. `CheckDetail`.
        record: &'static str,
        /// Field name, e.g. `DocumentationTypeIndicator`.
        field: &'static str,
        /// The offending value as text.
        value: String,
        /// The violated rule.
        msg: String,
    },

    /// A fixed-length record does not have its declared byte width.
    #[error("record length {length} does not match the expected length {expected}")]
    RecordWrongLength {
        /// Declared width.
        expected: usize,
        /// Actual width.
        length: usize,
    },

    /// Structural problem in the file tree: illegal record order, missing
    /// control record, control totals or sequence numbers that disagree with
    /// their children.
    #[error("{msg} ({field_name} {value:?})")]
    File {
        /// The field or record the rule concerns.
        field_name: String,
        /// The offending value as text.
        value: String,
        /// The violated rule.
        msg: String,
    },

    /// A two-character type code outside the recognised set.
    #[error("unknown record type {code:?}")]
    UnknownRecordType {
        /// The code as read from the stream.
        code: String,
    },

    /// A lower-level error annotated with where in the stream it happened.
    #[error("line {line} (byte offset {offset}): {source}")]
    Parse {
        /// 1-based record (line) number.
        line: usize,
        /// Byte offset of the start of the record.
        offset: u64,
        /// The underlying error.
        #[source]
        source: Box<IclError>,
    },

    /// A physical record is larger than the reader's buffer ceiling.
    #[error("record of {length} bytes exceeds the buffer size of {limit} bytes")]
    BufferSizeExceeded {
        /// Size of the record.
        length: usize,
        /// Configured ceiling.
        limit: usize,
    },

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON handed to the JSON bridge.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IclError {
    /// Build an [`IclError::Field`].
    pub fn field(
        record: &'static str,
        field: &'static str,
        value: impl ToString,
        msg: impl Into<String>,
    ) -> Self {
        IclError::Field {
            record,
            field,
            value: value.to_string(),
            msg: msg.into(),
        }
    }

    /// Build an [`IclError::File`].
    pub fn file(
        field_name: impl Into<String>,
        value: impl ToString,
        msg: impl Into<String>,
    ) -> Self {
        IclError::File {
            field_name: field_name.into(),
            value: value.to_string(),
            msg: msg.into(),
        }
    }

    /// Wrap this error with its position in the input stream.
    #[must_use]
    pub fn at(self, line: usize, offset: u64) -> Self {
        IclError::Parse {
            line,
            offset,
            source: Box::new(self),
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`IclError`].
pub type Result<T> = std::result::Result<T, IclError>;
