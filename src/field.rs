//! Fixed-width field codec shared by every record kind.
//!
//! An ICL record is a run of fixed-width slots. Each slot has a width, a
//! justification, and a pad character:
//!
//! | Kind | Justification | Pad | Parse |
//! |---|---|---|---|
//! | alphanumeric | left | space | trailing pad trimmed |
//! | numeric-blank (MICR text) | right | space | leading pad trimmed |
//! | numeric string | right | `0` | spaces trimmed, zeros kept |
//! | numeric | right | `0` | converted to an integer, blank is zero |
//! | date `yyyymmdd` / time `hhmm` | - | space when absent | `None` when blank or zero |
//!
//! [`FieldReader`] walks a record slice left to right and [`FieldWriter`]
//! builds one the same way. Both translate text through the configured
//! [`Encoding`] one field at a time; binary payloads are copied verbatim.

use crate::encoding::{text_bytes, Encoding};
use crate::error::{IclError, Result};
use chrono::{NaiveDate, NaiveTime};

/// Width of a `yyyymmdd` date field.
pub const DATE_WIDTH: usize = 8;
/// Width of a `hhmm` time field.
pub const TIME_WIDTH: usize = 4;

/// Cursor over the bytes of one record.
#[derive(Debug)]
pub struct FieldReader<'a> {
    record: &'static str,
    bytes: &'a [u8],
    pos: usize,
    encoding: Encoding,
}

impl<'a> FieldReader<'a> {
    /// Open a fixed-length record, rejecting any other width.
    ///
    /// The cursor starts after the two-character record type code.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::RecordWrongLength`] if `bytes` is not `expected` long.
    pub fn fixed(
        record: &'static str,
        bytes: &'a [u8],
        expected: usize,
        encoding: Encoding,
    ) -> Result<Self> {
        if bytes.len() != expected {
            return Err(IclError::RecordWrongLength {
                expected,
                length: bytes.len(),
            });
        }
        Ok(FieldReader {
            record,
            bytes,
            pos: 2,
            encoding,
        })
    }

    /// Open a variable-length record that is at least `minimum` bytes long.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::RecordWrongLength`] if `bytes` is shorter than `minimum`.
    pub fn variable(
        record: &'static str,
        bytes: &'a [u8],
        minimum: usize,
        encoding: Encoding,
    ) -> Result<Self> {
        if bytes.len() < minimum {
            return Err(IclError::RecordWrongLength {
                expected: minimum,
                length: bytes.len(),
            });
        }
        Ok(FieldReader {
            record,
            bytes,
            pos: 2,
            encoding,
        })
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, field: &'static str, width: usize) -> Result<&'a [u8]> {
        let end = self.pos + width;
        if end > self.bytes.len() {
            return Err(IclError::field(
                self.record,
                field,
                width,
                format!(
                    "field runs past the end of the record ({} bytes)",
                    self.bytes.len()
                ),
            ));
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn text(&mut self, field: &'static str, width: usize) -> Result<String> {
        let raw = self.take(field, width)?;
        Ok(self.encoding.decode_to_string(raw))
    }

    /// Skip a reserved slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot runs past the end of the record.
    pub fn skip(&mut self, width: usize) -> Result<()> {
        self.take("reserved", width).map(|_| ())
    }

    /// Read a left-justified alphanumeric field.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot runs past the end of the record.
    pub fn alpha(&mut self, field: &'static str, width: usize) -> Result<String> {
        let value = self.text(field, width)?;
        Ok(value.trim_end_matches(' ').to_string())
    }

    /// Read a right-justified, space-filled MICR field.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot runs past the end of the record.
    pub fn numeric_blank(&mut self, field: &'static str, width: usize) -> Result<String> {
        let value = self.text(field, width)?;
        Ok(value.trim_start_matches(' ').to_string())
    }

    /// Read a numeric field kept as text (routing numbers, sequence numbers).
    ///
    /// # Errors
    ///
    /// Returns an error if the slot runs past the end of the record.
    pub fn numeric_string(&mut self, field: &'static str, width: usize) -> Result<String> {
        let value = self.text(field, width)?;
        Ok(value.trim_matches(' ').to_string())
    }

    /// Read a numeric field as an integer; an all-blank field reads as zero.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the slot holds anything but digits.
    pub fn numeric<T: TryFrom<u64>>(&mut self, field: &'static str, width: usize) -> Result<T> {
        let value = self.text(field, width)?;
        let trimmed = value.trim_matches(' ');
        let parsed = if trimmed.is_empty() {
            0
        } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            trimmed
                .parse::<u64>()
                .map_err(|e| IclError::field(self.record, field, &value, e.to_string()))?
        } else {
            return Err(IclError::field(
                self.record,
                field,
                &value,
                "is not numeric",
            ));
        };
        T::try_from(parsed)
            .map_err(|_| IclError::field(self.record, field, &value, "is out of range"))
    }

    /// Read a `yyyymmdd` date; blank or all-zero means absent.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the slot is not a calendar date.
    pub fn date(&mut self, field: &'static str) -> Result<Option<NaiveDate>> {
        let value = self.text(field, DATE_WIDTH)?;
        parse_date(&value).map_err(|msg| IclError::field(self.record, field, &value, msg))
    }

    /// Read a `hhmm` time; blank means absent.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the slot is not a time of day.
    pub fn time(&mut self, field: &'static str) -> Result<Option<NaiveTime>> {
        let value = self.text(field, TIME_WIDTH)?;
        parse_time(&value).map_err(|msg| IclError::field(self.record, field, &value, msg))
    }

    /// Read a variable-length text payload of `len` bytes, untrimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload runs past the end of the record.
    pub fn variable_text(&mut self, field: &'static str, len: usize) -> Result<String> {
        self.text(field, len)
    }

    /// Read a binary payload of `len` bytes without translation.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload runs past the end of the record.
    pub fn binary(&mut self, field: &'static str, len: usize) -> Result<Vec<u8>> {
        Ok(self.take(field, len)?.to_vec())
    }
}

/// Builder for the bytes of one record.
#[derive(Debug)]
pub struct FieldWriter {
    record: &'static str,
    buf: Vec<u8>,
    encoding: Encoding,
}

impl FieldWriter {
    /// Start a record, writing its type code.
    #[must_use]
    pub fn new(record: &'static str, code: &str, capacity: usize, encoding: Encoding) -> Self {
        let mut buf = Vec::with_capacity(capacity);
        buf.extend(encoding.encode(code.as_bytes()));
        FieldWriter {
            record,
            buf,
            encoding,
        }
    }

    fn push_text(&mut self, text: &[u8]) {
        self.buf.extend(self.encoding.encode(text));
    }

    fn pad(&mut self, fill: u8, count: usize) {
        let padding = vec![fill; count];
        self.push_text(&padding);
    }

    /// Write a left-justified alphanumeric field, truncating on the right.
    pub fn alpha(&mut self, value: &str, width: usize) {
        let bytes = text_bytes(value);
        let used = bytes.len().min(width);
        self.push_text(&bytes[..used]);
        self.pad(b' ', width - used);
    }

    /// Write a right-justified, space-filled MICR field, truncating on the right.
    pub fn numeric_blank(&mut self, value: &str, width: usize) {
        let bytes = text_bytes(value);
        let used = bytes.len().min(width);
        self.pad(b' ', width - used);
        self.push_text(&bytes[..used]);
    }

    /// Write a numeric field held as text, zero-filled on the left.
    ///
    /// An empty value is written as blanks.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the value is wider than the slot.
    pub fn numeric_string(&mut self, field: &'static str, value: &str, width: usize) -> Result<()> {
        if value.is_empty() {
            self.pad(b' ', width);
            return Ok(());
        }
        let bytes = text_bytes(value);
        if bytes.len() > width {
            return Err(IclError::field(
                self.record,
                field,
                value,
                format!("exceeds the field width of {width}"),
            ));
        }
        self.pad(b'0', width - bytes.len());
        self.push_text(&bytes);
        Ok(())
    }

    /// Write an integer, zero-filled on the left.
    ///
    /// # Errors
    ///
    /// Returns [`IclError::Field`] if the value needs more than `width` digits.
    pub fn numeric(&mut self, field: &'static str, value: u64, width: usize) -> Result<()> {
        let digits = value.to_string();
        if digits.len() > width {
            return Err(IclError::field(
                self.record,
                field,
                value,
                format!("exceeds {width} digits"),
            ));
        }
        self.pad(b'0', width - digits.len());
        self.push_text(digits.as_bytes());
        Ok(())
    }

    /// Write a `yyyymmdd` date, blanks when absent.
    pub fn date(&mut self, value: Option<NaiveDate>) {
        match value {
            Some(date) => self.push_text(date.format("%Y%m%d").to_string().as_bytes()),
            None => self.pad(b' ', DATE_WIDTH),
        }
    }

    /// Write a `hhmm` time, blanks when absent.
    pub fn time(&mut self, value: Option<NaiveTime>) {
        match value {
            Some(time) => self.push_text(time.format("%H%M").to_string().as_bytes()),
            None => self.pad(b' ', TIME_WIDTH),
        }
    }

    /// Write a variable-length text payload as-is.
    pub fn variable_text(&mut self, value: &str) {
        self.push_text(&text_bytes(value));
    }

    /// Write a binary payload without translation.
    pub fn binary(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write a blank reserved slot.
    pub fn reserved(&mut self, width: usize) {
        self.pad(b' ', width);
    }

    /// Current length of the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written (never true once the code is written).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish the record.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Read a length field at `start` without building a full record.
///
/// Returns `None` if the slot is out of range or not numeric; a blank slot
/// reads as zero.
#[must_use]
pub fn peek_length(bytes: &[u8], start: usize, width: usize, encoding: Encoding) -> Option<usize> {
    let raw = bytes.get(start..start + width)?;
    let text = encoding.decode_to_string(raw);
    let trimmed = text.trim_matches(' ');
    if trimmed.is_empty() {
        return Some(0);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse `yyyymmdd`, treating blanks and zeros as absent.
///
/// # Errors
///
/// Returns a message describing why the text is not a date.
pub fn parse_date(value: &str) -> std::result::Result<Option<NaiveDate>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.bytes().all(|b| b == b'0') {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y%m%d")
        .map(Some)
        .map_err(|e| format!("is not a yyyymmdd date: {e}"))
}

/// Parse `hhmm`, treating blanks as absent.
///
/// # Errors
///
/// Returns a message describing why the text is not a time.
pub fn parse_time(value: &str) -> std::result::Result<Option<NaiveTime>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H%M")
        .map(Some)
        .map_err(|e| format!("is not a hhmm time: {e}"))
}
