//! Writing ICL files to byte streams.
//!
//! [`IclWriter`] walks a [`File`] in pre-order and emits every record with the
//! framing and encoding chosen by [`WriterOptions`]. Control records must be
//! present, so a tree built by hand needs [`File::create`] first.
//!
//! # Examples
//!
//! Writing to a buffer:
//!
//! ```
//! use imagecashletter::records::{CashLetterControl, CashLetterHeader, FileHeader};
//! use imagecashletter::{CashLetter, File, IclWriter, ValidateOpts};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut file = File::new(FileHeader::new());
//! let mut cash_letter = CashLetter::new(CashLetterHeader::default());
//! cash_letter.set_control(CashLetterControl::default());
//! file.add_cash_letter(cash_letter);
//! file.set_validation(ValidateOpts::skip_all());
//! file.create()?;
//!
//! let mut buffer = Vec::new();
//! let mut writer = IclWriter::new(&mut buffer);
//! writer.write(&file)?;
//! writer.finish()?;
//! assert_eq!(writer.records_written(), 4);
//! # Ok(())
//! # }
//! ```

use crate::bundle::Bundle;
use crate::cash_letter::CashLetter;
use crate::config::WriterOptions;
use crate::error::{IclError, Result};
use crate::file::File;
use crate::records::{IclRecord, Item, Record};
use log::{debug, trace};
use std::io::Write;

/// Writer for ICL files.
///
/// Fixed framing ends every record with `\n`. Variable framing precedes every
/// record with its length as a 4-byte big-endian integer and adds nothing
/// after it.
#[derive(Debug)]
pub struct IclWriter<W: Write> {
    writer: W,
    options: WriterOptions,
    records_written: usize,
    finished: bool,
}

impl<W: Write> IclWriter<W> {
    /// Create a writer with default options: fixed framing, ASCII,
    /// interleaved image views.
    pub fn new(writer: W) -> Self {
        IclWriter {
            writer,
            options: WriterOptions::default(),
            records_written: 0,
            finished: false,
        }
    }

    /// Replace the writer options.
    #[must_use]
    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Write one record with the configured framing and encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer has been finished, if a field does not
    /// fit its width, or if writing to the underlying stream fails.
    pub fn write_record(&mut self, record: &dyn IclRecord) -> Result<()> {
        self.ensure_open()?;
        let bytes = record.to_bytes(self.options.encoding())?;
        trace!("writing {} ({} bytes)", record.record_type(), bytes.len());
        self.emit(&bytes)
    }

    /// Write one [`Record`] token.
    ///
    /// # Errors
    ///
    /// As [`write_record`](Self::write_record); unmodeled record kinds are
    /// rejected.
    pub fn write_token(&mut self, record: &Record) -> Result<()> {
        self.ensure_open()?;
        let bytes = record.to_bytes(self.options.encoding())?;
        trace!("writing {} ({} bytes)", record.record_type(), bytes.len());
        self.emit(&bytes)
    }

    /// Write a whole file.
    ///
    /// Root-level bundles follow the file header and precede the cash
    /// letters.
    ///
    /// # Errors
    ///
    /// Returns an error if a control record is missing, if a record cannot be
    /// formatted, or if writing fails. Output written before the error is
    /// left in the stream.
    pub fn write(&mut self, file: &File) -> Result<()> {
        self.ensure_open()?;
        let before = self.records_written;

        self.write_record(&file.header)?;
        for bundle in &file.bundles {
            self.write_bundle(bundle)?;
        }
        for cash_letter in &file.cash_letters {
            self.write_cash_letter(cash_letter)?;
        }
        let control = file.control.as_ref().ok_or_else(|| missing_control("FileControl"))?;
        self.write_record(control)?;

        debug!(
            "wrote {} records for file {:?}",
            self.records_written - before,
            file.id
        );
        Ok(())
    }

    fn write_cash_letter(&mut self, cash_letter: &CashLetter) -> Result<()> {
        self.write_record(&cash_letter.cash_letter_header)?;
        for bundle in &cash_letter.bundles {
            self.write_bundle(bundle)?;
        }
        for summary in &cash_letter.routing_number_summary {
            self.write_record(summary)?;
        }
        for item in &cash_letter.credit_items {
            self.write_record(item)?;
        }
        for credit in &cash_letter.credits {
            self.write_record(credit)?;
        }
        let control = cash_letter
            .cash_letter_control
            .as_ref()
            .ok_or_else(|| missing_control("CashLetterControl"))?;
        self.write_record(control)
    }

    fn write_bundle(&mut self, bundle: &Bundle) -> Result<()> {
        self.write_record(&bundle.bundle_header)?;
        let collated = self.options.collated_image_view;
        for item in bundle.items() {
            self.write_record(item.as_record())?;
            item.for_each_addendum(&mut |addendum| self.write_record(addendum))?;
            if !collated {
                self.write_image_views(item)?;
            }
            for user in item.user_records() {
                self.write_record(user)?;
            }
        }
        if collated {
            for item in bundle.items() {
                self.write_image_views(item)?;
            }
        }
        let control = bundle
            .bundle_control
            .as_ref()
            .ok_or_else(|| missing_control("BundleControl"))?;
        self.write_record(control)
    }

    // Triples are written by index; a list shorter than the others just
    // leaves its slot out.
    fn write_image_views(&mut self, item: &dyn Item) -> Result<()> {
        let details = item.image_view_detail();
        let data = item.image_view_data();
        let analysis = item.image_view_analysis();
        let views = details.len().max(data.len()).max(analysis.len());
        for index in 0..views {
            if let Some(detail) = details.get(index) {
                self.write_record(detail)?;
            }
            if let Some(data) = data.get(index) {
                self.write_record(data)?;
            }
            if let Some(analysis) = analysis.get(index) {
                self.write_record(analysis)?;
            }
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            return Err(IclError::file(
                "IclWriter",
                "finished",
                "cannot write to a finished writer",
            ));
        }
        Ok(())
    }

    fn emit(&mut self, bytes: &[u8]) -> Result<()> {
        if self.options.variable_line_length {
            let length = u32::try_from(bytes.len()).map_err(|_| {
                IclError::file(
                    "RecordLength",
                    bytes.len(),
                    "record is too long for a 4-byte length prefix",
                )
            })?;
            self.writer.write_all(&length.to_be_bytes())?;
            self.writer.write_all(bytes)?;
        } else {
            self.writer.write_all(bytes)?;
            self.writer.write_all(b"\n")?;
        }
        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// After calling `finish`, no more records can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn missing_control(record: &str) -> IclError {
    IclError::file(
        record,
        "",
        format!("{record} record is mandatory, call create before writing"),
    )
}
