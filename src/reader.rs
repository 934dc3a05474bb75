//! Reading ICL files from byte streams.
//!
//! [`IclReader`] splits a stream into physical records, decodes each one,
//! and assembles the records into a [`File`] tree.
//!
//! Two framings are understood:
//!
//! - **fixed** (default): records are lines separated by `\n` (`\r\n` is
//!   accepted). A variable-length record whose payload contains a newline
//!   byte keeps consuming lines until its declared lengths are satisfied.
//! - **variable**: every record is preceded by a 4-byte big-endian length.
//!
//! # Examples
//!
//! ```no_run
//! use imagecashletter::{IclReader, ReaderOptions};
//! use std::fs::File;
//!
//! let input = File::open("valid-ebcdic.x937")?;
//! let options = ReaderOptions::new()
//!     .with_variable_line_length(true)
//!     .with_ebcdic_encoding(true);
//! let mut reader = IclReader::new(input).with_options(options);
//! let file = reader.read()?;
//! println!("{} cash letters", file.cash_letters.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::bundle::Bundle;
use crate::cash_letter::CashLetter;
use crate::config::ReaderOptions;
use crate::encoding::Encoding;
use crate::error::{IclError, Result};
use crate::file::File;
use crate::records::credit::CREDIT_ITEM_LENGTH;
use crate::records::{
    BundleControl, CashLetterControl, CheckDetail, CheckDetailAddendumB, FileControl,
    ImageViewData, ImageViewDetail, Item, Record, RecordType, ReturnDetail,
    ReturnDetailAddendumC, UserRecord, RECORD_LENGTH,
};
use log::{debug, trace, warn};
use std::io::{BufRead, BufReader, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Check,
    Return,
}

/// Reader for ICL files.
#[derive(Debug)]
pub struct IclReader<R: Read> {
    reader: BufReader<R>,
    options: ReaderOptions,
    file: File,
    line: usize,
    offset: u64,
    record_offset: u64,
    records_read: usize,
    header_seen: bool,
    finished: bool,
    cash_letter_open: bool,
    bundle_open: bool,
    root_bundle: bool,
    item: Option<ItemKind>,
    images_started: bool,
    pending_detail: Option<ImageViewDetail>,
    image_target: Option<(ItemKind, usize)>,
}

impl<R: Read> IclReader<R> {
    /// Create a reader with default options: fixed framing, ASCII.
    pub fn new(reader: R) -> Self {
        IclReader {
            reader: BufReader::new(reader),
            options: ReaderOptions::default(),
            file: File::default(),
            line: 0,
            offset: 0,
            record_offset: 0,
            records_read: 0,
            header_seen: false,
            finished: false,
            cash_letter_open: false,
            bundle_open: false,
            root_bundle: false,
            item: None,
            images_started: false,
            pending_detail: None,
            image_target: None,
        }
    }

    /// Replace the framing, encoding, and buffer options.
    #[must_use]
    pub fn with_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of records decoded so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// The tree assembled so far. After a failed [`read`](Self::read) this
    /// holds everything up to the offending record.
    #[must_use]
    pub fn partial_file(&self) -> &File {
        &self.file
    }

    /// Take the tree assembled so far.
    #[must_use]
    pub fn into_partial_file(self) -> File {
        self.file
    }

    /// Read and decode the next physical record without attaching it to the
    /// tree.
    ///
    /// Returns `Ok(None)` at end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error, annotated with the record's position, if the stream
    /// fails, the record exceeds the buffer size, or it cannot be decoded.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let start = self.offset;
        let line = self.line + 1;
        let framed = if self.options.variable_line_length {
            self.next_prefixed()
        } else {
            self.next_line()
        };
        let Some(bytes) = framed.map_err(|e| e.at(line, start))? else {
            return Ok(None);
        };
        self.line = line;
        self.record_offset = start;
        let record = Record::parse(&bytes, self.options.encoding()).map_err(|e| e.at(line, start))?;
        self.records_read += 1;
        trace!("line {line}: {}", record.record_type());
        Ok(Some(record))
    }

    /// Read the whole stream and assemble it into a [`File`].
    ///
    /// Absent bundle, cash letter, and file controls are replaced with empty
    /// ones; call [`File::create`] to recompute them.
    ///
    /// # Errors
    ///
    /// Returns the first framing, decoding, or ordering error, annotated with
    /// the record's position. The partial tree stays available through
    /// [`partial_file`](Self::partial_file).
    pub fn read(&mut self) -> Result<File> {
        while let Some(record) = self.read_record()? {
            let (line, offset) = (self.line, self.record_offset);
            self.accept(record).map_err(|e| e.at(line, offset))?;
        }
        self.finish().map_err(|e| e.at(self.line, self.offset))?;
        debug!("read {} records", self.records_read);
        Ok(std::mem::take(&mut self.file))
    }

    fn next_prefixed(&mut self) -> Result<Option<Vec<u8>>> {
        if self.reader.fill_buf()?.is_empty() {
            return Ok(None);
        }
        let mut prefix = [0u8; 4];
        self.reader.read_exact(&mut prefix)?;
        let length = u32::from_be_bytes(prefix) as usize;
        if length > self.options.buffer_size {
            return Err(IclError::BufferSizeExceeded {
                length,
                limit: self.options.buffer_size,
            });
        }
        let mut bytes = vec![0u8; length];
        self.reader.read_exact(&mut bytes)?;
        self.offset += 4 + length as u64;
        Ok(Some(bytes))
    }

    fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut bytes = Vec::new();
        loop {
            if !self.read_line(&mut bytes)? {
                return Ok(None);
            }
            if !(bytes.is_empty() || bytes == b"\r") {
                break;
            }
            bytes.clear();
        }

        // Binary payloads may contain the separator: keep reading until the
        // declared lengths are covered.
        let encoding = self.options.encoding();
        while let Some(need) = variable_length(&bytes, encoding) {
            if need <= bytes.len() {
                break;
            }
            let before = bytes.len();
            bytes.push(b'\n');
            if !self.read_line(&mut bytes)? {
                bytes.truncate(before);
                break;
            }
        }

        let expected = variable_length(&bytes, encoding).or_else(|| fixed_length(&bytes, encoding));
        if bytes.last() == Some(&b'\r') && expected.map_or(true, |need| bytes.len() > need) {
            bytes.pop();
        }
        Ok(Some(bytes))
    }

    // Append one line, without its separator, to `bytes`; false at end of stream.
    fn read_line(&mut self, bytes: &mut Vec<u8>) -> Result<bool> {
        let before = bytes.len();
        let read = self.reader.read_until(b'\n', bytes)?;
        if read == 0 {
            return Ok(false);
        }
        self.offset += read as u64;
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        if bytes.len() - before > self.options.buffer_size {
            return Err(IclError::BufferSizeExceeded {
                length: bytes.len() - before,
                limit: self.options.buffer_size,
            });
        }
        Ok(true)
    }

    fn unexpected(record_type: RecordType) -> IclError {
        IclError::file(
            "RecordType",
            record_type.code(),
            format!("unexpected {} record", record_type.name()),
        )
    }

    fn open_bundle(&mut self) -> Option<&mut Bundle> {
        if !self.bundle_open {
            return None;
        }
        if self.root_bundle {
            self.file.bundles.last_mut()
        } else {
            self.file.cash_letters.last_mut()?.bundles.last_mut()
        }
    }

    fn open_cash_letter(&mut self) -> Option<&mut CashLetter> {
        if !self.cash_letter_open {
            return None;
        }
        self.file.cash_letters.last_mut()
    }

    fn newest_check(&mut self, record_type: RecordType) -> Result<&mut CheckDetail> {
        if self.item != Some(ItemKind::Check) {
            return Err(Self::unexpected(record_type));
        }
        self.open_bundle()
            .and_then(|bundle| bundle.checks.last_mut())
            .ok_or_else(|| Self::unexpected(record_type))
    }

    fn newest_return(&mut self, record_type: RecordType) -> Result<&mut ReturnDetail> {
        if self.item != Some(ItemKind::Return) {
            return Err(Self::unexpected(record_type));
        }
        self.open_bundle()
            .and_then(|bundle| bundle.returns.last_mut())
            .ok_or_else(|| Self::unexpected(record_type))
    }

    // Addenda precede the item's image views.
    fn check_for_addendum(&mut self, record_type: RecordType) -> Result<&mut CheckDetail> {
        if self.images_started {
            return Err(Self::unexpected(record_type));
        }
        self.newest_check(record_type)
    }

    fn return_for_addendum(&mut self, record_type: RecordType) -> Result<&mut ReturnDetail> {
        if self.images_started {
            return Err(Self::unexpected(record_type));
        }
        self.newest_return(record_type)
    }

    fn newest_item(&mut self, record_type: RecordType) -> Result<&mut dyn Item> {
        match self.item {
            Some(ItemKind::Check) => {
                let check: &mut dyn Item = self.newest_check(record_type)?;
                Ok(check)
            },
            Some(ItemKind::Return) => {
                let ret: &mut dyn Item = self.newest_return(record_type)?;
                Ok(ret)
            },
            None => Err(Self::unexpected(record_type)),
        }
    }

    fn ensure_no_pending_image(&self) -> Result<()> {
        if self.pending_detail.is_some() {
            return Err(IclError::file(
                "ImageViewData",
                "",
                "ImageViewDetail is not followed by its ImageViewData",
            ));
        }
        Ok(())
    }

    fn close_bundle(&mut self) -> Result<()> {
        self.ensure_no_pending_image()?;
        if let Some(bundle) = self.open_bundle() {
            if bundle.bundle_control.is_none() {
                warn!(
                    "bundle {:?} has no BundleControl, using an empty one",
                    bundle.bundle_header.bundle_id
                );
                bundle.bundle_control = Some(BundleControl::default());
            }
        }
        self.bundle_open = false;
        self.root_bundle = false;
        self.item = None;
        self.images_started = false;
        self.image_target = None;
        Ok(())
    }

    fn close_cash_letter(&mut self) -> Result<()> {
        self.close_bundle()?;
        if let Some(cash_letter) = self.open_cash_letter() {
            if cash_letter.cash_letter_control.is_none() {
                warn!(
                    "cash letter {:?} has no CashLetterControl, using an empty one",
                    cash_letter.cash_letter_header.cash_letter_id
                );
                cash_letter.cash_letter_control = Some(CashLetterControl::default());
            }
        }
        self.cash_letter_open = false;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if !self.header_seen {
            return Err(IclError::file(
                "FileHeader",
                "",
                "FileHeader record is mandatory",
            ));
        }
        self.close_cash_letter()?;
        if self.file.control.is_none() {
            warn!("file has no FileControl, using an empty one");
            self.file.control = Some(FileControl::default());
        }
        self.finished = true;
        Ok(())
    }

    // Attach one record to the tree, enforcing the legal record order.
    #[allow(clippy::too_many_lines)]
    fn accept(&mut self, record: Record) -> Result<()> {
        let record_type = record.record_type();
        if self.finished || (!self.header_seen && record_type != RecordType::FileHeader) {
            return Err(Self::unexpected(record_type));
        }
        match record {
            Record::FileHeader(header) => {
                if self.header_seen {
                    return Err(Self::unexpected(record_type));
                }
                self.file.header = header;
                self.header_seen = true;
            },
            Record::CashLetterHeader(header) => {
                self.close_cash_letter()?;
                self.file.cash_letters.push(CashLetter::new(header));
                self.cash_letter_open = true;
            },
            Record::BundleHeader(header) => {
                self.close_bundle()?;
                let bundle = Bundle::new(header);
                if let Some(cash_letter) = self.open_cash_letter() {
                    cash_letter.bundles.push(bundle);
                } else if self.file.cash_letters.is_empty() {
                    // Legacy files may carry bundles ahead of the first cash letter.
                    debug!("bundle outside any cash letter");
                    self.file.bundles.push(bundle);
                    self.root_bundle = true;
                } else {
                    return Err(Self::unexpected(record_type));
                }
                self.bundle_open = true;
            },
            Record::CheckDetail(check) => {
                self.ensure_no_pending_image()?;
                let bundle = self
                    .open_bundle()
                    .ok_or_else(|| Self::unexpected(record_type))?;
                bundle.checks.push(check);
                self.item = Some(ItemKind::Check);
                self.images_started = false;
            },
            Record::ReturnDetail(ret) => {
                self.ensure_no_pending_image()?;
                let bundle = self
                    .open_bundle()
                    .ok_or_else(|| Self::unexpected(record_type))?;
                bundle.returns.push(ret);
                self.item = Some(ItemKind::Return);
                self.images_started = false;
            },
            Record::CheckDetailAddendumA(a) => {
                self.check_for_addendum(record_type)?.check_detail_addendum_a.push(a);
            },
            Record::CheckDetailAddendumB(b) => {
                self.check_for_addendum(record_type)?.check_detail_addendum_b.push(b);
            },
            Record::CheckDetailAddendumC(c) => {
                self.check_for_addendum(record_type)?.check_detail_addendum_c.push(c);
            },
            Record::ReturnDetailAddendumA(a) => {
                self.return_for_addendum(record_type)?.return_detail_addendum_a.push(a);
            },
            Record::ReturnDetailAddendumB(b) => {
                self.return_for_addendum(record_type)?.return_detail_addendum_b.push(b);
            },
            Record::ReturnDetailAddendumC(c) => {
                self.return_for_addendum(record_type)?.return_detail_addendum_c.push(c);
            },
            Record::ReturnDetailAddendumD(d) => {
                self.return_for_addendum(record_type)?.return_detail_addendum_d.push(d);
            },
            Record::ImageViewDetail(detail) => {
                self.ensure_no_pending_image()?;
                if self.item.is_none() {
                    return Err(Self::unexpected(record_type));
                }
                self.pending_detail = Some(detail);
                self.images_started = true;
            },
            Record::ImageViewData(data) => {
                let detail = self
                    .pending_detail
                    .take()
                    .ok_or_else(|| Self::unexpected(record_type))?;
                self.attach_image(detail, data, record_type)?;
            },
            Record::ImageViewAnalysis(analysis) => {
                let (kind, index) = self
                    .image_target
                    .take()
                    .ok_or_else(|| Self::unexpected(record_type))?;
                let bundle = self
                    .open_bundle()
                    .ok_or_else(|| Self::unexpected(record_type))?;
                let item: Option<&mut dyn Item> = match kind {
                    ItemKind::Check => bundle.checks.get_mut(index).map(|c| c as &mut dyn Item),
                    ItemKind::Return => bundle.returns.get_mut(index).map(|r| r as &mut dyn Item),
                };
                item.ok_or_else(|| Self::unexpected(record_type))?
                    .image_view_analysis_mut()
                    .push(analysis);
            },
            Record::UserRecord(user) => {
                self.newest_item(record_type)?.user_records_mut().push(user);
            },
            Record::CreditItem(item) => {
                self.close_bundle()?;
                self.open_cash_letter()
                    .ok_or_else(|| Self::unexpected(record_type))?
                    .credit_items
                    .push(item);
            },
            Record::Credit(credit) => {
                self.close_bundle()?;
                self.open_cash_letter()
                    .ok_or_else(|| Self::unexpected(record_type))?
                    .credits
                    .push(credit);
            },
            Record::BundleControl(control) => {
                self.ensure_no_pending_image()?;
                self.open_bundle()
                    .ok_or_else(|| Self::unexpected(record_type))?
                    .bundle_control = Some(control);
                self.close_bundle()?;
            },
            Record::RoutingNumberSummary(summary) => {
                self.close_bundle()?;
                self.open_cash_letter()
                    .ok_or_else(|| Self::unexpected(record_type))?
                    .routing_number_summary
                    .push(summary);
            },
            Record::CashLetterControl(control) => {
                self.close_bundle()?;
                self.open_cash_letter()
                    .ok_or_else(|| Self::unexpected(record_type))?
                    .cash_letter_control = Some(control);
                self.close_cash_letter()?;
            },
            Record::FileControl(control) => {
                self.close_cash_letter()?;
                self.file.control = Some(control);
                self.finished = true;
            },
            Record::Unmodeled { record_type, .. } => {
                warn!("skipping {record_type} record");
            },
        }
        Ok(())
    }

    fn attach_image(
        &mut self,
        detail: ImageViewDetail,
        data: ImageViewData,
        record_type: RecordType,
    ) -> Result<()> {
        let kind = self.item.ok_or_else(|| Self::unexpected(record_type))?;
        let bundle = self
            .open_bundle()
            .ok_or_else(|| Self::unexpected(record_type))?;
        let sequence = data.ece_institution_item_sequence_number.as_str();
        let index = match kind {
            ItemKind::Check => matching_item(&bundle.checks, sequence),
            ItemKind::Return => matching_item(&bundle.returns, sequence),
        }
        .ok_or_else(|| Self::unexpected(record_type))?;
        let item: &mut dyn Item = match kind {
            ItemKind::Check => &mut bundle.checks[index],
            ItemKind::Return => &mut bundle.returns[index],
        };
        item.image_view_detail_mut().push(detail);
        item.image_view_data_mut().push(data);
        self.image_target = Some((kind, index));
        Ok(())
    }
}

// The newest item carrying `sequence`, else the newest item.
fn matching_item<T: Item>(items: &[T], sequence: &str) -> Option<usize> {
    let matched = if sequence.is_empty() {
        None
    } else {
        items
            .iter()
            .rposition(|item| item.ece_institution_item_sequence_number() == sequence)
    };
    matched.or_else(|| items.len().checked_sub(1))
}

// Full length of a variable-length record, from its own length fields.
fn variable_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
    match RecordType::of(bytes, encoding).ok()? {
        RecordType::ImageViewData => ImageViewData::framed_length(bytes, encoding),
        RecordType::UserRecord => UserRecord::framed_length(bytes, encoding),
        RecordType::CheckDetailAddendumB => CheckDetailAddendumB::framed_length(bytes, encoding),
        RecordType::ReturnDetailAddendumC => ReturnDetailAddendumC::framed_length(bytes, encoding),
        _ => None,
    }
}

fn fixed_length(bytes: &[u8], encoding: Encoding) -> Option<usize> {
    match RecordType::of(bytes, encoding).ok()? {
        RecordType::CreditItem => Some(CREDIT_ITEM_LENGTH),
        RecordType::Unmodeled(_) => None,
        _ => Some(RECORD_LENGTH),
    }
}

impl<R: Read> Iterator for IclReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FileHeader, IclRecord};
    use std::io::Cursor;

    fn line(record: &dyn IclRecord) -> Vec<u8> {
        let mut bytes = record.to_bytes(Encoding::Ascii).unwrap();
        bytes.push(b'\n');
        bytes
    }

    fn header_line() -> Vec<u8> {
        line(&FileHeader::new())
    }

    #[test]
    fn test_empty_stream_is_an_error() {
        let mut reader = IclReader::new(Cursor::new(Vec::new()));
        let err = reader.read().unwrap_err();
        assert!(err.to_string().contains("FileHeader record is mandatory"));
    }

    #[test]
    fn test_missing_controls_are_synthesised() {
        let mut input = header_line();
        input.extend(line(&crate::records::CashLetterHeader::default()));
        input.extend(line(&crate::records::BundleHeader::default()));
        let file = IclReader::new(Cursor::new(input)).read().unwrap();
        assert_eq!(file.cash_letters.len(), 1);
        assert!(file.cash_letters[0].bundles[0].bundle_control.is_some());
        assert!(file.cash_letters[0].cash_letter_control.is_some());
        assert!(file.control.is_some());
    }

    #[test]
    fn test_unknown_code_reports_position() {
        let mut input = header_line();
        let mut bogus = b"77".to_vec();
        bogus.resize(RECORD_LENGTH, b' ');
        input.extend(bogus);
        let mut reader = IclReader::new(Cursor::new(input));
        let err = reader.read().unwrap_err();
        match err {
            IclError::Parse { line, offset, .. } => {
                assert_eq!(line, 2);
                assert_eq!(offset, 81);
            },
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(reader.partial_file().header, FileHeader::new());
    }

    #[test]
    fn test_addendum_without_item_is_rejected() {
        let mut input = header_line();
        input.extend(line(&crate::records::CashLetterHeader::default()));
        input.extend(line(&crate::records::CheckDetailAddendumA::default()));
        let err = IclReader::new(Cursor::new(input)).read().unwrap_err();
        assert!(err.to_string().contains("unexpected CheckDetailAddendumA"));
    }

    #[test]
    fn test_bundle_after_cash_letter_control_is_rejected() {
        let mut input = header_line();
        input.extend(line(&crate::records::CashLetterHeader::default()));
        input.extend(line(&crate::records::BundleHeader::default()));
        input.extend(line(&BundleControl::default()));
        input.extend(line(&CashLetterControl::default()));
        input.extend(line(&crate::records::BundleHeader::default()));
        input.extend(line(&BundleControl::default()));
        input.extend(line(&FileControl::default()));

        let mut reader = IclReader::new(Cursor::new(input));
        let err = reader.read().unwrap_err();
        assert!(err.to_string().contains("unexpected BundleHeader"));
        match err {
            IclError::Parse { line, .. } => assert_eq!(line, 6),
            other => panic!("unexpected error {other}"),
        }
        assert!(reader.partial_file().bundles.is_empty());
    }

    #[test]
    fn test_bundle_before_first_cash_letter_is_kept() {
        let mut input = header_line();
        input.extend(line(&crate::records::BundleHeader::default()));
        input.extend(line(&BundleControl::default()));
        input.extend(line(&crate::records::CashLetterHeader::default()));
        input.extend(line(&CashLetterControl::default()));
        input.extend(line(&FileControl::default()));

        let file = IclReader::new(Cursor::new(input)).read().unwrap();
        assert_eq!(file.bundles.len(), 1);
        assert_eq!(file.cash_letters.len(), 1);
        assert!(file.cash_letters[0].bundles.is_empty());
    }

    #[test]
    fn test_addendum_after_image_views_is_rejected() {
        let check = CheckDetail {
            ece_institution_item_sequence_number: "000000000000001".to_string(),
            ..Default::default()
        };
        let data = ImageViewData {
            ece_institution_item_sequence_number: "000000000000001".to_string(),
            ..Default::default()
        };
        let mut input = header_line();
        input.extend(line(&crate::records::CashLetterHeader::default()));
        input.extend(line(&crate::records::BundleHeader::default()));
        input.extend(line(&check));
        input.extend(line(&crate::records::CheckDetailAddendumA::default()));
        input.extend(line(&ImageViewDetail::default()));
        input.extend(line(&data));
        input.extend(line(&crate::records::ImageViewAnalysis::default()));
        input.extend(line(&crate::records::CheckDetailAddendumA::default()));

        let mut reader = IclReader::new(Cursor::new(input));
        let err = reader.read().unwrap_err();
        assert!(err.to_string().contains("unexpected CheckDetailAddendumA"));
        let partial = reader.into_partial_file();
        let check = &partial.cash_letters[0].bundles[0].checks[0];
        assert_eq!(check.addendum_a().len(), 1);
        assert_eq!(check.image_view_detail.len(), 1);
    }

    #[test]
    fn test_crlf_lines() {
        let mut input = FileHeader::new().to_bytes(Encoding::Ascii).unwrap();
        input.extend_from_slice(b"\r\n");
        let mut reader = IclReader::new(Cursor::new(input));
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.record_type(), RecordType::FileHeader);
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn test_buffer_size_ceiling() {
        let mut input = (RECORD_LENGTH as u32).to_be_bytes().to_vec();
        input.extend(FileHeader::new().to_bytes(Encoding::Ascii).unwrap());
        let options = ReaderOptions::new()
            .with_variable_line_length(true)
            .with_buffer_size(40);
        let mut reader = IclReader::new(Cursor::new(input)).with_options(options);
        let err = reader.read_record().unwrap_err();
        assert!(err.to_string().contains("exceeds the buffer size"));
    }

    #[test]
    fn test_image_data_with_newline_spans_lines() {
        let data = ImageViewData {
            image_data: b"ab\ncd\n".to_vec(),
            ..Default::default()
        };
        let mut input = data.to_bytes(Encoding::Ascii).unwrap();
        input.push(b'\n');
        let mut reader = IclReader::new(Cursor::new(input));
        match reader.read_record().unwrap().unwrap() {
            Record::ImageViewData(parsed) => assert_eq!(parsed.image_data, b"ab\ncd\n"),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn test_matching_item_prefers_sequence_number() {
        let items = vec![
            CheckDetail {
                ece_institution_item_sequence_number: "1".to_string(),
                ..Default::default()
            },
            CheckDetail {
                ece_institution_item_sequence_number: "2".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(matching_item(&items, "1"), Some(0));
        assert_eq!(matching_item(&items, "9"), Some(1));
        assert_eq!(matching_item(&items, ""), Some(1));
        assert_eq!(matching_item::<CheckDetail>(&[], "1"), None);
    }
}
