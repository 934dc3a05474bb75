//! Configuration options for reading, writing, and validating ICL files.
//!
//! Every option struct has sensible defaults, `with_*` builders, and a serde
//! `Deserialize` impl (camelCase keys, unknown keys ignored) so callers can
//! load options from JSON configuration.

use crate::encoding::Encoding;
use serde::{Deserialize, Serialize};

/// Options for [`IclReader`](crate::reader::IclReader).
///
/// # Examples
///
/// ```
/// use imagecashletter::ReaderOptions;
///
/// let opts = ReaderOptions::default()
///     .with_ebcdic_encoding(true)
///     .with_variable_line_length(true);
/// assert!(opts.variable_line_length);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderOptions {
    /// Records are framed by a 4-byte big-endian length prefix instead of
    /// newline separators.
    pub variable_line_length: bool,

    /// Text fields are EBCDIC (code page 037).
    pub ebcdic_encoding: bool,

    /// Largest physical record the reader will buffer, in bytes.
    pub buffer_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            variable_line_length: false,
            ebcdic_encoding: false,
            buffer_size: u32::MAX as usize,
        }
    }
}

impl ReaderOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects length-prefix framing.
    #[must_use]
    pub const fn with_variable_line_length(mut self, enabled: bool) -> Self {
        self.variable_line_length = enabled;
        self
    }

    /// Selects EBCDIC text.
    #[must_use]
    pub const fn with_ebcdic_encoding(mut self, enabled: bool) -> Self {
        self.ebcdic_encoding = enabled;
        self
    }

    /// Sets the record buffer ceiling.
    #[must_use]
    pub const fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// The text encoding these options select.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        if self.ebcdic_encoding {
            Encoding::Ebcdic
        } else {
            Encoding::Ascii
        }
    }
}

/// Options for [`IclWriter`](crate::writer::IclWriter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct WriterOptions {
    /// Frame each record with a 4-byte big-endian length prefix and no
    /// trailing newline.
    pub variable_line_length: bool,

    /// Translate text fields to EBCDIC (code page 037).
    pub ebcdic_encoding: bool,

    /// Emit every image-view record of a bundle after its last item.
    pub collated_image_view: bool,
}

impl WriterOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects length-prefix framing.
    #[must_use]
    pub const fn with_variable_line_length(mut self, enabled: bool) -> Self {
        self.variable_line_length = enabled;
        self
    }

    /// Selects EBCDIC text.
    #[must_use]
    pub const fn with_ebcdic_encoding(mut self, enabled: bool) -> Self {
        self.ebcdic_encoding = enabled;
        self
    }

    /// Groups image views at the end of each bundle.
    #[must_use]
    pub const fn with_collated_image_view(mut self, enabled: bool) -> Self {
        self.collated_image_view = enabled;
        self
    }

    /// The text encoding these options select.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        if self.ebcdic_encoding {
            Encoding::Ebcdic
        } else {
            Encoding::Ascii
        }
    }
}

/// Rules that `create` and `validate` may relax.
///
/// The default enforces everything.
///
/// # Examples
///
/// ```
/// use imagecashletter::ValidateOpts;
///
/// let opts: ValidateOpts =
///     serde_json::from_str(r#"{"allowInvalidCheckDigit": true, "unknownOption": 1}"#).unwrap();
/// assert!(opts.allow_invalid_check_digit);
/// assert!(!opts.skip_all);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct ValidateOpts {
    /// Disable every check.
    pub skip_all: bool,

    /// Credit records may carry a zero amount.
    pub allow_zero_credit_amounts: bool,

    /// Bundle sequence numbers may repeat within a cash letter.
    pub allow_duplicate_bundle_sequence_number: bool,

    /// Control amounts are not compared against their children.
    pub allow_invalid_amounts: bool,

    /// ABA check digits are not verified.
    pub allow_invalid_check_digit: bool,

    /// Any nine-digit routing number is accepted.
    pub allow_invalid_routing_number: bool,

    /// Image-view triples need not be complete.
    pub allow_missing_image_analysis: bool,
}

impl ValidateOpts {
    /// Creates options that enforce every rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that disable every rule.
    #[must_use]
    pub fn skip_all() -> Self {
        Self {
            skip_all: true,
            ..Self::default()
        }
    }

    /// Allows zero credit amounts.
    #[must_use]
    pub const fn with_allow_zero_credit_amounts(mut self, enabled: bool) -> Self {
        self.allow_zero_credit_amounts = enabled;
        self
    }

    /// Allows repeated bundle sequence numbers.
    #[must_use]
    pub const fn with_allow_duplicate_bundle_sequence_number(mut self, enabled: bool) -> Self {
        self.allow_duplicate_bundle_sequence_number = enabled;
        self
    }

    /// Skips control amount comparisons.
    #[must_use]
    pub const fn with_allow_invalid_amounts(mut self, enabled: bool) -> Self {
        self.allow_invalid_amounts = enabled;
        self
    }

    /// Skips ABA check digit tests.
    #[must_use]
    pub const fn with_allow_invalid_check_digit(mut self, enabled: bool) -> Self {
        self.allow_invalid_check_digit = enabled;
        self
    }

    /// Accepts any nine-digit routing number.
    #[must_use]
    pub const fn with_allow_invalid_routing_number(mut self, enabled: bool) -> Self {
        self.allow_invalid_routing_number = enabled;
        self
    }

    /// Allows incomplete image-view triples.
    #[must_use]
    pub const fn with_allow_missing_image_analysis(mut self, enabled: bool) -> Self {
        self.allow_missing_image_analysis = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_defaults() {
        let opts = ReaderOptions::default();
        assert!(!opts.variable_line_length);
        assert!(!opts.ebcdic_encoding);
        assert_eq!(opts.buffer_size, u32::MAX as usize);
        assert_eq!(opts.encoding(), Encoding::Ascii);
    }

    #[test]
    fn test_writer_builders() {
        let opts = WriterOptions::new()
            .with_ebcdic_encoding(true)
            .with_collated_image_view(true);
        assert_eq!(opts.encoding(), Encoding::Ebcdic);
        assert!(opts.collated_image_view);
        assert!(!opts.variable_line_length);
    }

    #[test]
    fn test_validate_opts_from_json_ignores_unknown_keys() {
        let opts: ValidateOpts = serde_json::from_str(
            r#"{"skipAll": false, "allowZeroCreditAmounts": true, "somethingElse": "x"}"#,
        )
        .unwrap();
        assert!(opts.allow_zero_credit_amounts);
        assert!(!opts.allow_invalid_amounts);
    }

    #[test]
    fn test_reader_options_from_json() {
        let opts: ReaderOptions =
            serde_json::from_str(r#"{"ebcdicEncoding": true, "bufferSize": 4096}"#).unwrap();
        assert_eq!(opts.encoding(), Encoding::Ebcdic);
        assert_eq!(opts.buffer_size, 4096);
    }

    #[test]
    fn test_skip_all_constructor() {
        let opts = ValidateOpts::skip_all();
        assert!(opts.skip_all);
        assert!(!opts.allow_invalid_check_digit);
    }
}
