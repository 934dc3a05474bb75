//! Character encoding support for ICL files.
//!
//! ICL files travel in one of two character sets:
//! - **ASCII**: the default, bytes are used as-is
//! - **EBCDIC** (code page 037): common on mainframe-originated files
//!
//! Translation is table-driven in both directions. Only text fields are
//! translated; image data and digital signatures are binary and always pass
//! through untouched, so the field codec calls into this module one field at a
//! time rather than over whole records.

use serde::{Deserialize, Serialize};

/// Character encoding of the text portion of an ICL file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// ASCII, the identity translation.
    #[default]
    Ascii,
    /// EBCDIC code page 037.
    Ebcdic,
}

/// ASCII substitute character, produced for EBCDIC bytes with no ASCII
/// counterpart.
pub const ASCII_SUBSTITUTE: u8 = 0x1A;

/// EBCDIC substitute character, produced for bytes above 0x7F on encode.
pub const EBCDIC_SUBSTITUTE: u8 = 0x3F;

#[rustfmt::skip]
const EBCDIC_TO_ASCII: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x1A, 0x09, 0x1A, 0x7F, 0x1A, 0x1A, 0x1A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x1A, 0x1A, 0x08, 0x1A, 0x18, 0x19, 0x1A, 0x1A, 0x1C, 0x1D, 0x1E, 0x1F,
    0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x0A, 0x17, 0x1B, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x05, 0x06, 0x07,
    0x1A, 0x1A, 0x16, 0x1A, 0x1A, 0x1A, 0x1A, 0x04, 0x1A, 0x1A, 0x1A, 0x1A, 0x14, 0x15, 0x1A, 0x1A,
    0x20, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x2E, 0x3C, 0x28, 0x2B, 0x7C,
    0x26, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x21, 0x24, 0x2A, 0x29, 0x3B, 0x1A,
    0x2D, 0x2F, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x2C, 0x25, 0x5F, 0x3E, 0x3F,
    0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x60, 0x3A, 0x23, 0x40, 0x27, 0x3D, 0x22,
    0x1A, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x1A, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, 0x70, 0x71, 0x72, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x1A, 0x7E, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x5E, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x5B, 0x5D, 0x1A, 0x1A, 0x1A, 0x1A,
    0x7B, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x7D, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x5C, 0x1A, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A, 0x1A,
];

#[rustfmt::skip]
const ASCII_TO_EBCDIC: [u8; 256] = [
    0x00, 0x01, 0x02, 0x03, 0x37, 0x2D, 0x2E, 0x2F, 0x16, 0x05, 0x25, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x10, 0x11, 0x12, 0x13, 0x3C, 0x3D, 0x32, 0x26, 0x18, 0x19, 0x3F, 0x27, 0x1C, 0x1D, 0x1E, 0x1F,
    0x40, 0x5A, 0x7F, 0x7B, 0x5B, 0x6C, 0x50, 0x7D, 0x4D, 0x5D, 0x5C, 0x4E, 0x6B, 0x60, 0x4B, 0x61,
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0x7A, 0x5E, 0x4C, 0x7E, 0x6E, 0x6F,
    0x7C, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6,
    0xD7, 0xD8, 0xD9, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, 0xE8, 0xE9, 0xBA, 0xE0, 0xBB, 0xB0, 0x6D,
    0x79, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x91, 0x92, 0x93, 0x94, 0x95, 0x96,
    0x97, 0x98, 0x99, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xC0, 0x4F, 0xD0, 0xA1, 0x07,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
    0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F, 0x3F,
];

impl Encoding {
    /// Translate bytes read from the wire into ASCII.
    ///
    /// EBCDIC bytes outside the ASCII-representable range become
    /// [`ASCII_SUBSTITUTE`]; decoding never fails.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Encoding::Ascii => bytes.to_vec(),
            Encoding::Ebcdic => bytes.iter().map(|&b| EBCDIC_TO_ASCII[b as usize]).collect(),
        }
    }

    /// Translate ASCII text into wire bytes.
    #[must_use]
    pub fn encode(self, text: &[u8]) -> Vec<u8> {
        match self {
            Encoding::Ascii => text.to_vec(),
            Encoding::Ebcdic => text.iter().map(|&b| ASCII_TO_EBCDIC[b as usize]).collect(),
        }
    }

    /// Decode wire bytes straight into a `String`, one `char` per byte.
    ///
    /// Bytes above `0x7F` in an ASCII stream become the Latin-1 character of
    /// the same value, so [`text_bytes`] restores them exactly. Field
    /// validation reports them later with the field name attached.
    #[must_use]
    pub fn decode_to_string(self, bytes: &[u8]) -> String {
        self.decode(bytes).into_iter().map(char::from).collect()
    }
}

/// The single-byte form of decoded text: one byte per `char`, with
/// characters beyond Latin-1 replaced by [`ASCII_SUBSTITUTE`].
#[must_use]
pub fn text_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c).unwrap_or(ASCII_SUBSTITUTE))
        .collect()
}

/// Length of `text` on the wire.
#[must_use]
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_bytes_survive_ascii_text() {
        let wire = [b'C', b'a', b'f', 0xE9, 0xFF, b' '];
        let text = Encoding::Ascii.decode_to_string(&wire);
        assert_eq!(text.chars().count(), wire.len());
        assert_eq!(text_len(&text), wire.len());
        assert_eq!(text_bytes(&text), wire);
        assert_eq!(text_bytes("\u{20AC}"), vec![ASCII_SUBSTITUTE]);
    }

    #[test]
    fn test_ascii_is_identity() {
        let data = b"25 Hello 0123";
        assert_eq!(Encoding::Ascii.encode(data), data.to_vec());
        assert_eq!(Encoding::Ascii.decode(data), data.to_vec());
    }

    #[test]
    fn test_ebcdic_known_code_points() {
        assert_eq!(Encoding::Ebcdic.encode(b"0"), vec![0xF0]);
        assert_eq!(Encoding::Ebcdic.encode(b"9"), vec![0xF9]);
        assert_eq!(Encoding::Ebcdic.encode(b"A"), vec![0xC1]);
        assert_eq!(Encoding::Ebcdic.encode(b"Z"), vec![0xE9]);
        assert_eq!(Encoding::Ebcdic.encode(b"a"), vec![0x81]);
        assert_eq!(Encoding::Ebcdic.encode(b" "), vec![0x40]);
        assert_eq!(Encoding::Ebcdic.decode(&[0xF2, 0xF5]), b"25".to_vec());
    }

    #[test]
    fn test_ebcdic_roundtrip_all_ascii() {
        let ascii: Vec<u8> = (0u8..128).collect();
        let encoded = Encoding::Ebcdic.encode(&ascii);
        assert_eq!(Encoding::Ebcdic.decode(&encoded), ascii);
    }

    #[test]
    fn test_ebcdic_untranslatable_bytes_substitute() {
        // 0x41 is a no-break space in code page 037
        assert_eq!(Encoding::Ebcdic.decode(&[0x41]), vec![ASCII_SUBSTITUTE]);
        assert_eq!(Encoding::Ebcdic.encode(&[0xE9]), vec![EBCDIC_SUBSTITUTE]);
    }

    #[test]
    fn test_decode_to_string() {
        let wire = Encoding::Ebcdic.encode(b"Wave Money");
        assert_eq!(Encoding::Ebcdic.decode_to_string(&wire), "Wave Money");
        assert_eq!(Encoding::Ascii.decode_to_string(b"Wave Money"), "Wave Money");
    }
}
