//! Window carving: decode raw bytes under one encoding and extract
//! length-bounded printable runs.
//!
//! One regex is built per enabled encoding: the configured character class
//! followed by a bounded repetition derived from the length limits. The
//! regex is case-insensitive and free-spacing so documentation-style catalog
//! patterns keep working when reused as character classes. Free-spacing
//! strips unescaped whitespace even inside character classes, so classes
//! that match a literal space must escape it (`\x20`, as the default class
//! does).

use crate::codec::{decode_wide, NarrowCodec};
use crate::types::EncodingTag;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// A configured decoding plus the character class carved out of it
#[derive(Debug, Clone)]
pub enum Encoding {
    /// Code-page text, 1 byte per character in the common case
    Narrow { codec: NarrowCodec, class: String },
    /// Fixed 2-byte UTF-16LE text
    Wide { class: String },
}

impl Encoding {
    pub fn tag(&self) -> EncodingTag {
        match self {
            Encoding::Narrow { .. } => EncodingTag::Narrow,
            Encoding::Wide { .. } => EncodingTag::Wide,
        }
    }

    fn class(&self) -> &str {
        match self {
            Encoding::Narrow { class, .. } => class,
            Encoding::Wide { class } => class,
        }
    }
}

/// A single carved run with its in-window text position.
///
/// `text` is trimmed of surrounding whitespace and `text_index` points at the
/// trimmed content: a UTF-16 code-unit index for wide carving, a character
/// index for narrow carving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarvedMatch {
    pub text: String,
    pub text_index: usize,
}

/// Carves one window of raw bytes under one encoding
pub struct Carver {
    encoding: Encoding,
    min_length: u32,
    regex: Regex,
}

impl Carver {
    /// Build the carving regex once per scan. A malformed character class is
    /// reported to the caller as a non-fatal pattern error; the scan
    /// continues with the remaining encodings.
    pub fn new(
        encoding: Encoding,
        min_length: u32,
        max_length: Option<u32>,
    ) -> std::result::Result<Self, regex::Error> {
        let quantifier = match max_length {
            Some(max) => format!("{{{},{}}}", min_length, max),
            None => format!("{{{},}}", min_length),
        };
        let pattern = format!("{}{}", encoding.class(), quantifier);

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .ignore_whitespace(true)
            .build()?;

        Ok(Self {
            encoding,
            min_length,
            regex,
        })
    }

    pub fn tag(&self) -> EncodingTag {
        self.encoding.tag()
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Decode a window and return every qualifying run, in text order.
    ///
    /// Decoding is lossy and never fails; malformed byte sequences become
    /// replacement characters that simply fall outside the character class.
    pub fn carve(&self, bytes: &[u8]) -> Vec<CarvedMatch> {
        let text: Cow<'_, str> = match &self.encoding {
            Encoding::Narrow { codec, .. } => codec.decode(bytes),
            Encoding::Wide { .. } => Cow::Owned(decode_wide(bytes)),
        };

        let wide = matches!(self.encoding, Encoding::Wide { .. });

        let mut matches = Vec::new();
        // Incremental cursor: find_iter yields matches in increasing order,
        // so prefix index counting stays linear over the window.
        let mut cursor_byte = 0usize;
        let mut cursor_index = 0usize;

        for m in self.regex.find_iter(&text) {
            let raw = m.as_str();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            // Trimming may drop qualifying whitespace from either end; runs
            // that fall below the minimum afterwards are not reported.
            if (trimmed.chars().count() as u32) < self.min_length {
                continue;
            }

            let lead = raw.len() - raw.trim_start().len();
            let target_byte = m.start() + lead;

            cursor_index += prefix_units(&text[cursor_byte..target_byte], wide);
            cursor_byte = target_byte;

            matches.push(CarvedMatch {
                text: trimmed.to_string(),
                text_index: cursor_index,
            });
        }

        matches
    }
}

/// Text-position units covered by `s`: UTF-16 code units for wide carving
/// (each decoded unit was 2 source bytes), characters for narrow carving.
fn prefix_units(s: &str, wide: bool) -> usize {
    if wide {
        s.chars().map(char::len_utf16).sum()
    } else {
        s.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_CHAR_CLASS;

    fn narrow_carver(min: u32, max: Option<u32>) -> Carver {
        let codec = NarrowCodec::resolve(1252).unwrap();
        Carver::new(
            Encoding::Narrow {
                codec,
                class: DEFAULT_CHAR_CLASS.to_string(),
            },
            min,
            max,
        )
        .unwrap()
    }

    fn wide_carver(min: u32) -> Carver {
        Carver::new(
            Encoding::Wide {
                class: DEFAULT_CHAR_CLASS.to_string(),
            },
            min,
            None,
        )
        .unwrap()
    }

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    #[test]
    fn test_narrow_carving_basic() {
        let carver = narrow_carver(4, None);
        let mut bytes = vec![0u8; 16];
        bytes.extend_from_slice(b"kernel32.dll");
        bytes.extend_from_slice(&[0, 1, 2]);
        bytes.extend_from_slice(b"ok"); // below minimum

        let matches = carver.carve(&bytes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "kernel32.dll");
        assert_eq!(matches[0].text_index, 16);
    }

    #[test]
    fn test_max_length_bounds_matches() {
        let carver = narrow_carver(3, Some(5));
        let matches = carver.carve(b"abcdefghij");
        // Non-overlapping bounded repetition splits the run
        assert_eq!(matches[0].text, "abcde");
        for m in &matches {
            assert!(m.text.chars().count() <= 5);
        }
    }

    #[test]
    fn test_min_length_enforced_after_trim() {
        let carver = narrow_carver(4, None);
        // Four qualifying characters, but two are the surrounding spaces
        let matches = carver.carve(b"\x00 ab \x00");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_trimming_advances_index() {
        let carver = narrow_carver(3, None);
        let matches = carver.carve(b"\x00\x00  hello\x00");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "hello");
        // Two NULs then two trimmed spaces
        assert_eq!(matches[0].text_index, 4);
    }

    #[test]
    fn test_wide_carving() {
        let carver = wide_carver(5);
        let mut bytes = vec![0u8; 8]; // 4 NUL code units
        bytes.extend(utf16le("WideString"));
        bytes.extend_from_slice(&[0, 0]);

        let matches = carver.carve(&bytes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "WideString");
        assert_eq!(matches[0].text_index, 4);
    }

    #[test]
    fn test_carving_is_idempotent() {
        let carver = narrow_carver(3, None);
        let bytes = b"\x01one\x02two33\x03 and more text \x04";
        let first = carver.carve(bytes);
        let second = carver.carve(bytes);
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_class_is_reported() {
        let codec = NarrowCodec::resolve(1252).unwrap();
        let result = Carver::new(
            Encoding::Narrow {
                codec,
                class: "[unclosed".to_string(),
            },
            3,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_undecodable_bytes_do_not_abort() {
        let carver = wide_carver(3);
        // Lone surrogates interleaved with text-like bytes
        let mut bytes = 0xD800u16.to_le_bytes().to_vec();
        bytes.extend(utf16le("abc"));
        bytes.extend(0xDC00u16.to_le_bytes());
        let matches = carver.carve(&bytes);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "abc");
    }
}
