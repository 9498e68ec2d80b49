//! Mapping text-space matches back to absolute byte offsets.
//!
//! Wide carving is fixed-width, so the offset is arithmetic. Narrow code
//! pages do not guarantee a 1:1 correspondence between decoded-text position
//! and byte position, so the matched text is re-encoded and re-located in
//! the window's raw bytes by a literal search starting at the text-index
//! guess. When the round trip fails to find an exact byte match, the guess
//! itself is reported and flagged approximate.

use crate::carver::{CarvedMatch, Encoding};
use crate::types::Window;

/// Resolve a carved match to an absolute byte offset in the source.
/// Returns the offset and whether it is approximate.
pub fn resolve_offset(
    m: &CarvedMatch,
    encoding: &Encoding,
    window: Window,
    raw_bytes: &[u8],
) -> (u64, bool) {
    match encoding {
        Encoding::Wide { .. } => (window.start + m.text_index as u64 * 2, false),
        Encoding::Narrow { codec, .. } => {
            let needle = codec.encode(&m.text);
            // For single-byte pages the character index equals the byte
            // position; for multi-byte pages it can only undershoot, so the
            // first match at or after the guess is the right one.
            match byte_search(raw_bytes, &needle, m.text_index) {
                Some(pos) => (window.start + pos as u64, false),
                None => (window.start + m.text_index as u64, true),
            }
        }
    }
}

/// Naive literal byte search: compare the candidate start byte, then the
/// remaining bytes linearly. Returns the first match at or after `start`.
pub fn byte_search(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || start > haystack.len() - needle.len()
    {
        return None;
    }

    for i in start..=haystack.len() - needle.len() {
        if haystack[i] == needle[0] && haystack[i..i + needle.len()] == *needle {
            return Some(i);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NarrowCodec;
    use crate::types::DEFAULT_CHAR_CLASS;

    fn narrow_encoding() -> Encoding {
        Encoding::Narrow {
            codec: NarrowCodec::resolve(1252).unwrap(),
            class: DEFAULT_CHAR_CLASS.to_string(),
        }
    }

    #[test]
    fn test_byte_search_from_guess() {
        let haystack = b"..needle....needle..";
        assert_eq!(byte_search(haystack, b"needle", 0), Some(2));
        assert_eq!(byte_search(haystack, b"needle", 3), Some(12));
        assert_eq!(byte_search(haystack, b"needle", 15), None);
        assert_eq!(byte_search(haystack, b"", 0), None);
    }

    #[test]
    fn test_wide_offset_is_arithmetic() {
        let m = CarvedMatch {
            text: "abc".to_string(),
            text_index: 7,
        };
        let window = Window::new(1000, 64, false);
        let encoding = Encoding::Wide {
            class: DEFAULT_CHAR_CLASS.to_string(),
        };
        let (offset, approx) = resolve_offset(&m, &encoding, window, &[]);
        assert_eq!(offset, 1014);
        assert!(!approx);
    }

    #[test]
    fn test_narrow_offset_relocated_exactly() {
        let mut raw = vec![0u8; 10];
        raw.extend_from_slice(b"payload");
        raw.push(0);

        let m = CarvedMatch {
            text: "payload".to_string(),
            // Deliberately early guess; the search walks forward
            text_index: 4,
        };
        let window = Window::new(500, raw.len() as u32, false);
        let (offset, approx) = resolve_offset(&m, &narrow_encoding(), window, &raw);
        assert_eq!(offset, 510);
        assert!(!approx);
    }

    #[test]
    fn test_narrow_round_trip_mismatch_is_approximate() {
        let raw = vec![0u8; 32];
        let m = CarvedMatch {
            text: "missing".to_string(),
            text_index: 9,
        };
        let window = Window::new(100, 32, false);
        let (offset, approx) = resolve_offset(&m, &narrow_encoding(), window, &raw);
        assert_eq!(offset, 109);
        assert!(approx);
    }
}
