//! Text decoding capabilities.
//!
//! The carver never implements encodings itself: narrow (code-page) text is
//! delegated to `encoding_rs`, with the numeric Windows code-page identifier
//! resolved once at configuration time through `codepage`. Wide text is fixed
//! 2-byte UTF-16LE. Both decodings are lossy — undecodable sequences become
//! replacement characters so scanning never aborts on malformed bytes.

use crate::error::{CarveError, Result};
use std::borrow::Cow;

/// A resolved narrow (code-page) codec: byte <-> text both ways.
///
/// Cheap to copy; the underlying encoding tables are static.
#[derive(Clone, Copy)]
pub struct NarrowCodec {
    encoding: &'static encoding_rs::Encoding,
    code_page: u16,
}

impl NarrowCodec {
    /// Resolve a numeric code-page identifier. Fails at configuration time,
    /// before any window is read.
    pub fn resolve(code_page: u16) -> Result<Self> {
        let encoding = codepage::to_encoding(code_page).ok_or(CarveError::Codec(code_page))?;
        Ok(Self {
            encoding,
            code_page,
        })
    }

    pub fn code_page(&self) -> u16 {
        self.code_page
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode bytes to text; malformed sequences become U+FFFD
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let (text, _, _) = self.encoding.decode(bytes);
        text
    }

    /// Re-encode text back to bytes under the same code page. Unmappable
    /// characters are substituted, which the offset resolver detects as a
    /// round-trip mismatch.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, _) = self.encoding.encode(text);
        bytes.into_owned()
    }
}

impl std::fmt::Debug for NarrowCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrowCodec")
            .field("code_page", &self.code_page)
            .field("name", &self.name())
            .finish()
    }
}

/// Decode a window as fixed-width UTF-16LE. A trailing odd byte cannot form
/// a code unit and is dropped; lone surrogates become replacement characters.
pub fn decode_wide(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
