/// Which decoding produced a hit. Rendered as a single letter after the
/// offset: A for the code-page (narrow) decoding, U for UTF-16LE (wide).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingTag {
    Narrow,
    Wide,
}

impl EncodingTag {
    pub fn as_char(&self) -> char {
        match self {
            EncodingTag::Narrow => 'A',
            EncodingTag::Wide => 'U',
        }
    }
}

/// A contiguous byte range of the source scheduled for one carving pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Absolute start offset in the source
    pub start: u64,
    /// Window length in bytes
    pub len: u32,
    /// True for seam-straddling reconciliation windows
    pub boundary: bool,
}

impl Window {
    pub fn new(start: u64, len: u32, boundary: bool) -> Self {
        Self {
            start,
            len,
            boundary,
        }
    }

    pub fn end(&self) -> u64 {
        self.start + self.len as u64
    }
}

/// Supported chunk size range for the CLI path, in megabytes
pub const MIN_CHUNK_MB: u64 = 1;
pub const MAX_CHUNK_MB: u64 = 1024;
pub const DEFAULT_CHUNK_MB: u64 = 512;

/// Default printable range carved out of decoded text
pub const DEFAULT_CHAR_CLASS: &str = "[\\x20-\\x7E]";

/// Scan configuration, constructed once before scanning and read-only after
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Minimum string length in characters (>= 1)
    pub min_length: u32,

    /// Maximum string length in characters; None = unlimited
    pub max_length: Option<u32>,

    /// Primary window size in bytes
    pub chunk_size_bytes: u64,

    /// Carve with the code-page (narrow) decoding
    pub narrow: bool,

    /// Carve with the UTF-16LE (wide) decoding
    pub wide: bool,

    /// Regex character class applied to narrow-decoded text
    pub narrow_class: String,

    /// Regex character class applied to wide-decoded text
    pub wide_class: String,

    /// Numeric code-page identifier for the narrow decoding
    pub code_page: u16,

    /// Compute absolute byte offsets for every hit
    pub with_offsets: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: None,
            chunk_size_bytes: DEFAULT_CHUNK_MB * 1024 * 1024,
            narrow: true,
            wide: true,
            narrow_class: DEFAULT_CHAR_CLASS.to_string(),
            wide_class: DEFAULT_CHAR_CLASS.to_string(),
            code_page: 1252,
            with_offsets: false,
        }
    }
}

impl ScanConfig {
    /// Set the chunk size from a megabyte count, silently falling back to
    /// the default when the value is outside the supported range.
    pub fn with_chunk_size_mb(mut self, mb: u64) -> Self {
        let mb = if !(MIN_CHUNK_MB..=MAX_CHUNK_MB).contains(&mb) {
            DEFAULT_CHUNK_MB
        } else {
            mb
        };
        self.chunk_size_bytes = mb * 1024 * 1024;
        self
    }

    /// Effective maximum length: values not exceeding min_length are
    /// treated as unlimited, matching the CLI defaulting behavior.
    pub fn effective_max(&self) -> Option<u32> {
        self.max_length.filter(|&x| x > self.min_length)
    }
}

/// Progress snapshot emitted after each primary window
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// 1-based index of the window that just finished
    pub window_index: usize,
    /// Total number of primary windows
    pub total_windows: usize,
    /// Distinct strings collected so far
    pub hits_so_far: usize,
    /// Bytes processed so far
    pub bytes_scanned: u64,
    /// Elapsed wall time since the scan started
    pub elapsed: std::time::Duration,
}

/// Scan statistics returned alongside the hit set
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub primary_windows: usize,
    pub boundary_windows: usize,
    pub bytes_scanned: u64,
    /// Whether any hit was produced only by the boundary pass
    pub boundary_hits_found: bool,
    pub duration_secs: f64,
}

/// Non-fatal problems encountered during a scan or filtering pass.
/// Decoding is lossy and cannot fail, so the only diagnostics are
/// pattern-compilation problems.
#[derive(Debug, Clone)]
pub enum Diagnostic {
    /// A user-supplied or catalog pattern failed to compile
    Pattern { pattern: String, detail: String },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Pattern { pattern, detail } => {
                write!(f, "bad pattern '{}': {}", pattern, detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_clamping() {
        let config = ScanConfig::default().with_chunk_size_mb(64);
        assert_eq!(config.chunk_size_bytes, 64 * 1024 * 1024);

        // Out of range falls back to the default instead of failing
        let config = ScanConfig::default().with_chunk_size_mb(0);
        assert_eq!(config.chunk_size_bytes, DEFAULT_CHUNK_MB * 1024 * 1024);

        let config = ScanConfig::default().with_chunk_size_mb(4096);
        assert_eq!(config.chunk_size_bytes, DEFAULT_CHUNK_MB * 1024 * 1024);
    }

    #[test]
    fn test_effective_max() {
        let mut config = ScanConfig {
            min_length: 5,
            max_length: Some(10),
            ..Default::default()
        };
        assert_eq!(config.effective_max(), Some(10));

        config.max_length = Some(5);
        assert_eq!(config.effective_max(), None);

        config.max_length = None;
        assert_eq!(config.effective_max(), None);
    }

    #[test]
    fn test_window_end() {
        let w = Window::new(1024, 512, false);
        assert_eq!(w.end(), 1536);
        assert!(!w.boundary);
    }

    #[test]
    fn test_pattern_diagnostic_display() {
        let d = Diagnostic::Pattern {
            pattern: "[broken".to_string(),
            detail: "unclosed character class".to_string(),
        };
        assert_eq!(d.to_string(), "bad pattern '[broken': unclosed character class");
    }
}
