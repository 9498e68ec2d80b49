use crate::hits::SortOrder;
use crate::types::{ScanConfig, DEFAULT_CHAR_CLASS};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// strcarve - boundary-safe string carving for binary evidence
/// Extracts code-page and UTF-16LE strings from files of any size
#[derive(Parser, Debug, Clone)]
#[command(name = "strcarve")]
#[command(version)]
#[command(about = "Carves printable strings from binary files and images", long_about = None)]
pub struct Args {
    /// File to search. Either this or -d is required
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Directory to recursively process. Either this or -f is required
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,

    /// File to save results to (appended)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// File to save a machine-readable JSON report to
    #[arg(long = "json")]
    pub json: Option<PathBuf>,

    /// Look for code-page strings. Use -a false to disable
    #[arg(short = 'a', long = "ascii", default_value_t = true, action = ArgAction::Set)]
    pub ascii: bool,

    /// Look for UTF-16LE strings. Use -u false to disable
    #[arg(short = 'u', long = "unicode", default_value_t = true, action = ArgAction::Set)]
    pub unicode: bool,

    /// Minimum string length
    #[arg(short = 'm', long = "min", default_value_t = 3)]
    pub min: u32,

    /// Maximum string length. Default is unlimited
    #[arg(short = 'x', long = "max", default_value_t = -1, allow_negative_numbers = true)]
    pub max: i64,

    /// Chunk size in MB. Valid range is 1 to 1024
    #[arg(short = 'b', long = "chunk", default_value_t = 512)]
    pub chunk_mb: u64,

    /// Quiet mode (do not show header or total number of hits)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Really quiet mode (do not display hits to console; speeds up -o)
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Display the list of built-in regex patterns and exit
    #[arg(short = 'p', long = "patterns")]
    pub list_patterns: bool,

    /// String to look for. When set, only matching strings are returned
    #[arg(long = "ls", value_name = "STRING", action = ArgAction::Append)]
    pub literal: Vec<String>,

    /// Regex (or built-in pattern name) to look for. When set, only
    /// matching strings are returned
    #[arg(long = "lr", value_name = "REGEX", action = ArgAction::Append)]
    pub regex: Vec<String>,

    /// File containing strings to look for, one per line
    #[arg(long = "fs", value_name = "FILE")]
    pub literal_file: Option<PathBuf>,

    /// File containing regexes to look for, one per line
    #[arg(long = "fr", value_name = "FILE")]
    pub regex_file: Option<PathBuf>,

    /// Character class to carve for code-page strings
    #[arg(long = "ar", value_name = "CLASS", default_value = DEFAULT_CHAR_CLASS)]
    pub ascii_range: String,

    /// Character class to carve for UTF-16LE strings
    #[arg(long = "ur", value_name = "CLASS", default_value = DEFAULT_CHAR_CLASS)]
    pub unicode_range: String,

    /// Code page to use for narrow decoding
    #[arg(long = "cp", default_value_t = 1252)]
    pub code_page: u16,

    /// When using -d, file mask to search for. * and ? are supported.
    /// No effect when using -f
    #[arg(long = "mask")]
    pub mask: Option<String>,

    /// When using -d, maximum file size in bytes to process.
    /// No effect when using -f
    #[arg(long = "ms", default_value_t = -1, allow_negative_numbers = true)]
    pub max_size: i64,

    /// List the string matched by the regex instead of the string it was
    /// found in. May duplicate output; ~ denotes an approximate offset
    #[arg(long = "ro")]
    pub regex_only: bool,

    /// Show offset to each hit after the string, followed by the encoding
    /// (A=code page, U=UTF-16LE)
    #[arg(long = "off")]
    pub show_offsets: bool,

    /// Sort results alphabetically
    #[arg(long = "sa")]
    pub sort_alpha: bool,

    /// Sort results by length
    #[arg(long = "sl")]
    pub sort_length: bool,
}

impl Args {
    /// Validate the arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.list_patterns {
            return Ok(());
        }

        if self.file.is_none() && self.dir.is_none() {
            return Err("Either -f or -d is required".to_string());
        }

        if self.file.is_some() && self.dir.is_some() {
            return Err("-f and -d cannot be used together".to_string());
        }

        if self.min == 0 {
            return Err("Minimum string length must be at least 1".to_string());
        }

        if self.sort_alpha && self.sort_length {
            return Err("--sa and --sl cannot be used together".to_string());
        }

        if self.silent && self.output.is_none() && self.json.is_none() {
            return Err("-s without -o or --json would produce no output".to_string());
        }

        Ok(())
    }

    /// Maximum string length, if a usable bound was given
    pub fn max_length(&self) -> Option<u32> {
        (self.max > 0).then(|| self.max as u32)
    }

    /// Per-directory file size cap in bytes, if one was given
    pub fn max_file_size(&self) -> Option<u64> {
        (self.max_size >= 0).then(|| self.max_size as u64)
    }

    /// Requested result ordering
    pub fn sort_order(&self) -> Option<SortOrder> {
        if self.sort_alpha {
            Some(SortOrder::Lexical)
        } else if self.sort_length {
            Some(SortOrder::ByLength)
        } else {
            None
        }
    }

    /// Build the scan configuration. An out-of-range chunk size falls back
    /// to the default silently.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            min_length: self.min,
            max_length: self.max_length(),
            narrow: self.ascii,
            wide: self.unicode,
            narrow_class: self.ascii_range.clone(),
            wide_class: self.unicode_range.clone(),
            code_page: self.code_page,
            with_offsets: self.show_offsets,
            ..ScanConfig::default()
        }
        .with_chunk_size_mb(self.chunk_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_CHUNK_MB;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("strcarve").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["-f", "image.bin"]);
        assert!(args.ascii);
        assert!(args.unicode);
        assert_eq!(args.min, 3);
        assert_eq!(args.max, -1);
        assert_eq!(args.chunk_mb, 512);
        assert_eq!(args.code_page, 1252);
        assert!(args.max_length().is_none());
        assert!(args.sort_order().is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_encoding_toggles_take_values() {
        let args = parse(&["-f", "image.bin", "-a", "false", "-u", "true"]);
        assert!(!args.ascii);
        assert!(args.unicode);
    }

    #[test]
    fn test_requires_file_or_dir() {
        let args = parse(&["-m", "4"]);
        assert!(args.validate().is_err());

        let args = parse(&["-f", "a.bin", "-d", "dir"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_sort_flags_are_exclusive() {
        let args = parse(&["-f", "a.bin", "--sa", "--sl"]);
        assert!(args.validate().is_err());

        let args = parse(&["-f", "a.bin", "--sa"]);
        assert_eq!(args.sort_order(), Some(SortOrder::Lexical));
    }

    #[test]
    fn test_silent_needs_a_sink() {
        let args = parse(&["-f", "a.bin", "-s"]);
        assert!(args.validate().is_err());

        let args = parse(&["-f", "a.bin", "-s", "-o", "out.txt"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_chunk_size_falls_back_silently() {
        let args = parse(&["-f", "a.bin", "-b", "4096"]);
        let config = args.scan_config();
        assert_eq!(config.chunk_size_bytes, DEFAULT_CHUNK_MB * 1024 * 1024);

        let args = parse(&["-f", "a.bin", "-b", "64"]);
        assert_eq!(args.scan_config().chunk_size_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_repeatable_filter_options() {
        let args = parse(&["-f", "a.bin", "--ls", "one", "--ls", "two", "--lr", "guid"]);
        assert_eq!(args.literal, vec!["one", "two"]);
        assert_eq!(args.regex, vec!["guid"]);
    }

    #[test]
    fn test_max_length_sentinel() {
        let args = parse(&["-f", "a.bin", "-x", "10"]);
        assert_eq!(args.max_length(), Some(10));

        let args = parse(&["-f", "a.bin", "-x", "-1"]);
        assert!(args.max_length().is_none());
    }
}
