//! Chunked, boundary-safe string carving for binary evidence.
//!
//! This library extracts printable strings from files of arbitrary size:
//! - Fixed-size primary windows keep memory flat regardless of input size
//! - A boundary reconciliation pass recovers strings split across seams
//! - Code-page (via encoding_rs) and UTF-16LE decodings carve independently
//! - Hits can be annotated with absolute byte offsets, deduplicated,
//!   sorted, and filtered by literal or regex criteria

pub mod carver;
pub mod cli;
pub mod codec;
pub mod error;
pub mod filter;
pub mod hits;
pub mod offsets;
pub mod patterns;
pub mod planner;
pub mod report;
pub mod scanner;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use carver::{CarvedMatch, Carver, Encoding};
pub use codec::{decode_wide, NarrowCodec};
pub use error::{CarveError, Result};
pub use filter::{filter, FilterCriteria};
pub use hits::{Hit, HitSet, OffsetTag, SortOrder};
pub use planner::{plan_windows, WindowPlan};
pub use scanner::{scan, scan_with_progress, ScanOutcome};
pub use source::{open_source, ByteSource, FileSource, MappedSource, SliceSource};
pub use types::{
    Diagnostic, EncodingTag, ScanConfig, ScanProgress, ScanStats, Window, DEFAULT_CHAR_CLASS,
};
