use thiserror::Error;

/// Main error type for the carving tool
#[derive(Error, Debug)]
pub enum CarveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Memory mapping error: {0}")]
    Mmap(String),

    #[error("Invalid offset: requested offset {offset} exceeds source size {source_size}")]
    InvalidOffset { offset: u64, source_size: u64 },

    #[error("Invalid read: {size} bytes at offset {offset} exceeds source bounds (source size: {source_size})")]
    InvalidSize {
        offset: u64,
        size: u64,
        source_size: u64,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unknown code page: {0}")]
    Codec(u16),

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for carving operations
pub type Result<T> = std::result::Result<T, CarveError>;
