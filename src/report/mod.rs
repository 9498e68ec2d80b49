//! Output sinks: appendable text files and machine-readable JSON reports.

use crate::error::Result;
use crate::hits::Hit;
use crate::types::ScanStats;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain-text sink for reported hits.
///
/// Opened in append mode so repeated runs against different inputs can
/// accumulate into one file, matching console output line for line.
pub struct TextSink {
    writer: BufWriter<File>,
}

impl TextSink {
    pub fn append(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Report metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub timestamp: String,
    /// Tool name
    pub tool_name: String,
    /// Tool version
    pub version: String,
    /// Minimum string length searched for
    pub min_length: u32,
    /// Maximum string length, if bounded
    pub max_length: Option<u32>,
    /// Code page used for narrow decoding
    pub code_page: u16,
}

impl ReportMetadata {
    pub fn new(min_length: u32, max_length: Option<u32>, code_page: u16) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339(),
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            min_length,
            max_length,
            code_page,
        }
    }
}

/// One reported hit in JSON form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonHit {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<char>,
    pub approximate: bool,
    pub from_boundary: bool,
}

impl From<&Hit> for JsonHit {
    fn from(hit: &Hit) -> Self {
        Self {
            text: hit.text.clone(),
            offset: hit.tag.map(|t| t.offset),
            encoding: hit.tag.map(|t| t.encoding.as_char()),
            approximate: hit.tag.map(|t| t.approximate).unwrap_or(false),
            from_boundary: hit.from_boundary,
        }
    }
}

/// Per-source-file section of the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub source: String,
    pub bytes_scanned: u64,
    pub primary_windows: usize,
    pub boundary_windows: usize,
    pub boundary_hits_found: bool,
    pub duration_secs: f64,
    pub match_count: u64,
    pub hits: Vec<JsonHit>,
}

impl FileReport {
    pub fn new(source: String, stats: &ScanStats, match_count: u64, hits: &[Hit]) -> Self {
        Self {
            source,
            bytes_scanned: stats.bytes_scanned,
            primary_windows: stats.primary_windows,
            boundary_windows: stats.boundary_windows,
            boundary_hits_found: stats.boundary_hits_found,
            duration_secs: stats.duration_secs,
            match_count,
            hits: hits.iter().map(JsonHit::from).collect(),
        }
    }
}

/// Machine-readable run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub metadata: ReportMetadata,
    pub files: Vec<FileReport>,
    pub total_matches: u64,
}

impl JsonReport {
    pub fn new(metadata: ReportMetadata) -> Self {
        Self {
            metadata,
            files: Vec::new(),
            total_matches: 0,
        }
    }

    pub fn push_file(&mut self, file: FileReport) {
        self.total_matches += file.match_count;
        self.files.push(file);
    }

    /// Write the report as pretty-printed JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
