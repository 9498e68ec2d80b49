//! The top-level scan loop.
//!
//! Scanning is single-threaded and deterministic: primary windows are
//! processed strictly in increasing offset order, then every boundary window
//! is re-carved through the same carvers and its hits are marked as
//! boundary-found. The only blocking points are the byte-source reads.

use crate::carver::{Carver, Encoding};
use crate::codec::NarrowCodec;
use crate::error::{CarveError, Result};
use crate::hits::{Hit, HitSet, OffsetTag};
use crate::offsets::resolve_offset;
use crate::planner::plan_windows;
use crate::source::ByteSource;
use crate::types::{Diagnostic, ScanConfig, ScanProgress, ScanStats, Window};
use std::time::Instant;

/// Everything a scan produces: the deduplicated hits, the non-fatal
/// diagnostics encountered along the way, and summary statistics.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub hits: HitSet,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ScanStats,
}

/// Scan a byte source under the given configuration.
pub fn scan(source: &dyn ByteSource, config: &ScanConfig) -> Result<ScanOutcome> {
    scan_with_progress(source, config, |_| {})
}

/// Scan with a progress callback invoked after each primary window.
pub fn scan_with_progress(
    source: &dyn ByteSource,
    config: &ScanConfig,
    mut progress: impl FnMut(&ScanProgress),
) -> Result<ScanOutcome> {
    if config.min_length == 0 {
        return Err(CarveError::Config(
            "minimum string length must be at least 1".to_string(),
        ));
    }

    let started = Instant::now();
    let mut outcome = ScanOutcome::default();

    let carvers = build_carvers(config, &mut outcome.diagnostics)?;
    if carvers.is_empty() {
        return Ok(outcome);
    }

    let plan = plan_windows(source.len(), config.chunk_size_bytes, config.min_length);
    outcome.stats.primary_windows = plan.primary.len();
    outcome.stats.boundary_windows = plan.boundary.len();

    let total_windows = plan.primary.len();
    for (index, window) in plan.primary.iter().enumerate() {
        carve_window(source, *window, &carvers, config, &mut outcome)?;

        progress(&ScanProgress {
            window_index: index + 1,
            total_windows,
            hits_so_far: outcome.hits.len(),
            bytes_scanned: outcome.stats.bytes_scanned,
            elapsed: started.elapsed(),
        });
    }

    // Boundary reconciliation pass: anything found here was split by the
    // primary chunking and carries a distinct, prefixed identity.
    for window in &plan.boundary {
        carve_window(source, *window, &carvers, config, &mut outcome)?;
    }

    outcome.stats.duration_secs = started.elapsed().as_secs_f64();
    Ok(outcome)
}

/// Build one carver per enabled encoding. A malformed character class
/// disables that encoding for the scan with a single diagnostic; the codec
/// itself must resolve or the whole configuration is rejected.
fn build_carvers(config: &ScanConfig, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<Carver>> {
    let mut carvers = Vec::new();
    let max = config.effective_max();

    if config.narrow {
        let codec = NarrowCodec::resolve(config.code_page)?;
        let encoding = Encoding::Narrow {
            codec,
            class: config.narrow_class.clone(),
        };
        match Carver::new(encoding, config.min_length, max) {
            Ok(carver) => carvers.push(carver),
            Err(e) => diagnostics.push(Diagnostic::Pattern {
                pattern: config.narrow_class.clone(),
                detail: e.to_string(),
            }),
        }
    }

    if config.wide {
        let encoding = Encoding::Wide {
            class: config.wide_class.clone(),
        };
        match Carver::new(encoding, config.min_length, max) {
            Ok(carver) => carvers.push(carver),
            Err(e) => diagnostics.push(Diagnostic::Pattern {
                pattern: config.wide_class.clone(),
                detail: e.to_string(),
            }),
        }
    }

    Ok(carvers)
}

fn carve_window(
    source: &dyn ByteSource,
    window: Window,
    carvers: &[Carver],
    config: &ScanConfig,
    outcome: &mut ScanOutcome,
) -> Result<()> {
    let bytes = source.read_at(window.start, window.len as usize)?;
    outcome.stats.bytes_scanned += bytes.len() as u64;

    for carver in carvers {
        for m in carver.carve(&bytes) {
            let tag = config.with_offsets.then(|| {
                let (offset, approximate) =
                    resolve_offset(&m, carver.encoding(), window, &bytes);
                OffsetTag {
                    offset,
                    encoding: carver.tag(),
                    approximate,
                }
            });

            if window.boundary {
                outcome.stats.boundary_hits_found = true;
            }

            outcome.hits.insert(Hit {
                text: m.text,
                tag,
                from_boundary: window.boundary,
            });
        }
    }

    Ok(())
}
