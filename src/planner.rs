//! Window planning for the chunked scan.
//!
//! A scan makes two passes: primary windows cover the source end to end
//! without overlap, and boundary windows straddle each seam between primary
//! windows so a string split by the chunking is recovered by a second sweep.

use crate::types::Window;

/// The windows to scan, in scan order
#[derive(Debug, Clone)]
pub struct WindowPlan {
    pub primary: Vec<Window>,
    pub boundary: Vec<Window>,
}

impl WindowPlan {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }
}

/// Compute primary and boundary windows for a source of known length.
///
/// Primary windows are `chunk_size` bytes each, the last clamped to the
/// remaining byte count. For each seam at `k * chunk_size` a boundary window
/// of `40 * min_length` bytes starts at `seam - 20 * min_length`, covering
/// the seam symmetrically: a run of at least `min_length` printable bytes
/// cut by the seam fits entirely inside it. The start is clamped at the
/// start of the source; a window that would extend past the end of the
/// source is skipped, so every emitted window lies within bounds.
pub fn plan_windows(source_len: u64, chunk_size: u64, min_length: u32) -> WindowPlan {
    assert!(chunk_size > 0, "chunk size must be non-zero");

    let mut primary = Vec::new();
    let mut offset = 0u64;
    while offset < source_len {
        let len = (source_len - offset).min(chunk_size) as u32;
        primary.push(Window::new(offset, len, false));
        offset += chunk_size;
    }

    let half = 20 * min_length as u64;
    let size = 40 * min_length as u64;

    let mut boundary = Vec::new();
    // Seams exist only between consecutive primary windows.
    for k in 1..primary.len() as u64 {
        let seam = k * chunk_size;
        let start = seam.saturating_sub(half);
        // Starts are nondecreasing across seams, so the first overrun ends
        // the pass.
        if start + size > source_len {
            break;
        }
        boundary.push(Window::new(start, size as u32, true));
    }

    WindowPlan { primary, boundary }
}
