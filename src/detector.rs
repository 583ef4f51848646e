//! Adaptive peak detection over a vertical-acceleration signal.
//!
//! One forward pass. For every scanned sample the threshold is recomputed
//! from the sliding window:
//!
//! ```text
//! threshold(i) = max(min_peak, peak_threshold * bounded_max + window_mean)
//! ```
//!
//! The mean term follows the local noise floor and the scaled maximum follows
//! the local step intensity, so the threshold adapts between slow and brisk
//! segments of the same recording without a calibration pass.

use log::trace;

use crate::config::SampleParams;
use crate::window::WindowTracker;

/// Scan `raw` for step candidates.
///
/// `smoothed` is used for the local-maximum test only and must have the same
/// length as `raw` (pass `raw` again when smoothing is disabled). When
/// `thresholds` is given it is resized to `raw.len()` and receives the
/// threshold of every scanned sample, `0.0` elsewhere.
///
/// Returns an empty list for signals shorter than one window.
pub fn detect_candidates(
    raw: &[f64],
    smoothed: &[f64],
    params: &SampleParams,
    mut thresholds: Option<&mut Vec<f64>>,
) -> Vec<usize> {
    debug_assert_eq!(raw.len(), smoothed.len());

    let n = raw.len();
    if let Some(sink) = thresholds.as_deref_mut() {
        sink.clear();
        sink.resize(n, 0.0);
    }

    let offset = params.offset;
    if n < params.window_len || n < 2 * offset + 2 {
        return Vec::new();
    }

    // Distance from the scanned sample to the newest sample of the window.
    let lead = params.window_len - offset;

    let mut window = WindowTracker::fill(&raw[..params.window_len], params.min_peak, params.max_peak);
    let mut candidates = Vec::new();
    let mut last_peak: Option<usize> = None;

    for i in offset..n - offset - 1 {
        let threshold = (params.peak_threshold * window.bounded_max() + window.mean())
            .max(params.min_peak);
        if let Some(sink) = thresholds.as_deref_mut() {
            sink[i] = threshold;
        }

        let is_local_max = smoothed[i] >= smoothed[i - 1] && smoothed[i] > smoothed[i + 1];
        let past_refractory = last_peak.map_or(true, |p| (i - p) as f64 >= params.tao_min);

        if raw[i] > threshold && is_local_max && past_refractory {
            // A clipped maximum is not a step but still opens a refractory window.
            if raw[i] < params.max_peak {
                trace!("step candidate at {i}: value {:.3} > threshold {:.3}", raw[i], threshold);
                candidates.push(i);
            } else {
                trace!("clipped peak at {i}: value {:.3} >= max_peak", raw[i]);
            }
            last_peak = Some(i);
        }

        window.slide(raw[i + lead]);
    }

    candidates
}
