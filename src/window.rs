use std::collections::VecDeque;

/// Sliding window with a running sum and a bounded running maximum.
///
/// The maximum is clamped into `[min_peak, max_peak]`: it stands for the
/// expected peak height of a step in the local context, not the literal
/// window maximum. It is only rescanned when the evicted sample was the
/// extremum or a new sample beats it.
///
/// Samples must be finite: a NaN leaves the running sum NaN until the end.
#[derive(Clone, Debug)]
pub struct WindowTracker {
    window: VecDeque<f64>,
    sum: f64,
    bounded_max: f64,
    min_peak: f64,
    max_peak: f64,
}

impl WindowTracker {
    /// Create a window holding `initial`, e.g. the first `window_len` samples.
    pub fn fill(initial: &[f64], min_peak: f64, max_peak: f64) -> Self {
        let mut tracker = WindowTracker {
            window: initial.iter().copied().collect(),
            sum: initial.iter().sum(),
            bounded_max: min_peak,
            min_peak,
            max_peak,
        };
        tracker.rescan();
        tracker
    }

    /// Push `incoming` to the back, pop the oldest sample and return it.
    pub fn slide(&mut self, incoming: f64) -> Option<f64> {
        self.window.push_back(incoming);
        let removed = self.window.pop_front();

        let removed_value = removed.unwrap_or(0.0);
        self.sum += incoming - removed_value;

        let evicted_extremum = removed.is_some_and(|r| r >= self.bounded_max);
        if evicted_extremum || incoming > self.bounded_max {
            self.rescan();
        }

        removed
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.window.len().max(1) as f64
    }

    /// Window maximum clamped into `[min_peak, max_peak]`.
    pub fn bounded_max(&self) -> f64 {
        self.bounded_max
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    fn rescan(&mut self) {
        let raw = self
            .window
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        self.bounded_max = clamp_peak(raw, self.min_peak, self.max_peak);
    }
}

// Not f64::clamp: NaN samples should fall back to the lower bound.
fn clamp_peak(value: f64, min_peak: f64, max_peak: f64) -> f64 {
    if value > max_peak {
        max_peak
    } else if value >= min_peak {
        value
    } else {
        min_peak
    }
}
