//! Optional second opinion on detected steps.
//!
//! A trained classifier (kept outside this crate) scores the signal segment
//! around each step. The crate only defines the feature vector handed to it
//! and the gate that keeps or drops steps by score.

use log::debug;

/// Number of summary statistics appended after the resampled segment.
pub const SUMMARY_FEATURES: usize = 4;

/// Scores a feature vector built by [`peak_features`]. Scores are in `[0, 1]`,
/// higher meaning "more likely a real step".
pub trait StepClassifier {
    /// Number of resampled points the classifier expects before the summary
    /// statistics.
    fn input_size(&self) -> usize;

    fn classify(&self, features: &[f64]) -> f64;
}

/// Adapts a plain function to [`StepClassifier`].
pub struct FnClassifier<F> {
    input_size: usize,
    score: F,
}

impl<F> FnClassifier<F>
where
    F: Fn(&[f64]) -> f64,
{
    pub fn new(input_size: usize, score: F) -> Self {
        Self { input_size, score }
    }
}

impl<F> StepClassifier for FnClassifier<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn input_size(&self) -> usize {
        self.input_size
    }

    fn classify(&self, features: &[f64]) -> f64 {
        (self.score)(features)
    }
}

/// Resample `segment` to `input_size` points by linear interpolation, then
/// append mean, variance, min and max of the original segment.
///
/// Returns `None` for an empty segment or a zero input size.
pub fn peak_features(segment: &[f64], input_size: usize) -> Option<Vec<f64>> {
    if segment.is_empty() || input_size == 0 {
        return None;
    }

    let len = segment.len();
    let last = len - 1;
    let mut features = Vec::with_capacity(input_size + SUMMARY_FEATURES);

    for j in 0..input_size {
        let position = j as f64 * len as f64 / input_size as f64;
        let lo = (position.floor() as usize).min(last);
        let hi = (position.ceil() as usize).min(last);
        let frac = position.fract();
        features.push(segment[lo] * (1.0 - frac) + segment[hi] * frac);
    }

    let n = len as f64;
    let mean = segment.iter().sum::<f64>() / n;
    let mean_sq = segment.iter().map(|v| v * v).sum::<f64>() / n;
    let min = segment.iter().copied().fold(f64::INFINITY, f64::min);
    let max = segment.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    features.extend([mean, mean_sq - mean * mean, min, max]);
    Some(features)
}

/// Keeps steps whose surrounding segment scores at least `threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierGate {
    pub threshold: f64,
    /// Samples taken on each side of the step index.
    pub half_span: usize,
}

impl ClassifierGate {
    pub fn new(threshold: f64, half_span: usize) -> Self {
        Self {
            threshold,
            half_span,
        }
    }

    /// Filter `steps`, preserving order. NaN scores reject the step.
    pub fn retain<C>(&self, classifier: &C, vertical: &[f64], steps: &[usize]) -> Vec<usize>
    where
        C: StepClassifier + ?Sized,
    {
        steps
            .iter()
            .copied()
            .filter(|&step| {
                let start = step.saturating_sub(self.half_span);
                let end = (step + self.half_span + 1).min(vertical.len());
                let Some(features) = vertical
                    .get(start..end)
                    .and_then(|segment| peak_features(segment, classifier.input_size()))
                else {
                    return false;
                };
                let score = classifier.classify(&features);
                let keep = score >= self.threshold;
                if !keep {
                    debug!("classifier rejected step at {step} (score {score:.3})");
                }
                keep
            })
            .collect()
    }
}
