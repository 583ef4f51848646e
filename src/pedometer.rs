// pedometer.rs - Step detection pipeline
//
// vertical extraction → optional smoothing → adaptive peak scan →
// consecutive-run filter → optional classifier gate.
//
// Stateless between calls: every invocation builds its own window, candidate
// list and trace, so one `Pedometer` can be shared across threads.

use std::borrow::Cow;

use log::debug;
use serde::Serialize;

use crate::classifier::{ClassifierGate, StepClassifier};
use crate::config::{PedometerConfig, SampleParams};
use crate::debug_dump::DetectionTrace;
use crate::detector::detect_candidates;
use crate::error::{PedometerError, Result};
use crate::run_filter::filter_runs;
use crate::smoothing::{MeanFilter, Smoother};
use crate::types::{Acceleration, Attitude};
use crate::vertical::{check_synchronized, GravityProjection, VerticalExtractor};

/// Outcome of one detection run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    /// Step sample indices, strictly increasing.
    pub steps: Vec<usize>,
    /// Candidates found by the peak scan before run filtering.
    pub candidate_count: usize,
    /// Present only when the configuration has `debug` set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<DetectionTrace>,
}

impl StepReport {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

type BoxedClassifier = Box<dyn StepClassifier + Send + Sync>;

pub struct Pedometer<E = GravityProjection, S = MeanFilter> {
    config: PedometerConfig,
    extractor: E,
    smoother: S,
    classifier: Option<(BoxedClassifier, ClassifierGate)>,
}

impl Pedometer {
    /// Pedometer with the built-in extractor and mean filter.
    pub fn new(config: PedometerConfig) -> Result<Self> {
        Self::with_collaborators(config, GravityProjection, MeanFilter)
    }
}

impl<E, S> Pedometer<E, S>
where
    E: VerticalExtractor,
    S: Smoother,
{
    pub fn with_collaborators(config: PedometerConfig, extractor: E, smoother: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            extractor,
            smoother,
            classifier: None,
        })
    }

    /// Re-check every surviving step with `classifier`.
    pub fn with_classifier<C>(mut self, classifier: C, gate: ClassifierGate) -> Self
    where
        C: StepClassifier + Send + Sync + 'static,
    {
        self.classifier = Some((Box::new(classifier), gate));
        self
    }

    pub fn config(&self) -> &PedometerConfig {
        &self.config
    }

    /// Step indices for synchronized acceleration and attitude series.
    pub fn detect(
        &self,
        acceleration: &[Acceleration],
        attitude: &[Attitude],
        sampling_rate: f64,
    ) -> Result<Vec<usize>> {
        Ok(self.analyze(acceleration, attitude, sampling_rate)?.steps)
    }

    /// Like [`detect`](Self::detect), also returning the candidate count and,
    /// in debug mode, the per-sample trace.
    pub fn analyze(
        &self,
        acceleration: &[Acceleration],
        attitude: &[Attitude],
        sampling_rate: f64,
    ) -> Result<StepReport> {
        let params = self.config.resolve(sampling_rate)?;
        check_synchronized(acceleration, attitude)?;
        let vertical = self.extractor.extract(acceleration, attitude)?;
        self.run(vertical, &params)
    }

    /// Run on an already extracted vertical component.
    pub fn detect_in_signal(&self, vertical: &[f64], sampling_rate: f64) -> Result<StepReport> {
        let params = self.config.resolve(sampling_rate)?;
        self.run(vertical.to_vec(), &params)
    }

    fn run(&self, vertical: Vec<f64>, params: &SampleParams) -> Result<StepReport> {
        // A NaN would poison the window sum for the rest of the scan.
        if let Some(i) = vertical.iter().position(|v| !v.is_finite()) {
            return Err(PedometerError::InvalidInput(format!(
                "vertical component is not finite at sample {i}"
            )));
        }

        if vertical.len() < params.window_len {
            // Too short to hold a step: an empty result, not an error.
            debug!(
                "signal of {} samples is shorter than one window ({} samples), no steps",
                vertical.len(),
                params.window_len
            );
        }

        let mut thresholds = Vec::new();
        let candidates = {
            let smoothed: Cow<'_, [f64]> = if params.mean_filter_size > 1 {
                let smoothed = self.smoother.smooth(&vertical, params.mean_filter_size);
                if smoothed.len() != vertical.len() {
                    return Err(PedometerError::InvalidInput(format!(
                        "smoother returned {} samples for a {}-sample signal",
                        smoothed.len(),
                        vertical.len()
                    )));
                }
                Cow::Owned(smoothed)
            } else {
                Cow::Borrowed(vertical.as_slice())
            };
            let sink = self.config.debug.then_some(&mut thresholds);
            detect_candidates(&vertical, &smoothed, params, sink)
        };

        let mut steps = filter_runs(&candidates, params.min_consecutive_steps, params.tao_max);
        if let Some((classifier, gate)) = &self.classifier {
            steps = gate.retain(&**classifier, &vertical, &steps);
        }

        debug!(
            "{} candidate(s), {} step(s) over {} samples",
            candidates.len(),
            steps.len(),
            vertical.len()
        );

        let trace = self
            .config
            .debug
            .then(|| DetectionTrace::new(vertical, thresholds, &steps));

        Ok(StepReport {
            steps,
            candidate_count: candidates.len(),
            trace,
        })
    }
}

/// Detect steps with the built-in collaborators. `None` uses the defaults.
pub fn detect_steps(
    acceleration: &[Acceleration],
    attitude: &[Attitude],
    sampling_rate: f64,
    config: Option<&PedometerConfig>,
) -> Result<Vec<usize>> {
    let config = config.cloned().unwrap_or_default();
    Pedometer::new(config)?.detect(acceleration, attitude, sampling_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FnClassifier;
    use crate::test_support::{bump_signal, gait_signal, level_recording};

    const RATE: f64 = 100.0;

    /// Gait with jittered spacing, uneven heights and small noise.
    fn irregular_walk(len: usize) -> Vec<f64> {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10_000) as f64 / 10_000.0
        };

        let mut bumps = Vec::new();
        let mut center = 30;
        while center < len {
            bumps.push((center, 4.0 + 2.0 * next()));
            center += 40 + (next() * 30.0) as usize;
        }
        let mut signal = bump_signal(len, &bumps);
        for v in signal.iter_mut() {
            *v += 0.5 * (next() - 0.5);
        }
        signal
    }

    #[test]
    fn test_detects_steps_of_level_walk() {
        let (acc, att) = level_recording(&gait_signal(1000, 60, 50, 4.0));
        let steps = detect_steps(&acc, &att, RATE, None).unwrap();
        let expected: Vec<usize> = (0..18).map(|k| 60 + 50 * k).collect();
        assert_eq!(steps, expected);
    }

    #[test]
    fn test_mean_filter_shifts_peak_to_plateau_end() {
        let (acc, att) = level_recording(&gait_signal(1000, 60, 50, 4.0));
        let config = PedometerConfig::default().with_mean_filter_size(2);
        let steps = detect_steps(&acc, &att, RATE, Some(&config)).unwrap();
        let expected: Vec<usize> = (0..18).map(|k| 61 + 50 * k).collect();
        assert_eq!(steps, expected);
    }

    #[test]
    fn test_stationary_signal_has_no_steps() {
        let (acc, att) = level_recording(&vec![0.1; 3000]);
        assert!(detect_steps(&acc, &att, RATE, None).unwrap().is_empty());
    }

    #[test]
    fn test_isolated_peaks_removed_by_run_filter() {
        let signal = bump_signal(2000, &[(300, 4.0), (350, 4.0), (1200, 4.0)]);
        let pedometer = Pedometer::new(PedometerConfig::default()).unwrap();
        let report = pedometer.detect_in_signal(&signal, RATE).unwrap();
        assert_eq!(report.candidate_count, 3);
        assert!(report.steps.is_empty());

        let lenient = PedometerConfig {
            min_consecutive_steps: 2,
            ..Default::default()
        };
        let report = Pedometer::new(lenient).unwrap().detect_in_signal(&signal, RATE).unwrap();
        assert_eq!(report.steps, vec![300, 350]);
    }

    #[test]
    fn test_deterministic() {
        let (acc, att) = level_recording(&irregular_walk(5000));
        let first = detect_steps(&acc, &att, RATE, None).unwrap();
        let second = detect_steps(&acc, &att, RATE, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_invariants_on_irregular_walk() {
        let signal = irregular_walk(6000);
        for config in [
            PedometerConfig::default(),
            PedometerConfig::default().with_min_step_time(0.3).with_mean_filter_size(2),
            PedometerConfig {
                window_size: 0.75,
                min_consecutive_steps: 5,
                ..Default::default()
            },
        ] {
            let params = config.resolve(RATE).unwrap();
            let steps = Pedometer::new(config.clone())
                .unwrap()
                .detect_in_signal(&signal, RATE)
                .unwrap()
                .steps;
            assert!(!steps.is_empty(), "expected steps for {:?}", config);

            for pair in steps.windows(2) {
                assert!(pair[0] < pair[1], "not strictly increasing: {:?}", pair);
                assert!(
                    (pair[1] - pair[0]) as f64 >= config.min_step_time * RATE,
                    "refractory violated: {:?}",
                    pair
                );
            }

            let margin = (config.window_size * RATE / 2.0).ceil() as usize;
            assert!(steps.iter().all(|&s| s >= margin && s < signal.len() - margin));

            for run in steps.chunk_by(|a, b| ((b - a) as f64) < params.tao_max) {
                assert!(run.len() >= config.min_consecutive_steps);
            }
        }
    }

    #[test]
    fn test_short_signal_returns_empty() {
        let (acc, att) = level_recording(&gait_signal(99, 40, 50, 4.0));
        assert_eq!(detect_steps(&acc, &att, RATE, None).unwrap(), Vec::<usize>::new());

        let (acc, att) = level_recording(&[]);
        assert!(detect_steps(&acc, &att, RATE, None).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_series_rejected() {
        let (acc, mut att) = level_recording(&gait_signal(500, 60, 50, 4.0));
        att.pop();
        let err = detect_steps(&acc, &att, RATE, None).unwrap_err();
        assert!(matches!(err, PedometerError::InvalidInput(_)));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_non_finite_samples_rejected() {
        let mut vertical = gait_signal(500, 60, 50, 4.0);
        vertical[250] = f64::NAN;
        let (acc, att) = level_recording(&vertical);
        let err = detect_steps(&acc, &att, RATE, None).unwrap_err();
        assert!(matches!(err, PedometerError::InvalidInput(_)));

        vertical[250] = f64::INFINITY;
        let pedometer = Pedometer::new(PedometerConfig::default()).unwrap();
        assert!(pedometer.detect_in_signal(&vertical, RATE).is_err());
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let (acc, att) = level_recording(&gait_signal(500, 60, 50, 4.0));
        assert!(detect_steps(&acc, &att, 0.0, None).is_err());
        assert!(detect_steps(&acc, &att, f64::NAN, None).is_err());
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = PedometerConfig {
            min_peak: 9.0,
            ..Default::default()
        };
        assert!(matches!(
            Pedometer::new(config),
            Err(PedometerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_trace_does_not_change_steps() {
        let signal = irregular_walk(4000);
        let plain = Pedometer::new(PedometerConfig::default())
            .unwrap()
            .detect_in_signal(&signal, RATE)
            .unwrap();
        let traced = Pedometer::new(PedometerConfig::default().with_debug(true))
            .unwrap()
            .detect_in_signal(&signal, RATE)
            .unwrap();

        assert!(plain.trace.is_none());
        assert_eq!(plain.steps, traced.steps);

        let trace = traced.trace.unwrap();
        assert_eq!(trace.vertical, signal);
        assert_eq!(trace.thresholds.len(), signal.len());
        assert_eq!(trace.step_count(), traced.steps.len());
    }

    #[test]
    fn test_custom_collaborators() {
        // Extractor reading the x axis; smoother that leaves the signal alone.
        let x_axis = |acc: &[Acceleration], _: &[Attitude]| -> Vec<f64> {
            acc.iter().map(|a| a.x).collect()
        };
        let identity = |s: &[f64], _: usize| s.to_vec();
        let config = PedometerConfig::default().with_mean_filter_size(4);
        let pedometer = Pedometer::with_collaborators(config, x_axis, identity).unwrap();

        let signal = gait_signal(1000, 60, 50, 4.0);
        let acc: Vec<Acceleration> = signal.iter().map(|&v| Acceleration::new(v, 0.0, 0.0)).collect();
        let att = vec![Attitude::default(); acc.len()];
        assert_eq!(pedometer.detect(&acc, &att, RATE).unwrap().len(), 18);
    }

    #[test]
    fn test_smoother_length_mismatch_rejected() {
        let truncating = |s: &[f64], _: usize| s[1..].to_vec();
        let config = PedometerConfig::default().with_mean_filter_size(3);
        let pedometer = Pedometer::with_collaborators(config, GravityProjection, truncating).unwrap();
        let err = pedometer
            .detect_in_signal(&gait_signal(500, 60, 50, 4.0), RATE)
            .unwrap_err();
        assert!(matches!(err, PedometerError::InvalidInput(_)));
    }

    #[test]
    fn test_classifier_gate_runs_after_run_filter() {
        let mut bumps: Vec<(usize, f64)> = (0..10).map(|k| (100 + 50 * k, 4.0)).collect();
        bumps[4].1 = 6.0;
        let signal = bump_signal(1000, &bumps);

        let tall_only = FnClassifier::new(10, |f: &[f64]| if f[10 + 3] > 5.0 { 1.0 } else { 0.0 });
        let pedometer = Pedometer::new(PedometerConfig::default())
            .unwrap()
            .with_classifier(tall_only, ClassifierGate::new(0.5, 10));

        let report = pedometer.detect_in_signal(&signal, RATE).unwrap();
        assert_eq!(report.candidate_count, 10);
        assert_eq!(report.steps, vec![300]);
    }
}
