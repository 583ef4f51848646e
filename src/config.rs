// config.rs - Tunable parameters for step detection
//
// Times are given in seconds and converted to sample counts once per call
// via `resolve`. The detector itself only ever sees `SampleParams`.

use serde::{Deserialize, Serialize};

use crate::error::{PedometerError, Result};

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PedometerConfig {
    // ── Adaptive threshold ──
    /// Sliding window length in seconds.
    pub window_size: f64,
    /// Lower bound on the window's working maximum, and the threshold floor.
    pub min_peak: f64,
    /// Upper bound on the working maximum; peaks at or above it are clipping.
    pub max_peak: f64,
    /// Fraction of the working maximum added to the window mean.
    pub peak_threshold: f64,

    // ── Step timing ──
    /// Refractory period between two steps, seconds.
    pub min_step_time: f64,
    /// Largest gap between two steps of the same run, seconds.
    pub max_step_time: f64,
    pub min_consecutive_steps: usize,

    // ── Pre-processing ──
    /// Smoothing window in samples. Values <= 1 disable smoothing.
    pub mean_filter_size: usize,

    // ── Diagnostics ──
    pub debug: bool,
}

impl Default for PedometerConfig {
    fn default() -> Self {
        Self {
            window_size: 1.0,
            min_peak: 2.0,
            max_peak: 8.0,
            peak_threshold: 0.5,
            min_step_time: 0.4,
            max_step_time: 0.8,
            min_consecutive_steps: 3,
            mean_filter_size: 1,
            debug: false,
        }
    }
}

/// Configuration with every time converted to samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    pub window_len: usize,
    /// Samples excluded from the scan at each end of the signal.
    pub offset: usize,
    pub tao_min: f64,
    pub tao_max: f64,
    pub min_peak: f64,
    pub max_peak: f64,
    pub peak_threshold: f64,
    pub min_consecutive_steps: usize,
    pub mean_filter_size: usize,
}

impl PedometerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_min_step_time(mut self, seconds: f64) -> Self {
        self.min_step_time = seconds;
        self
    }

    pub fn with_mean_filter_size(mut self, samples: usize) -> Self {
        self.mean_filter_size = samples;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Reject values outside their domain before any scan starts.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("windowSize", self.window_size),
            ("minPeak", self.min_peak),
            ("maxPeak", self.max_peak),
            ("peakThreshold", self.peak_threshold),
            ("minStepTime", self.min_step_time),
            ("maxStepTime", self.max_step_time),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(PedometerError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.window_size <= 0.0 {
            return Err(PedometerError::InvalidConfig(format!(
                "windowSize must be positive, got {}",
                self.window_size
            )));
        }
        if self.min_peak >= self.max_peak {
            return Err(PedometerError::InvalidConfig(format!(
                "minPeak ({}) must be below maxPeak ({})",
                self.min_peak, self.max_peak
            )));
        }
        if self.peak_threshold < 0.0 {
            return Err(PedometerError::InvalidConfig(format!(
                "peakThreshold must not be negative, got {}",
                self.peak_threshold
            )));
        }
        if self.min_step_time < 0.0 {
            return Err(PedometerError::InvalidConfig(format!(
                "minStepTime must not be negative, got {}",
                self.min_step_time
            )));
        }
        if self.min_step_time >= self.max_step_time {
            return Err(PedometerError::InvalidConfig(format!(
                "minStepTime ({}) must be below maxStepTime ({})",
                self.min_step_time, self.max_step_time
            )));
        }
        Ok(())
    }

    /// Convert to sample units for a given sampling rate.
    pub fn resolve(&self, sampling_rate: f64) -> Result<SampleParams> {
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(PedometerError::InvalidInput(format!(
                "sampling rate must be positive and finite, got {sampling_rate}"
            )));
        }
        self.validate()?;

        let window_len = (self.window_size * sampling_rate).round() as usize;
        if window_len == 0 {
            return Err(PedometerError::InvalidConfig(format!(
                "windowSize {}s is shorter than one sample at {} Hz",
                self.window_size, sampling_rate
            )));
        }

        Ok(SampleParams {
            window_len,
            offset: window_len.div_ceil(2),
            tao_min: self.min_step_time * sampling_rate,
            tao_max: self.max_step_time * sampling_rate,
            min_peak: self.min_peak,
            max_peak: self.max_peak,
            peak_threshold: self.peak_threshold,
            min_consecutive_steps: self.min_consecutive_steps,
            mean_filter_size: self.mean_filter_size,
        })
    }
}
