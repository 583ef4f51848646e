//! Synthetic gait signals shared by the unit tests.

use crate::types::{Acceleration, Attitude};

const BUMP_HALF_WIDTH: usize = 10;

/// Raised-cosine pulses of `amplitude` centred on each `(center, amplitude)`.
/// Every pulse has a single strict maximum at its centre.
pub fn bump_signal(len: usize, bumps: &[(usize, f64)]) -> Vec<f64> {
    let mut signal = vec![0.0; len];
    let h = BUMP_HALF_WIDTH as f64;
    for &(center, amplitude) in bumps {
        let start = center.saturating_sub(BUMP_HALF_WIDTH - 1);
        let end = (center + BUMP_HALF_WIDTH).min(len);
        for (j, slot) in signal.iter_mut().enumerate().take(end).skip(start) {
            let d = (j as f64 - center as f64).abs();
            *slot += amplitude * 0.5 * (1.0 + (std::f64::consts::PI * d / h).cos());
        }
    }
    signal
}

/// Evenly spaced pulses starting at `first_peak`, one every `period` samples.
pub fn gait_signal(len: usize, first_peak: usize, period: usize, amplitude: f64) -> Vec<f64> {
    let bumps: Vec<(usize, f64)> = (first_peak..len)
        .step_by(period)
        .map(|c| (c, amplitude))
        .collect();
    bump_signal(len, &bumps)
}

/// Level device (identity attitude) whose z axis carries `vertical`.
pub fn level_recording(vertical: &[f64]) -> (Vec<Acceleration>, Vec<Attitude>) {
    let acc = vertical
        .iter()
        .map(|&v| Acceleration::new(0.05, -0.02, v))
        .collect();
    let att = vec![Attitude::default(); vertical.len()];
    (acc, att)
}
