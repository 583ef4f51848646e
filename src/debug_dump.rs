//! Diagnostic trace of one detection run and its Octave/Matlab rendering.
//!
//! The detector only fills a [`DetectionTrace`]; all formatting lives here so
//! enabling diagnostics cannot change which steps are returned.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionTrace {
    /// Vertical component the detector ran on (unsmoothed).
    pub vertical: Vec<f64>,
    /// Threshold per sample, `0.0` where the sample was not scanned.
    pub thresholds: Vec<f64>,
    /// True at every returned step index.
    pub step_mask: Vec<bool>,
}

impl DetectionTrace {
    pub fn new(vertical: Vec<f64>, thresholds: Vec<f64>, steps: &[usize]) -> Self {
        let mut step_mask = vec![false; vertical.len()];
        for &s in steps {
            if let Some(slot) = step_mask.get_mut(s) {
                *slot = true;
            }
        }
        Self {
            vertical,
            thresholds,
            step_mask,
        }
    }

    pub fn step_count(&self) -> usize {
        self.step_mask.iter().filter(|&&m| m).count()
    }
}

/// Write `trace` as an Octave script that plots the input, the threshold and
/// the detected steps (offset by 10 so they sit above the signal).
pub fn write_octave_dump<W: Write>(out: &mut W, trace: &DetectionTrace) -> io::Result<()> {
    write_column(out, "input", trace.vertical.iter().map(|v| v.to_string()))?;
    write_column(out, "thresholds", trace.thresholds.iter().map(|t| t.to_string()))?;
    write_column(
        out,
        "res",
        trace.step_mask.iter().map(|&m| if m { "1" } else { "0" }.to_string()),
    )?;

    writeln!(out, "nSteps={}", trace.step_count())?;
    writeln!(out, "figure;")?;
    writeln!(out, "plot([input thresholds res+10]);")?;
    writeln!(
        out,
        "legend('Vertical component of input','Peak threshold','detected steps');"
    )?;
    Ok(())
}

fn write_column<W, I>(out: &mut W, name: &str, values: I) -> io::Result<()>
where
    W: Write,
    I: Iterator<Item = String>,
{
    writeln!(out, "{name}=[...")?;
    for value in values {
        writeln!(out, "{value};...")?;
    }
    writeln!(out, "];")
}
