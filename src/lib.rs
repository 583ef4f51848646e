//! Step detection from accelerometer and attitude recordings.
//!
//! Steps are found with a windowed, adaptive-threshold peak detector run over
//! the vertical component of linear acceleration:
//!
//! 1. rotate each sample into the world frame and keep the "up" component,
//! 2. optionally smooth it with a mean filter,
//! 3. scan once with a sliding window whose mean and bounded maximum set a
//!    per-sample threshold, accepting local maxima outside a refractory period,
//! 4. drop runs of steps too short to be a walking bout.
//!
//! ```no_run
//! use pedometer_rs::{detect_steps, Acceleration, Attitude, PedometerConfig};
//!
//! let acc: Vec<Acceleration> = Vec::new();
//! let att: Vec<Attitude> = Vec::new();
//! let config = PedometerConfig::default().with_min_step_time(0.3);
//! let steps = detect_steps(&acc, &att, 100.0, Some(&config))?;
//! println!("{} steps", steps.len());
//! # Ok::<(), pedometer_rs::PedometerError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod debug_dump;
pub mod detector;
pub mod error;
pub mod pedometer;
pub mod recording;
pub mod run_filter;
pub mod smoothing;
pub mod types;
pub mod vertical;
pub mod window;

#[cfg(test)]
mod test_support;

pub use classifier::{ClassifierGate, FnClassifier, StepClassifier};
pub use config::{PedometerConfig, SampleParams};
pub use debug_dump::{write_octave_dump, DetectionTrace};
pub use error::{PedometerError, Result};
pub use pedometer::{detect_steps, Pedometer, StepReport};
pub use recording::{load_recording, Recording};
pub use smoothing::{MeanFilter, Smoother};
pub use types::{Acceleration, Attitude};
pub use vertical::{GravityProjection, VerticalExtractor};
