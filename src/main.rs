use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pedometer_rs::{load_recording, write_octave_dump, Pedometer, PedometerConfig};

#[derive(Parser, Debug)]
#[command(name = "pedometer")]
#[command(about = "Detect walking steps in an acceleration + attitude recording", long_about = None)]
struct Args {
    /// Recording to analyse (.json or .json.gz)
    #[arg(value_name = "RECORDING")]
    recording: PathBuf,

    /// JSON file with configuration overrides (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling rate in Hz (defaults to the recording's own rate)
    #[arg(long)]
    sampling_rate: Option<f64>,

    /// Sliding window length (seconds)
    #[arg(long)]
    window_size: Option<f64>,

    /// Lower bound on the expected step peak
    #[arg(long)]
    min_peak: Option<f64>,

    /// Upper bound on the expected step peak
    #[arg(long)]
    max_peak: Option<f64>,

    /// Minimum time between two steps (seconds)
    #[arg(long)]
    min_step_time: Option<f64>,

    /// Maximum time between two steps of one run (seconds)
    #[arg(long)]
    max_step_time: Option<f64>,

    /// Fraction of the window maximum added to the window mean
    #[arg(long)]
    peak_threshold: Option<f64>,

    /// Minimum number of consecutive steps to keep a run
    #[arg(long)]
    min_consecutive_steps: Option<usize>,

    /// Mean filter length in samples (<= 1 disables smoothing)
    #[arg(long)]
    mean_filter_size: Option<usize>,

    /// Print an Octave/Matlab plotting script instead of the step list
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Also write the step report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = build_config(&args)?;
    let recording = load_recording(&args.recording)
        .with_context(|| format!("failed to load {}", args.recording.display()))?;
    let sampling_rate = args.sampling_rate.unwrap_or(recording.sampling_rate);

    info!(
        "{}: {} samples at {} Hz ({:.1} s)",
        args.recording.display(),
        recording.len(),
        sampling_rate,
        recording.len() as f64 / sampling_rate
    );

    let pedometer = Pedometer::new(config)?;
    let report = pedometer.analyze(&recording.acceleration, &recording.attitude, sampling_rate)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match report.trace.as_ref() {
        Some(trace) => write_octave_dump(&mut out, trace)?,
        None => {
            writeln!(out, "Detected {} steps", report.step_count())?;
            for step in &report.steps {
                writeln!(out, "{step}")?;
            }
        }
    }
    out.flush()?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(())
}

/// Defaults, then the config file, then individual flags.
fn build_config(args: &Args) -> Result<PedometerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            PedometerConfig::from_json(&json)?
        }
        None => PedometerConfig::default(),
    };

    if let Some(v) = args.window_size {
        config.window_size = v;
    }
    if let Some(v) = args.min_peak {
        config.min_peak = v;
    }
    if let Some(v) = args.max_peak {
        config.max_peak = v;
    }
    if let Some(v) = args.min_step_time {
        config.min_step_time = v;
    }
    if let Some(v) = args.max_step_time {
        config.max_step_time = v;
    }
    if let Some(v) = args.peak_threshold {
        config.peak_threshold = v;
    }
    if let Some(v) = args.min_consecutive_steps {
        config.min_consecutive_steps = v;
    }
    if let Some(v) = args.mean_filter_size {
        config.mean_filter_size = v;
    }
    if args.debug {
        config.debug = true;
    }

    config.validate()?;
    Ok(config)
}
