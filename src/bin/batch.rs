use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};
use serde_json::{json, Value};

use pedometer_rs::recording::is_recording_file;
use pedometer_rs::{load_recording, Pedometer, PedometerConfig};

#[derive(Parser, Debug)]
struct Args {
    /// Single recording (.json or .json.gz)
    #[arg(long, conflicts_with = "dir")]
    recording: Option<PathBuf>,

    /// Directory of recordings to batch process (*.json[.gz])
    #[arg(long)]
    dir: Option<PathBuf>,

    /// JSON file with configuration overrides (camelCase keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON object mapping recording file name to expected step count
    #[arg(long)]
    expected: Option<PathBuf>,

    /// Allowed absolute difference from the expected count
    #[arg(long, default_value_t = 0)]
    tolerance: usize,
}

fn run_once(path: &Path, pedometer: &Pedometer, expected: Option<usize>, tolerance: usize) -> anyhow::Result<Value> {
    let recording = load_recording(path)?;
    let report = pedometer.analyze(&recording.acceleration, &recording.attitude, recording.sampling_rate)?;
    let count = report.step_count();

    let pass = expected.map(|e| count.abs_diff(e) <= tolerance);
    if pass == Some(false) {
        warn!("{}: detected {} steps, expected {:?}", path.display(), count, expected);
    }

    Ok(json!({
        "recording": file_name(path),
        "samples": recording.len(),
        "sampling_rate": recording.sampling_rate,
        "duration_s": recording.duration_secs(),
        "candidates": report.candidate_count,
        "steps": count,
        "expected": expected,
        "pass": pass,
    }))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PedometerConfig> {
    match path {
        Some(p) => Ok(PedometerConfig::from_json(&std::fs::read_to_string(p)?)?),
        None => Ok(PedometerConfig::default()),
    }
}

fn load_expected(path: Option<&PathBuf>) -> anyhow::Result<BTreeMap<String, usize>> {
    match path {
        Some(p) => Ok(serde_json::from_str(&std::fs::read_to_string(p)?)?),
        None => Ok(BTreeMap::new()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let pedometer = Pedometer::new(load_config(args.config.as_ref())?)?;
    let expected = load_expected(args.expected.as_ref())?;

    let mut paths = Vec::new();
    if let Some(dir) = args.dir.as_ref() {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_recording_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
    } else if let Some(recording) = args.recording.as_ref() {
        paths.push(recording.clone());
    } else {
        anyhow::bail!("Provide --recording or --dir");
    }

    let mut results = Vec::new();
    let mut failures = 0usize;
    for path in &paths {
        let want = expected.get(&file_name(path)).copied();
        match run_once(path, &pedometer, want, args.tolerance) {
            Ok(res) => {
                if res["pass"] == Value::Bool(false) {
                    failures += 1;
                }
                results.push(res);
            }
            Err(e) => {
                eprintln!("Failed {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    info!("{} recordings, {} failures", paths.len(), failures);

    if failures > 0 {
        anyhow::bail!("{failures} of {} recordings failed", paths.len());
    }
    Ok(())
}
