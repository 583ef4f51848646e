use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Acceleration, Attitude};

/// A recorded session: synchronized acceleration and attitude at a fixed rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Samples per second.
    pub sampling_rate: f64,
    pub acceleration: Vec<Acceleration>,
    pub attitude: Vec<Attitude>,
}

impl Recording {
    pub fn len(&self) -> usize {
        self.acceleration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acceleration.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sampling_rate
    }
}

/// Load a `.json` or gzip-compressed `.json.gz` recording.
pub fn load_recording(path: &Path) -> Result<Recording> {
    let file = File::open(path)?;
    if is_gzip(path) {
        from_reader(GzDecoder::new(file))
    } else {
        from_reader(file)
    }
}

/// True for `*.json` and `*.json.gz` paths.
pub fn is_recording_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".json") || name.ends_with(".json.gz")
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map(|e| e == "gz").unwrap_or(false)
}

fn from_reader<R: Read>(reader: R) -> Result<Recording> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}
