pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Body-frame linear acceleration (m/s², gravity removed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Acceleration {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Device attitude in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

impl Attitude {
    pub fn new(pitch: f64, roll: f64, yaw: f64) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Body-to-world rotation for this attitude.
    pub fn rotation(&self) -> Rot3 {
        Rot3::from_euler_angles(self.roll, self.pitch, self.yaw)
    }
}

/// `[pitch, roll, yaw]`, the order attitude triples are recorded in.
impl From<[f64; 3]> for Attitude {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}
