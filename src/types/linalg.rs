//! Linear algebra aliases for attitude handling
//!
//! Keeps the nalgebra types used by the vertical-component path in one
//! place so the extractor reads in terms of vectors and rotations.

use nalgebra::{Rotation3, Vector3};

// ===== Frames =====
pub type Vec3 = Vector3<f64>;
pub type Rot3 = Rotation3<f64>;

/// World "up" axis. Vertical acceleration is the projection onto this axis.
pub fn world_up() -> Vec3 {
    Vec3::z()
}
