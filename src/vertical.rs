// vertical.rs - Vertical component of linear acceleration
//
// Rotates each body-frame sample into the world frame using the attitude at
// the same instant and keeps the component along world "up". No filtering or
// attitude estimation happens here; the attitude series is taken as given.

use crate::error::{PedometerError, Result};
use crate::types::{world_up, Acceleration, Attitude};

/// Turns synchronized acceleration + attitude series into one scalar per sample.
pub trait VerticalExtractor {
    fn extract(&self, acceleration: &[Acceleration], attitude: &[Attitude]) -> Result<Vec<f64>>;
}

/// Projection of the world-frame acceleration onto the up axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct GravityProjection;

impl GravityProjection {
    pub fn project(acceleration: &Acceleration, attitude: &Attitude) -> f64 {
        let world = attitude.rotation() * acceleration.to_vec3();
        world.dot(&world_up())
    }
}

impl VerticalExtractor for GravityProjection {
    fn extract(&self, acceleration: &[Acceleration], attitude: &[Attitude]) -> Result<Vec<f64>> {
        check_synchronized(acceleration, attitude)?;
        Ok(acceleration
            .iter()
            .zip(attitude)
            .map(|(acc, att)| Self::project(acc, att))
            .collect())
    }
}

impl<F> VerticalExtractor for F
where
    F: Fn(&[Acceleration], &[Attitude]) -> Vec<f64>,
{
    fn extract(&self, acceleration: &[Acceleration], attitude: &[Attitude]) -> Result<Vec<f64>> {
        check_synchronized(acceleration, attitude)?;
        let vertical = self(acceleration, attitude);
        if vertical.len() != acceleration.len() {
            return Err(PedometerError::InvalidInput(format!(
                "vertical component has {} samples, expected {}",
                vertical.len(),
                acceleration.len()
            )));
        }
        Ok(vertical)
    }
}

pub(crate) fn check_synchronized(acceleration: &[Acceleration], attitude: &[Attitude]) -> Result<()> {
    if acceleration.len() != attitude.len() {
        return Err(PedometerError::InvalidInput(format!(
            "acceleration has {} samples but attitude has {}",
            acceleration.len(),
            attitude.len()
        )));
    }
    Ok(())
}
