//! Sensors measure the environment once per frame, before any controller of
//! their entity runs.

use std::fmt;

use super::entity::{AsAny, SensorContext};
use super::error::SimulationError;

mod distance;

pub use distance::DistanceSensor;

/// A component that measures the environment once per frame.
pub trait Sensor: AsAny + fmt::Debug {
    /// Simulates the sensor for one frame.
    fn simulate(&mut self, ctx: &SensorContext<'_>) -> Result<(), SimulationError>;

    /// Raw reading.
    fn value(&self) -> f32;

    /// Reading rescaled to `[0, 1]`.
    fn normalized_value(&self) -> f32;
}
