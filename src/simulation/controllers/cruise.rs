use super::super::entity::ControllerContext;
use super::super::error::SimulationError;
use super::Controller;

/// Drives a car straight along the road at a constant speed.
///
/// Has no collision awareness; used for traffic that physics cars must avoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarCruiseController {
    /// Cruise speed in m/s.
    pub speed: f32,
}

impl CarCruiseController {
    /// Creates a cruise controller.
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Controller for CarCruiseController {
    fn simulate(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError> {
        ctx.pose.position.y += self.speed * ctx.time.time_delta as f32;
        Ok(())
    }
}
