//! Controllers run once per frame, after the sensors of their entity.
//!
//! - [`CarPhysicsController`] - kinematics, drag, steering and death detection
//! - [`CarCruiseController`] - constant speed traffic
//! - [`RoadController`] - lane geometry of the road
//! - [`KeyboardCarInputController`] / [`NetworkCarInputController`] - driving input sources

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{AsAny, ControllerContext};
use super::error::SimulationError;

mod cruise;
mod input;
mod physics;
mod road;

pub use cruise::CarCruiseController;
pub use input::{INTENT_OUTPUTS, KeyboardCarInputController, NetworkCarInputController};
pub use physics::{CarPhysicsController, CarPhysicsParameters};
pub use road::RoadController;

/// A component invoked once per frame that may read sensors and inputs and
/// move its entity.
pub trait Controller: AsAny + fmt::Debug {
    /// Simulates the controller for one frame.
    fn simulate(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError>;

    /// Driving input offered to physics controllers of the same entity.
    ///
    /// Only input controllers return `Some`.
    fn driving_input(&self) -> Option<DrivingInput> {
        None
    }
}

/// Throttle and steering, each expected in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrivingInput {
    /// Positive accelerates forward, negative brakes or reverses.
    pub throttle: f32,
    /// Positive steers right, negative steers left.
    pub steering_input: f32,
}

/// Four on/off driving intents, as produced by keys or network outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrivingIntent {
    /// Accelerate forward.
    pub accelerate: bool,
    /// Brake or reverse.
    pub decelerate: bool,
    /// Steer left.
    pub steer_left: bool,
    /// Steer right.
    pub steer_right: bool,
}

impl DrivingIntent {
    /// Converts the intents into a driving input.
    ///
    /// Conflicting pairs (both or neither pressed) collapse to neutral.
    pub fn to_input(self) -> DrivingInput {
        let throttle = match (self.accelerate, self.decelerate) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        let steering_input = match (self.steer_left, self.steer_right) {
            (false, true) => 1.0,
            (true, false) => -1.0,
            _ => 0.0,
        };
        DrivingInput {
            throttle,
            steering_input,
        }
    }
}
