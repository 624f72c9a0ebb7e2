//! Approximate car physics: throttle driven acceleration, speed dependent drag,
//! speed scaled steering, and collision based death.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::colliders::CarCollider;
use super::super::entity::ControllerContext;
use super::super::error::{ConfigError, SimulationError};
use super::super::math::{bound, circle_point, deg_to_rad, sign, wrap_angle};
use super::Controller;

/// Below this throttle and speed the car is snapped to a standstill.
const IDLE_THROTTLE: f32 = 0.01;
const IDLE_SPEED: f32 = 0.5;

/// Tuning of a [`CarPhysicsController`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarPhysicsParameters {
    /// Maximum forward acceleration in m/s².
    pub max_forward_acceleration: f32,
    /// Maximum reverse acceleration in m/s².
    pub max_reverse_acceleration: f32,
    /// Maximum braking deceleration in m/s².
    pub max_braking_acceleration: f32,
    /// Constant part of the drag in m/s².
    pub drag_base: f32,
    /// Quadratic drag factor in 1/m.
    pub drag_factor: f32,
    /// Maximum forward speed in m/s.
    pub max_forward_speed: f32,
    /// Maximum reverse speed in m/s.
    pub max_reverse_speed: f32,
    /// Heading change per meter driven at full steering, in rad/m.
    pub steering_factor: f32,
}

impl Default for CarPhysicsParameters {
    fn default() -> Self {
        Self {
            max_forward_acceleration: 20.0,
            max_reverse_acceleration: 10.0,
            max_braking_acceleration: 30.0,
            drag_base: 1.0,
            drag_factor: 0.02,
            max_forward_speed: 15.0,
            max_reverse_speed: 5.0,
            steering_factor: deg_to_rad(5.0),
        }
    }
}

impl CarPhysicsParameters {
    /// Checks that every value is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("max_forward_acceleration", self.max_forward_acceleration),
            ("max_reverse_acceleration", self.max_reverse_acceleration),
            ("max_braking_acceleration", self.max_braking_acceleration),
            ("drag_base", self.drag_base),
            ("drag_factor", self.drag_factor),
            ("max_forward_speed", self.max_forward_speed),
            ("max_reverse_speed", self.max_reverse_speed),
            ("steering_factor", self.steering_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Moves a car from throttle and steering input and kills it on collision.
///
/// Input comes from the first input controller of the entity, if any;
/// otherwise `throttle` and `steering_input` can be set directly. The car dies
/// when its [`CarCollider`] rectangle crosses a collider of an entity that does
/// not carry a physics controller itself (road borders and traffic, never other
/// physics driven cars). A dead car stays in place as an obstacle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CarPhysicsController {
    /// Physics tuning.
    pub parameters: CarPhysicsParameters,
    /// Current throttle in `[-1, 1]`.
    pub throttle: f32,
    /// Current steering input in `[-1, 1]`.
    pub steering_input: f32,
    acceleration: f32,
    current_speed: f32,
    time_of_death: Option<f64>,
    distance_traveled: f64,
    distance_moved: f64,
    average_speed: f64,
}

impl CarPhysicsController {
    /// Creates a controller at rest.
    pub fn new(parameters: CarPhysicsParameters) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    /// Acceleration of the last frame in m/s², negative when slowing down or reversing.
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Current speed in m/s, negative when reversing.
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Whether the car has collided.
    pub fn is_dead(&self) -> bool {
        self.time_of_death.is_some()
    }

    /// Simulation time of the collision in seconds.
    pub fn time_of_death(&self) -> Option<f64> {
        self.time_of_death
    }

    /// Distance along the road, i.e. the Y coordinate of the car.
    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// Distance actually driven; reversing reduces it.
    pub fn distance_moved(&self) -> f64 {
        self.distance_moved
    }

    /// [`distance_moved`](Self::distance_moved) over simulation time, `0` at time zero.
    pub fn average_speed(&self) -> f64 {
        self.average_speed
    }

    /// Revives the car and clears all motion state and statistics.
    pub fn reset(&mut self) {
        *self = Self::new(self.parameters);
    }

    fn driven_acceleration(&self) -> f32 {
        let p = &self.parameters;
        let braking = sign(self.throttle) != sign(self.current_speed);

        if self.throttle > 0.0 {
            self.throttle
                * if braking {
                    p.max_braking_acceleration
                } else {
                    p.max_forward_acceleration
                }
        } else if self.throttle < 0.0 {
            self.throttle
                * if braking {
                    p.max_braking_acceleration
                } else {
                    p.max_reverse_acceleration
                }
        } else {
            0.0
        }
    }

    fn drag(&self) -> f32 {
        let p = &self.parameters;
        let magnitude = self.current_speed * self.current_speed * p.drag_factor + p.drag_base;
        match sign(self.current_speed) {
            1 => magnitude,
            -1 => -magnitude,
            _ => 0.0,
        }
    }
}

impl Controller for CarPhysicsController {
    fn simulate(&mut self, ctx: &mut ControllerContext<'_>) -> Result<(), SimulationError> {
        if self.is_dead() {
            return Ok(());
        }

        if let Some(input) = ctx.driving_input {
            self.throttle = bound(input.throttle, -1.0, 1.0);
            self.steering_input = bound(input.steering_input, -1.0, 1.0);
        }

        let dt = ctx.time.time_delta as f32;

        self.acceleration = self.driven_acceleration() - self.drag();
        self.current_speed = bound(
            self.current_speed + self.acceleration * dt,
            -self.parameters.max_reverse_speed,
            self.parameters.max_forward_speed,
        );

        if self.throttle.abs() < IDLE_THROTTLE && self.current_speed.abs() < IDLE_SPEED {
            self.current_speed = 0.0;
        }

        let angle = wrap_angle(
            ctx.pose.angle
                + self.steering_input * self.parameters.steering_factor * self.current_speed * dt,
        );
        let displacement = circle_point(self.current_speed * dt, angle);

        ctx.pose.position = ctx.pose.position + displacement;
        ctx.pose.angle = angle;

        if !ctx.pose.is_finite() {
            return Err(SimulationError::NonFinitePose {
                controller: "CarPhysicsController",
                x: ctx.pose.position.x,
                y: ctx.pose.position.y,
                angle: ctx.pose.angle,
            });
        }

        let step = f64::from(displacement.x.hypot(displacement.y));
        if self.current_speed >= 0.0 {
            self.distance_moved += step;
        } else {
            self.distance_moved -= step;
        }
        self.distance_traveled = f64::from(ctx.pose.position.y);

        let simulation_time = ctx.time.simulation_time;
        self.average_speed = if simulation_time > 0.0 {
            self.distance_moved / simulation_time
        } else {
            0.0
        };

        let Some(collider) = ctx.collider::<CarCollider>() else {
            return Ok(());
        };
        let polygon = collider
            .rectangle(&ctx.collider_owner())
            .ok_or(SimulationError::MissingComponent {
                component: "CarParameterSet",
            })?;

        let collision = ctx
            .others
            .iter()
            .filter(|other| !other.has_controller::<CarPhysicsController>())
            .any(|other| {
                let owner = other.collider_owner();
                other
                    .collider_components()
                    .iter()
                    .any(|c| c.check_polygon_collision(&owner, &polygon))
            });

        if collision {
            self.time_of_death = Some(simulation_time);
            debug!(
                owner = ?ctx.owner,
                time = simulation_time,
                distance = self.distance_traveled,
                "car collided"
            );
        }

        Ok(())
    }
}
