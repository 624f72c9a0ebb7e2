//! Ranging sensor - casts a ray from the car and reports the nearest hit.

use geo::Coord;
use tracing::trace;

use super::super::entity::{Pose, SensorContext};
use super::super::error::SimulationError;
use super::super::geometry::Point;
use super::super::math::rotate;
use super::Sensor;

/// Distance sensor mounted on an entity.
///
/// The ray starts at the mount point and extends `range` meters along the mount
/// heading. Readings:
/// - `value`: distance to the closest collider of another entity, or `range`
/// - `normalized_value`: `1.0` for contact at the mount point, `0.0` for nothing in range
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSensor {
    /// Mount point relative to the owner, in the owner's frame.
    pub position: Point,
    /// Mount heading relative to the owner.
    pub angle: f32,
    /// Maximum range in meters.
    pub range: f32,
    value: f32,
    normalized_value: f32,
}

impl DistanceSensor {
    /// Default range in meters.
    pub const DEFAULT_RANGE: f32 = 10.0;

    /// Creates a sensor reading "nothing detected".
    pub fn new(position: Point, angle: f32, range: f32) -> Self {
        Self {
            position,
            angle,
            range,
            value: range,
            normalized_value: 0.0,
        }
    }

    /// Creates a sensor with [`DEFAULT_RANGE`](Self::DEFAULT_RANGE).
    pub fn with_default_range(position: Point, angle: f32) -> Self {
        Self::new(position, angle, Self::DEFAULT_RANGE)
    }

    /// World-space start of the ray for an owner at `pose`.
    pub fn start_point(&self, pose: &Pose) -> Point {
        pose.position + rotate(self.position, pose.angle)
    }

    /// World-space end of the ray for an owner at `pose`.
    pub fn end_point(&self, pose: &Pose) -> Point {
        self.start_point(pose) + self.vector(pose)
    }

    /// Ray vector from start to end for an owner at `pose`.
    pub fn vector(&self, pose: &Pose) -> Point {
        rotate(
            Coord {
                x: 0.0,
                y: self.range,
            },
            pose.angle + self.angle,
        )
    }
}

impl Sensor for DistanceSensor {
    fn simulate(&mut self, ctx: &SensorContext<'_>) -> Result<(), SimulationError> {
        let start = self.start_point(&ctx.pose);
        let end = self.end_point(&ctx.pose);

        let mut closest: Option<f32> = None;
        for other in ctx.others.iter() {
            let owner = other.collider_owner();
            for collider in other.collider_components() {
                for (_, position) in collider.collision_points(&owner, start, end) {
                    closest = Some(closest.map_or(position, |c| c.min(position)));
                }
            }
        }

        match closest {
            Some(position) => {
                self.normalized_value = 1.0 - position;
                self.value = self.range * position;
                trace!(owner = ?ctx.owner, distance = self.value, "distance sensor contact");
            }
            None => {
                self.normalized_value = 0.0;
                self.value = self.range;
            }
        }

        Ok(())
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn normalized_value(&self) -> f32 {
        self.normalized_value
    }
}
