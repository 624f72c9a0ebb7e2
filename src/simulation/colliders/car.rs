use std::f32::consts::PI;

use super::super::entity::ColliderOwner;
use super::super::geometry::{LineGeometry, Point};
use super::super::math::circle_point;
use super::super::parameters::CarParameterSet;
use super::Collider;

/// Oriented rectangle around a car, sized by the owner's [`CarParameterSet`].
///
/// The rectangle is recomputed from the owner's pose on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarCollider;

impl CarCollider {
    /// Creates a car collider.
    pub fn new() -> Self {
        Self
    }

    /// The four corners of a `parameters`-sized car at `owner`'s pose, or
    /// `None` when the owner has no [`CarParameterSet`].
    pub fn rectangle(&self, owner: &ColliderOwner<'_>) -> Option<[Point; 4]> {
        let parameters = owner.parameter_set::<CarParameterSet>()?;
        let half_width = parameters.width / 2.0;
        let half_length = parameters.length / 2.0;
        let radius = half_width.hypot(half_length);
        let offset = half_width.atan2(half_length);

        let position = owner.pose.position;
        let angle = owner.pose.angle;

        Some([
            position + circle_point(radius, angle + offset),
            position + circle_point(radius, angle + PI - offset),
            position + circle_point(radius, angle + PI + offset),
            position + circle_point(radius, angle - offset),
        ])
    }
}

impl Collider for CarCollider {
    fn line_geometry(&self, _owner: &ColliderOwner<'_>) -> Vec<LineGeometry> {
        Vec::new()
    }

    fn polygon_geometry(&self, owner: &ColliderOwner<'_>) -> Vec<Vec<Point>> {
        self.rectangle(owner)
            .map(|corners| vec![corners.to_vec()])
            .unwrap_or_default()
    }
}
