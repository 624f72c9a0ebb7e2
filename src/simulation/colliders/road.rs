use geo::Coord;

use super::super::entity::ColliderOwner;
use super::super::geometry::{LineGeometry, Point};
use super::super::parameters::RoadParameterSet;
use super::Collider;

/// The two borders of a road as infinite vertical lines, taken from the
/// owner's [`RoadParameterSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadCollider;

impl RoadCollider {
    /// Creates a road collider.
    pub fn new() -> Self {
        Self
    }
}

fn vertical(x: f32) -> LineGeometry {
    LineGeometry::infinite(Coord { x, y: 0.0 }, Coord { x, y: 1.0 })
}

impl Collider for RoadCollider {
    fn line_geometry(&self, owner: &ColliderOwner<'_>) -> Vec<LineGeometry> {
        owner
            .parameter_set::<RoadParameterSet>()
            .map(|road| vec![vertical(road.left_border()), vertical(road.right_border())])
            .unwrap_or_default()
    }

    fn polygon_geometry(&self, _owner: &ColliderOwner<'_>) -> Vec<Vec<Point>> {
        Vec::new()
    }
}
