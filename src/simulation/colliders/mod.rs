//! Colliders expose line and polygon geometry for collision and ray queries.
//!
//! Concrete colliders only provide geometry; ray enumeration and polygon
//! collision are derived once on top of it by the [`Collider`] trait.

use std::fmt;

use super::entity::{AsAny, ColliderOwner};
use super::geometry::{self, LineGeometry, Point};

mod car;
mod road;

pub use car::CarCollider;
pub use road::RoadCollider;

/// A geometry provider attached to an entity.
pub trait Collider: AsAny + fmt::Debug {
    /// Line geometry of the collider, each line finite or infinite.
    fn line_geometry(&self, owner: &ColliderOwner<'_>) -> Vec<LineGeometry>;

    /// Closed polygons of the collider.
    fn polygon_geometry(&self, owner: &ColliderOwner<'_>) -> Vec<Vec<Point>>;

    /// Every intersection of the finite ray `start -> end` with this collider,
    /// as the hit point and its position along the ray.
    fn collision_points(
        &self,
        owner: &ColliderOwner<'_>,
        start: Point,
        end: Point,
    ) -> Vec<(Point, f32)> {
        let ray = LineGeometry::finite(start, end);
        let mut points: Vec<(Point, f32)> = self
            .line_geometry(owner)
            .iter()
            .filter_map(|line| geometry::intersect_lines(&ray, line))
            .map(|hit| (hit.point, hit.position_a))
            .collect();

        for polygon in self.polygon_geometry(owner) {
            points.extend(geometry::polygon_line_intersections(start, end, &polygon));
        }

        points
    }

    /// Whether `polygon` crosses any line or polygon edge of this collider.
    fn check_polygon_collision(&self, owner: &ColliderOwner<'_>, polygon: &[Point]) -> bool {
        self.line_geometry(owner)
            .iter()
            .any(|line| geometry::polygon_intersects_line(polygon, line))
            || self
                .polygon_geometry(owner)
                .iter()
                .any(|own| geometry::polygons_intersect(polygon, own))
    }
}
