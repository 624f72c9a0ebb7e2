//! Line and polygon intersection kernel used by colliders and ranging sensors.
//!
//! Lines are parametrised from `start` (position `0`) to `end` (position `1`).
//! Polygons are closed vertex loops of any winding: edge `i` runs from
//! `polygon[i]` to `polygon[(i + 1) % n]`.
//!
//! Polygon tests only look for crossing edges, so a polygon fully contained in
//! another one is not reported as intersecting.

use geo::{Coord, Line};

use super::math::lerp_point;

/// A point in road space, in meters.
pub type Point = Coord<f32>;

/// A line that is either a finite segment or extends infinitely in both
/// directions through `start` and `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeometry {
    /// The two points defining the line.
    pub line: Line<f32>,
    /// Whether the line extends past its two points.
    pub infinite: bool,
}

impl LineGeometry {
    /// A finite segment from `start` to `end`.
    pub fn finite(start: Point, end: Point) -> Self {
        Self {
            line: Line::new(start, end),
            infinite: false,
        }
    }

    /// An infinite line through `start` and `end`.
    pub fn infinite(start: Point, end: Point) -> Self {
        Self {
            line: Line::new(start, end),
            infinite: true,
        }
    }

    fn accepts(&self, position: f32) -> bool {
        self.infinite || (0.0..=1.0).contains(&position)
    }
}

/// Result of intersecting two lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The intersection point.
    pub point: Point,
    /// Position of the point along the first line.
    pub position_a: f32,
    /// Position of the point along the second line.
    pub position_b: f32,
}

/// Intersects two lines, each finite or infinite.
///
/// Parallel and colinear lines never intersect, whatever their extent.
pub fn intersect_lines(a: &LineGeometry, b: &LineGeometry) -> Option<Intersection> {
    let (start_a, end_a) = (a.line.start, a.line.end);
    let (start_b, end_b) = (b.line.start, b.line.end);

    let t_top = (end_b.x - start_b.x) * (start_a.y - start_b.y)
        - (end_b.y - start_b.y) * (start_a.x - start_b.x);
    let u_top = (start_b.y - start_a.y) * (start_a.x - end_a.x)
        - (start_b.x - start_a.x) * (start_a.y - end_a.y);
    let bottom = (end_b.y - start_b.y) * (end_a.x - start_a.x)
        - (end_b.x - start_b.x) * (end_a.y - start_a.y);

    if bottom == 0.0 {
        return None;
    }

    let position_a = t_top / bottom;
    let position_b = u_top / bottom;

    if a.accepts(position_a) && b.accepts(position_b) {
        Some(Intersection {
            point: lerp_point(start_a, end_a, position_a),
            position_a,
            position_b,
        })
    } else {
        None
    }
}

/// Intersects two finite segments.
pub fn intersect_segments(a: Line<f32>, b: Line<f32>) -> Option<Intersection> {
    intersect_lines(
        &LineGeometry {
            line: a,
            infinite: false,
        },
        &LineGeometry {
            line: b,
            infinite: false,
        },
    )
}

/// Iterates the closed edge loop of a polygon.
pub fn edges(polygon: &[Point]) -> impl Iterator<Item = Line<f32>> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| Line::new(polygon[i], polygon[(i + 1) % n]))
}

/// Yields every polygon edge crossed by the finite line `start -> end`, in edge
/// order, as the crossing point and its position along the line.
pub fn polygon_line_intersections(
    start: Point,
    end: Point,
    polygon: &[Point],
) -> impl Iterator<Item = (Point, f32)> + '_ {
    let line = LineGeometry::finite(start, end);
    edges(polygon).filter_map(move |edge| {
        intersect_lines(&line, &LineGeometry { line: edge, infinite: false })
            .map(|hit| (hit.point, hit.position_a))
    })
}

/// Whether any edge of `a` crosses any edge of `b`.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    edges(a).any(|edge_a| edges(b).any(|edge_b| intersect_segments(edge_a, edge_b).is_some()))
}

/// Whether any edge of `polygon` crosses `line`.
pub fn polygon_intersects_line(polygon: &[Point], line: &LineGeometry) -> bool {
    edges(polygon).any(|edge| {
        intersect_lines(
            &LineGeometry {
                line: edge,
                infinite: false,
            },
            line,
        )
        .is_some()
    })
}
