#![allow(missing_docs)]

use std::f32::consts::PI;

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Line, coord};
use proptest::prelude::*;
use roadsim::simulation::geometry::{
    LineGeometry, Point, intersect_lines, intersect_segments, polygon_intersects_line,
    polygons_intersect,
};

fn square(x: f32, y: f32, half: f32) -> Vec<Point> {
    vec![
        coord! { x: x - half, y: y - half },
        coord! { x: x + half, y: y - half },
        coord! { x: x + half, y: y + half },
        coord! { x: x - half, y: y + half },
    ]
}

prop_compose! {
    fn arb_point()(x in -100.0f32..100.0, y in -100.0f32..100.0) -> Point {
        coord! { x: x, y: y }
    }
}

prop_compose! {
    // Small closed loops in a shared box so that pairs often overlap.
    fn arb_polygon()(
        points in prop::collection::vec((-10.0f32..10.0, -10.0f32..10.0), 3..6)
    ) -> Vec<Point> {
        points.into_iter().map(|(x, y)| coord! { x: x, y: y }).collect()
    }
}

prop_compose! {
    fn arb_line()(start in arb_point(), end in arb_point(), infinite in any::<bool>()) -> LineGeometry {
        LineGeometry { line: Line::new(start, end), infinite }
    }
}

prop_compose! {
    // Two segments built around a shared point so that they always cross.
    fn arb_crossing()(
        center in arb_point(),
        angle in 0.0f32..PI,
        spread in 0.2f32..(PI - 0.2),
        lengths in prop::array::uniform4(0.5f32..10.0),
    ) -> (Line<f32>, Line<f32>, Point) {
        let along = |angle: f32, distance: f32| coord! {
            x: center.x + angle.cos() * distance,
            y: center.y + angle.sin() * distance,
        };
        let other = angle + spread;
        (
            Line::new(along(angle, -lengths[0]), along(angle, lengths[1])),
            Line::new(along(other, -lengths[2]), along(other, lengths[3])),
            center,
        )
    }
}

prop_compose! {
    // Integer coordinates keep the direction vectors exact.
    fn arb_parallel()(
        sx in -50i16..50, sy in -50i16..50,
        dx in -20i16..20, dy in -20i16..20,
        ox in -30i16..30, oy in -30i16..30,
    ) -> (Line<f32>, Line<f32>) {
        let (dx, dy) = if dx == 0 && dy == 0 { (1, 0) } else { (dx, dy) };
        let start = coord! { x: f32::from(sx), y: f32::from(sy) };
        let end = coord! { x: f32::from(sx + dx), y: f32::from(sy + dy) };
        let offset = coord! { x: f32::from(ox), y: f32::from(oy) };
        (Line::new(start, end), Line::new(start + offset, end + offset))
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn intersection_is_symmetric(a in arb_line(), b in arb_line()) {
        let ab = intersect_lines(&a, &b);
        let ba = intersect_lines(&b, &a);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert_eq!(ab.position_a, ba.position_b);
            prop_assert_eq!(ab.position_b, ba.position_a);
        }
    }

    #[test]
    fn polygon_intersection_is_symmetric(a in arb_polygon(), b in arb_polygon()) {
        prop_assert_eq!(polygons_intersect(&a, &b), polygons_intersect(&b, &a));
    }

    #[test]
    fn crossing_segments_meet_inside_both(crossing in arb_crossing()) {
        let (a, b, center) = crossing;
        let hit = intersect_segments(a, b);
        prop_assert!(hit.is_some());
        let hit = hit.unwrap();
        prop_assert!((0.0..=1.0).contains(&hit.position_a));
        prop_assert!((0.0..=1.0).contains(&hit.position_b));
        prop_assert!((hit.point.x - center.x).abs() < 1e-2);
        prop_assert!((hit.point.y - center.y).abs() < 1e-2);

        match line_intersection(a, b) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                prop_assert!((hit.point.x - intersection.x).abs() < 1e-2);
                prop_assert!((hit.point.y - intersection.y).abs() < 1e-2);
            }
            other => prop_assert!(false, "geo disagrees: {:?}", other),
        }
    }

    #[test]
    fn parallel_lines_never_intersect(lines in arb_parallel(), infinite in any::<bool>()) {
        let (a, b) = lines;
        let a = LineGeometry { line: a, infinite };
        let b = LineGeometry { line: b, infinite };
        prop_assert!(intersect_lines(&a, &b).is_none());
    }
}

#[test]
fn infinite_line_reaches_past_its_points() {
    let segment = LineGeometry::finite(coord! { x: 5.0, y: -1.0 }, coord! { x: 5.0, y: 1.0 });
    let ray = LineGeometry::finite(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 });
    assert!(intersect_lines(&ray, &segment).is_none());

    let line = LineGeometry::infinite(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 0.0 });
    let hit = intersect_lines(&line, &segment).unwrap();
    assert_eq!(hit.position_a, 5.0);
    assert_eq!(hit.position_b, 0.5);
}

#[test]
fn overlapping_squares_intersect() {
    assert!(polygons_intersect(&square(0.0, 0.0, 1.0), &square(1.0, 1.0, 1.0)));
    assert!(!polygons_intersect(&square(0.0, 0.0, 1.0), &square(5.0, 0.0, 1.0)));
}

#[test]
fn contained_polygon_is_not_reported() {
    assert!(!polygons_intersect(&square(0.0, 0.0, 4.0), &square(0.0, 0.0, 1.0)));
}

#[test]
fn polygon_straddling_infinite_line() {
    let border = LineGeometry::infinite(coord! { x: -4.5, y: 0.0 }, coord! { x: -4.5, y: 1.0 });
    assert!(polygon_intersects_line(&square(-4.0, 100.0, 1.0), &border));
    assert!(!polygon_intersects_line(&square(0.0, 100.0, 1.0), &border));
}
