//! Scalar and vector helpers shared by the geometry, physics and sensor code.
//!
//! Headings follow the road convention: an angle of `0` faces `+Y` and positive
//! angles turn clockwise.

use std::f32::consts::{PI, TAU};

use geo::Coord;

/// Linear interpolation between `a` and `b`.
///
/// Exact at both ends: `t == 0` returns `a`, `t == 1` returns `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Single precision variant of [`lerp`].
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Interpolates between two points.
#[inline]
pub fn lerp_point(a: Coord<f32>, b: Coord<f32>, t: f32) -> Coord<f32> {
    Coord {
        x: lerp_f32(a.x, b.x, t),
        y: lerp_f32(a.y, b.y, t),
    }
}

/// Clamps `value` into `[minimum, maximum]`.
#[inline]
pub fn bound(value: f32, minimum: f32, maximum: f32) -> f32 {
    value.max(minimum).min(maximum)
}

/// Sign of a value as `-1`, `0` or `1`.
///
/// Unlike [`f32::signum`] zero maps to `0`.
#[inline]
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Point on a circle of `radius` around the origin at heading `angle`.
#[inline]
pub fn circle_point(radius: f32, angle: f32) -> Coord<f32> {
    Coord {
        x: angle.sin() * radius,
        y: angle.cos() * radius,
    }
}

/// Rotates `vector` clockwise by `angle` radians.
pub fn rotate(vector: Coord<f32>, angle: f32) -> Coord<f32> {
    let (sin, cos) = (-angle).sin_cos();
    Coord {
        x: cos * vector.x - sin * vector.y,
        y: sin * vector.x + cos * vector.y,
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Converts degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f32) -> f32 {
    deg / 180.0 * PI
}

/// Converts radians to degrees.
#[inline]
pub fn rad_to_deg(rad: f32) -> f32 {
    rad / PI * 180.0
}
