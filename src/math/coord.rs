use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, ANGLE_TOLERANCE, KEY_DECIMALS, TOLERANCE};

/// Quantized coordinate used for hashing and deduplication.
///
/// Two points whose coordinates round to the same `KEY_DECIMALS` decimal
/// places share a key. Points closer than [`TOLERANCE`] can still straddle a
/// rounding boundary, so lookups should also probe [`CoordKey::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    pub x: i64,
    pub y: i64,
}

impl CoordKey {
    /// Quantizes a point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(p: &Point2) -> Self {
        let scale = 10f64.powi(KEY_DECIMALS);
        Self {
            x: (p.x * scale).round() as i64,
            y: (p.y * scale).round() as i64,
        }
    }

    /// The 3x3 block of keys centred on this one.
    pub fn neighbors(self) -> impl Iterator<Item = CoordKey> {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).map(move |dy| CoordKey {
                x: self.x + dx,
                y: self.y + dy,
            })
        })
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn dist(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Direction angle from `a` to `b`, in radians.
#[must_use]
pub fn angle_to(a: &Point2, b: &Point2) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Moves `p` by `length` along `angle`.
#[must_use]
pub fn push(p: &Point2, angle: f64, length: f64) -> Point2 {
    Point2::new(p.x + angle.cos() * length, p.y + angle.sin() * length)
}

/// Whether two points coincide within [`TOLERANCE`].
#[must_use]
pub fn close_enough(a: &Point2, b: &Point2) -> bool {
    dist(a, b) <= TOLERANCE
}

/// Whether two angles are equal modulo 2π within [`ANGLE_TOLERANCE`].
#[must_use]
pub fn close_enough_angle(a: f64, b: f64) -> bool {
    normalize_angle(a - b).abs() <= ANGLE_TOLERANCE
}

/// Normalizes an angle into `(-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn positive_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// 2D cross product (`a.x * b.y - a.y * b.x`).
///
/// Positive when `b` is clockwise of `a` in screen coordinates.
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
