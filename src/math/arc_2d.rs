//! 2D arc math in center form.
//!
//! Sweep convention: a clockwise arc (screen coordinates) has a positive
//! sweep in `(0, 2π]`, a counter-clockwise arc a negative one in `[-2π, 0)`.

use std::f64::consts::{PI, TAU};

use super::coord::{angle_to, close_enough, positive_angle};
use super::{Point2, Vector2, ANGLE_TOLERANCE, TOLERANCE};

/// Signed sweep of the arc from `start` to `end` around `center`.
///
/// Coincident endpoints describe a full circle (`±2π`).
#[must_use]
pub fn arc_sweep(center: &Point2, start: &Point2, end: &Point2, clockwise: bool) -> f64 {
    if close_enough(start, end) {
        return if clockwise { TAU } else { -TAU };
    }
    let delta = positive_angle(angle_to(center, end) - angle_to(center, start));
    if clockwise {
        delta
    } else {
        delta - TAU
    }
}

/// Evaluates a point on an arc at parameter `t` in `[0, 1]`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, start_angle: f64, sweep: f64, t: f64) -> Point2 {
    let angle = start_angle + sweep * t;
    Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
}

/// Unit tangent on an arc at parameter `t`, pointing along the travel direction.
#[must_use]
pub fn arc_tangent_at(start_angle: f64, sweep: f64, t: f64) -> Vector2 {
    let angle = start_angle + sweep * t;
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// `slack` is the angular tolerance at both ends. Returns `None` when the
/// angle lies outside the arc.
#[must_use]
pub fn angle_param(angle: f64, start_angle: f64, sweep: f64, slack: f64) -> Option<f64> {
    if sweep.abs() < ANGLE_TOLERANCE {
        return None;
    }
    let forward = if sweep > 0.0 {
        positive_angle(angle - start_angle)
    } else {
        positive_angle(start_angle - angle)
    };
    let span = sweep.abs();

    if forward <= span + slack {
        return Some((forward / span).clamp(0.0, 1.0));
    }
    // Just before the start, wrapped to the top of the range.
    if TAU - forward <= slack {
        return Some(0.0);
    }
    None
}

/// Number of chords needed to approximate an arc within `tolerance`.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < TOLERANCE || abs_sweep < ANGLE_TOLERANCE || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2)).
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil().min(4096.0) as u32;
    n.max(1)
}
