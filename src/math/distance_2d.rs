use super::arc_2d::{angle_param, arc_point_at};
use super::coord::{angle_to, dist};
use super::{Point2, ANGLE_TOLERANCE};

/// Returns the minimum distance from `p` to the line segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        return dist(p, a);
    }

    // Project onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    dist(p, &(a + d * t))
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// When `p` is within the arc's angular range the distance is radial,
/// otherwise it is the distance to the nearer endpoint.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, center: &Point2, radius: f64, start_angle: f64, sweep: f64) -> f64 {
    let to_center = dist(p, center);
    if to_center > 0.0
        && angle_param(angle_to(center, p), start_angle, sweep, ANGLE_TOLERANCE).is_some()
    {
        return (to_center - radius).abs();
    }

    let p0 = arc_point_at(center, radius, start_angle, sweep, 0.0);
    let p1 = arc_point_at(center, radius, start_angle, sweep, 1.0);
    dist(p, &p0).min(dist(p, &p1))
}
