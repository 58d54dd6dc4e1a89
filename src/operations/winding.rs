use std::f64::consts::{FRAC_PI_8, PI};

use tracing::debug;

use crate::geometry::{Path, Segment, SegmentWithPrev};
use crate::math::coord::{angle_to, dist, normalize_angle};
use crate::math::{Point2, ANGLE_TOLERANCE, TOLERANCE};

const QUAD_SAMPLES: u32 = 16;

/// Samples a segment chain into a polyline for turning-angle measurement.
///
/// Arcs are sampled at least every π/8 of sweep; zero-length segments are
/// skipped.
fn sample(segments: &[SegmentWithPrev]) -> Vec<Point2> {
    let mut points: Vec<Point2> = Vec::new();
    for s in segments {
        if s.is_degenerate() {
            continue;
        }
        if points.is_empty() {
            points.push(s.start());
        }
        let n = match s.segment {
            Segment::Line { .. } => 1,
            Segment::Arc { .. } => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let n = (s.sweep().abs() / FRAC_PI_8).ceil().max(1.0) as u32;
                n
            }
            Segment::Quad { .. } => QUAD_SAMPLES,
        };
        for i in 1..=n {
            points.push(s.point_at(f64::from(i) / f64::from(n)));
        }
    }
    points
}

/// Signed total turning of a closed segment chain, in radians.
///
/// The sum of direction changes between consecutive sampled chords,
/// including the wrap from the last chord back to the first. A simple
/// clockwise loop turns by `+2π`, a counter-clockwise one by `-2π`.
#[must_use]
pub fn total_turning(segments: &[SegmentWithPrev]) -> f64 {
    let points = sample(segments);
    let mut directions = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        if dist(&pair[0], &pair[1]) > TOLERANCE {
            directions.push(angle_to(&pair[0], &pair[1]));
        }
    }
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if dist(last, first) > TOLERANCE {
            directions.push(angle_to(last, first));
        }
    }
    let n = directions.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| normalize_angle(directions[(i + 1) % n] - directions[i]))
        .sum()
}

/// Whether a closed segment chain winds clockwise (on screen).
///
/// A lone arc is judged by its own direction flag, since a full circle has
/// no corners to sample.
#[must_use]
pub fn is_clockwise(segments: &[SegmentWithPrev]) -> bool {
    if let [only] = segments {
        if let Segment::Arc { clockwise, .. } = only.segment {
            return clockwise;
        }
    }
    total_turning(segments) >= PI - ANGLE_TOLERANCE
}

/// Whether a path winds clockwise.
#[must_use]
pub fn is_path_clockwise(path: &Path) -> bool {
    is_clockwise(&path.segments_with_prev(0))
}

/// The path traversed backwards. Arcs flip their direction flag.
#[must_use]
pub fn reverse_path(path: &Path) -> Path {
    path.reversed()
}

/// Returns the path wound clockwise.
///
/// A clockwise path is returned unchanged. A lone full circle gets its
/// direction flag set; anything else is reversed.
#[must_use]
pub fn ensure_clockwise(path: &Path) -> Path {
    if let [only] = path.segments_with_prev(0).as_slice() {
        if let Segment::Arc { center, to, .. } = only.segment {
            if only.is_full_circle() {
                return Path::new(path.origin, vec![Segment::arc(center, to, true)], path.closed);
            }
        }
    }
    if is_path_clockwise(path) {
        return path.clone();
    }
    debug!(segments = path.segments.len(), "reversing counter-clockwise path");
    path.reversed()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    fn square() -> Path {
        Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        )
    }

    #[test]
    fn convex_polygon_turns_a_full_turn() {
        let turning = total_turning(&square().segments_with_prev(0));
        assert_abs_diff_eq!(turning, TAU, epsilon = 1e-9);
        let turning = total_turning(&square().reversed().segments_with_prev(0));
        assert_abs_diff_eq!(turning, -TAU, epsilon = 1e-9);
    }

    #[test]
    fn reversing_flips_winding() {
        assert!(is_path_clockwise(&square()));
        assert!(!is_path_clockwise(&reverse_path(&square())));
    }

    #[test]
    fn single_full_circle_uses_its_flag() {
        let p = Point2::new(10.0, 0.0);
        let cw = Path::new(p, vec![Segment::arc(Point2::origin(), p, true)], true);
        let ccw = Path::new(p, vec![Segment::arc(Point2::origin(), p, false)], true);
        assert!(is_path_clockwise(&cw));
        assert!(!is_path_clockwise(&ccw));
        let fixed = ensure_clockwise(&ccw);
        assert!(matches!(fixed.segments[0], Segment::Arc { clockwise: true, .. }));
    }

    #[test]
    fn half_disc_with_arc() {
        // Diameter along the x axis, arc bulging toward +y.
        let path = Path::new(
            Point2::new(-1.0, 0.0),
            vec![
                Segment::line(Point2::new(1.0, 0.0)),
                Segment::arc(Point2::origin(), Point2::new(-1.0, 0.0), true),
            ],
            true,
        );
        assert!(is_path_clockwise(&path));
        assert!(!is_path_clockwise(&path.reversed()));
    }

    #[test]
    fn lone_partial_arc_keeps_its_geometry() {
        // Quarter arc from (1,0) to (0,-1), counter-clockwise on screen.
        let arc = Path::new(
            Point2::new(1.0, 0.0),
            vec![Segment::arc(Point2::origin(), Point2::new(0.0, -1.0), false)],
            false,
        );
        let fixed = ensure_clockwise(&arc);
        assert!(is_path_clockwise(&fixed));
        assert_abs_diff_eq!(fixed.origin, Point2::new(0.0, -1.0), epsilon = 1e-12);
        let s = fixed.segments_with_prev(0)[0];
        assert_abs_diff_eq!(s.end(), Point2::new(1.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(s.sweep(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(s.point_at(0.5), arc.segments_with_prev(0)[0].point_at(0.5), epsilon = 1e-9);
    }

    #[test]
    fn ensure_clockwise_reverses_only_when_needed() {
        let sq = square();
        assert_eq!(ensure_clockwise(&sq), sq);
        let fixed = ensure_clockwise(&sq.reversed());
        assert!(is_path_clockwise(&fixed));
    }

    #[test]
    fn zero_length_segments_are_ignored() {
        let path = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        );
        assert_abs_diff_eq!(total_turning(&path.segments_with_prev(0)), TAU, epsilon = 1e-9);
    }
}
