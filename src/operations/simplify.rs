use tracing::debug;

use crate::geometry::{Path, Segment, SegmentWithPrev};
use crate::math::coord::{close_enough, cross};
use crate::math::{ANGLE_TOLERANCE, TOLERANCE};

use std::f64::consts::TAU;

/// Merges contiguous segments that describe the same geometry.
///
/// - zero-length lines are dropped,
/// - consecutive collinear lines running the same way become one line,
/// - consecutive arcs on the same circle turning the same way become one arc
///   (never more than a full turn).
///
/// Closed paths also merge across the wrap-around, so the origin may move to
/// the start of the merged piece. Quads are kept as they are. The effective
/// geometry never changes and applying the function twice gives the same
/// result as applying it once.
#[must_use]
pub fn simplify_path(path: &Path) -> Path {
    let input = path.segments_with_prev(0);
    let mut out: Vec<SegmentWithPrev> = Vec::with_capacity(input.len());

    for s in input {
        if is_droppable(&s) {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if let Some(merged) = merge(last, &s) {
                *last = merged;
                continue;
            }
        }
        out.push(s);
    }

    if path.closed && out.len() > 1 {
        let n = out.len();
        if let Some(merged) = merge(&out[n - 1], &out[0]) {
            out[0] = merged;
            out.pop();
        }
    }

    debug!(
        before = path.segments.len(),
        after = out.len(),
        "simplified path"
    );

    if out.is_empty() {
        return Path::new(path.origin, Vec::new(), path.closed);
    }
    Path::from_segments_with_prev(&out, path.closed)
}

fn is_droppable(s: &SegmentWithPrev) -> bool {
    match s.segment {
        Segment::Line { .. } | Segment::Arc { .. } => s.is_degenerate(),
        Segment::Quad { .. } => false,
    }
}

/// Joins `b` onto `a` when both lie on the same line or circle.
fn merge(a: &SegmentWithPrev, b: &SegmentWithPrev) -> Option<SegmentWithPrev> {
    match (a.segment, b.segment) {
        (Segment::Line { .. }, Segment::Line { to }) => {
            let da = a.tangent_at(1.0);
            let db = b.tangent_at(0.0);
            if cross(&da, &db).abs() <= ANGLE_TOLERANCE && da.dot(&db) > 0.0 {
                Some(SegmentWithPrev::new(a.prev, Segment::line(to), a.shape))
            } else {
                None
            }
        }
        (
            Segment::Arc {
                center: ca,
                clockwise: cwa,
                ..
            },
            Segment::Arc {
                center: cb,
                to,
                clockwise: cwb,
            },
        ) => {
            let ra = a.radius()?;
            let rb = b.radius()?;
            let same_circle = close_enough(&ca, &cb) && (ra - rb).abs() <= TOLERANCE;
            let combined = a.sweep().abs() + b.sweep().abs();
            (same_circle && cwa == cwb && combined <= TAU + ANGLE_TOLERANCE)
                .then(|| SegmentWithPrev::new(a.prev, Segment::arc(ca, to, cwa), a.shape))
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn merges_collinear_lines_and_drops_zero_length() {
        let path = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(0.5, 0.0),
                Point2::new(0.5, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        );
        let s = simplify_path(&path);
        assert_eq!(s.segments.len(), 4);
        assert_abs_diff_eq!(s.segments[0].to(), Point2::new(1.0, 0.0));
    }

    #[test]
    fn does_not_merge_reversing_lines() {
        let path = Path::from_points(
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 0.0)],
            false,
        );
        assert_eq!(simplify_path(&path).segments.len(), 2);
    }

    #[test]
    fn merges_across_the_wrap() {
        // Starts in the middle of the top edge.
        let path = Path::from_points(
            &[
                Point2::new(0.5, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
                Point2::new(0.0, 0.0),
            ],
            true,
        );
        let s = simplify_path(&path);
        assert_eq!(s.segments.len(), 4);
        assert_abs_diff_eq!(s.origin, Point2::new(0.0, 0.0));
        assert_abs_diff_eq!(s.segments[3].to(), s.origin);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn merges_co_circular_arcs_into_full_circle() {
        let c = Point2::origin();
        let a = Point2::new(1.0, 0.0);
        let b = Point2::new(-1.0, 0.0);
        let path = Path::new(a, vec![Segment::arc(c, b, true), Segment::arc(c, a, true)], true);
        let s = simplify_path(&path);
        assert_eq!(s.segments.len(), 1);
        let only = s.segments_with_prev(0)[0];
        assert!(only.is_full_circle());
        assert_abs_diff_eq!(only.sweep(), TAU, epsilon = 1e-9);
    }

    #[test]
    fn keeps_arcs_of_opposite_direction() {
        let c = Point2::origin();
        let path = Path::new(
            Point2::new(1.0, 0.0),
            vec![
                Segment::arc(c, Point2::new(0.0, 1.0), true),
                Segment::arc(c, Point2::new(1.0, 0.0), false),
            ],
            false,
        );
        assert_eq!(simplify_path(&path).segments.len(), 2);
    }

    #[test]
    fn is_idempotent() {
        let path = Path::from_points(
            &[
                Point2::new(0.5, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 0.5),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
                Point2::new(0.0, 0.0),
            ],
            true,
        );
        let once = simplify_path(&path);
        assert_eq!(simplify_path(&once), once);
    }
}
