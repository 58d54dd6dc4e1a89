use std::f64::consts::FRAC_PI_2;

use tracing::trace;

use crate::geometry::{Segment, SegmentWithPrev};
use crate::math::coord::{angle_to, close_enough, cross, dist, push};
use crate::math::intersect_2d::{line_line, nearest_intersection};
use crate::math::{line_to_slope, Point2, Primitive, MITER_LIMIT, TOLERANCE};

/// Offsets one segment on its own, ignoring neighbours.
///
/// Lines move along their right-hand normal; arcs keep their center and
/// change radius (clockwise arcs shrink for positive `inset`). Quads use the
/// Tiller–Hanson construction: both control-polygon legs are offset and the
/// new control point is where they meet.
///
/// Returns `None` when an arc would collapse to zero or negative radius, or
/// the segment has no direction to offset along.
#[must_use]
pub fn offset_raw(s: &SegmentWithPrev, inset: f64) -> Option<SegmentWithPrev> {
    match s.segment {
        Segment::Line { to } => {
            if close_enough(&s.prev, &to) {
                return None;
            }
            let normal = angle_to(&s.prev, &to) + FRAC_PI_2;
            Some(SegmentWithPrev::new(
                push(&s.prev, normal, inset),
                Segment::line(push(&to, normal, inset)),
                s.shape,
            ))
        }
        Segment::Arc {
            center,
            to,
            clockwise,
        } => {
            let r = s.radius()?;
            if r <= TOLERANCE {
                return None;
            }
            let r_new = if clockwise { r - inset } else { r + inset };
            if r_new <= TOLERANCE {
                return None;
            }
            let scale = r_new / r;
            let start = center + (s.prev - center) * scale;
            let end = center + (to - center) * (dist(&center, &to).max(TOLERANCE).recip() * r_new);
            Some(SegmentWithPrev::new(
                start,
                Segment::arc(center, end, clockwise),
                s.shape,
            ))
        }
        Segment::Quad { control, to } => {
            if close_enough(&s.prev, &to) && close_enough(&s.prev, &control) {
                return None;
            }
            let degenerate_leg = close_enough(&s.prev, &control) || close_enough(&control, &to);
            if degenerate_leg {
                let normal = angle_to(&s.prev, &to) + FRAC_PI_2;
                let start = push(&s.prev, normal, inset);
                let end = push(&to, normal, inset);
                return Some(SegmentWithPrev::new(
                    start,
                    Segment::quad(Point2::from((start.coords + end.coords) * 0.5), end),
                    s.shape,
                ));
            }
            let n0 = angle_to(&s.prev, &control) + FRAC_PI_2;
            let n1 = angle_to(&control, &to) + FRAC_PI_2;
            let start = push(&s.prev, n0, inset);
            let end = push(&to, n1, inset);
            let leg0 = line_to_slope(&start, &push(&control, n0, inset), false);
            let leg1 = line_to_slope(&push(&control, n1, inset), &end, false);
            let control = match (leg0, leg1) {
                (Some(a), Some(b)) => line_line(&a, &b),
                _ => None,
            }
            .unwrap_or_else(|| push(&control, n0, inset));
            Some(SegmentWithPrev::new(start, Segment::quad(control, end), s.shape))
        }
    }
}

/// Unbounded primitive under a segment; quads use their chord.
fn unbounded(s: &SegmentWithPrev) -> Option<Primitive> {
    match s.segment {
        Segment::Line { to } | Segment::Quad { to, .. } => {
            line_to_slope(&s.prev, &to, false).map(Primitive::Line)
        }
        Segment::Arc { center, .. } => s.radius().map(|radius| Primitive::Circle { center, radius }),
    }
}

/// Offsets `current` and resolves its joint with `next`.
///
/// The returned pieces start with `current`'s offset, whose end is adjusted
/// so it meets the offset of `next`:
/// - offsets that already meet are kept as they are,
/// - offsets that cross are trimmed to their crossing nearest the corner,
/// - lines that open a gap are extended to their miter point when it lies
///   within [`MITER_LIMIT`] × `|inset|` of the corner,
/// - any other gap gets a bridge when `bridge` is set: an arc of radius
///   `|inset|` around the corner, or a straight line when the two ends are
///   not equidistant from it.
///
/// The start of the first piece is left at the raw offset; callers chaining
/// joints move it onto the previous joint's end. A degenerate `current`
/// comes back as a single best-effort segment.
#[must_use]
pub fn inset_segment(
    current: &SegmentWithPrev,
    next: Option<&SegmentWithPrev>,
    inset: f64,
    bridge: bool,
) -> Vec<SegmentWithPrev> {
    let Some(a) = offset_raw(current, inset) else {
        trace!(?current, "segment cannot be offset, keeping it as is");
        return vec![*current];
    };
    let Some(next) = next else {
        return vec![a];
    };
    let Some(b) = offset_raw(next, inset) else {
        return vec![a];
    };
    if close_enough(&a.end(), &b.start()) {
        return vec![a.with_end(b.start())];
    }

    let corner = current.end();
    let turn = cross(&current.tangent_at(1.0), &next.tangent_at(0.0));

    if turn * inset > 0.0 {
        // The offsets overlap: trim both to where they cross.
        if let (Some(pa), Some(pb)) = (unbounded(&a), unbounded(&b)) {
            if let Some(p) = nearest_intersection(&pa, &pb, &corner) {
                trace!(?corner, ?p, "trimmed overlapping joint");
                return vec![a.with_end(p)];
            }
        }
    } else if let (Segment::Line { .. }, Segment::Line { .. }) = (a.segment, b.segment) {
        if let (Some(Primitive::Line(la)), Some(Primitive::Line(lb))) = (unbounded(&a), unbounded(&b)) {
            if let Some(miter) = line_line(&la, &lb) {
                if dist(&miter, &corner) <= MITER_LIMIT * inset.abs() {
                    trace!(?corner, ?miter, "mitered joint");
                    return vec![a.with_end(miter)];
                }
            }
        }
    }

    if !bridge {
        return vec![a];
    }
    let from = a.end();
    let to = b.start();
    let equidistant = (dist(&corner, &from) - dist(&corner, &to)).abs() <= TOLERANCE;
    let connector = if equidistant && dist(&corner, &from) > TOLERANCE {
        Segment::arc(corner, to, inset < 0.0)
    } else {
        Segment::line(to)
    };
    trace!(?corner, ?connector, "bridged joint");
    vec![a, SegmentWithPrev::new(from, connector, current.shape)]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> SegmentWithPrev {
        SegmentWithPrev::new(Point2::new(x0, y0), Segment::line(Point2::new(x1, y1)), 0)
    }

    #[test]
    fn line_moves_to_the_right_of_travel() {
        // Heading +x on screen, right is +y.
        let o = offset_raw(&line(0.0, 0.0, 1.0, 0.0), 0.1).unwrap();
        assert_abs_diff_eq!(o.start(), Point2::new(0.0, 0.1), epsilon = 1e-12);
        assert_abs_diff_eq!(o.end(), Point2::new(1.0, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn clockwise_arc_shrinks_and_counter_clockwise_grows() {
        let c = Point2::origin();
        let cw = SegmentWithPrev::new(Point2::new(1.0, 0.0), Segment::arc(c, Point2::new(0.0, 1.0), true), 0);
        assert_abs_diff_eq!(offset_raw(&cw, 0.25).unwrap().radius().unwrap(), 0.75, epsilon = 1e-12);
        let ccw = cw.reversed();
        assert_abs_diff_eq!(offset_raw(&ccw, 0.25).unwrap().radius().unwrap(), 1.25, epsilon = 1e-12);
        assert!(offset_raw(&cw, 1.0).is_none());
    }

    #[test]
    fn quad_offset_keeps_ends_on_normals() {
        let q = SegmentWithPrev::new(
            Point2::new(0.0, 0.0),
            Segment::quad(Point2::new(1.0, -1.0), Point2::new(2.0, 0.0)),
            0,
        );
        let o = offset_raw(&q, 0.1).unwrap();
        assert_abs_diff_eq!(dist(&o.start(), &q.start()), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(dist(&o.end(), &q.end()), 0.1, epsilon = 1e-12);
        // Symmetric curve keeps a symmetric control point.
        if let Segment::Quad { control, .. } = o.segment {
            assert_abs_diff_eq!(control.x, 1.0, epsilon = 1e-9);
        } else {
            panic!("expected a quad");
        }
    }

    #[test]
    fn convex_corner_is_trimmed() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(1.0, 0.0, 1.0, 1.0);
        let out = inset_segment(&a, Some(&b), 0.1, true);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].end(), Point2::new(0.9, 0.1), epsilon = 1e-9);
    }

    #[test]
    fn outward_corner_is_mitered() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(1.0, 0.0, 1.0, 1.0);
        let out = inset_segment(&a, Some(&b), -0.1, true);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].end(), Point2::new(1.1, -0.1), epsilon = 1e-9);
    }

    #[test]
    fn sharp_outward_corner_gets_an_arc_bridge() {
        // Near reversal: the miter would be far beyond the limit.
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(1.0, 0.0, 0.0, 0.01);
        let out = inset_segment(&a, Some(&b), -0.1, true);
        assert_eq!(out.len(), 2);
        let bridge = out[1];
        assert!(matches!(bridge.segment, Segment::Arc { .. }));
        assert_abs_diff_eq!(bridge.radius().unwrap(), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(bridge.start(), out[0].end());
        assert_abs_diff_eq!(bridge.end(), offset_raw(&b, -0.1).unwrap().start(), epsilon = 1e-12);
    }

    #[test]
    fn bridge_can_be_disabled() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(1.0, 0.0, 0.0, 0.01);
        assert_eq!(inset_segment(&a, Some(&b), -0.1, false).len(), 1);
    }

    #[test]
    fn tangent_continuation_needs_no_joint() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(1.0, 0.0, 2.0, 0.0);
        let out = inset_segment(&a, Some(&b), 0.1, true);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0].end(), Point2::new(1.0, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_segment_is_returned_unchanged() {
        let dot = line(1.0, 1.0, 1.0, 1.0);
        let out = inset_segment(&dot, None, 0.1, true);
        assert_eq!(out, vec![dot]);
    }
}
