use super::coord::{close_enough, dist};
use super::primitive::{Primitive, SlopeLine};
use super::{Point2, TOLERANCE};

/// Intersection of two lines, `None` when they are parallel.
///
/// Span limits are honoured.
#[must_use]
pub fn line_line(l1: &SlopeLine, l2: &SlopeLine) -> Option<Point2> {
    let (a1, b1, c1) = l1.general_form();
    let (a2, b2, c2) = l2.general_form();
    let det = a1 * b2 - a2 * b1;
    if det.abs() < 1e-12 {
        return None;
    }
    let p = Point2::new((c1 * b2 - c2 * b1) / det, (a1 * c2 - a2 * c1) / det);
    (l1.within_limit(&p) && l2.within_limit(&p)).then_some(p)
}

/// Intersections of a line with a circle (zero, one or two points).
///
/// A tangent line yields a single point.
#[must_use]
pub fn line_circle(line: &SlopeLine, center: &Point2, radius: f64) -> Vec<Point2> {
    let (anchor, dir) = line.anchor();
    let t_foot = (center - anchor).dot(&dir);
    let foot = anchor + dir * t_foot;
    let h = dist(&foot, center);

    let candidates = if (h - radius).abs() <= TOLERANCE {
        vec![foot]
    } else if h > radius {
        Vec::new()
    } else {
        let s = (radius * radius - h * h).sqrt();
        vec![foot - dir * s, foot + dir * s]
    };

    candidates
        .into_iter()
        .filter(|p| line.within_limit(p))
        .collect()
}

/// Intersections of two circles (zero, one or two points).
///
/// Concentric circles report no intersection, even when they coincide.
#[must_use]
pub fn circle_circle(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> Vec<Point2> {
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }

    let d = dist(c1, c2);
    if d < TOLERANCE {
        return Vec::new();
    }
    if d > r1 + r2 + TOLERANCE || d < (r1 - r2).abs() - TOLERANCE {
        return Vec::new();
    }

    // Distance from c1 along c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let u = (c2 - c1) / d;
    let mid = c1 + u * a;

    if h < TOLERANCE {
        return vec![mid];
    }
    let perp = nalgebra::Vector2::new(-u.y, u.x);
    vec![mid + perp * h, mid - perp * h]
}

/// Intersections of two primitives.
#[must_use]
pub fn intersect(a: &Primitive, b: &Primitive) -> Vec<Point2> {
    match (a, b) {
        (Primitive::Line(l1), Primitive::Line(l2)) => line_line(l1, l2).into_iter().collect(),
        (Primitive::Line(l), Primitive::Circle { center, radius })
        | (Primitive::Circle { center, radius }, Primitive::Line(l)) => {
            line_circle(l, center, *radius)
        }
        (
            Primitive::Circle {
                center: c1,
                radius: r1,
            },
            Primitive::Circle {
                center: c2,
                radius: r2,
            },
        ) => circle_circle(c1, *r1, c2, *r2),
    }
}

/// The intersection of two primitives closest to `near`.
#[must_use]
pub fn nearest_intersection(a: &Primitive, b: &Primitive, near: &Point2) -> Option<Point2> {
    intersect(a, b).into_iter().min_by(|p, q| {
        dist(p, near)
            .partial_cmp(&dist(q, near))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Removes near-duplicate points, keeping first occurrences.
#[must_use]
pub fn dedup_points(points: Vec<Point2>) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if !out.iter().any(|q| close_enough(q, &p)) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::primitive::line_to_slope;
    use approx::assert_abs_diff_eq;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64, limited: bool) -> SlopeLine {
        line_to_slope(&Point2::new(x0, y0), &Point2::new(x1, y1), limited).unwrap()
    }

    #[test]
    fn line_line_perpendicular() {
        let p = line_line(&line(0.0, 0.0, 1.0, 0.0, false), &line(0.5, -1.0, 0.5, 1.0, false));
        assert_abs_diff_eq!(p.unwrap(), Point2::new(0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        assert!(line_line(&line(0.0, 0.0, 1.0, 0.0, false), &line(0.0, 1.0, 1.0, 1.0, false)).is_none());
    }

    #[test]
    fn limited_lines_miss_outside_span() {
        let a = line(0.0, 0.0, 1.0, 0.0, true);
        let b = line(2.0, -1.0, 2.0, 1.0, true);
        assert!(line_line(&a, &b).is_none());
        let unlimited = line(0.0, 0.0, 1.0, 0.0, false);
        assert!(line_line(&unlimited, &b).is_some());
    }

    #[test]
    fn line_circle_two_crossings() {
        let hits = line_circle(&line(-2.0, 0.0, 2.0, 0.0, false), &Point2::origin(), 1.0);
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].x.abs(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hits[1].x.abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn line_circle_tangent() {
        let hits = line_circle(&line(-1.0, 1.0, 1.0, 1.0, false), &Point2::origin(), 1.0);
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0], Point2::new(0.0, 1.0), epsilon = 1e-9);
    }

    #[test]
    fn line_circle_miss() {
        assert!(line_circle(&line(3.0, 0.0, 3.0, 1.0, false), &Point2::origin(), 1.0).is_empty());
    }

    #[test]
    fn circle_circle_two_crossings() {
        let hits = circle_circle(&Point2::origin(), 1.0, &Point2::new(1.0, 0.0), 1.0);
        assert_eq!(hits.len(), 2);
        let sqrt3_2 = 3.0_f64.sqrt() / 2.0;
        for p in &hits {
            assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(p.y.abs(), sqrt3_2, epsilon = 1e-12);
        }
    }

    #[test]
    fn circle_circle_tangent() {
        let hits = circle_circle(&Point2::origin(), 1.0, &Point2::new(2.0, 0.0), 1.0);
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0], Point2::new(1.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn concentric_circles_do_not_intersect() {
        assert!(circle_circle(&Point2::origin(), 1.0, &Point2::origin(), 1.0).is_empty());
    }

    #[test]
    fn nearest_picks_closest_candidate() {
        let l = Primitive::Line(line(-2.0, 0.0, 2.0, 0.0, false));
        let c = Primitive::Circle {
            center: Point2::origin(),
            radius: 1.0,
        };
        let p = nearest_intersection(&l, &c, &Point2::new(0.8, 0.1)).unwrap();
        assert_abs_diff_eq!(p, Point2::new(1.0, 0.0), epsilon = 1e-12);
    }
}
