use super::{Point2, TOLERANCE};

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive for clockwise rings in screen coordinates.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Signed crossing contribution of edge `a → b` to the winding number at `p`.
///
/// Summing this over every edge of one or more closed rings yields their
/// winding number around `p`; clockwise rings count positive.
#[must_use]
pub fn winding_contribution(p: &Point2, a: &Point2, b: &Point2) -> i32 {
    let is_left = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
    if a.y <= p.y {
        if b.y > p.y && is_left > 0.0 {
            return 1;
        }
    } else if b.y <= p.y && is_left < 0.0 {
        return -1;
    }
    0
}

/// Winding number of a closed ring around `p`.
#[must_use]
pub fn winding_number(p: &Point2, ring: &[Point2]) -> i32 {
    let n = ring.len();
    (0..n)
        .map(|i| winding_contribution(p, &ring[i], &ring[(i + 1) % n]))
        .sum()
}

/// Rotates a closed ring so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Gives deterministic vertex order.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn clockwise_square_has_positive_area() {
        assert!((signed_area_2d(&square()) - 1.0).abs() < 1e-12);
        let mut rev = square();
        rev.reverse();
        assert!((signed_area_2d(&rev) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < 1e-12);
        assert!(signed_area_2d(&[]).abs() < 1e-12);
    }

    #[test]
    fn winding_inside_and_outside() {
        assert_eq!(winding_number(&Point2::new(0.5, 0.5), &square()), 1);
        assert_eq!(winding_number(&Point2::new(1.5, 0.5), &square()), 0);
        let mut rev = square();
        rev.reverse();
        assert_eq!(winding_number(&Point2::new(0.5, 0.5), &rev), -1);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert!(rotated[0].x.abs() < 1e-12 && rotated[0].y.abs() < 1e-12);
        assert!((rotated[1].x - 1.0).abs() < 1e-12);
    }
}
