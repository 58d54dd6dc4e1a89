use super::{Point2, Vector2, TOLERANCE};

/// An infinite (or span-limited) line in slope-intercept form.
///
/// To keep `|m| <= 1`, steep lines are stored with the axes swapped:
/// - `steep == false`: `y = m * x + b`, `limit` spans `x`
/// - `steep == true`: `x = m * y + b`, `limit` spans `y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeLine {
    pub m: f64,
    pub b: f64,
    pub steep: bool,
    /// Valid span along the primary axis, when the line is bounded.
    pub limit: Option<(f64, f64)>,
}

impl SlopeLine {
    /// General form `(a, b, c)` of `a * x + b * y = c`.
    #[must_use]
    pub fn general_form(&self) -> (f64, f64, f64) {
        if self.steep {
            (1.0, -self.m, self.b)
        } else {
            (-self.m, 1.0, self.b)
        }
    }

    /// A point on the line and its unit direction.
    #[must_use]
    pub fn anchor(&self) -> (Point2, Vector2) {
        if self.steep {
            (Point2::new(self.b, 0.0), Vector2::new(self.m, 1.0).normalize())
        } else {
            (Point2::new(0.0, self.b), Vector2::new(1.0, self.m).normalize())
        }
    }

    /// Perpendicular distance from `p` to the infinite line.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        let (a, b, c) = self.general_form();
        (a * p.x + b * p.y - c).abs() / (a * a + b * b).sqrt()
    }

    /// Whether `p` (assumed on the line) falls inside `limit`.
    #[must_use]
    pub fn within_limit(&self, p: &Point2) -> bool {
        let Some((lo, hi)) = self.limit else {
            return true;
        };
        let v = if self.steep { p.y } else { p.x };
        v >= lo - TOLERANCE && v <= hi + TOLERANCE
    }
}

/// The unbounded geometric object underlying a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Line(SlopeLine),
    Circle { center: Point2, radius: f64 },
}

/// Builds the line through `p1` and `p2`.
///
/// With `limited`, the line only accepts points between `p1` and `p2`.
/// Returns `None` when the two points coincide.
#[must_use]
pub fn line_to_slope(p1: &Point2, p2: &Point2, limited: bool) -> Option<SlopeLine> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    if dx.abs() < TOLERANCE * 1e-3 && dy.abs() < TOLERANCE * 1e-3 {
        return None;
    }
    let steep = dy.abs() > dx.abs();
    let (m, b, span) = if steep {
        let m = dx / dy;
        (m, p1.x - m * p1.y, (p1.y, p2.y))
    } else {
        let m = dy / dx;
        (m, p1.y - m * p1.x, (p1.x, p2.x))
    };
    let limit = limited.then(|| (span.0.min(span.1), span.0.max(span.1)));
    Some(SlopeLine { m, b, steep, limit })
}
