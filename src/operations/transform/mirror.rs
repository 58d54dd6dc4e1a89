use crate::error::{GeometryError, Result};
use crate::geometry::{Path, Segment};
use crate::math::coord::dist;
use crate::math::{Point2, TOLERANCE};

/// Mirrors a path across the line through two points.
///
/// Reflection reverses the sense of every arc. Closed paths are reversed
/// afterwards so a clockwise input stays clockwise; open paths keep their
/// start point.
#[derive(Debug)]
pub struct Mirror {
    path: Path,
    a: Point2,
    b: Point2,
}

impl Mirror {
    /// Creates a new `Mirror` operation across the line `a`–`b`.
    #[must_use]
    pub fn new(path: Path, a: Point2, b: Point2) -> Self {
        Self { path, a, b }
    }

    /// Executes the mirror.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if `a` and `b` coincide.
    pub fn execute(&self) -> Result<Path> {
        if dist(&self.a, &self.b) < TOLERANCE {
            return Err(GeometryError::Degenerate("mirror axis has zero length".to_owned()).into());
        }
        let axis = (self.b - self.a).normalize();
        let reflect = |p: &Point2| -> Point2 {
            let v = p - self.a;
            let along = axis * v.dot(&axis);
            self.a + along * 2.0 - v
        };

        let segments = self
            .path
            .segments
            .iter()
            .map(|s| match *s {
                Segment::Line { to } => Segment::line(reflect(&to)),
                Segment::Arc {
                    center,
                    to,
                    clockwise,
                } => Segment::arc(reflect(&center), reflect(&to), !clockwise),
                Segment::Quad { control, to } => Segment::quad(reflect(&control), reflect(&to)),
            })
            .collect();
        let mirrored = Path::new(reflect(&self.path.origin), segments, self.path.closed);
        Ok(if mirrored.closed {
            mirrored.reversed()
        } else {
            mirrored
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use crate::operations::winding::is_path_clockwise;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mirrored_square_keeps_winding() {
        let square = Path::from_points(
            &[
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 1.0),
                Point2::new(1.0, 1.0),
            ],
            true,
        );
        assert!(is_path_clockwise(&square));
        let out = Mirror::new(square, Point2::origin(), Point2::new(0.0, 1.0))
            .execute()
            .unwrap();
        assert!(is_path_clockwise(&out));
        for p in out.vertices() {
            assert!(p.x <= -1.0 + 1e-12 && p.x >= -2.0 - 1e-12);
        }
    }

    #[test]
    fn arcs_flip_their_sense() {
        let open = Path::new(
            Point2::new(1.0, 0.0),
            vec![Segment::arc(Point2::origin(), Point2::new(0.0, 1.0), true)],
            false,
        );
        let out = Mirror::new(open, Point2::origin(), Point2::new(1.0, 0.0))
            .execute()
            .unwrap();
        assert_abs_diff_eq!(out.origin, Point2::new(1.0, 0.0), epsilon = 1e-12);
        let Segment::Arc { to, clockwise, .. } = out.segments[0] else {
            panic!("expected an arc");
        };
        assert!(!clockwise);
        assert_abs_diff_eq!(to, Point2::new(0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_axis_is_rejected() {
        let path = Path::from_points(&[Point2::origin(), Point2::new(1.0, 0.0)], false);
        assert!(matches!(
            Mirror::new(path, Point2::origin(), Point2::origin()).execute(),
            Err(KernelError::Geometry(GeometryError::Degenerate(_)))
        ));
    }
}
