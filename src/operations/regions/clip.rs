use tracing::debug;

use crate::error::Result;
use crate::geometry::Path;
use crate::operations::simplify::simplify_path;

use super::Regions;

/// Which part of the subject a clip keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    /// Keep the parts of the subject inside the clip shape.
    Inside,
    /// Keep the parts of the subject outside the clip shape.
    Outside,
}

/// Clips a closed subject path against a closed clip path.
#[derive(Debug)]
pub struct ClipPath {
    subject: Path,
    clip: Path,
    mode: ClipMode,
}

impl ClipPath {
    /// Creates a new clip operation.
    #[must_use]
    pub fn new(subject: Path, clip: Path, mode: ClipMode) -> Self {
        Self {
            subject,
            clip,
            mode,
        }
    }

    /// Executes the clip.
    ///
    /// Each kept region comes back as a clockwise outer path followed by the
    /// counter-clockwise paths of its holes.
    ///
    /// # Errors
    ///
    /// Returns an error if either path is not a valid closed shape.
    pub fn execute(&self) -> Result<Vec<Path>> {
        let set = Regions::new(vec![self.subject.clone(), self.clip.clone()]).execute()?;
        let kept: Vec<Path> = set
            .regions
            .iter()
            .filter(|r| {
                let in_subject = r.containing.contains(&0);
                let in_clip = r.containing.contains(&1);
                match self.mode {
                    ClipMode::Inside => in_subject && in_clip,
                    ClipMode::Outside => in_subject && !in_clip,
                }
            })
            .flat_map(|r| r.to_paths())
            .map(|p| simplify_path(&p))
            .collect();
        debug!(mode = ?self.mode, regions = set.regions.len(), kept = kept.len(), "clipped path");
        Ok(kept)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::math::Point2;
    use crate::operations::winding::is_path_clockwise;
    use approx::assert_abs_diff_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
        Path::from_points(
            &[
                Point2::new(x0, y0),
                Point2::new(x1, y0),
                Point2::new(x1, y1),
                Point2::new(x0, y1),
            ],
            true,
        )
    }

    fn total_area(paths: &[Path]) -> f64 {
        paths.iter().map(|p| signed_area_2d(&p.to_points(1e-6))).sum()
    }

    #[test]
    fn inside_keeps_the_overlap() {
        let out = ClipPath::new(rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0), ClipMode::Inside)
            .execute()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].segments.len(), 4);
        assert_abs_diff_eq!(signed_area_2d(&out[0].to_points(1e-6)), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn outside_keeps_the_remainder() {
        let out = ClipPath::new(rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0), ClipMode::Outside)
            .execute()
            .unwrap();
        assert_eq!(out.len(), 1);
        for p in out[0].vertices() {
            assert!(p.x <= 0.5 + 1e-9);
        }
    }

    #[test]
    fn hole_punched_by_a_circle() {
        let p = Point2::new(1.5, 1.0);
        let circle = Path::new(p, vec![Segment::arc(Point2::new(1.0, 1.0), p, true)], true);
        let disc = std::f64::consts::PI * 0.25;

        let inside = ClipPath::new(rect(0.0, 0.0, 2.0, 2.0), circle.clone(), ClipMode::Inside)
            .execute()
            .unwrap();
        assert_eq!(inside.len(), 1);
        assert!(inside[0].segments.iter().all(|s| matches!(s, Segment::Arc { .. })));
        assert_abs_diff_eq!(total_area(&inside), disc, epsilon = 1e-4);

        let outside = ClipPath::new(rect(0.0, 0.0, 2.0, 2.0), circle, ClipMode::Outside)
            .execute()
            .unwrap();
        assert_eq!(outside.len(), 2);
        assert!(is_path_clockwise(&outside[0]));
        assert!(!is_path_clockwise(&outside[1]));
        assert_abs_diff_eq!(total_area(&outside), 4.0 - disc, epsilon = 1e-4);
    }

    #[test]
    fn ring_between_concentric_circles() {
        let circle = |r: f64| {
            let p = Point2::new(r, 0.0);
            Path::new(p, vec![Segment::arc(Point2::origin(), p, true)], true)
        };
        let pi = std::f64::consts::PI;
        let ring = ClipPath::new(circle(2.0), circle(1.0), ClipMode::Outside)
            .execute()
            .unwrap();
        assert_eq!(ring.len(), 2);
        assert_abs_diff_eq!(total_area(&ring), 3.0 * pi, epsilon = 1e-4);

        let core = ClipPath::new(circle(2.0), circle(1.0), ClipMode::Inside)
            .execute()
            .unwrap();
        assert_eq!(core.len(), 1);
        assert_abs_diff_eq!(total_area(&core), pi, epsilon = 1e-4);
    }
}
