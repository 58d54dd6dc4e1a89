use geo::orient::Direction;
use geo::{BooleanOps, LineString, MultiPolygon, Orient, Polygon};
use tracing::trace;

use crate::error::Result;
use crate::geometry::Path;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;

use super::path_data::{from_path_data, to_path_data};
use super::BooleanEngine;

/// [`BooleanEngine`] backed by the `geo` crate.
///
/// Curves are flattened to polylines on load, so results only contain
/// straight lines.
#[derive(Debug, Clone, Copy)]
pub struct GeoBooleanEngine {
    flatten_tolerance: f64,
}

impl GeoBooleanEngine {
    /// Creates an engine that flattens curves within `flatten_tolerance`.
    #[must_use]
    pub fn new(flatten_tolerance: f64) -> Self {
        Self { flatten_tolerance }
    }
}

impl Default for GeoBooleanEngine {
    fn default() -> Self {
        Self::new(1e-3)
    }
}

fn ring(points: &[Point2]) -> LineString<f64> {
    LineString::from(points.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>())
}

fn to_path(ring: &LineString<f64>) -> Option<Path> {
    let mut points: Vec<Point2> = ring.coords().map(|c| Point2::new(c.x, c.y)).collect();
    if ring.is_closed() {
        points.pop();
    }
    (points.len() >= 3).then(|| Path::from_points(&points, true))
}

impl BooleanEngine for GeoBooleanEngine {
    type Handle = MultiPolygon<f64>;

    /// Loads every subpath as a ring. Clockwise rings add area and
    /// counter-clockwise rings cut it away.
    fn load(&self, path_data: &str) -> Result<Self::Handle> {
        let mut solid = MultiPolygon::new(Vec::new());
        let mut holes = MultiPolygon::new(Vec::new());
        for path in from_path_data(path_data)? {
            let points = path.to_points(self.flatten_tolerance);
            if points.len() < 3 {
                continue;
            }
            let polygon = MultiPolygon::new(vec![Polygon::new(ring(&points), Vec::new())]);
            if signed_area_2d(&points) > 0.0 {
                solid = solid.union(&polygon);
            } else {
                holes = holes.union(&polygon);
            }
        }
        trace!(solid = solid.0.len(), holes = holes.0.len(), "loaded path data");
        Ok(solid.difference(&holes))
    }

    fn union(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle {
        a.union(b)
    }

    fn difference(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle {
        a.difference(b)
    }

    fn intersect(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle {
        a.intersection(b)
    }

    /// Writes exteriors clockwise and holes counter-clockwise.
    fn save(&self, handle: &Self::Handle) -> String {
        let oriented = handle.orient(Direction::Default);
        let paths: Vec<Path> = oriented
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
            .filter_map(to_path)
            .collect();
        to_path_data(&paths)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Segment;
    use approx::assert_abs_diff_eq;

    #[test]
    fn counter_clockwise_subpath_is_a_hole() {
        let engine = GeoBooleanEngine::default();
        let handle = engine
            .load("M0 0 L4 0 L4 4 L0 4 Z M1 1 L1 3 L3 3 L3 1 Z")
            .unwrap();
        assert_eq!(handle.0.len(), 1);
        assert_eq!(handle.0[0].interiors().len(), 1);
    }

    #[test]
    fn arcs_are_flattened_on_load() {
        let p = Point2::new(1.0, 0.0);
        let circle = Path::new(p, vec![Segment::arc(Point2::origin(), p, true)], true);
        let engine = GeoBooleanEngine::new(1e-4);
        let handle = engine.load(&to_path_data(&[circle])).unwrap();
        let out = from_path_data(&engine.save(&handle)).unwrap();
        assert_eq!(out.len(), 1);
        let area = signed_area_2d(&out[0].to_points(1e-6));
        assert_abs_diff_eq!(area, std::f64::consts::PI, epsilon = 1e-2);
    }

    #[test]
    fn empty_result_saves_as_empty_data() {
        let engine = GeoBooleanEngine::default();
        let a = engine.load("M0 0 L1 0 L1 1 L0 1 Z").unwrap();
        let b = engine.load("M5 5 L6 5 L6 6 L5 6 Z").unwrap();
        let out = engine.save(&engine.intersect(&a, &b));
        assert!(from_path_data(&out).unwrap().is_empty());
    }
}
