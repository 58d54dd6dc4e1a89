//! Conversion between paths and SVG path data (`d` attribute strings).
//!
//! Path data carries single-precision numbers, so coordinates survive a round
//! trip to about seven significant digits.

use std::f64::consts::PI;

use svg::node::element::path::{Command, Data, Parameters, Position};
use svg::node::Value;

use crate::error::{PathDataError, Result};
use crate::geometry::{Path, Segment, SegmentWithPrev};
use crate::math::arc_2d::arc_sweep;
use crate::math::coord::dist;
use crate::math::{Point2, Vector2};

/// Distance under which a closing point is snapped onto its subpath start.
const CLOSE_SNAP: f64 = 1e-4;

#[allow(clippy::cast_possible_truncation)]
fn params(values: &[f64]) -> Parameters {
    Parameters::from(values.iter().map(|&v| v as f32).collect::<Vec<f32>>())
}

fn arc_params(s: &SegmentWithPrev, to: &Point2) -> Parameters {
    let r = s.radius().unwrap_or(0.0);
    let sweep = s.sweep();
    let large = if sweep.abs() > PI { 1.0 } else { 0.0 };
    let clockwise = if sweep > 0.0 { 1.0 } else { 0.0 };
    params(&[r, r, 0.0, large, clockwise, to.x, to.y])
}

/// Writes paths as SVG path data.
///
/// Full circles are written as two half arcs since a single arc command
/// cannot start and end at the same point.
#[must_use]
pub fn to_path_data(paths: &[Path]) -> String {
    let mut data = Data::new();
    for path in paths.iter().filter(|p| !p.is_empty()) {
        data = data.add(Command::Move(Position::Absolute, params(&[path.origin.x, path.origin.y])));
        for s in path.segments_with_prev(0) {
            match s.segment {
                Segment::Line { to } => {
                    data = data.add(Command::Line(Position::Absolute, params(&[to.x, to.y])));
                }
                Segment::Quad { control, to } => {
                    data = data.add(Command::QuadraticCurve(
                        Position::Absolute,
                        params(&[control.x, control.y, to.x, to.y]),
                    ));
                }
                Segment::Arc { .. } if s.is_full_circle() => {
                    let half = s.sub(0.0, 0.5);
                    let mid = half.end();
                    data = data.add(Command::EllipticalArc(Position::Absolute, arc_params(&half, &mid)));
                    let rest = s.sub(0.5, 1.0);
                    data = data.add(Command::EllipticalArc(
                        Position::Absolute,
                        arc_params(&rest, &s.end()),
                    ));
                }
                Segment::Arc { to, .. } => {
                    data = data.add(Command::EllipticalArc(Position::Absolute, arc_params(&s, &to)));
                }
            }
        }
        if path.closed {
            data = data.close();
        }
    }
    Value::from(data).to_string()
}

/// Accumulates segments of the subpath being parsed.
struct Builder {
    paths: Vec<Path>,
    start: Option<Point2>,
    current: Point2,
    segments: Vec<Segment>,
    last_quad_control: Option<Point2>,
}

impl Builder {
    fn new() -> Self {
        Self {
            paths: Vec::new(),
            start: None,
            current: Point2::origin(),
            segments: Vec::new(),
            last_quad_control: None,
        }
    }

    fn flush(&mut self, closed: bool) {
        if let Some(start) = self.start {
            if !self.segments.is_empty() {
                let segments = std::mem::take(&mut self.segments);
                self.paths.push(Path::new(start, segments, closed));
            }
        }
    }

    fn move_to(&mut self, p: Point2) {
        self.flush(false);
        self.start = Some(p);
        self.current = p;
        self.last_quad_control = None;
    }

    /// Makes sure a subpath is open, for drawing commands after a close.
    fn ensure_started(&mut self) -> Result<()> {
        if self.start.is_none() {
            return Err(PathDataError::MissingMoveTo.into());
        }
        Ok(())
    }

    fn push(&mut self, segment: Segment) {
        self.current = segment.to();
        self.last_quad_control = match segment {
            Segment::Quad { control, .. } => Some(control),
            _ => None,
        };
        self.segments.push(segment);
    }

    fn line_to(&mut self, p: Point2) -> Result<()> {
        self.ensure_started()?;
        self.push(Segment::line(p));
        Ok(())
    }

    fn quad_to(&mut self, control: Point2, p: Point2) -> Result<()> {
        self.ensure_started()?;
        self.push(Segment::quad(control, p));
        Ok(())
    }

    fn smooth_quad_to(&mut self, p: Point2) -> Result<()> {
        let control = self
            .last_quad_control
            .map_or(self.current, |c| self.current + (self.current - c));
        self.quad_to(control, p)
    }

    fn arc_to(&mut self, rx: f64, ry: f64, large: bool, clockwise: bool, p: Point2) -> Result<()> {
        self.ensure_started()?;
        if (rx - ry).abs() > 1e-3 * rx.abs().max(ry.abs()) {
            return Err(PathDataError::Unsupported(format!("elliptical arc with radii {rx} and {ry}")).into());
        }
        let from = self.current;
        let chord = dist(&from, &p);
        if rx.abs() < f64::EPSILON || chord < f64::EPSILON {
            self.push(Segment::line(p));
            return Ok(());
        }
        let center = arc_center(&from, &p, rx.abs(), large, clockwise);
        self.push(Segment::arc(center, p, clockwise));
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(start) = self.start else {
            return Err(PathDataError::MissingMoveTo.into());
        };
        if let Some(last) = self.segments.last_mut() {
            if dist(&last.to(), &start) <= CLOSE_SNAP {
                *last = last.with_to(start);
            } else {
                self.segments.push(Segment::line(start));
            }
        }
        self.flush(true);
        self.current = start;
        self.start = Some(start);
        self.last_quad_control = None;
        Ok(())
    }
}

/// Center of the circular arc from `from` to `to` with the given flags.
///
/// A radius shorter than half the chord is scaled up to fit.
fn arc_center(from: &Point2, to: &Point2, radius: f64, large: bool, clockwise: bool) -> Point2 {
    let chord = to - from;
    let d = chord.norm();
    let r = radius.max(d * 0.5);
    let mid = from + chord * 0.5;
    let h = (r * r - d * d * 0.25).max(0.0).sqrt();
    let n = Vector2::new(-chord.y, chord.x) / d;
    let candidate = mid + n * h;
    let is_large = arc_sweep(&candidate, from, to, clockwise).abs() > PI;
    if is_large == large {
        candidate
    } else {
        mid - n * h
    }
}

fn chunks(values: &[f32], size: usize, command: &str) -> Result<Vec<Vec<f64>>> {
    if values.is_empty() || values.len() % size != 0 {
        return Err(PathDataError::Malformed(format!(
            "{command} expects a multiple of {size} parameters, got {}",
            values.len()
        ))
        .into());
    }
    Ok(values
        .chunks(size)
        .map(|c| c.iter().map(|&v| f64::from(v)).collect())
        .collect())
}

/// Parses SVG path data into paths, one per subpath.
///
/// Supports `M`, `L`, `H`, `V`, `Q`, `T`, `A` and `Z` in absolute and
/// relative form. Arcs must be circular.
///
/// # Errors
///
/// - [`PathDataError::Malformed`] when the string cannot be parsed.
/// - [`PathDataError::Unsupported`] for cubic curves and elliptical arcs.
/// - [`PathDataError::MissingMoveTo`] when drawing starts without a move-to.
pub fn from_path_data(d: &str) -> Result<Vec<Path>> {
    let data = Data::parse(d).map_err(|e| PathDataError::Malformed(e.to_string()))?;
    let mut b = Builder::new();

    for command in data.iter() {
        match command {
            Command::Move(position, values) => {
                for (i, c) in chunks(values, 2, "M")?.into_iter().enumerate() {
                    let p = resolve(*position, &b.current, c[0], c[1]);
                    if i == 0 {
                        b.move_to(p);
                    } else {
                        b.line_to(p)?;
                    }
                }
            }
            Command::Line(position, values) => {
                for c in chunks(values, 2, "L")? {
                    let p = resolve(*position, &b.current, c[0], c[1]);
                    b.line_to(p)?;
                }
            }
            Command::HorizontalLine(position, values) => {
                for c in chunks(values, 1, "H")? {
                    let x = match position {
                        Position::Absolute => c[0],
                        Position::Relative => b.current.x + c[0],
                    };
                    b.line_to(Point2::new(x, b.current.y))?;
                }
            }
            Command::VerticalLine(position, values) => {
                for c in chunks(values, 1, "V")? {
                    let y = match position {
                        Position::Absolute => c[0],
                        Position::Relative => b.current.y + c[0],
                    };
                    b.line_to(Point2::new(b.current.x, y))?;
                }
            }
            Command::QuadraticCurve(position, values) => {
                for c in chunks(values, 4, "Q")? {
                    let control = resolve(*position, &b.current, c[0], c[1]);
                    let p = resolve(*position, &b.current, c[2], c[3]);
                    b.quad_to(control, p)?;
                }
            }
            Command::SmoothQuadraticCurve(position, values) => {
                for c in chunks(values, 2, "T")? {
                    let p = resolve(*position, &b.current, c[0], c[1]);
                    b.smooth_quad_to(p)?;
                }
            }
            Command::EllipticalArc(position, values) => {
                for c in chunks(values, 7, "A")? {
                    let p = resolve(*position, &b.current, c[5], c[6]);
                    b.arc_to(c[0], c[1], c[3] != 0.0, c[4] != 0.0, p)?;
                }
            }
            Command::CubicCurve(..) | Command::SmoothCubicCurve(..) => {
                return Err(PathDataError::Unsupported("cubic curve".to_owned()).into());
            }
            Command::Close => b.close()?,
        }
    }
    b.flush(false);
    Ok(b.paths)
}

fn resolve(position: Position, current: &Point2, x: f64, y: f64) -> Point2 {
    match position {
        Position::Absolute => Point2::new(x, y),
        Position::Relative => Point2::new(current.x + x, current.y + y),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn writes_and_reads_a_square() {
        let square = Path::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            true,
        );
        let d = to_path_data(std::slice::from_ref(&square));
        assert!(d.starts_with('M'));
        assert!(d.trim_end().ends_with('z') || d.trim_end().ends_with('Z'));
        let back = from_path_data(&d).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back[0].closed);
        assert_eq!(back[0].segments.len(), 4);
        assert!(back[0].validate().is_ok());
    }

    #[test]
    fn full_circle_becomes_two_arcs() {
        let p = Point2::new(2.0, 1.0);
        let circle = Path::new(p, vec![Segment::arc(Point2::new(1.0, 1.0), p, true)], true);
        let d = to_path_data(&[circle]);
        let back = from_path_data(&d).unwrap();
        assert_eq!(back[0].segments.len(), 2);
        for s in back[0].segments_with_prev(0) {
            let Segment::Arc { center, clockwise, .. } = s.segment else {
                panic!("expected arcs, got {s:?}");
            };
            assert!(clockwise);
            assert_abs_diff_eq!(center, Point2::new(1.0, 1.0), epsilon = 1e-5);
            assert_abs_diff_eq!(s.sweep(), PI, epsilon = 1e-4);
        }
    }

    #[test]
    fn relative_commands() {
        let paths = from_path_data("m 1 1 h 2 v 2 l -2 0 z").unwrap();
        assert_eq!(paths.len(), 1);
        let v = paths[0].vertices();
        assert_abs_diff_eq!(v[1], Point2::new(3.0, 1.0));
        assert_abs_diff_eq!(v[2], Point2::new(3.0, 3.0));
        assert_abs_diff_eq!(v[3], Point2::new(1.0, 3.0));
        assert_abs_diff_eq!(v[4], Point2::new(1.0, 1.0));
    }

    #[test]
    fn large_arc_flag_picks_the_long_way() {
        let short = from_path_data("M 0 0 A 1 1 0 0 1 1 1").unwrap();
        let long = from_path_data("M 0 0 A 1 1 0 1 1 1 1").unwrap();
        let s = short[0].segments_with_prev(0)[0];
        let l = long[0].segments_with_prev(0)[0];
        assert_abs_diff_eq!(s.sweep(), PI / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(l.sweep(), 1.5 * PI, epsilon = 1e-9);
    }

    #[test]
    fn quads_and_smooth_quads() {
        let paths = from_path_data("M0 0 Q1 1 2 0 T4 0").unwrap();
        let segs = &paths[0].segments;
        assert_eq!(segs.len(), 2);
        let Segment::Quad { control, .. } = segs[1] else {
            panic!("expected a quad");
        };
        assert_abs_diff_eq!(control, Point2::new(3.0, -1.0));
    }

    #[test]
    fn several_subpaths() {
        let paths = from_path_data("M0 0 L1 0 L1 1 Z M5 5 L6 5").unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].closed);
        assert!(!paths[1].closed);
    }

    #[test]
    fn rejects_unsupported_input() {
        assert!(matches!(
            from_path_data("M0 0 C1 1 2 2 3 3"),
            Err(KernelError::PathData(PathDataError::Unsupported(_)))
        ));
        assert!(matches!(
            from_path_data("M0 0 A1 2 0 0 1 1 1"),
            Err(KernelError::PathData(PathDataError::Unsupported(_)))
        ));
        assert!(matches!(
            from_path_data("L1 1"),
            Err(KernelError::PathData(PathDataError::MissingMoveTo))
        ));
    }
}
