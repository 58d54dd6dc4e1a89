use crate::math::arc_2d::{angle_param, arc_point_at, arc_subdivision_count, arc_sweep, arc_tangent_at};
use crate::math::coord::{angle_to, close_enough, cross, dist};
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::{line_to_slope, Point2, Primitive, Vector2, TOLERANCE};

/// Identifier of the source shape a segment belongs to.
///
/// `0` is the shape being operated on, `1` the optional second shape when two
/// shapes are clipped against each other.
pub type ShapeId = usize;

/// One bounded piece of a path.
///
/// Only the end point is stored; the start is the previous segment's `to`
/// (or the path origin for the first segment).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line {
        to: Point2,
    },
    /// Circular arc around `center`. The radius is implied by the start point.
    Arc {
        center: Point2,
        to: Point2,
        clockwise: bool,
    },
    /// Quadratic Bézier curve.
    Quad {
        control: Point2,
        to: Point2,
    },
}

impl Segment {
    /// Creates a line segment.
    #[must_use]
    pub fn line(to: Point2) -> Self {
        Self::Line { to }
    }

    /// Creates an arc segment.
    #[must_use]
    pub fn arc(center: Point2, to: Point2, clockwise: bool) -> Self {
        Self::Arc {
            center,
            to,
            clockwise,
        }
    }

    /// Creates a quadratic segment.
    #[must_use]
    pub fn quad(control: Point2, to: Point2) -> Self {
        Self::Quad { control, to }
    }

    /// End point of the segment.
    #[must_use]
    pub fn to(&self) -> Point2 {
        match self {
            Self::Line { to } | Self::Arc { to, .. } | Self::Quad { to, .. } => *to,
        }
    }

    /// Same segment with a different end point.
    #[must_use]
    pub fn with_to(&self, to: Point2) -> Self {
        match *self {
            Self::Line { .. } => Self::Line { to },
            Self::Arc {
                center, clockwise, ..
            } => Self::Arc {
                center,
                to,
                clockwise,
            },
            Self::Quad { control, .. } => Self::Quad { control, to },
        }
    }
}

/// A segment paired with its explicit start point and source shape.
///
/// This is the form the kernel works on internally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentWithPrev {
    pub prev: Point2,
    pub segment: Segment,
    pub shape: ShapeId,
}

impl SegmentWithPrev {
    #[must_use]
    pub fn new(prev: Point2, segment: Segment, shape: ShapeId) -> Self {
        Self {
            prev,
            segment,
            shape,
        }
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.prev
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.segment.to()
    }

    /// Same segment starting at `prev`.
    #[must_use]
    pub fn with_prev(&self, prev: Point2) -> Self {
        Self { prev, ..*self }
    }

    /// Same segment ending at `to`.
    #[must_use]
    pub fn with_end(&self, to: Point2) -> Self {
        Self {
            segment: self.segment.with_to(to),
            ..*self
        }
    }

    /// Arc radius measured at the start point, `None` for non-arcs.
    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match self.segment {
            Segment::Arc { center, .. } => Some(dist(&center, &self.prev)),
            _ => None,
        }
    }

    /// Signed sweep of an arc (positive clockwise), `0` for other segments.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        match self.segment {
            Segment::Arc {
                center,
                to,
                clockwise,
            } => arc_sweep(&center, &self.prev, &to, clockwise),
            _ => 0.0,
        }
    }

    /// Whether this is an arc that returns to its own start.
    #[must_use]
    pub fn is_full_circle(&self) -> bool {
        matches!(self.segment, Segment::Arc { .. })
            && close_enough(&self.prev, &self.end())
            && self.radius().is_some_and(|r| r > TOLERANCE)
    }

    /// Whether the segment has (near) zero extent.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self.segment {
            Segment::Line { to } => close_enough(&self.prev, &to),
            Segment::Arc { .. } => {
                !self.radius().is_some_and(|r| r > TOLERANCE)
                    || (close_enough(&self.prev, &self.end()) && !self.is_full_circle())
            }
            Segment::Quad { control, to } => {
                close_enough(&self.prev, &to) && close_enough(&self.prev, &control)
            }
        }
    }

    /// Length along the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self.segment {
            Segment::Line { to } => dist(&self.prev, &to),
            Segment::Arc { .. } => self.radius().unwrap_or(0.0) * self.sweep().abs(),
            Segment::Quad { .. } => {
                let mut last = self.prev;
                let mut total = 0.0;
                for p in self.points(crate::math::FLATTEN_TOLERANCE) {
                    total += dist(&last, &p);
                    last = p;
                }
                total
            }
        }
    }

    /// Evaluates the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        match self.segment {
            Segment::Line { to } => self.prev + (to - self.prev) * t,
            Segment::Arc { center, .. } => {
                let r = self.radius().unwrap_or(0.0);
                arc_point_at(&center, r, angle_to(&center, &self.prev), self.sweep(), t)
            }
            Segment::Quad { control, to } => {
                let u = 1.0 - t;
                Point2::from(
                    self.prev.coords * (u * u) + control.coords * (2.0 * u * t) + to.coords * (t * t),
                )
            }
        }
    }

    /// Unit tangent at parameter `t`, along the travel direction.
    ///
    /// Degenerate segments return the zero vector.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let raw = match self.segment {
            Segment::Line { to } => to - self.prev,
            Segment::Arc { center, .. } => {
                arc_tangent_at(angle_to(&center, &self.prev), self.sweep(), t)
            }
            Segment::Quad { control, to } => {
                let d = (control - self.prev) * (2.0 * (1.0 - t)) + (to - control) * (2.0 * t);
                if d.norm() < TOLERANCE {
                    to - self.prev
                } else {
                    d
                }
            }
        };
        raw.try_normalize(1e-12).unwrap_or_else(Vector2::zeros)
    }

    /// Direction angle of the tangent at parameter `t`.
    #[must_use]
    pub fn tangent_angle_at(&self, t: f64) -> f64 {
        let d = self.tangent_at(t);
        d.y.atan2(d.x)
    }

    /// Signed curvature at parameter `t`; positive when turning clockwise.
    #[must_use]
    pub fn curvature_at(&self, t: f64) -> f64 {
        match self.segment {
            Segment::Line { .. } => 0.0,
            Segment::Arc { .. } => {
                let r = self.radius().unwrap_or(0.0);
                if r < TOLERANCE {
                    0.0
                } else {
                    self.sweep().signum() / r
                }
            }
            Segment::Quad { control, to } => {
                let d1 = (control - self.prev) * (2.0 * (1.0 - t)) + (to - control) * (2.0 * t);
                let d2 = (to - control * 2.0 + self.prev.coords) * 2.0;
                let speed = d1.norm();
                if speed < TOLERANCE {
                    0.0
                } else {
                    cross(&d1, &d2) / (speed * speed * speed)
                }
            }
        }
    }

    /// Parameter of a point assumed to lie on the segment.
    #[must_use]
    pub fn param_of(&self, p: &Point2) -> f64 {
        match self.segment {
            Segment::Line { to } => {
                let d = to - self.prev;
                let len_sq = d.norm_squared();
                if len_sq < 1e-20 {
                    0.0
                } else {
                    ((p - self.prev).dot(&d) / len_sq).clamp(0.0, 1.0)
                }
            }
            Segment::Arc { center, .. } => {
                if close_enough(p, &self.prev) {
                    return 0.0;
                }
                if close_enough(p, &self.end()) && !self.is_full_circle() {
                    return 1.0;
                }
                let start_angle = angle_to(&center, &self.prev);
                angle_param(angle_to(&center, p), start_angle, self.sweep(), std::f64::consts::TAU)
                    .unwrap_or(0.0)
            }
            Segment::Quad { .. } => self.nearest_param(p),
        }
    }

    /// Whether `p` lies on the bounded segment.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        if close_enough(p, &self.prev) || close_enough(p, &self.end()) {
            return true;
        }
        match self.segment {
            Segment::Arc { center, .. } => {
                let r = self.radius().unwrap_or(0.0);
                if r < TOLERANCE || (dist(&center, p) - r).abs() > TOLERANCE {
                    return false;
                }
                let start_angle = angle_to(&center, &self.prev);
                angle_param(angle_to(&center, p), start_angle, self.sweep(), TOLERANCE / r).is_some()
            }
            _ => self.distance_to(p) <= TOLERANCE,
        }
    }

    /// Minimum distance from `p` to the segment.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self.segment {
            Segment::Line { to } => point_to_segment_dist(p, &self.prev, &to),
            Segment::Arc { center, .. } => point_to_arc_dist(
                p,
                &center,
                self.radius().unwrap_or(0.0),
                angle_to(&center, &self.prev),
                self.sweep(),
            ),
            Segment::Quad { .. } => {
                let mut last = self.prev;
                let mut best = f64::MAX;
                for q in self.points(crate::math::FLATTEN_TOLERANCE) {
                    best = best.min(point_to_segment_dist(p, &last, &q));
                    last = q;
                }
                best
            }
        }
    }

    /// The piece of this segment between parameters `t0` and `t1`.
    #[must_use]
    pub fn sub(&self, t0: f64, t1: f64) -> Self {
        let start = self.point_at(t0);
        let end = self.point_at(t1);
        let segment = match self.segment {
            Segment::Line { .. } => Segment::Line { to: end },
            Segment::Arc {
                center, clockwise, ..
            } => Segment::Arc {
                center,
                to: end,
                clockwise,
            },
            Segment::Quad { control, to } => {
                // Blossom of the curve at (t0, t1).
                let w0 = (1.0 - t0) * (1.0 - t1);
                let w1 = (1.0 - t0) * t1 + t0 * (1.0 - t1);
                let w2 = t0 * t1;
                Segment::Quad {
                    control: Point2::from(self.prev.coords * w0 + control.coords * w1 + to.coords * w2),
                    to: end,
                }
            }
        };
        Self {
            prev: start,
            segment,
            shape: self.shape,
        }
    }

    /// The same geometry traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let segment = match self.segment {
            Segment::Line { .. } => Segment::Line { to: self.prev },
            Segment::Arc {
                center, clockwise, ..
            } => Segment::Arc {
                center,
                to: self.prev,
                clockwise: !clockwise,
            },
            Segment::Quad { control, .. } => Segment::Quad {
                control,
                to: self.prev,
            },
        };
        Self {
            prev: self.end(),
            segment,
            shape: self.shape,
        }
    }

    /// The unbounded primitive under the segment (`None` for quads).
    ///
    /// Lines are limited to the segment's span.
    #[must_use]
    pub fn primitive(&self) -> Option<Primitive> {
        match self.segment {
            Segment::Line { to } => line_to_slope(&self.prev, &to, true).map(Primitive::Line),
            Segment::Arc { center, .. } => Some(Primitive::Circle {
                center,
                radius: self.radius().unwrap_or(0.0),
            }),
            Segment::Quad { .. } => None,
        }
    }

    /// Flattens the segment into points, excluding the start point.
    #[must_use]
    pub fn points(&self, tolerance: f64) -> Vec<Point2> {
        let n = match self.segment {
            Segment::Line { to } => return vec![to],
            Segment::Arc { .. } => arc_subdivision_count(
                self.radius().unwrap_or(0.0),
                self.sweep().abs(),
                tolerance,
            ),
            Segment::Quad { control, to } => quad_subdivision_count(&self.prev, &control, &to, tolerance),
        };
        (1..=n)
            .map(|i| {
                if i == n {
                    self.end()
                } else {
                    self.point_at(f64::from(i) / f64::from(n))
                }
            })
            .collect()
    }

    fn nearest_param(&self, p: &Point2) -> f64 {
        const SAMPLES: u32 = 32;
        let mut best_t = 0.0;
        let mut best_d = f64::MAX;
        for i in 0..=SAMPLES {
            let t = f64::from(i) / f64::from(SAMPLES);
            let d = dist(&self.point_at(t), p);
            if d < best_d {
                best_d = d;
                best_t = t;
            }
        }
        // Golden-section refinement around the best sample.
        let step = 1.0 / f64::from(SAMPLES);
        let (mut lo, mut hi) = ((best_t - step).max(0.0), (best_t + step).min(1.0));
        let ratio = 0.5 * (5.0_f64.sqrt() - 1.0);
        for _ in 0..40 {
            let a = hi - ratio * (hi - lo);
            let b = lo + ratio * (hi - lo);
            if dist(&self.point_at(a), p) < dist(&self.point_at(b), p) {
                hi = b;
            } else {
                lo = a;
            }
        }
        0.5 * (lo + hi)
    }
}

/// Uniform subdivision count keeping a quad's chord error under `tolerance`.
fn quad_subdivision_count(p0: &Point2, control: &Point2, p2: &Point2, tolerance: f64) -> u32 {
    let dd = (p0.coords - control.coords * 2.0 + p2.coords).norm();
    if dd < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (dd / (4.0 * tolerance)).sqrt().ceil().min(1024.0) as u32;
    n.max(1)
}
