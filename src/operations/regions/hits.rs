use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::geometry::{Segment, SegmentWithPrev};
use crate::math::coord::{close_enough, cross};
use crate::math::intersect_2d::{dedup_points, intersect};
use crate::math::{Point2, ANGLE_TOLERANCE, FLATTEN_TOLERANCE, TOLERANCE};

/// An intersection recorded on one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the segment this hit is recorded on.
    pub first: usize,
    /// Index of the other segment.
    pub second: usize,
    pub coord: Point2,
    /// Parameter of `coord` along `first`, in `[0, 1]`.
    pub along: f64,
}

/// All hits between a set of segments, per segment and ordered start to end.
#[derive(Debug, Clone, Default)]
pub struct Hits {
    per_segment: Vec<Vec<Hit>>,
}

impl Hits {
    /// Hits on segment `index`, ordered by `along`.
    #[must_use]
    pub fn on(&self, index: usize) -> &[Hit] {
        self.per_segment.get(index).map_or(&[], Vec::as_slice)
    }

    /// Total number of recorded hits, counting each intersection once per segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_segment.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether a segment takes part in intersection tests.
pub(super) fn is_usable(s: &SegmentWithPrev) -> bool {
    !s.is_degenerate()
}

/// Computes every pairwise intersection between `segments`.
///
/// Each intersection is recorded on both segments. Overlapping collinear
/// lines and overlapping arcs of the same circle report the overlap's end
/// points. With `skip_adjacent`, the shared end point of two consecutive
/// segments of the same shape is not reported.
///
/// # Errors
///
/// Returns [`ShapeError::Empty`] when no segment is usable.
pub fn get_some_hits(segments: &[SegmentWithPrev], skip_adjacent: bool) -> Result<Hits> {
    let usable: Vec<usize> = (0..segments.len())
        .filter(|&i| is_usable(&segments[i]))
        .collect();
    if usable.is_empty() {
        return Err(ShapeError::Empty.into());
    }

    let mut per_segment: Vec<Vec<Hit>> = vec![Vec::new(); segments.len()];
    for (n, &i) in usable.iter().enumerate() {
        for &j in &usable[n + 1..] {
            let (a, b) = (&segments[i], &segments[j]);
            let mut points = segment_hits(a, b);
            if skip_adjacent && a.shape == b.shape {
                points.retain(|p| !is_shared_joint(a, b, p));
            }
            for p in points {
                per_segment[i].push(Hit {
                    first: i,
                    second: j,
                    coord: p,
                    along: a.param_of(&p),
                });
                per_segment[j].push(Hit {
                    first: j,
                    second: i,
                    coord: p,
                    along: b.param_of(&p),
                });
            }
        }
    }

    for list in &mut per_segment {
        list.sort_by(|x, y| x.along.total_cmp(&y.along));
    }
    let hits = Hits { per_segment };
    debug!(segments = segments.len(), hits = hits.len(), "collected hits");
    Ok(hits)
}

/// Whether `p` is the joint where one segment ends and the other begins.
fn is_shared_joint(a: &SegmentWithPrev, b: &SegmentWithPrev, p: &Point2) -> bool {
    (close_enough(&a.end(), &b.start()) && close_enough(p, &a.end()))
        || (close_enough(&b.end(), &a.start()) && close_enough(p, &b.end()))
}

/// Intersection points of two bounded segments.
fn segment_hits(a: &SegmentWithPrev, b: &SegmentWithPrev) -> Vec<Point2> {
    let a_pieces = pieces(a);
    let b_pieces = pieces(b);
    let mut points = Vec::new();
    for pa in &a_pieces {
        for pb in &b_pieces {
            points.extend(simple_hits(pa, pb));
        }
    }
    dedup_points(points)
}

/// Quads are split into line pieces; other segments stay whole.
fn pieces(s: &SegmentWithPrev) -> Vec<SegmentWithPrev> {
    match s.segment {
        Segment::Quad { .. } => {
            let mut prev = s.prev;
            s.points(FLATTEN_TOLERANCE * 100.0)
                .into_iter()
                .map(|p| {
                    let piece = SegmentWithPrev::new(prev, Segment::line(p), s.shape);
                    prev = p;
                    piece
                })
                .filter(|piece| !piece.is_degenerate())
                .collect()
        }
        _ => vec![*s],
    }
}

/// Hits between two line or arc segments, including end points touching
/// the other segment.
fn simple_hits(a: &SegmentWithPrev, b: &SegmentWithPrev) -> Vec<Point2> {
    let mut points = Vec::new();
    if let (Some(pa), Some(pb)) = (a.primitive(), b.primitive()) {
        if !coincident(a, b) {
            points.extend(
                intersect(&pa, &pb)
                    .into_iter()
                    .filter(|p| a.contains(p) && b.contains(p)),
            );
        }
    }
    for p in [a.start(), a.end()] {
        if b.contains(&p) {
            points.push(p);
        }
    }
    for p in [b.start(), b.end()] {
        if a.contains(&p) {
            points.push(p);
        }
    }
    points
}

/// Whether both segments lie on the same line or the same circle.
fn coincident(a: &SegmentWithPrev, b: &SegmentWithPrev) -> bool {
    match (a.segment, b.segment) {
        (Segment::Line { .. }, Segment::Line { .. }) => {
            let da = a.tangent_at(0.0);
            let db = b.tangent_at(0.0);
            cross(&da, &db).abs() <= ANGLE_TOLERANCE
                && cross(&da, &(b.start() - a.start())).abs() <= TOLERANCE
        }
        (Segment::Arc { center: ca, .. }, Segment::Arc { center: cb, .. }) => {
            close_enough(&ca, &cb)
                && match (a.radius(), b.radius()) {
                    (Some(ra), Some(rb)) => (ra - rb).abs() <= TOLERANCE,
                    _ => false,
                }
        }
        _ => false,
    }
}
