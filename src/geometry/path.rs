use crate::error::{GeometryError, Result, ShapeError};
use crate::math::coord::dist;
use crate::math::{Point2, TOLERANCE};

use super::segment::{Segment, SegmentWithPrev, ShapeId};

/// A chain of segments starting at an explicit origin.
///
/// A closed path ends where it starts: the last segment's `to` equals
/// `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub origin: Point2,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Path {
    /// Creates a path from its parts.
    #[must_use]
    pub fn new(origin: Point2, segments: Vec<Segment>, closed: bool) -> Self {
        Self {
            origin,
            segments,
            closed,
        }
    }

    /// Creates a line-only path through `points`.
    ///
    /// A closed path gets a final segment back to the first point.
    #[must_use]
    pub fn from_points(points: &[Point2], closed: bool) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::new(Point2::origin(), Vec::new(), closed);
        };
        let mut segments: Vec<Segment> = rest.iter().map(|p| Segment::line(*p)).collect();
        if closed && rest.last().is_some_and(|last| dist(last, first) > TOLERANCE) {
            segments.push(Segment::line(*first));
        }
        Self::new(*first, segments, closed)
    }

    /// Rebuilds a path from explicit segments. The origin is the first
    /// segment's start.
    #[must_use]
    pub fn from_segments_with_prev(segments: &[SegmentWithPrev], closed: bool) -> Self {
        let origin = segments.first().map_or_else(Point2::origin, SegmentWithPrev::start);
        Self::new(origin, segments.iter().map(|s| s.segment).collect(), closed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Pairs every segment with its start point, tagged with `shape`.
    #[must_use]
    pub fn segments_with_prev(&self, shape: ShapeId) -> Vec<SegmentWithPrev> {
        let mut prev = self.origin;
        self.segments
            .iter()
            .map(|segment| {
                let s = SegmentWithPrev::new(prev, *segment, shape);
                prev = segment.to();
                s
            })
            .collect()
    }

    /// The same path traversed backwards.
    ///
    /// Each segment swaps its start and end; arcs flip their direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let Some(last) = self.segments.last() else {
            return self.clone();
        };
        let origin = last.to();
        let segments = self
            .segments_with_prev(0)
            .iter()
            .rev()
            .map(|s| s.reversed().segment)
            .collect();
        Self::new(origin, segments, self.closed)
    }

    /// Start points of every segment followed by the final end point.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        let mut out = Vec::with_capacity(self.segments.len() + 1);
        out.push(self.origin);
        out.extend(self.segments.iter().map(Segment::to));
        out
    }

    /// Flattens the path into a polyline; curves are sampled within `tolerance`.
    ///
    /// For closed paths the repeated end point is omitted.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point2> {
        if self.segments.is_empty() {
            return Vec::new();
        }
        let mut points = vec![self.origin];
        for s in self.segments_with_prev(0) {
            if s.is_degenerate() {
                continue;
            }
            points.extend(s.points(tolerance));
        }
        if self.closed && points.len() > 1 {
            if let Some(last) = points.last() {
                if dist(last, &self.origin) <= TOLERANCE {
                    points.pop();
                }
            }
        }
        points
    }

    /// Total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments_with_prev(0).iter().map(SegmentWithPrev::length).sum()
    }

    /// Distance between the end of the last segment and the origin.
    #[must_use]
    pub fn closing_gap(&self) -> f64 {
        self.segments
            .last()
            .map_or(0.0, |last| dist(&last.to(), &self.origin))
    }

    /// Checks the path is usable as a closed shape.
    ///
    /// # Errors
    ///
    /// - [`ShapeError::Empty`] when there are no segments.
    /// - [`ShapeError::NotClosed`] when a closed path does not return to its origin.
    /// - [`GeometryError::ArcRadiusMismatch`] when an arc's endpoints sit at
    ///   different distances from its center.
    pub fn validate(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(ShapeError::Empty.into());
        }
        let gap = self.closing_gap();
        if self.closed && gap > TOLERANCE {
            return Err(ShapeError::NotClosed { gap }.into());
        }
        for s in self.segments_with_prev(0) {
            if let Segment::Arc { center, to, .. } = s.segment {
                let start = dist(&center, &s.prev);
                let end = dist(&center, &to);
                if (start - end).abs() > TOLERANCE.max(start * 1e-6) {
                    return Err(GeometryError::ArcRadiusMismatch { start, end }.into());
                }
            }
        }
        Ok(())
    }
}
