use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::geometry::{Path, Segment, SegmentWithPrev};
use crate::math::coord::dist;
use crate::math::{line_to_slope, Point2, TOLERANCE};
use crate::operations::simplify::simplify_path;
use crate::operations::winding::ensure_clockwise;

use super::joint::{inset_segment, offset_raw};

/// Raw result of offsetting a path, before self-intersection cleanup.
#[derive(Debug, Clone, Default)]
pub struct InsetChain {
    /// The offset chain; for closed input it is a closed loop.
    pub segments: Vec<SegmentWithPrev>,
    /// Corner points of the source path the chain was built from.
    pub corners: Vec<Point2>,
    pub closed: bool,
}

impl InsetChain {
    /// The chain as a path whose origin is the last segment's end.
    #[must_use]
    pub fn to_path(&self) -> Path {
        match self.segments.last() {
            Some(last) if self.closed => Path::new(
                last.end(),
                self.segments.iter().map(|s| s.segment).collect(),
                true,
            ),
            _ => Path::from_segments_with_prev(&self.segments, self.closed),
        }
    }
}

/// Offsets every segment of `path` by `inset` and joins the pieces.
///
/// Closed paths are wound clockwise and simplified first, so positive
/// `inset` always shrinks them. Open paths are offset as given.
#[must_use]
pub fn inset_segments(path: &Path, inset: f64) -> InsetChain {
    build_chain(path, inset, true)
}

/// Rebuilds the offset chain of `path` as a single path.
#[must_use]
pub fn inset_path(path: &Path, inset: f64) -> Path {
    inset_segments(path, inset).to_path()
}

pub(super) fn build_chain(path: &Path, inset: f64, bridge: bool) -> InsetChain {
    if inset.abs() < TOLERANCE {
        let segments = path.segments_with_prev(0);
        return InsetChain {
            corners: segments.iter().map(SegmentWithPrev::start).collect(),
            segments,
            closed: path.closed,
        };
    }

    let normalized = if path.closed {
        simplify_path(&ensure_clockwise(path))
    } else {
        simplify_path(path)
    };

    let source: Vec<SegmentWithPrev> = normalized
        .segments_with_prev(0)
        .into_iter()
        .filter(|s| {
            let keep = !s.is_degenerate() && offset_raw(s, inset).is_some();
            if !keep {
                warn!(segment = ?s, inset, "dropping segment that collapses under offset");
            }
            keep
        })
        .collect();

    let corners = source.iter().map(SegmentWithPrev::start).collect();
    let n = source.len();
    let mut out: Vec<SegmentWithPrev> = Vec::with_capacity(n * 2);
    // Unclamped sweep of each main offset arc, for the inversion check.
    let mut raw_sweeps: Vec<Option<f64>> = Vec::with_capacity(n * 2);

    for i in 0..n {
        let next = if i + 1 < n {
            Some(&source[i + 1])
        } else if path.closed {
            Some(&source[0])
        } else {
            None
        };
        let pieces = inset_segment(&source[i], next, inset, bridge);
        for (k, mut piece) in pieces.into_iter().enumerate() {
            if k == 0 {
                if let Some(end) = out.last().map(SegmentWithPrev::end) {
                    if bridge || on_carrier(&piece, &end) {
                        piece = piece.with_prev(end);
                    }
                }
            }
            let raw = (k == 0)
                .then(|| offset_raw(&source[i], inset))
                .flatten()
                .filter(|r| matches!(r.segment, Segment::Arc { .. }))
                .map(|r| r.sweep());
            out.push(piece);
            raw_sweeps.push(raw);
        }
    }

    if path.closed {
        if let Some(last_end) = out.last().map(SegmentWithPrev::end) {
            if bridge || on_carrier(&out[0], &last_end) {
                out[0] = out[0].with_prev(last_end);
            }
        }
    }

    let segments: Vec<SegmentWithPrev> = out
        .into_iter()
        .zip(raw_sweeps)
        .map(|(s, raw)| match (s.segment, raw) {
            // Trimming past the far end flips an arc onto its long way round.
            (Segment::Arc { to, .. }, Some(raw)) if s.sweep().abs() > raw.abs() + PI => {
                SegmentWithPrev::new(s.prev, Segment::line(to), s.shape)
            }
            _ => s,
        })
        .filter(|s| !(matches!(s.segment, Segment::Line { .. }) && s.is_degenerate()))
        .collect();

    debug!(
        source = n,
        output = segments.len(),
        inset,
        closed = path.closed,
        "built inset chain"
    );

    InsetChain {
        segments,
        corners,
        closed: path.closed && bridge,
    }
}

/// Whether `p` lies on the line or circle carrying `s`.
fn on_carrier(s: &SegmentWithPrev, p: &Point2) -> bool {
    match s.segment {
        Segment::Arc { center, .. } => s
            .radius()
            .is_some_and(|r| (dist(&center, p) - r).abs() <= TOLERANCE),
        Segment::Line { to } | Segment::Quad { to, .. } => {
            line_to_slope(&s.prev, &to, false).is_some_and(|l| l.distance_to(p) <= TOLERANCE)
        }
    }
}
