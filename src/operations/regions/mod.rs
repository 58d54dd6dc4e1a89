mod clip;
mod collect;
mod graph;
mod hits;

pub use clip::{ClipMode, ClipPath};
pub use collect::{collect_regions, Region, RegionSet};
pub use hits::{get_some_hits, Hit, Hits};

use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::geometry::{Path, SegmentWithPrev};
use crate::operations::winding::ensure_clockwise;

/// Splits one or more closed shapes into their regions.
///
/// Shape ids follow the order of `shapes`. Every shape is wound clockwise
/// before intersecting, so winding numbers count positive inside a shape.
#[derive(Debug)]
pub struct Regions {
    shapes: Vec<Path>,
    skip_adjacent: bool,
}

impl Regions {
    /// Creates a new region extraction over `shapes`.
    #[must_use]
    pub fn new(shapes: Vec<Path>) -> Self {
        Self {
            shapes,
            skip_adjacent: true,
        }
    }

    /// Whether shared joints of consecutive segments are left out of the
    /// hit lists (default `true`).
    #[must_use]
    pub fn with_skip_adjacent(mut self, skip_adjacent: bool) -> Self {
        self.skip_adjacent = skip_adjacent;
        self
    }

    /// Executes the extraction.
    ///
    /// # Errors
    ///
    /// - [`ShapeError::Empty`] when there are no shapes or a shape has no segments.
    /// - [`ShapeError::NotClosed`] when a shape is open.
    /// - Any error from [`Path::validate`].
    pub fn execute(&self) -> Result<RegionSet> {
        if self.shapes.is_empty() {
            return Err(ShapeError::Empty.into());
        }
        let mut segments: Vec<SegmentWithPrev> = Vec::new();
        for (id, shape) in self.shapes.iter().enumerate() {
            if !shape.closed {
                return Err(ShapeError::NotClosed {
                    gap: shape.closing_gap(),
                }
                .into());
            }
            shape.validate()?;
            segments.extend(ensure_clockwise(shape).segments_with_prev(id));
        }
        debug!(shapes = self.shapes.len(), segments = segments.len(), "extracting regions");
        let hits = get_some_hits(&segments, self.skip_adjacent)?;
        Ok(collect_regions(&segments, &hits))
    }
}
