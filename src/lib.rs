pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{KernelError, Result};
pub use geometry::{Path, Segment, SegmentWithPrev, ShapeId};
pub use math::Point2;
