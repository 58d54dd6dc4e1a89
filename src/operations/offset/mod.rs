mod chain;
mod cleanup;
mod joint;

pub use chain::{inset_path, inset_segments, InsetChain};
pub use cleanup::clean_up_inset_segments;
pub use joint::{inset_segment, offset_raw};

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::Path;
use crate::math::TOLERANCE;

/// Offsets a path by a signed distance.
///
/// For closed paths positive `inset` shrinks the shape (whatever its input
/// winding) and negative grows it; the result is a list of clockwise loops,
/// each followed by any counter-clockwise holes inside it, and is empty when
/// the shape vanishes. Open paths are offset to the right of
/// travel for positive `inset` and come back as a single open path.
#[derive(Debug)]
pub struct InsetPath {
    path: Path,
    inset: f64,
    bridge: bool,
}

impl InsetPath {
    /// Creates a new inset operation.
    #[must_use]
    pub fn new(path: Path, inset: f64) -> Self {
        Self {
            path,
            inset,
            bridge: true,
        }
    }

    /// Whether gaps at joints are bridged (default `true`).
    ///
    /// Without bridging the raw offset pieces are returned as one open path
    /// and no self-intersection cleanup takes place.
    #[must_use]
    pub fn with_bridge(mut self, bridge: bool) -> Self {
        self.bridge = bridge;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or not a valid shape,
    /// `OperationError::InvalidInput` for a non-finite inset, or
    /// `OperationError::Failed` if every segment of an open path collapses.
    pub fn execute(&self) -> Result<Vec<Path>> {
        if !self.inset.is_finite() {
            return Err(OperationError::InvalidInput(format!("inset must be finite, got {}", self.inset)).into());
        }
        self.path.validate()?;
        if self.inset.abs() < TOLERANCE {
            return Ok(vec![self.path.clone()]);
        }
        debug!(
            segments = self.path.segments.len(),
            inset = self.inset,
            closed = self.path.closed,
            "insetting path"
        );

        let chain = chain::build_chain(&self.path, self.inset, self.bridge);
        if !self.path.closed || !self.bridge {
            if chain.segments.is_empty() {
                return Err(OperationError::Failed("offset collapsed completely".to_owned()).into());
            }
            return Ok(vec![chain.to_path()]);
        }
        clean_up_inset_segments(&chain, &self.path, self.inset)
    }
}
