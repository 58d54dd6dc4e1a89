//! Boundary to an external polygon boolean engine.
//!
//! Paths cross the boundary as SVG path data. An engine loads a string into
//! its own handle type, combines handles and writes the result back out, so
//! any 2D boolean library can sit behind [`BooleanEngine`].

mod geo_engine;
pub mod path_data;

pub use geo_engine::GeoBooleanEngine;
pub use path_data::{from_path_data, to_path_data};

use tracing::debug;

use crate::error::{Result, ShapeError};
use crate::geometry::Path;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersect,
}

/// A polygon boolean engine working over SVG path data.
pub trait BooleanEngine {
    /// Engine-side representation of a loaded shape.
    type Handle;

    /// Loads path data into a handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the path data cannot be read.
    fn load(&self, path_data: &str) -> Result<Self::Handle>;

    fn union(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle;

    fn difference(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle;

    fn intersect(&self, a: &Self::Handle, b: &Self::Handle) -> Self::Handle;

    /// Writes a handle back out as path data.
    fn save(&self, handle: &Self::Handle) -> String;

    /// Applies `op` to two handles.
    fn apply(&self, op: BooleanOp, a: &Self::Handle, b: &Self::Handle) -> Self::Handle {
        match op {
            BooleanOp::Union => self.union(a, b),
            BooleanOp::Difference => self.difference(a, b),
            BooleanOp::Intersect => self.intersect(a, b),
        }
    }
}

/// Combines two sets of closed paths with an external engine.
#[derive(Debug)]
pub struct PathBoolean {
    a: Vec<Path>,
    b: Vec<Path>,
    op: BooleanOp,
}

impl PathBoolean {
    /// Creates a new boolean operation of `a` with `b`.
    #[must_use]
    pub fn new(a: Vec<Path>, b: Vec<Path>, op: BooleanOp) -> Self {
        Self { a, b, op }
    }

    /// Runs the operation on `engine` and parses the result back into paths.
    ///
    /// # Errors
    ///
    /// - [`ShapeError::TooFewShapes`] when either operand has no paths.
    /// - Any validation error of an operand path.
    /// - Any error the engine reports while loading, or a parse error of its
    ///   output.
    pub fn execute<E: BooleanEngine>(&self, engine: &E) -> Result<Vec<Path>> {
        if self.a.is_empty() || self.b.is_empty() {
            return Err(ShapeError::TooFewShapes.into());
        }
        for path in self.a.iter().chain(&self.b) {
            path.validate()?;
        }
        let a = engine.load(&to_path_data(&self.a))?;
        let b = engine.load(&to_path_data(&self.b))?;
        let out = engine.save(&engine.apply(self.op, &a, &b));
        let paths = from_path_data(&out)?;
        debug!(op = ?self.op, paths = paths.len(), "boolean operation done");
        Ok(paths)
    }
}
