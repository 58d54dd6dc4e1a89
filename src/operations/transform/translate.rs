use crate::error::Result;
use crate::geometry::{Path, Segment};
use crate::math::Vector2;

/// Translates a path by a vector.
#[derive(Debug)]
pub struct Translate {
    path: Path,
    offset: Vector2,
}

impl Translate {
    /// Creates a new `Translate` operation.
    #[must_use]
    pub fn new(path: Path, offset: Vector2) -> Self {
        Self { path, offset }
    }

    /// Executes the translation.
    ///
    /// # Errors
    ///
    /// Never fails today; returns `Result` like the other transforms.
    pub fn execute(&self) -> Result<Path> {
        let d = self.offset;
        let segments = self
            .path
            .segments
            .iter()
            .map(|s| match *s {
                Segment::Line { to } => Segment::line(to + d),
                Segment::Arc {
                    center,
                    to,
                    clockwise,
                } => Segment::arc(center + d, to + d, clockwise),
                Segment::Quad { control, to } => Segment::quad(control + d, to + d),
            })
            .collect();
        Ok(Path::new(self.path.origin + d, segments, self.path.closed))
    }
}
