use thiserror::Error;

/// Top-level error type for the offset/region kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    PathData(#[from] PathDataError),
}

/// The input is not a shape the operation can work on.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("shape has no segments")]
    Empty,

    #[error("path is not closed (gap of {gap})")]
    NotClosed { gap: f64 },

    #[error("operation needs at least two shapes")]
    TooFewShapes,
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("arc radius mismatch: {start} at start, {end} at end")]
    ArcRadiusMismatch { start: f64, end: f64 },
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors raised at the path-data (SVG `d` string) boundary.
#[derive(Debug, Error)]
pub enum PathDataError {
    #[error("malformed path data: {0}")]
    Malformed(String),

    #[error("unsupported path command: {0}")]
    Unsupported(String),

    #[error("path data must start with a move-to")]
    MissingMoveTo,
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;
