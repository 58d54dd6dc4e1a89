//! Coordinate and primitive algebra.
//!
//! Coordinates are screen coordinates (`y` grows downward), so the direction
//! of increasing `atan2` angle is clockwise on screen.

pub mod arc_2d;
pub mod coord;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;
pub mod primitive;

pub use coord::{angle_to, close_enough, close_enough_angle, dist, normalize_angle, push, CoordKey};
pub use primitive::{line_to_slope, Primitive, SlopeLine};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Point coincidence tolerance shared by the whole kernel.
pub const TOLERANCE: f64 = 1e-6;

/// Tolerance for angle comparisons, in radians.
pub const ANGLE_TOLERANCE: f64 = 1e-6;

/// Decimal places kept by [`CoordKey`] quantization.
pub const KEY_DECIMALS: i32 = 5;

/// Maximum chord sagitta when flattening arcs.
pub const FLATTEN_TOLERANCE: f64 = 1e-6;

/// Maximum miter length at an offset joint, as a multiple of `|inset|`.
pub const MITER_LIMIT: f64 = 4.0;
