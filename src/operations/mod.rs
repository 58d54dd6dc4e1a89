pub mod boolean;
pub mod offset;
pub mod regions;
pub mod simplify;
pub mod transform;
pub mod winding;
