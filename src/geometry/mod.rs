//! Page geometry
//!
//! Points, boxes and affine transforms shared by both detection strategies.
//! All boxes use a top-left origin with y growing downward.

mod bbox;
mod point;
mod transform;

pub use self::bbox::BoundingBox;
pub use self::point::Point;
pub use self::transform::Matrix;
