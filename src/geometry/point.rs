//! Point structure for page coordinates

/// A point in page space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (grows to the right)
    pub x: f64,
    /// Y coordinate (grows downward)
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}
