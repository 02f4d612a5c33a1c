//! Bounding box structure for regions on a page

use serde::Serialize;

use super::point::Point;

/// An axis-aligned box in page coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its edges
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// Create a bounding box from origin and size
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundingBox::new(x, y, x + width, y + height)
    }

    /// Smallest box enclosing all points, or None for an empty slice
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Get the area of the bounding box
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Point {
        Point::new(
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Whether both dimensions are strictly positive
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Convert to an integer pixel rectangle clamped to an image
    ///
    /// Returns `(x, y, width, height)`, or None when nothing of the box
    /// lies inside the image.
    pub fn to_pixel_rect(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.min_x.floor().max(0.0);
        let y0 = self.min_y.floor().max(0.0);
        let x1 = self.max_x.ceil().min(image_width as f64);
        let y1 = self.max_y.ceil().min(image_height as f64);

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}
