//! Affine transformation matrices
//!
//! PDF expresses placement with 3x3 affine matrices written as six numbers
//! `[a b c d e f]`. A point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.

use super::bbox::BoundingBox;
use super::point::Point;

/// Affine matrix in PDF `[a b c d e f]` form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::identity()
    }
}

impl Matrix {
    /// Create a matrix from its six coefficients
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Matrix { a, b, c, d, e, f }
    }

    /// The identity transform
    pub fn identity() -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Build from a slice of six numbers
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f] => Some(Matrix::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// Compose `self` applied first, then `other`
    ///
    /// This is the PDF `cm` rule: the new CTM is `M x CTM`, so
    /// `m.then(&ctm)` yields the updated CTM.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }

    /// Bounding box of the unit square mapped through this matrix
    ///
    /// Image XObjects are always painted into the unit square of their
    /// current user space, so this is the placed extent of an image.
    pub fn unit_square_bounds(&self) -> BoundingBox {
        let corners = [
            self.apply(Point::new(0.0, 0.0)),
            self.apply(Point::new(1.0, 0.0)),
            self.apply(Point::new(0.0, 1.0)),
            self.apply(Point::new(1.0, 1.0)),
        ];
        // Four corners are never empty
        BoundingBox::enclosing(&corners).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_then_translate() {
        let ctm = Matrix::new(200.0, 0.0, 0.0, 150.0, 40.0, 500.0);
        let bounds = ctm.unit_square_bounds();
        assert_eq!(bounds, BoundingBox::new(40.0, 500.0, 240.0, 650.0));
    }

    #[test]
    fn concatenation_follows_cm_rule() {
        // Outer translation, then a nested scale applied with `cm`
        let page = Matrix::new(1.0, 0.0, 0.0, 1.0, 100.0, 100.0);
        let scale = Matrix::new(50.0, 0.0, 0.0, 20.0, 0.0, 0.0);
        let ctm = scale.then(&page);
        assert_eq!(ctm.apply(Point::new(1.0, 1.0)), Point::new(150.0, 120.0));
    }

    #[test]
    fn from_slice_requires_six_values() {
        assert!(Matrix::from_slice(&[1.0, 0.0, 0.0, 1.0]).is_none());
        assert_eq!(Matrix::from_slice(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]), Some(Matrix::identity()));
    }
}
