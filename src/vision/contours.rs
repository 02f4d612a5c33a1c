//! External contour extraction

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

use crate::geometry::BoundingBox;

/// Bounding rectangle and enclosed area of an outer contour
#[derive(Debug, Clone, PartialEq)]
pub struct ContourRegion {
    pub bbox: BoundingBox,
    pub area: f64,
}

/// Outermost contours of the foreground in a binary mask
///
/// Holes and contours nested inside other contours are skipped. The bounding
/// box covers the contour's pixels inclusively; the area is the polygon
/// area of the traced boundary.
pub fn external_contours(mask: &GrayImage) -> Vec<ContourRegion> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .filter_map(|contour| {
            let first = contour.points.first()?;
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
            for p in &contour.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }

            Some(ContourRegion {
                bbox: BoundingBox::new(min_x as f64, min_y as f64, (max_x + 1) as f64, (max_y + 1) as f64),
                area: polygon_area(&contour.points),
            })
        })
        .collect()
}

/// Shoelace area of a closed polygon
pub fn polygon_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
    }
    twice_area.abs() / 2.0
}
