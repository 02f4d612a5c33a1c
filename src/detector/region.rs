//! Region structure for candidate photographs
//!
//! A region is a detected area of a page that may be one of the report's
//! photographs. Coordinates are page-local with the origin at the top-left
//! corner and y growing downward: points for embedded rasters, pixels for
//! rendered pages.

use lopdf::ObjectId;
use serde::Serialize;

use crate::errors::{PanelError, PanelResult};
use crate::geometry::{BoundingBox, Point};

/// Where a region came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// An image XObject of the PDF page
    Embedded {
        object_id: ObjectId,
        pixel_width: u32,
        pixel_height: u32,
    },
    /// A contour traced on the rendered page
    Contour,
}

/// Candidate photograph area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    bbox: Option<BoundingBox>,
    area: f64,
    provenance: Provenance,
    /// Position in the detector's raw output, before area sorting
    source_index: usize,
}

impl Region {
    /// Create a region from a traced contour
    ///
    /// # Arguments
    /// * `bbox` - Bounding rectangle in page pixels
    /// * `area` - Polygon area of the contour
    /// * `source_index` - Index of the contour in detection order
    ///
    /// # Returns
    /// The region, or `InvalidRegion` when the box or area is not positive
    pub fn from_contour(bbox: BoundingBox, area: f64, source_index: usize) -> PanelResult<Self> {
        if !bbox.is_valid() {
            return Err(PanelError::InvalidRegion(format!("degenerate bounding box {:?}", bbox)));
        }
        if !(area > 0.0) {
            return Err(PanelError::InvalidRegion(format!("non-positive area {}", area)));
        }

        Ok(Region {
            bbox: Some(bbox),
            area,
            provenance: Provenance::Contour,
            source_index,
        })
    }

    /// Create a region from an embedded raster
    ///
    /// The area is the raw pixel count of the raster, independent of the
    /// size it is drawn at. Placement is optional.
    pub fn from_embedded(object_id: ObjectId, pixel_width: u32, pixel_height: u32,
                         placement: Option<BoundingBox>, source_index: usize) -> PanelResult<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return Err(PanelError::InvalidRegion(format!(
                "image {:?} is {}x{} pixels", object_id, pixel_width, pixel_height)));
        }
        if let Some(bbox) = placement {
            if !bbox.is_valid() {
                return Err(PanelError::InvalidRegion(format!(
                    "image {:?} placed in degenerate box {:?}", object_id, bbox)));
            }
        }

        Ok(Region {
            bbox: placement,
            area: pixel_width as f64 * pixel_height as f64,
            provenance: Provenance::Embedded { object_id, pixel_width, pixel_height },
            source_index,
        })
    }

    /// Bounding box, None when the placement is unknown
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// Center of the bounding box, None when the placement is unknown
    pub fn center(&self) -> Option<Point> {
        self.bbox.map(|b| b.center())
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }
}
