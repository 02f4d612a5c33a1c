//! Detection by contour tracing on the rendered page

use image::imageops;
use log::{debug, trace};

use crate::errors::{PanelError, PanelResult};
use crate::vision::{adaptive_threshold_inv, clean_mask, external_contours};
use crate::vision::threshold::{BLOCK_SIZE, MORPH_RADIUS, THRESHOLD_C};
use super::detector_strategy::{sort_by_area, RegionDetector};
use super::page::{Page, PageContent};
use super::region::Region;

/// Finds photographs as large external contours of the thresholded page
#[derive(Debug, Clone)]
pub struct VisualDetector {
    min_area_fraction: f64,
}

impl VisualDetector {
    pub fn new(min_area_fraction: f64) -> Self {
        VisualDetector { min_area_fraction }
    }
}

impl RegionDetector for VisualDetector {
    fn name(&self) -> &'static str {
        "visual"
    }

    fn detect(&self, page: &Page) -> PanelResult<Vec<Region>> {
        let PageContent::Raster(image) = &page.content else {
            return Err(PanelError::GenericError(
                "visual detection needs a rendered page".to_string()));
        };

        let gray = imageops::grayscale(image);
        let mask = adaptive_threshold_inv(&gray, BLOCK_SIZE, THRESHOLD_C);
        drop(gray);
        let mask = clean_mask(&mask, MORPH_RADIUS);

        let min_area = self.min_area_fraction * page.area();
        let contours = external_contours(&mask);
        debug!("Page {}: {} external contours, min area {:.0}", page.number(), contours.len(), min_area);

        let mut regions = Vec::new();
        for (index, contour) in contours.into_iter().enumerate() {
            if contour.area <= min_area {
                trace!("Dropping contour {} with area {:.0}", index, contour.area);
                continue;
            }
            regions.push(Region::from_contour(contour.bbox, contour.area, index)?);
        }

        sort_by_area(&mut regions);
        Ok(regions)
    }
}
