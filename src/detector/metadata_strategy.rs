//! Detection from embedded image objects

use log::{debug, warn};

use crate::errors::{PanelError, PanelResult};
use super::detector_strategy::{sort_by_area, RegionDetector};
use super::page::{Page, PageContent};
use super::region::Region;

/// Treats every image XObject on the page as a candidate
///
/// Area is the raw pixel count; the box is the drawn placement when the
/// content stream revealed one.
#[derive(Debug, Default)]
pub struct MetadataDetector;

impl MetadataDetector {
    pub fn new() -> Self {
        MetadataDetector
    }
}

impl RegionDetector for MetadataDetector {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn detect(&self, page: &Page) -> PanelResult<Vec<Region>> {
        let PageContent::Embedded(rasters) = &page.content else {
            return Err(PanelError::GenericError(
                "metadata detection needs the page's embedded images".to_string()));
        };

        let mut regions = Vec::with_capacity(rasters.len());
        for (index, raster) in rasters.iter().enumerate() {
            // A degenerate placement is treated as unknown rather than dropping the image
            let placement = raster.placement.filter(|b| b.is_valid());
            match Region::from_embedded(raster.object_id, raster.width, raster.height, placement, index) {
                Ok(region) => regions.push(region),
                Err(e) => warn!("Page {}: skipping image {:?}: {}", page.number(), raster.object_id, e),
            }
        }

        sort_by_area(&mut regions);
        debug!("Page {}: {} embedded candidates", page.number(), regions.len());
        Ok(regions)
    }
}
