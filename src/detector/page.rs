//! Page representations handed to the detectors

use image::{imageops, RgbImage};

use crate::errors::{PanelError, PanelResult};
use crate::pdf::EmbeddedRaster;
use super::region::{Provenance, Region};

/// What a page is made of
pub enum PageContent {
    /// Image XObjects with their placements, in enumeration order
    Embedded(Vec<EmbeddedRaster>),
    /// The whole page rendered to a bitmap
    Raster(RgbImage),
}

/// One PDF page ready for detection
pub struct Page {
    /// 0-based page index in the document
    pub index: usize,
    /// Page width in the unit region boxes use
    pub width: f64,
    /// Page height in the unit region boxes use
    pub height: f64,
    pub content: PageContent,
}

impl Page {
    /// Page backed by a rendered bitmap; dimensions are the bitmap's
    pub fn from_raster(index: usize, image: RgbImage) -> Self {
        Page {
            index,
            width: image.width() as f64,
            height: image.height() as f64,
            content: PageContent::Raster(image),
        }
    }

    /// Page backed by embedded rasters on a media box of the given size
    pub fn from_embedded(index: usize, width: f64, height: f64, rasters: Vec<EmbeddedRaster>) -> Self {
        Page {
            index,
            width,
            height,
            content: PageContent::Embedded(rasters),
        }
    }

    /// 1-based page number
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Cut a region out of the page as an RGB image
    ///
    /// Embedded regions yield the complete decoded raster; contour regions
    /// are sliced out of the page bitmap, clamped to its bounds.
    pub fn crop(&self, region: &Region) -> PanelResult<RgbImage> {
        match (&self.content, region.provenance()) {
            (PageContent::Embedded(rasters), Provenance::Embedded { object_id, .. }) => {
                let raster = rasters.iter()
                    .find(|r| r.object_id == *object_id)
                    .ok_or_else(|| PanelError::GenericError(format!(
                        "image {:?} is not on page {}", object_id, self.number())))?;
                raster.decode_rgb()
            }
            (PageContent::Raster(image), Provenance::Contour) => {
                let bbox = region.bbox()
                    .ok_or_else(|| PanelError::InvalidRegion("contour region without box".to_string()))?;
                let (x, y, w, h) = bbox.to_pixel_rect(image.width(), image.height())
                    .ok_or_else(|| PanelError::InvalidRegion(format!(
                        "box {:?} lies outside the {}x{} page", bbox, image.width(), image.height())))?;
                Ok(imageops::crop_imm(image, x, y, w, h).to_image())
            }
            _ => Err(PanelError::GenericError(format!(
                "region provenance {:?} does not match page {} content", region.provenance(), self.number()))),
        }
    }
}
