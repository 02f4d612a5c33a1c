//! Page screening
//!
//! Report pages carry four photographs and sometimes a logo. Counting the
//! embedded rasters that are large enough to be photographs picks out those
//! pages before extraction, and a filtered copy of the PDF can be written
//! with only them.

use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use lopdf::Object;
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::errors::PanelResult;
use crate::pdf::{number, ImageCollector, PdfDocument};

/// Screening result for one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageScreenInfo {
    /// 1-based page number
    pub page_number: usize,
    /// Image XObjects used by the page
    pub image_count: usize,
    /// Images with at least the configured pixel count
    pub large_image_count: usize,
    pub qualifies: bool,
}

/// Decides which pages look like photo report pages
#[derive(Debug, Clone)]
pub struct PageScreener {
    large_image_pixels: u64,
    min_images: usize,
    max_images: usize,
}

impl PageScreener {
    pub fn new(config: &ExtractionConfig) -> Self {
        PageScreener {
            large_image_pixels: config.large_image_pixels,
            min_images: config.screen_min_images,
            max_images: config.screen_max_images,
        }
    }

    /// Whether a count of large images qualifies a page
    pub fn qualifies(&self, large_images: usize) -> bool {
        (self.min_images..=self.max_images).contains(&large_images)
    }

    /// Screen one page by 0-based index
    pub fn screen_page(&self, doc: &PdfDocument, index: usize) -> PanelResult<PageScreenInfo> {
        let page_id = doc.page_id(index)?;
        let images = ImageCollector::new(doc).collect(page_id)?;

        let mut large = 0;
        for image in &images {
            let Ok(Object::Stream(stream)) = doc.inner().get_object(image.object_id) else {
                continue;
            };
            let dimension = |key: &[u8]| stream.dict.get(key).ok()
                .and_then(|o| doc.resolve(o))
                .and_then(number)
                .unwrap_or(0.0);
            let pixels = (dimension(b"Width") * dimension(b"Height")).max(0.0) as u64;
            if pixels >= self.large_image_pixels {
                large += 1;
            }
        }

        let info = PageScreenInfo {
            page_number: index + 1,
            image_count: images.len(),
            large_image_count: large,
            qualifies: self.qualifies(large),
        };
        debug!("Page {}: {} images, {} large", info.page_number, info.image_count, large);
        Ok(info)
    }

    /// Screen every page; unreadable pages count as having no images
    pub fn screen(&self, doc: &PdfDocument) -> Vec<PageScreenInfo> {
        (0..doc.page_count())
            .map(|index| self.screen_page(doc, index).unwrap_or_else(|e| {
                warn!("Page {}: could not count images: {}", index + 1, e);
                PageScreenInfo {
                    page_number: index + 1,
                    image_count: 0,
                    large_image_count: 0,
                    qualifies: self.qualifies(0),
                }
            }))
            .collect()
    }

    /// 0-based indices of qualifying pages
    pub fn qualifying_pages(infos: &[PageScreenInfo]) -> Vec<usize> {
        infos.iter()
            .filter(|i| i.qualifies)
            .map(|i| i.page_number - 1)
            .collect()
    }

    /// Write a copy of the document containing only qualifying pages
    ///
    /// # Returns
    /// The written path, or None when no page qualifies (nothing is written)
    pub fn write_filtered(doc: &PdfDocument, infos: &[PageScreenInfo], output: &Path) -> PanelResult<Option<PathBuf>> {
        let keep = Self::qualifying_pages(infos);
        if keep.is_empty() {
            warn!("No page qualifies, filtered PDF not written");
            return Ok(None);
        }

        let drop: Vec<u32> = infos.iter()
            .filter(|i| !i.qualifies)
            .map(|i| i.page_number as u32)
            .collect();

        let mut filtered = doc.inner().clone();
        filtered.delete_pages(&drop);
        filtered.prune_objects();

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        filtered.save(output)?;

        info!("Wrote {} of {} pages to {}", keep.len(), infos.len(), output.display());
        Ok(Some(output.to_path_buf()))
    }
}
