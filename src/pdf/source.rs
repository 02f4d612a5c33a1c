//! Page sources for the two detection strategies

use std::path::Path;
use log::{debug, warn};
use lopdf::Object;

use crate::detector::Page;
use crate::errors::{PanelError, PanelResult};
use super::content::ImageCollector;
use super::document::{to_page_space, PdfDocument};
use super::raster::EmbeddedRaster;
use super::renderer::PageRenderer;

/// Yields pages one at a time
///
/// Each call produces an independent page; nothing is retained between
/// calls, so memory use is bounded by a single page.
pub trait PageSource {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Load a page by 0-based index
    fn load_page(&self, index: usize) -> PanelResult<Page>;

    /// Text of a page, for sources backed by a PDF
    fn page_text(&self, _index: usize) -> PanelResult<Option<String>> {
        Ok(None)
    }
}

/// Pages as lists of embedded rasters with placements
pub struct EmbeddedPageSource {
    doc: PdfDocument,
}

impl EmbeddedPageSource {
    pub fn open(path: &Path) -> PanelResult<Self> {
        Ok(Self::new(PdfDocument::load(path)?))
    }

    pub fn new(doc: PdfDocument) -> Self {
        EmbeddedPageSource { doc }
    }

    /// Embedded rasters of a page with page-space placements
    pub fn page_rasters(&self, index: usize) -> PanelResult<Vec<EmbeddedRaster>> {
        let page_id = self.doc.page_id(index)?;
        let media_box = self.doc.media_box(page_id);
        let images = ImageCollector::new(&self.doc).collect(page_id)?;

        let mut rasters = Vec::with_capacity(images.len());
        for image in images {
            let stream = match self.doc.inner().get_object(image.object_id) {
                Ok(Object::Stream(stream)) => stream,
                _ => {
                    warn!("Image {:?} on page {} is not a stream", image.object_id, index + 1);
                    continue;
                }
            };

            let placement = image.placement.map(|b| to_page_space(&b, &media_box));
            match EmbeddedRaster::from_stream(&self.doc, image.object_id, stream, placement) {
                Ok(raster) => rasters.push(raster),
                Err(e) => warn!("Skipping image {:?} on page {}: {}", image.object_id, index + 1, e),
            }
        }

        Ok(rasters)
    }
}

impl PageSource for EmbeddedPageSource {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn load_page(&self, index: usize) -> PanelResult<Page> {
        let page_id = self.doc.page_id(index)?;
        let media_box = self.doc.media_box(page_id);
        let rasters = self.page_rasters(index)?;
        debug!("Page {}: {} embedded rasters on {}x{} pt",
               index + 1, rasters.len(), media_box.width(), media_box.height());
        Ok(Page::from_embedded(index, media_box.width(), media_box.height(), rasters))
    }

    fn page_text(&self, index: usize) -> PanelResult<Option<String>> {
        self.doc.page_text(index).map(Some)
    }
}

/// Pages rendered to bitmaps
pub struct RenderedPageSource {
    doc: PdfDocument,
    renderer: PageRenderer,
}

impl RenderedPageSource {
    /// Open a PDF for rendering; the page count comes from its page tree
    pub fn open(path: &Path, renderer: PageRenderer) -> PanelResult<Self> {
        Ok(RenderedPageSource {
            doc: PdfDocument::load(path)?,
            renderer,
        })
    }
}

impl PageSource for RenderedPageSource {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn load_page(&self, index: usize) -> PanelResult<Page> {
        if index >= self.doc.page_count() {
            return Err(PanelError::PageOutOfRange(index));
        }
        let image = self.renderer.render_page(self.doc.path(), index)?;
        Ok(Page::from_raster(index, image))
    }

    fn page_text(&self, index: usize) -> PanelResult<Option<String>> {
        self.doc.page_text(index).map(Some)
    }
}
