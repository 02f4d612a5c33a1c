//! PDF access
//!
//! Loading documents, locating image XObjects and their placement,
//! decoding embedded rasters and rendering whole pages.

mod document;
mod content;
mod raster;
mod renderer;
mod source;

pub use document::{name, number, to_page_space, PdfDocument};
pub use content::{ImageCollector, PageImage};
pub use raster::{cmyk_to_rgb, ColorModel, EmbeddedRaster, FilterSpec};
pub use renderer::PageRenderer;
pub use source::{EmbeddedPageSource, PageSource, RenderedPageSource};
