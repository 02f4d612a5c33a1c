//! Region detector strategy definitions
//!
//! Two interchangeable detectors share one contract: given a page, return
//! candidate regions sorted by area, largest first. The factory pairs each
//! strategy with the page source it needs.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use log::info;
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::errors::{PanelError, PanelResult};
use crate::pdf::{EmbeddedPageSource, PageRenderer, PageSource, RenderedPageSource};

use super::metadata_strategy::MetadataDetector;
use super::page::Page;
use super::region::Region;
use super::visual_strategy::VisualDetector;

/// Strategy for finding candidate photographs on a page
///
/// Implementations return every candidate they find; they never enforce a
/// minimum count.
pub trait RegionDetector {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Detect candidate regions
    ///
    /// # Arguments
    /// * `page` - The page to inspect
    ///
    /// # Returns
    /// Regions sorted by area descending, ties kept in detection order
    fn detect(&self, page: &Page) -> PanelResult<Vec<Region>>;
}

/// Sort regions largest first, keeping detection order for equal areas
pub fn sort_by_area(regions: &mut [Region]) {
    regions.sort_by(|a, b| b.area().partial_cmp(&a.area()).unwrap_or(Ordering::Equal));
}

/// Which detector to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Embedded image objects and their placement
    Metadata,
    /// Contour detection on the rendered page
    Visual,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Metadata => "metadata",
            Strategy::Visual => "visual",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metadata" | "embedded" => Ok(Strategy::Metadata),
            "visual" | "advanced" | "contour" => Ok(Strategy::Visual),
            other => Err(PanelError::ConfigError(format!(
                "Unknown strategy '{}', expected 'metadata' or 'visual'", other))),
        }
    }
}

/// Factory for creating page sources and detectors
pub struct ExtractorStrategyFactory<'a> {
    config: &'a ExtractionConfig,
}

impl<'a> ExtractorStrategyFactory<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        ExtractorStrategyFactory { config }
    }

    /// Open the page source a strategy reads from
    ///
    /// # Arguments
    /// * `strategy` - Detection strategy
    /// * `pdf_path` - PDF to read
    ///
    /// # Returns
    /// A source yielding embedded rasters (metadata) or rendered bitmaps (visual)
    pub fn create_source(&self, strategy: Strategy, pdf_path: &Path) -> PanelResult<Box<dyn PageSource>> {
        info!("Opening {} with the {} strategy", pdf_path.display(), strategy);
        match strategy {
            Strategy::Metadata => Ok(Box::new(EmbeddedPageSource::open(pdf_path)?)),
            Strategy::Visual => {
                let renderer = PageRenderer::new(&self.config.renderer_command, self.config.dpi);
                Ok(Box::new(RenderedPageSource::open(pdf_path, renderer)?))
            }
        }
    }

    /// Create the detector for a strategy
    pub fn create_detector(&self, strategy: Strategy) -> Box<dyn RegionDetector> {
        match strategy {
            Strategy::Metadata => Box::new(MetadataDetector::new()),
            Strategy::Visual => Box::new(VisualDetector::new(self.config.min_area_fraction)),
        }
    }
}
