//! Candidate photograph detection
//!
//! This module provides the page model and the detection strategies that
//! turn a page into candidate regions.

mod region;
mod page;
mod detector_strategy;
mod metadata_strategy;
mod visual_strategy;

pub use region::{Provenance, Region};
pub use page::{Page, PageContent};
pub use detector_strategy::{sort_by_area, ExtractorStrategyFactory, RegionDetector, Strategy};
pub use metadata_strategy::MetadataDetector;
pub use visual_strategy::VisualDetector;
