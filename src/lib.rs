pub mod errors;
pub mod config;
pub mod geometry;
pub mod filters;
pub mod pdf;
pub mod vision;
pub mod detector;
pub mod layout;
pub mod extraction;
pub mod screening;
pub mod comparison;
pub mod organizer;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::PanelKit;

pub use errors::{PanelError, PanelResult};
pub use config::ExtractionConfig;
pub use detector::{Page, Region, RegionDetector, Strategy};
pub use layout::{AssignmentMethod, Slot, SlotAssignment};
pub use extraction::{BatchReport, PageOutcome, PageStatus};
