//! Extraction runs: pipeline, persistence and reporting

mod persister;
mod pipeline;
mod report;

pub use persister::{SlotWriter, WriteFailure};
pub use pipeline::PanelExtractor;
pub use report::{BatchReport, FailureReason, LayoutManifest, PageOutcome, PageStatus, SlotRecord, LAYOUT_FILE, REPORT_FILE, TEXT_FILE};
