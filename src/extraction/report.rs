//! Per-page outcomes, layout manifests and the batch report

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use serde::Serialize;

use crate::detector::{Provenance, Strategy};
use crate::errors::PanelResult;
use crate::geometry::BoundingBox;
use crate::layout::{AssignmentMethod, Slot, SlotAssignment};

/// File name of the batch report
pub const REPORT_FILE: &str = "extraction_report.json";

/// File name of the per-page layout manifest
pub const LAYOUT_FILE: &str = "layout.json";

/// File name of the page text written next to the slot images
pub const TEXT_FILE: &str = "text.md";

/// Why a page did not produce four images
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The page could not be read or rendered
    LoadFailed { message: String },
    /// The detector raised an error
    DetectionFailed { message: String },
    /// Fewer than four candidates survived filtering
    InsufficientRegions { found: usize, required: usize },
    /// Cropping, decoding or writing a slot image failed
    ExtractionIo { written: usize, message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureReason::LoadFailed { message } => write!(f, "could not load page: {}", message),
            FailureReason::DetectionFailed { message } => write!(f, "detection failed: {}", message),
            FailureReason::InsufficientRegions { found, required } =>
                write!(f, "found {} of {} photos", found, required),
            FailureReason::ExtractionIo { written, message } =>
                write!(f, "failed after {} images: {}", written, message),
        }
    }
}

/// Result of one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageStatus {
    Success,
    Failed { reason: FailureReason },
}

/// Everything recorded about one processed page
#[derive(Debug, Clone, Serialize)]
pub struct PageOutcome {
    /// 1-based page number
    pub page_number: usize,
    #[serde(flatten)]
    pub status: PageStatus,
    /// Candidates returned by the detector
    pub candidates: usize,
    /// Assignment method, when the page got as far as assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentMethod>,
    /// Directory holding the page's images, when one was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl PageOutcome {
    pub fn failed(page_number: usize, candidates: usize, reason: FailureReason) -> Self {
        PageOutcome {
            page_number,
            status: PageStatus::Failed { reason },
            candidates,
            assignment: None,
            output_dir: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PageStatus::Success
    }

    /// Slot images written for this page, in slot order
    pub fn slot_files(&self) -> Vec<PathBuf> {
        let Some(dir) = &self.output_dir else {
            return Vec::new();
        };
        let written = match &self.status {
            PageStatus::Success => Slot::ALL.len(),
            PageStatus::Failed { reason: FailureReason::ExtractionIo { written, .. } } => *written,
            PageStatus::Failed { .. } => 0,
        };
        Slot::ALL.iter().take(written).map(|slot| dir.join(slot.file_name())).collect()
    }
}

/// Summary of an extraction run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub strategy: Strategy,
    pub total_pages: usize,
    pub successful_pages: usize,
    pub pages: Vec<PageOutcome>,
}

impl BatchReport {
    pub fn new(strategy: Strategy) -> Self {
        BatchReport {
            strategy,
            total_pages: 0,
            successful_pages: 0,
            pages: Vec::new(),
        }
    }

    /// Record a page outcome
    pub fn push(&mut self, outcome: PageOutcome) {
        self.total_pages += 1;
        if outcome.is_success() {
            self.successful_pages += 1;
        }
        self.pages.push(outcome);
    }

    /// Outcome of a page by 1-based number
    pub fn page(&self, page_number: usize) -> Option<&PageOutcome> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Pages that used the order-based fallback
    pub fn fallback_pages(&self) -> Vec<usize> {
        self.pages.iter()
            .filter(|p| p.assignment.map(|m| m.is_fallback()).unwrap_or(false))
            .map(|p| p.page_number)
            .collect()
    }

    /// Write `extraction_report.json` into a directory
    pub fn write_to(&self, dir: &Path) -> PanelResult<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}

/// One slot of a layout manifest
#[derive(Debug, Clone, Serialize)]
pub struct SlotRecord {
    pub slot: Slot,
    pub file: String,
    pub bbox: Option<BoundingBox>,
    pub area: f64,
    pub provenance: Provenance,
}

/// Contents of a page's `layout.json`
#[derive(Debug, Clone, Serialize)]
pub struct LayoutManifest {
    pub page_number: usize,
    pub strategy: Strategy,
    pub page_width: f64,
    pub page_height: f64,
    pub candidates: usize,
    #[serde(flatten)]
    pub assignment: AssignmentMethod,
    pub slots: Vec<SlotRecord>,
}

impl LayoutManifest {
    pub fn new(page_number: usize, strategy: Strategy, page_size: (f64, f64),
               candidates: usize, assignment: &SlotAssignment) -> Self {
        let slots = assignment.entries().iter()
            .map(|(slot, region)| SlotRecord {
                slot: *slot,
                file: slot.file_name(),
                bbox: region.bbox().copied(),
                area: region.area(),
                provenance: *region.provenance(),
            })
            .collect();

        LayoutManifest {
            page_number,
            strategy,
            page_width: page_size.0,
            page_height: page_size.1,
            candidates,
            assignment: assignment.method(),
            slots,
        }
    }

    /// Write `layout.json` into a page directory
    pub fn write_to(&self, page_dir: &Path) -> PanelResult<()> {
        fs::write(page_dir.join(LAYOUT_FILE), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_successes() {
        let mut report = BatchReport::new(Strategy::Visual);
        report.push(PageOutcome {
            page_number: 1,
            status: PageStatus::Success,
            candidates: 5,
            assignment: Some(AssignmentMethod::Geometric),
            output_dir: None,
        });
        report.push(PageOutcome::failed(2, 2, FailureReason::InsufficientRegions { found: 2, required: 4 }));

        assert_eq!(report.total_pages, 2);
        assert_eq!(report.successful_pages, 1);
        assert!(report.page(2).is_some_and(|p| !p.is_success()));
        assert!(report.fallback_pages().is_empty());
    }

    #[test]
    fn serializes_failure_reason_inline() {
        let outcome = PageOutcome::failed(3, 1, FailureReason::InsufficientRegions { found: 1, required: 4 });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["page_number"], 3);
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"]["kind"], "insufficient_regions");
        assert_eq!(json["reason"]["found"], 1);
        assert!(json.get("output_dir").is_none());
    }

    #[test]
    fn writes_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = BatchReport::new(Strategy::Metadata);
        let path = report.write_to(dir.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["strategy"], "metadata");
        assert_eq!(json["total_pages"], 0);
    }
}
