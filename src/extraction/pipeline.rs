//! Page-by-page extraction
//!
//! Each page runs detection, selection, assignment and persistence to
//! completion before the next page is loaded. Failures are recorded in the
//! batch report and never stop the run.

use log::{error, info, warn};

use crate::config::ExtractionConfig;
use crate::detector::{Page, RegionDetector, Strategy};
use crate::errors::PanelError;
use crate::layout::{RegionSelector, SlotAssigner};
use crate::pdf::PageSource;
use crate::utils::progress::ProgressTracker;

use super::persister::{SlotWriter, WriteFailure};
use super::report::{BatchReport, FailureReason, LayoutManifest, PageOutcome, PageStatus};

/// Runs the extraction pipeline over pages
pub struct PanelExtractor {
    strategy: Strategy,
    selector: RegionSelector,
    assigner: SlotAssigner,
    writer: SlotWriter,
    show_progress: bool,
}

impl PanelExtractor {
    /// Create an extractor writing below `writer`'s output directory
    pub fn new(config: &ExtractionConfig, strategy: Strategy, writer: SlotWriter) -> Self {
        PanelExtractor {
            strategy,
            selector: RegionSelector::new(config.expected_regions),
            assigner: SlotAssigner::new(),
            writer,
            show_progress: true,
        }
    }

    /// Enable or disable the progress bar
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Process one loaded page
    pub fn process_page(&self, page: &Page, detector: &dyn RegionDetector) -> PageOutcome {
        let number = page.number();

        let candidates = match detector.detect(page) {
            Ok(regions) => regions,
            Err(e) => {
                error!("Page {}: detection failed: {}", number, e);
                return PageOutcome::failed(number, 0, FailureReason::DetectionFailed {
                    message: e.to_string(),
                });
            }
        };
        let candidate_count = candidates.len();

        let selected = match self.selector.select(candidates) {
            Ok(selected) => selected,
            Err(PanelError::InsufficientRegions { found, required }) => {
                warn!("Page {}: only {} of {} regions found, skipping", number, found, required);
                return PageOutcome::failed(number, candidate_count,
                                           FailureReason::InsufficientRegions { found, required });
            }
            Err(e) => {
                error!("Page {}: selection failed: {}", number, e);
                return PageOutcome::failed(number, candidate_count, FailureReason::DetectionFailed {
                    message: e.to_string(),
                });
            }
        };

        let assignment = match self.assigner.assign(selected, page.height) {
            Ok(assignment) => assignment,
            Err(e) => {
                error!("Page {}: slot assignment failed: {}", number, e);
                return PageOutcome::failed(number, candidate_count, FailureReason::DetectionFailed {
                    message: e.to_string(),
                });
            }
        };

        let method = assignment.method();
        if method.is_fallback() {
            warn!("Page {}: layout is not a clean 2x2 grid, assigning by area order ({:?})", number, method);
        }

        let io_failure = |written: usize, e: PanelError| {
            error!("Page {}: extraction failed after {} images ({} candidates): {}",
                   number, written, candidate_count, e);
            FailureReason::ExtractionIo { written, message: e.to_string() }
        };

        let page_dir = match self.writer.prepare(number) {
            Ok(dir) => dir,
            Err(e) => return PageOutcome::failed(number, candidate_count, io_failure(0, e)),
        };

        let manifest = LayoutManifest::new(number, self.strategy, (page.width, page.height),
                                           candidate_count, &assignment);
        if let Err(e) = manifest.write_to(&page_dir) {
            warn!("Page {}: could not write layout manifest: {}", number, e);
        }

        let status = match self.writer.write(page, &assignment) {
            Ok(_) => PageStatus::Success,
            Err(WriteFailure { written, error }) => PageStatus::Failed { reason: io_failure(written, error) },
        };

        PageOutcome {
            page_number: number,
            status,
            candidates: candidate_count,
            assignment: Some(method),
            output_dir: Some(page_dir),
        }
    }

    /// Write the page text next to the slot images when the source has text
    fn save_text(&self, source: &dyn PageSource, index: usize, page_number: usize) {
        match source.page_text(index) {
            Ok(Some(text)) => {
                if let Err(e) = self.writer.write_text(page_number, &text) {
                    warn!("Page {}: could not write text: {}", page_number, e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Page {}: text extraction failed: {}", page_number, e),
        }
    }

    /// Process pages of a source
    ///
    /// # Arguments
    /// * `source` - Where pages come from
    /// * `detector` - Detector matching the source's page content
    /// * `pages` - 0-based page indices to process, or all pages when None
    ///
    /// # Returns
    /// The batch report, also written to the output directory
    pub fn run(&self, source: &dyn PageSource, detector: &dyn RegionDetector,
               pages: Option<&[usize]>) -> crate::errors::PanelResult<BatchReport> {
        let indices: Vec<usize> = match pages {
            Some(selection) => selection.to_vec(),
            None => (0..source.page_count()).collect(),
        };

        info!("Extracting {} pages with the {} detector", indices.len(), detector.name());

        let progress = if self.show_progress {
            ProgressTracker::new(indices.len() as u64, "Extracting photos")
        } else {
            ProgressTracker::hidden(indices.len() as u64)
        };

        let mut report = BatchReport::new(self.strategy);
        for index in indices {
            progress.set_message(&format!("Page {}", index + 1));

            let outcome = match source.load_page(index) {
                Ok(page) => self.process_page(&page, detector),
                Err(e) => {
                    error!("Page {}: could not be loaded: {}", index + 1, e);
                    PageOutcome::failed(index + 1, 0, FailureReason::LoadFailed { message: e.to_string() })
                }
            };
            // The page and its buffers are dropped here, before the next load

            if outcome.output_dir.is_some() {
                self.save_text(source, index, outcome.page_number);
            }

            report.push(outcome);
            progress.increment(1);
        }
        progress.finish();

        info!("Extraction complete: {}/{} pages succeeded", report.successful_pages, report.total_pages);
        report.write_to(self.writer.output_dir())?;
        Ok(report)
    }
}
