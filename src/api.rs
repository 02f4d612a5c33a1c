use std::path::{Path, PathBuf};
use log::info;

use crate::comparison::{ComparisonReport, StrategySummary};
use crate::config::ExtractionConfig;
use crate::detector::{ExtractorStrategyFactory, Strategy};
use crate::errors::PanelResult;
use crate::extraction::{BatchReport, PanelExtractor, SlotWriter};
use crate::organizer::{OrganizationSummary, OutputOrganizer};
use crate::pdf::PdfDocument;
use crate::screening::{PageScreenInfo, PageScreener};

/// Main interface to the panelkit library
pub struct PanelKit {
    config: ExtractionConfig,
    show_progress: bool,
}

impl PanelKit {
    /// Create a new PanelKit instance
    ///
    /// # Arguments
    /// * `config` - Extraction settings, validated here
    ///
    /// # Returns
    /// A PanelKit instance or a configuration error
    pub fn new(config: ExtractionConfig) -> PanelResult<Self> {
        config.validate()?;
        Ok(PanelKit { config, show_progress: true })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Extract the four photos of every page of a PDF
    ///
    /// # Arguments
    /// * `pdf_path` - Report PDF
    /// * `output_dir` - Directory receiving `page_<n>` folders and the run report
    /// * `strategy` - Detection strategy
    ///
    /// # Returns
    /// The batch report, or an error when the PDF cannot be opened at all
    pub fn extract(&self, pdf_path: &Path, output_dir: &Path, strategy: Strategy) -> PanelResult<BatchReport> {
        self.extract_pages(pdf_path, output_dir, strategy, None)
    }

    /// Extract a selection of pages (0-based indices)
    pub fn extract_pages(&self, pdf_path: &Path, output_dir: &Path, strategy: Strategy,
                         pages: Option<&[usize]>) -> PanelResult<BatchReport> {
        let factory = ExtractorStrategyFactory::new(&self.config);
        let source = factory.create_source(strategy, pdf_path)?;
        let detector = factory.create_detector(strategy);

        let extractor = PanelExtractor::new(&self.config, strategy, SlotWriter::new(output_dir))
            .with_progress(self.show_progress);
        extractor.run(source.as_ref(), detector.as_ref(), pages)
    }

    /// Extract only the pages that pass screening
    pub fn extract_screened(&self, pdf_path: &Path, output_dir: &Path, strategy: Strategy) -> PanelResult<BatchReport> {
        let infos = self.screen(pdf_path)?;
        let pages = PageScreener::qualifying_pages(&infos);
        info!("{} of {} pages pass screening", pages.len(), infos.len());
        self.extract_pages(pdf_path, output_dir, strategy, Some(&pages))
    }

    /// Count large embedded images on every page
    pub fn screen(&self, pdf_path: &Path) -> PanelResult<Vec<PageScreenInfo>> {
        let doc = PdfDocument::load(pdf_path)?;
        Ok(PageScreener::new(&self.config).screen(&doc))
    }

    /// Write a copy of the PDF holding only the pages that pass screening
    ///
    /// # Returns
    /// The written path, or None when no page qualifies
    pub fn write_filtered(&self, pdf_path: &Path, output: &Path) -> PanelResult<Option<PathBuf>> {
        let doc = PdfDocument::load(pdf_path)?;
        let infos = PageScreener::new(&self.config).screen(&doc);
        PageScreener::write_filtered(&doc, &infos, output)
    }

    /// Run both strategies into `<output_dir>/metadata` and `<output_dir>/visual`
    pub fn compare(&self, pdf_path: &Path, output_dir: &Path) -> PanelResult<ComparisonReport> {
        let run = |strategy: Strategy| -> StrategySummary {
            let dir = output_dir.join(strategy.as_str());
            match self.extract(pdf_path, &dir, strategy) {
                Ok(report) => StrategySummary::from_run(&report, &dir),
                Err(e) => StrategySummary::failed(strategy, &dir, e.to_string()),
            }
        };

        let comparison = ComparisonReport::new(run(Strategy::Metadata), run(Strategy::Visual));
        comparison.write_to(output_dir)?;
        Ok(comparison)
    }

    /// Group classified page folders by activity
    pub fn organize(&self, source_dir: &Path, target_dir: &Path) -> PanelResult<OrganizationSummary> {
        OutputOrganizer::new(source_dir, target_dir).organize()
    }
}
