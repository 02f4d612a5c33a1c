//! Side-by-side runs of both detection strategies

use std::path::{Path, PathBuf};
use log::{info, warn};
use serde::Serialize;

use crate::detector::Strategy;
use crate::errors::PanelResult;
use crate::extraction::BatchReport;

/// Report file written next to the per-strategy directories
pub const COMPARISON_FILE: &str = "comparison.json";

/// Dimensions of one extracted image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSize {
    pub file: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// What one strategy produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub output_dir: PathBuf,
    pub successful_pages: usize,
    pub png_count: usize,
    pub page_dirs: usize,
    pub image_sizes: Vec<ImageSize>,
    /// Set when the run could not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StrategySummary {
    /// Summarize a finished run from the files it reports writing
    ///
    /// Files left in the output directory by earlier runs are not counted.
    pub fn from_run(report: &BatchReport, output_dir: &Path) -> Self {
        let mut sizes = Vec::new();
        for path in report.pages.iter().flat_map(|outcome| outcome.slot_files()) {
            match image::image_dimensions(&path) {
                Ok((width, height)) => sizes.push(ImageSize {
                    file: path.strip_prefix(output_dir).map(Path::to_path_buf).unwrap_or(path),
                    width,
                    height,
                }),
                Err(e) => warn!("Cannot read {}: {}", path.display(), e),
            }
        }

        StrategySummary {
            strategy: report.strategy,
            output_dir: output_dir.to_path_buf(),
            successful_pages: report.successful_pages,
            png_count: sizes.len(),
            page_dirs: report.pages.iter().filter(|outcome| outcome.output_dir.is_some()).count(),
            image_sizes: sizes,
            error: None,
        }
    }

    /// Summary for a strategy whose run failed outright
    pub fn failed(strategy: Strategy, output_dir: &Path, message: String) -> Self {
        warn!("{} strategy failed: {}", strategy, message);
        StrategySummary {
            strategy,
            output_dir: output_dir.to_path_buf(),
            successful_pages: 0,
            png_count: 0,
            page_dirs: 0,
            image_sizes: Vec::new(),
            error: Some(message),
        }
    }
}

/// Both strategies on the same document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub metadata: StrategySummary,
    pub visual: StrategySummary,
    pub same_image_count: bool,
}

impl ComparisonReport {
    pub fn new(metadata: StrategySummary, visual: StrategySummary) -> Self {
        let same_image_count = metadata.png_count == visual.png_count;
        ComparisonReport { metadata, visual, same_image_count }
    }

    /// Write `comparison.json` into a directory
    pub fn write_to(&self, dir: &Path) -> PanelResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(COMPARISON_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Comparison written to {}", path.display());
        Ok(path)
    }

    /// Human readable summary for the console
    pub fn describe(&self) -> String {
        let mut text = String::from("Strategy comparison:\n");
        for summary in [&self.metadata, &self.visual] {
            text.push_str(&format!("  {}: ", summary.strategy));
            match &summary.error {
                Some(message) => text.push_str(&format!("failed ({})\n", message)),
                None => text.push_str(&format!("{} pages, {} images in {} page folders\n",
                                               summary.successful_pages, summary.png_count, summary.page_dirs)),
            }
        }
        text.push_str(&format!("  Same image count: {}\n", if self.same_image_count { "yes" } else { "no" }));
        text
    }
}
