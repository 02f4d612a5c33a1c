//! Photo extraction command
//!
//! Runs the extraction pipeline over a report PDF and prints a per-run
//! summary, optionally restricted to pages that pass screening.

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::api::PanelKit;
use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, input_arg};
use crate::detector::Strategy;
use crate::errors::{PanelError, PanelResult};
use crate::extraction::{BatchReport, PageStatus};
use crate::utils::logger::Logger;

/// Command for extracting the four photos of each page
pub struct ExtractCommand<'a> {
    /// Path to the input PDF
    input_file: PathBuf,
    /// Directory receiving the page folders
    output_dir: PathBuf,
    strategy: Strategy,
    /// Only process pages that pass screening
    screen_first: bool,
    kit: PanelKit,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ExtractCommand<'a> {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ExtractCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PanelResult<Self> {
        let input_file = PathBuf::from(input_arg(args)?);
        info!("Input file: {}", input_file.display());

        let output_dir = PathBuf::from(args.get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or("output"));
        info!("Output directory: {}", output_dir.display());

        let strategy = args.get_one::<String>("strategy")
            .map(|s| s.parse::<Strategy>())
            .transpose()?
            .unwrap_or(Strategy::Visual);
        info!("Strategy: {}", strategy);

        let screen_first = args.get_flag("screen-first");
        let kit = PanelKit::new(config_from_args(args)?)?;

        Ok(ExtractCommand {
            input_file,
            output_dir,
            strategy,
            screen_first,
            kit,
            logger,
        })
    }

    fn print_report(&self, report: &BatchReport) {
        println!("Extraction with the {} strategy", report.strategy);
        println!("  Pages processed: {}", report.total_pages);
        println!("  Pages extracted: {}", report.successful_pages);

        for outcome in &report.pages {
            if let PageStatus::Failed { reason } = &outcome.status {
                println!("  Page {}: {}", outcome.page_number, reason);
            }
        }

        let fallback = report.fallback_pages();
        if !fallback.is_empty() {
            println!("  Order-based slot assignment on pages: {:?}", fallback);
        }
        println!("  Output: {}", self.output_dir.display());
    }
}

impl<'a> Command for ExtractCommand<'a> {
    fn execute(&self) -> PanelResult<()> {
        if !self.input_file.is_file() {
            return Err(PanelError::GenericError(format!(
                "Input PDF not found: {}", self.input_file.display())));
        }

        let report = if self.screen_first {
            self.kit.extract_screened(&self.input_file, &self.output_dir, self.strategy)?
        } else {
            self.kit.extract(&self.input_file, &self.output_dir, self.strategy)?
        };

        self.print_report(&report);
        self.logger.write_line(&format!("Extracted {}/{} pages from {}",
                                        report.successful_pages, report.total_pages,
                                        self.input_file.display()))?;
        Ok(())
    }
}
