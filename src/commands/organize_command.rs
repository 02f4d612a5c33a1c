//! Activity organization command

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::api::PanelKit;
use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, input_arg};
use crate::errors::PanelResult;
use crate::utils::logger::Logger;

/// Command grouping classified page folders by activity
pub struct OrganizeCommand<'a> {
    /// Directory of `page_<n>` folders
    source_dir: PathBuf,
    target_dir: PathBuf,
    kit: PanelKit,
    logger: &'a Logger,
}

impl<'a> OrganizeCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PanelResult<Self> {
        let source_dir = PathBuf::from(input_arg(args)?);
        let target_dir = PathBuf::from(args.get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or("organized"));
        info!("Organizing {} into {}", source_dir.display(), target_dir.display());

        Ok(OrganizeCommand {
            source_dir,
            target_dir,
            kit: PanelKit::new(config_from_args(args)?)?,
            logger,
        })
    }
}

impl<'a> Command for OrganizeCommand<'a> {
    fn execute(&self) -> PanelResult<()> {
        let summary = self.kit.organize(&self.source_dir, &self.target_dir)?;

        println!("Organized {} pages into {} activity folders ({} sets)",
                 summary.total_pages_processed,
                 summary.organization_stats.total_activity_folders,
                 summary.organization_stats.total_sets_organized);
        for (activity, count) in &summary.activities_found {
            println!("  {}: {}", activity, count);
        }

        self.logger.write_line(&format!("Organized {} pages from {}",
                                        summary.total_pages_processed, self.source_dir.display()))?;
        Ok(())
    }
}
