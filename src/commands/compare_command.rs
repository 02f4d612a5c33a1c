//! Strategy comparison command

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::api::PanelKit;
use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, input_arg};
use crate::errors::PanelResult;
use crate::utils::logger::Logger;

/// Command running both strategies on one PDF
pub struct CompareCommand<'a> {
    input_file: PathBuf,
    output_dir: PathBuf,
    kit: PanelKit,
    logger: &'a Logger,
}

impl<'a> CompareCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PanelResult<Self> {
        let input_file = PathBuf::from(input_arg(args)?);
        let output_dir = PathBuf::from(args.get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or("comparison"));
        info!("Comparing strategies on {} into {}", input_file.display(), output_dir.display());

        Ok(CompareCommand {
            input_file,
            output_dir,
            kit: PanelKit::new(config_from_args(args)?)?,
            logger,
        })
    }
}

impl<'a> Command for CompareCommand<'a> {
    fn execute(&self) -> PanelResult<()> {
        let comparison = self.kit.compare(&self.input_file, &self.output_dir)?;
        print!("{}", comparison.describe());

        self.logger.write_line(&format!("Compared strategies on {}: {} vs {} images",
                                        self.input_file.display(),
                                        comparison.metadata.png_count,
                                        comparison.visual.png_count))?;
        Ok(())
    }
}
