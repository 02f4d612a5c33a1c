//! Page screening command

use std::path::PathBuf;
use clap::ArgMatches;
use log::info;

use crate::api::PanelKit;
use crate::commands::command_traits::Command;
use crate::commands::{config_from_args, input_arg};
use crate::errors::PanelResult;
use crate::screening::PageScreener;
use crate::utils::logger::Logger;

/// Command listing large-image counts per page
pub struct ScreenCommand<'a> {
    input_file: PathBuf,
    /// Where to write the PDF of qualifying pages, if requested
    filtered_output: Option<PathBuf>,
    kit: PanelKit,
    logger: &'a Logger,
}

impl<'a> ScreenCommand<'a> {
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PanelResult<Self> {
        let input_file = PathBuf::from(input_arg(args)?);
        let filtered_output = args.get_one::<String>("filtered-output").map(PathBuf::from);
        info!("Screening {} (filtered output: {:?})", input_file.display(), filtered_output);

        Ok(ScreenCommand {
            input_file,
            filtered_output,
            kit: PanelKit::new(config_from_args(args)?)?.with_progress(false),
            logger,
        })
    }
}

impl<'a> Command for ScreenCommand<'a> {
    fn execute(&self) -> PanelResult<()> {
        let infos = self.kit.screen(&self.input_file)?;

        println!("{:>6}  {:>6}  {:>6}  qualifies", "page", "images", "large");
        for info in &infos {
            println!("{:>6}  {:>6}  {:>6}  {}", info.page_number, info.image_count,
                     info.large_image_count, if info.qualifies { "yes" } else { "no" });
        }

        let qualifying = PageScreener::qualifying_pages(&infos);
        println!("{} of {} pages qualify", qualifying.len(), infos.len());

        if let Some(output) = &self.filtered_output {
            match self.kit.write_filtered(&self.input_file, output)? {
                Some(path) => println!("Filtered PDF written to {}", path.display()),
                None => println!("No qualifying pages, filtered PDF not written"),
            }
        }

        self.logger.write_line(&format!("Screened {}: {} of {} pages qualify",
                                        self.input_file.display(), qualifying.len(), infos.len()))?;
        Ok(())
    }
}
