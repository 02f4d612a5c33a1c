//! CLI command implementations
//!
//! Each CLI mode is a Command; the factory picks one from the parsed flags.

pub mod command_traits;
pub mod extract_command;
pub mod screen_command;
pub mod compare_command;
pub mod organize_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use screen_command::ScreenCommand;
pub use compare_command::CompareCommand;
pub use organize_command::OrganizeCommand;

use clap::ArgMatches;
use log::info;

use crate::config::ExtractionConfig;
use crate::errors::{PanelError, PanelResult};
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct PanelkitCommandFactory;

impl PanelkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        PanelkitCommandFactory
    }
}

impl Default for PanelkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for PanelkitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> PanelResult<Box<dyn Command + 'a>> {
        if args.get_flag("organize") {
            Ok(Box::new(OrganizeCommand::new(args, logger)?))
        } else if args.get_flag("compare") {
            Ok(Box::new(CompareCommand::new(args, logger)?))
        } else if args.get_flag("screen") {
            Ok(Box::new(ScreenCommand::new(args, logger)?))
        } else {
            // Default to extraction
            Ok(Box::new(ExtractCommand::new(args, logger)?))
        }
    }
}

/// Input path argument
pub(crate) fn input_arg(args: &ArgMatches) -> PanelResult<String> {
    args.get_one::<String>("input")
        .cloned()
        .ok_or_else(|| PanelError::GenericError("Missing input path".to_string()))
}

/// Build the configuration from `--config`, then `--dpi` and `--min-area`
pub fn config_from_args(args: &ArgMatches) -> PanelResult<ExtractionConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => ExtractionConfig::from_file(path)?,
        None => ExtractionConfig::default(),
    };

    if let Some(dpi) = args.get_one::<String>("dpi") {
        let dpi = dpi.parse::<u32>()
            .map_err(|_| PanelError::ConfigError(format!("Invalid DPI: {}", dpi)))?;
        config = config.with_dpi(dpi);
    }

    if let Some(fraction) = args.get_one::<String>("min-area") {
        let fraction = fraction.parse::<f64>()
            .map_err(|_| PanelError::ConfigError(format!("Invalid minimum area fraction: {}", fraction)))?;
        config = config.with_min_area_fraction(fraction);
    }

    config.validate()?;
    info!("Configuration: dpi={}, min_area_fraction={}", config.dpi, config.min_area_fraction);
    Ok(config)
}
