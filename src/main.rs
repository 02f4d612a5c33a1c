use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::{error, Level};

use panelkit::utils::logger::Logger;
use panelkit::commands::{CommandFactory, PanelkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("panelkit")
        .version("1.0")
        .about("Extract the before/during/after photos of maintenance report pages")
        .arg(
            Arg::new("input")
                .help("Input PDF, or a directory of page folders with --organize")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .help("Detection strategy (metadata or visual)")
                .value_name("STRATEGY")
                .default_value("visual")
                .required(false),
        )
        .arg(
            Arg::new("dpi")
                .long("dpi")
                .help("Rendering resolution for the visual strategy")
                .value_name("DPI")
                .required(false),
        )
        .arg(
            Arg::new("min-area")
                .long("min-area")
                .help("Minimum photo area as a fraction of the page area")
                .value_name("FRACTION")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("screen")
                .long("screen")
                .help("Count large images per page instead of extracting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("screen-first")
                .long("screen-first")
                .help("Only extract pages that pass screening")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("filtered-output")
                .long("filtered-output")
                .help("With --screen, write the qualifying pages to this PDF")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("compare")
                .long("compare")
                .help("Run both strategies and compare their output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("organize")
                .long("organize")
                .help("Group classified page folders by activity")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let logger = match Logger::new("panelkit-commands.log", Level::Info) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("panelkit.log", verbose) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = PanelkitCommandFactory::new();

    match factory.create_command(&matches, &logger) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
