mod cli;
mod commands;
mod config;
mod logging;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::UserConfig;
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = UserConfig::load();
    let log_level_override = cli.log_level;
    config.merge_with_args(cli.root.clone(), cli.strict_thresholds, cli.refresh_ms());

    match cli.command {
        Some(Commands::Debug) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            commands::debug::run(&config)
        }
        Some(Commands::Config { path, reset }) => {
            let _guard = logging::init(config.log_level, LogMode::Stderr, log_level_override);
            commands::config::run(path, reset)
        }
        None => {
            // Watch mode logs to a file so nothing interleaves with the reports.
            let mode = if cli.watch {
                LogMode::File
            } else {
                LogMode::Stderr
            };
            let _guard = logging::init(config.log_level, mode, log_level_override);
            commands::hud::run(&config, cli.watch, cli.samples)
        }
    }
}
