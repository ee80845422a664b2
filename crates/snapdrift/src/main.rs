// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapdrift - random photo and video discovery for Immich, over chat.
//!
//! This is the binary entry point for the Snapdrift bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snapdrift_config::SnapdriftConfig;

/// Snapdrift - random photo and video discovery for Immich, over chat.
#[derive(Parser, Debug)]
#[command(name = "snapdrift", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Check configuration, storage, and connectivity.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => snapdrift_config::load_and_validate_path(path),
        None => snapdrift_config::load_and_validate(),
    };
    let config: SnapdriftConfig = match loaded {
        Ok(config) => config,
        Err(errors) => {
            snapdrift_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        None => {
            println!("snapdrift: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("snapdrift: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_applies_to_subcommands() {
        let cli = Cli::try_parse_from(["snapdrift", "doctor", "--config", "/tmp/s.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doctor)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = snapdrift_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.bot.command_prefix, "/");
    }
}
