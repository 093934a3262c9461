// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grievance portal binary: the HTTP API and a terminal client for it.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod list;
mod portal;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use grievance_config::{ConfigError, GrievanceConfig};

/// Grievance portal.
#[derive(Parser, Debug)]
#[command(name = "grievance", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the grievance API server.
    Serve,
    /// Open the interactive grievance form.
    Portal {
        /// Device latitude to attach to submissions.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Device longitude to attach to submissions.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Print every grievance, newest first.
    List {
        /// Print raw JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate configuration, reporting every problem found.
    Check,
}

fn load(path: Option<&PathBuf>) -> Result<GrievanceConfig, Vec<ConfigError>> {
    match path {
        Some(path) => grievance_config::load_and_validate_path(path),
        None => grievance_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            grievance_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Portal { lat, lon }) => portal::run_portal(config, lat.zip(lon)).await,
        Some(Commands::List { json }) => list::run_list(config, json).await,
        Some(Commands::Config {
            action: ConfigCommands::Check,
        }) => {
            println!(
                "{} (mode {}, listening on {}:{})",
                "configuration ok".green(),
                config.server.mode,
                config.server.host,
                config.server.port
            );
            Ok(())
        }
        None => {
            println!("grievance: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn portal_location_needs_both_flags() {
        let cli = Cli::try_parse_from(["grievance", "portal", "--lat", "17.38", "--lon", "-78.48"])
            .unwrap();
        match cli.command {
            Some(Commands::Portal { lat, lon }) => {
                assert_eq!(lat.zip(lon), Some((17.38, -78.48)));
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["grievance", "portal", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["grievance", "list", "--config", "/tmp/g.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.toml")));
    }
}
