//! Command-line interface.

pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Gauntlet: a self-running persona elimination tournament.
#[derive(Parser, Debug)]
#[command(name = "gauntlet", version, about)]
pub struct Cli {
    /// Path to a config file (defaults to the gauntlet.yaml hierarchy)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tournament until completion or shutdown
    Run(commands::run::RunArgs),
    /// Summarize the persisted snapshot
    Status(commands::status::StatusArgs),
}

/// Load configuration from an explicit file or the default hierarchy.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_config() {
        let cli = Cli::parse_from(["gauntlet", "run", "--config", "custom.yaml"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.yaml")));
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_parse_status() {
        let cli = Cli::parse_from(["gauntlet", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }
}
