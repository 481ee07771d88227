//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// hhsetup - installer for the hh job-search CLI.
#[derive(Debug, Parser)]
#[command(name = "hhsetup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the hh executable, its config, and the backend package
    /// (default if no command specified)
    Install,

    /// Remove the executable, backend package, config, and data directories
    Uninstall,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses_as_none() {
        let cli = Cli::parse_from(["hhsetup"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn install_and_uninstall_parse() {
        let cli = Cli::parse_from(["hhsetup", "install"]);
        assert!(matches!(cli.command, Some(Commands::Install)));

        let cli = Cli::parse_from(["hhsetup", "uninstall", "--debug"]);
        assert!(matches!(cli.command, Some(Commands::Uninstall)));
        assert!(cli.debug);
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let result = Cli::try_parse_from(["hhsetup", "reinstall"]);
        assert!(result.is_err());
    }
}
