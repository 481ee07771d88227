//! Command-line interface and dispatch.

mod args;

pub use args::{Cli, Commands};

use crate::error::Result;
use crate::profile::SetupProfile;
use crate::runner::Orchestrator;
use crate::shell::Privilege;

/// Dispatch the parsed CLI to an orchestration run.
///
/// `install` is the default when no subcommand is given. Privilege is
/// resolved once here, before any state-mutating step; the operator
/// declining the elevation prompt aborts the whole run.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let profile = SetupProfile::standard();

    match cli.command {
        None | Some(Commands::Install) => {
            let privilege = Privilege::acquire()?;
            Orchestrator::new(profile, privilege)?.quiet(cli.quiet).install()
        }
        Some(Commands::Uninstall) => {
            let privilege = Privilege::acquire()?;
            Orchestrator::new(profile, privilege)?.quiet(cli.quiet).uninstall()
        }
    }
}
