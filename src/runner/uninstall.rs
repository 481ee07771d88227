//! The uninstall direction of the state machine.

use super::{Orchestrator, UninstallStep};
use crate::error::{Result, SetupError};
use crate::requirements::Prober;
use crate::runlog::RunLog;
use crate::shell::{self, Privilege};

impl Orchestrator {
    /// Remove everything the install direction creates.
    ///
    /// Each step reports targets that are already absent and still
    /// succeeds, so a second uninstall on a clean host exits zero.
    pub fn uninstall(&self) -> Result<()> {
        let mut log = RunLog::create(&self.profile.log_dir, "uninstall");

        self.run_step(&mut log, UninstallStep::RemoveExecutable.label(), || {
            let removed = shell::remove_path(&self.profile.bin_path, &self.privilege)?;
            self.report_target(&self.profile.bin_path.display().to_string(), removed);
            Ok(())
        })?;

        self.run_step(&mut log, UninstallStep::RemoveBackend.label(), || {
            self.remove_backend()
        })?;

        self.run_step(&mut log, UninstallStep::RemoveConfig.label(), || {
            let removed = shell::remove_path(&self.profile.config_dir, &self.privilege)?;
            self.report_target(&self.profile.config_dir.display().to_string(), removed);
            Ok(())
        })?;

        self.run_step(&mut log, UninstallStep::RemoveDataCache.label(), || {
            for dir in &self.profile.data_dirs {
                let removed = shell::remove_path(dir, &self.privilege)?;
                self.report_target(&dir.display().to_string(), removed);
            }
            Ok(())
        })?;

        self.finish(&mut log, "uninstall");
        Ok(())
    }

    /// Remove the backend package via its package-installation tool.
    ///
    /// The backend is opaque; presence is judged by its command being
    /// resolvable on the search path. Absent means already uninstalled.
    fn remove_backend(&self) -> Result<()> {
        let prober = Prober::new(self.search_path.clone(), None);
        if prober.find_command(&self.profile.backend_command).is_none() {
            self.report_target(&self.profile.backend_package, false);
            return Ok(());
        }

        let result = shell::run(&self.profile.backend_uninstall, &Privilege::User)?;
        if !result.success {
            return Err(SetupError::CommandFailed {
                command: self.profile.backend_uninstall.join(" "),
                code: result.exit_code,
            });
        }
        self.report_target(&self.profile.backend_package, true);
        Ok(())
    }

    fn report_target(&self, subject: &str, removed: bool) {
        if removed {
            tracing::info!(subject, "removed");
        } else {
            tracing::info!(subject, "already absent");
        }
    }
}
