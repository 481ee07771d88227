//! The install direction of the state machine.

use super::{InstallStep, Orchestrator};
use crate::artifact::{extract, patch};
use crate::cleanup;
use crate::error::{Result, SetupError};
use crate::requirements::{resolver, PackageManager, Prober};
use crate::runlog::RunLog;
use crate::shell::{self, Privilege};
use std::fs;

impl Orchestrator {
    /// Bring the host to the fully-installed state.
    ///
    /// Fail-fast: the first failing step aborts the run, except legacy
    /// cleanup which is best-effort by design.
    pub fn install(&self) -> Result<()> {
        let mut log = RunLog::create(&self.profile.log_dir, "install");

        // Cleanup is best effort and never fails the run.
        let outcomes = self.run_step(&mut log, InstallStep::Cleanup.label(), || {
            let prober = Prober::new(self.search_path.clone(), None);
            Ok(cleanup::run(&self.profile, &prober, &self.privilege))
        })?;
        for outcome in outcomes {
            let status = match (&outcome.error, outcome.removed) {
                (Some(e), _) => format!("failed: {e}"),
                (None, true) => "removed".to_string(),
                (None, false) => "absent or kept".to_string(),
            };
            log.line(&format!("  {}: {}", outcome.path.display(), status));
        }

        // Manager identification is a hard precondition, checked before
        // any probing.
        let (manager, missing) =
            self.run_step(&mut log, InstallStep::DependencyCheck.label(), || {
                let manager = PackageManager::detect(&self.search_path)?;
                let prober = Prober::new(self.search_path.clone(), manager.package_query());
                let missing = resolver::resolve(&prober, &self.profile.requirements);
                if !missing.is_empty() {
                    let names: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
                    tracing::info!(missing = %names.join(", "), "dependencies to install");
                }
                Ok((manager, missing))
            })?;

        for requirement in &missing {
            log.line(&format!("  missing: {}", requirement.name));
        }

        // One batch call, no retry.
        self.run_step(&mut log, InstallStep::DependencyInstall.label(), || {
            resolver::install_missing(manager, &missing, &self.privilege)
        })?;

        // The backend package tool is per-user; it runs unprivileged even
        // when the rest of the run is elevated.
        self.run_step(&mut log, InstallStep::BackendInstall.label(), || {
            let result = shell::run(&self.profile.backend_install, &Privilege::User)?;
            if !result.success {
                return Err(SetupError::CommandFailed {
                    command: self.profile.backend_install.join(" "),
                    code: result.exit_code,
                });
            }
            Ok(())
        })?;

        // ConfigSetup is idempotent: an existing config file is left
        // byte-for-byte untouched, protecting user edits across reinstalls.
        self.run_step(&mut log, InstallStep::ConfigSetup.label(), || {
            self.config_setup()
        })?;

        // Fetch, patch, and atomically place the executable.
        self.run_step(&mut log, InstallStep::CliInstall.label(), || {
            self.cli_install()
        })?;

        self.finish(&mut log, "install");
        Ok(())
    }

    fn config_setup(&self) -> Result<()> {
        if self.profile.config_file.exists() {
            tracing::info!(
                path = %self.profile.config_file.display(),
                "config already present, leaving untouched"
            );
            return Ok(());
        }

        let url = self
            .profile
            .template_url
            .as_deref()
            .unwrap_or(&self.profile.script_url);
        let source = self.fetcher.fetch(url)?;
        let region = extract(&source, &self.profile.config_markers)?;

        fs::create_dir_all(&self.profile.config_dir)?;
        let mut content = region.join("\n");
        content.push('\n');
        fs::write(&self.profile.config_file, content)?;
        tracing::info!(path = %self.profile.config_file.display(), "config written");
        Ok(())
    }

    fn cli_install(&self) -> Result<()> {
        let script = self.fetcher.fetch(&self.profile.script_url)?;

        // Config-load injection first, dispatch injection second; both
        // anchors are validated before any mutation.
        let directives = [
            self.profile.config_load.clone(),
            self.profile.dispatch.clone(),
        ];
        let plan = patch::prepare(&script, &directives)?;
        let patched = plan.apply();

        for dir in &self.profile.data_dirs {
            fs::create_dir_all(dir)?;
        }

        patch::install_executable(&patched, &self.profile.bin_path, &self.privilege)?;
        tracing::info!(path = %self.profile.bin_path.display(), "executable installed");
        Ok(())
    }
}
