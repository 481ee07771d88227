//! Orchestration of install and uninstall runs.
//!
//! Both directions are strictly sequential state machines: each step runs
//! to completion before the next begins, and the first failure aborts the
//! whole run. The only best-effort step is legacy cleanup. Exactly one run
//! is expected at a time; no locking is implemented and concurrent
//! invocations are unsupported.
//!
//! Install sequence:
//! `Cleanup → DependencyCheck → DependencyInstall → BackendInstall →
//! ConfigSetup → CliInstall → Done`
//!
//! Uninstall sequence:
//! `RemoveExecutable → RemoveBackend → RemoveConfig → RemoveDataCache → Done`

mod install;
mod uninstall;

use crate::artifact::ArtifactFetcher;
use crate::error::Result;
use crate::profile::SetupProfile;
use crate::requirements::probe;
use crate::runlog::RunLog;
use crate::shell::Privilege;
use console::style;
use std::path::PathBuf;

/// States of the install direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    Cleanup,
    DependencyCheck,
    DependencyInstall,
    BackendInstall,
    ConfigSetup,
    CliInstall,
}

impl InstallStep {
    pub fn label(&self) -> &'static str {
        match self {
            InstallStep::Cleanup => "cleanup",
            InstallStep::DependencyCheck => "dependency-check",
            InstallStep::DependencyInstall => "dependency-install",
            InstallStep::BackendInstall => "backend-install",
            InstallStep::ConfigSetup => "config-setup",
            InstallStep::CliInstall => "cli-install",
        }
    }
}

/// States of the uninstall direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallStep {
    RemoveExecutable,
    RemoveBackend,
    RemoveConfig,
    RemoveDataCache,
}

impl UninstallStep {
    pub fn label(&self) -> &'static str {
        match self {
            UninstallStep::RemoveExecutable => "remove-executable",
            UninstallStep::RemoveBackend => "remove-backend",
            UninstallStep::RemoveConfig => "remove-config",
            UninstallStep::RemoveDataCache => "remove-data-cache",
        }
    }
}

/// Sequences the full install and uninstall state machines.
///
/// Owns the lifecycle of transient artifacts within one run; nothing is
/// retained between runs.
pub struct Orchestrator {
    profile: SetupProfile,
    privilege: Privilege,
    fetcher: ArtifactFetcher,
    search_path: Vec<PathBuf>,
    quiet: bool,
}

impl Orchestrator {
    /// Orchestrator over the live process PATH.
    pub fn new(profile: SetupProfile, privilege: Privilege) -> Result<Self> {
        let search_path = probe::parse_system_path();
        Self::with_search_path(profile, privilege, search_path)
    }

    /// Orchestrator probing an explicit search path, for tests.
    pub fn with_search_path(
        profile: SetupProfile,
        privilege: Privilege,
        search_path: Vec<PathBuf>,
    ) -> Result<Self> {
        let fetcher = ArtifactFetcher::new(profile.fetch_timeout)?;
        Ok(Self {
            profile,
            privilege,
            fetcher,
            search_path,
            quiet: false,
        })
    }

    /// Suppress per-step console lines (errors still print).
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn profile(&self) -> &SetupProfile {
        &self.profile
    }

    /// Run one step, recording its outcome before propagating any failure.
    fn run_step<T>(
        &self,
        log: &mut RunLog,
        name: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        if !self.quiet {
            println!("{} {}", style("→").cyan().bold(), name);
        }
        tracing::info!(step = name, "starting");
        match f() {
            Ok(value) => {
                log.record(name, "ok");
                Ok(value)
            }
            Err(e) => {
                log.record(name, &format!("failed: {e}"));
                eprintln!(
                    "{} step '{}' failed: {}",
                    style("✗").red().bold(),
                    name,
                    e
                );
                Err(e)
            }
        }
    }

    fn finish(&self, log: &mut RunLog, operation: &str) {
        log.record(operation, "complete");
        if !self.quiet {
            println!("{} {} complete", style("✓").green().bold(), operation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_step_labels_are_distinct() {
        let steps = [
            InstallStep::Cleanup,
            InstallStep::DependencyCheck,
            InstallStep::DependencyInstall,
            InstallStep::BackendInstall,
            InstallStep::ConfigSetup,
            InstallStep::CliInstall,
        ];
        let mut labels: Vec<&str> = steps.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), steps.len());
    }

    #[test]
    fn uninstall_step_labels_are_distinct() {
        let steps = [
            UninstallStep::RemoveExecutable,
            UninstallStep::RemoveBackend,
            UninstallStep::RemoveConfig,
            UninstallStep::RemoveDataCache,
        ];
        let mut labels: Vec<&str> = steps.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), steps.len());
    }
}
