//! Host package manager detection and batched installation.
//!
//! Identification is a hard precondition: when no known manager binary is
//! on the search path, the run fails with `UnsupportedPlatform` before any
//! requirement probing happens. Installation is one update-then-install
//! sequence with the full missing set; there is no retry, since manager
//! failures (network, lock contention, unsatisfiable dependency) are not
//! safely auto-recoverable.

use crate::error::{Result, SetupError};
use crate::profile::PackageRequirement;
use crate::requirements::probe::{find_on_path, PackageQuery};
use crate::shell::{self, CommandResult, Privilege};
use std::path::PathBuf;

/// A supported host package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
    Pacman,
    Zypper,
}

/// Detection order. Apt before Dnf so Debian derivatives with rpm
/// compatibility shims resolve to their native manager.
const DETECTION_ORDER: &[PackageManager] = &[
    PackageManager::Apt,
    PackageManager::Dnf,
    PackageManager::Yum,
    PackageManager::Pacman,
    PackageManager::Zypper,
];

impl PackageManager {
    /// Identify the host package manager from the given search path.
    pub fn detect(path_entries: &[PathBuf]) -> Result<Self> {
        for manager in DETECTION_ORDER {
            if find_on_path(manager.binary(), path_entries).is_some() {
                tracing::debug!(manager = manager.binary(), "package manager detected");
                return Ok(*manager);
            }
        }
        Err(SetupError::UnsupportedPlatform {
            message: "no supported package manager found (looked for apt-get, dnf, yum, pacman, zypper)"
                .into(),
        })
    }

    /// The manager's driver binary.
    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt-get",
            PackageManager::Dnf => "dnf",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
        }
    }

    /// Installed-package query tool, where the manager family offers one.
    pub fn package_query(&self) -> Option<PackageQuery> {
        match self {
            PackageManager::Apt => Some(PackageQuery::Dpkg),
            PackageManager::Dnf | PackageManager::Yum | PackageManager::Zypper => {
                Some(PackageQuery::Rpm)
            }
            // pacman's query syntax is unsupported here; callers fall back
            // to command-presence probes.
            PackageManager::Pacman => None,
        }
    }

    /// Argv refreshing the package index.
    pub fn update_argv(&self) -> Vec<String> {
        let argv: &[&str] = match self {
            PackageManager::Apt => &["apt-get", "update", "-qq"],
            PackageManager::Dnf => &["dnf", "makecache", "-q"],
            PackageManager::Yum => &["yum", "makecache", "-q"],
            PackageManager::Pacman => &["pacman", "-Sy", "--noconfirm"],
            PackageManager::Zypper => &["zypper", "--non-interactive", "refresh"],
        };
        argv.iter().map(|s| s.to_string()).collect()
    }

    /// Argv installing the given packages in one batch.
    pub fn install_argv(&self, packages: &[String]) -> Vec<String> {
        let base: &[&str] = match self {
            PackageManager::Apt => &["apt-get", "install", "-y"],
            PackageManager::Dnf => &["dnf", "install", "-y"],
            PackageManager::Yum => &["yum", "install", "-y"],
            PackageManager::Pacman => &["pacman", "-S", "--noconfirm", "--needed"],
            PackageManager::Zypper => &["zypper", "--non-interactive", "install"],
        };
        base.iter()
            .map(|s| s.to_string())
            .chain(packages.iter().cloned())
            .collect()
    }

    /// Run the update-then-install sequence for the full missing set.
    ///
    /// Deliberately unbounded in time: package-manager invocations inherit
    /// no timeout, matching the interactive expectations of the underlying
    /// tools.
    pub fn install_batch(
        &self,
        missing: &[PackageRequirement],
        privilege: &Privilege,
    ) -> Result<()> {
        self.install_batch_with(missing, |argv| shell::run(argv, privilege))
    }

    /// Same sequence with an injected command runner, for tests.
    pub(crate) fn install_batch_with(
        &self,
        missing: &[PackageRequirement],
        mut run: impl FnMut(&[String]) -> Result<CommandResult>,
    ) -> Result<()> {
        let packages: Vec<String> = missing.iter().map(|r| r.package.clone()).collect();

        let update = run(&self.update_argv())?;
        if !update.success {
            return Err(SetupError::PackageManager {
                message: format!(
                    "{} index update failed (exit {:?}): {}",
                    self.binary(),
                    update.exit_code,
                    update.stderr.trim()
                ),
            });
        }

        let install = run(&self.install_argv(&packages))?;
        if !install.success {
            return Err(SetupError::PackageManager {
                message: format!(
                    "{} install of [{}] failed (exit {:?}): {}",
                    self.binary(),
                    packages.join(", "),
                    install.exit_code,
                    install.stderr.trim()
                ),
            });
        }

        tracing::info!(packages = %packages.join(", "), "dependencies installed");
        Ok(())
    }
}
