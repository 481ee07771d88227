//! Environment probing for installed commands, packages, and legacy files.
//!
//! The prober is side-effect free: it answers presence questions and lists
//! legacy paths that still exist, but never removes or installs anything.
//! Search-path entries are injected at construction so tests can probe
//! against synthetic directories instead of the live system.

use crate::profile::{PackageRequirement, ProbeMethod, SetupProfile};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a command name by iterating over search-path entries.
///
/// Returns the first match that exists and is executable. Does NOT shell
/// out to `which`; its behavior varies across systems and it is sometimes
/// a shell builtin with inconsistent error handling.
pub fn find_on_path(command: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(command);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Query backend for installed-package checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageQuery {
    /// Debian-family `dpkg-query`.
    Dpkg,
    /// RPM-family `rpm -q`.
    Rpm,
}

impl PackageQuery {
    /// Whether the package database records `package` as installed.
    ///
    /// Returns `None` when the query tool itself cannot be spawned, in
    /// which case callers fall back to a command-presence check.
    pub fn is_installed(&self, package: &str) -> Option<bool> {
        let output = match self {
            PackageQuery::Dpkg => Command::new("dpkg-query")
                .args(["-W", "-f", "${Status}", package])
                .output(),
            PackageQuery::Rpm => Command::new("rpm").args(["-q", package]).output(),
        };

        match output {
            Ok(out) => Some(match self {
                PackageQuery::Dpkg => {
                    out.status.success()
                        && String::from_utf8_lossy(&out.stdout).contains("install ok installed")
                }
                PackageQuery::Rpm => out.status.success(),
            }),
            Err(_) => None,
        }
    }
}

/// Inspects the host for installed commands, packages, and legacy files.
#[derive(Debug, Clone)]
pub struct Prober {
    path_entries: Vec<PathBuf>,
    query: Option<PackageQuery>,
}

impl Prober {
    /// Prober over explicit search-path entries.
    pub fn new(path_entries: Vec<PathBuf>, query: Option<PackageQuery>) -> Self {
        Self {
            path_entries,
            query,
        }
    }

    /// Prober over the live process PATH.
    pub fn from_environment(query: Option<PackageQuery>) -> Self {
        Self::new(parse_system_path(), query)
    }

    /// Whether a requirement is already satisfied on this host.
    pub fn probe(&self, requirement: &PackageRequirement) -> bool {
        match &requirement.probe {
            ProbeMethod::Command(command) => self.find_command(command).is_some(),
            ProbeMethod::InstalledPackage(package) => {
                match self.query.as_ref().and_then(|q| q.is_installed(package)) {
                    Some(installed) => installed,
                    // No usable query backend: fall back to command presence
                    // under the requirement's logical name.
                    None => self.find_command(&requirement.name).is_some(),
                }
            }
        }
    }

    /// Resolve a command on this prober's search path.
    pub fn find_command(&self, command: &str) -> Option<PathBuf> {
        find_on_path(command, &self.path_entries)
    }

    /// Legacy paths from the profile's fixed candidate list that still exist,
    /// in list order. A separate cleanup pass performs the removal.
    pub fn find_legacy_paths(&self, profile: &SetupProfile) -> Vec<PathBuf> {
        profile
            .legacy_paths
            .iter()
            .filter(|p| p.exists())
            .cloned()
            .collect()
    }
}
