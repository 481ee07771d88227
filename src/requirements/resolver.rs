//! Dependency resolution across the profile's requirement set.
//!
//! `resolve` is a pure function of current host state: it probes every
//! requirement and returns the absent subset, deduplicated by logical name
//! and sorted for deterministic operator-facing reporting. `install_missing`
//! drives the host package manager exactly once for the whole set.

use crate::error::{Result, SetupError};
use crate::profile::PackageRequirement;
use crate::requirements::manager::PackageManager;
use crate::requirements::probe::Prober;
use crate::shell::Privilege;

/// Probe every requirement and return those not present.
///
/// Duplicates collapse by logical name (first definition wins); the result
/// is sorted by name so repeated runs report the same missing set in the
/// same order.
pub fn resolve(prober: &Prober, requirements: &[PackageRequirement]) -> Vec<PackageRequirement> {
    let mut missing: Vec<PackageRequirement> = Vec::new();
    for requirement in requirements {
        if missing.iter().any(|r| r.name == requirement.name) {
            continue;
        }
        if !prober.probe(requirement) {
            tracing::debug!(requirement = %requirement.name, "requirement missing");
            missing.push(requirement.clone());
        }
    }
    missing.sort_by(|a, b| a.name.cmp(&b.name));
    missing
}

/// Install the missing set in one batched package-manager call.
///
/// A no-op success when the set is empty. Otherwise elevation is a hard
/// precondition, checked before the manager is touched. Batch failure is
/// fatal to the whole orchestration; there is no retry and no
/// partial-dependency continuation.
pub fn install_missing(
    manager: PackageManager,
    missing: &[PackageRequirement],
    privilege: &Privilege,
) -> Result<()> {
    if missing.is_empty() {
        tracing::debug!("all requirements satisfied, nothing to install");
        return Ok(());
    }

    if !privilege.is_elevated() {
        return Err(SetupError::Permission {
            message: format!(
                "installing system packages [{}] requires root or a validated sudo session",
                missing
                    .iter()
                    .map(|r| r.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        });
    }

    manager.install_batch(missing, privilege)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn fake_binary(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolve_returns_exactly_the_absent_subset() {
        let temp = TempDir::new().unwrap();
        fake_binary(temp.path(), "curl");
        fake_binary(temp.path(), "python3");

        let prober = Prober::new(vec![temp.path().to_path_buf()], None);
        let requirements = vec![
            PackageRequirement::command("curl"),
            PackageRequirement::command("jq"),
            PackageRequirement::command("python3"),
            PackageRequirement::command("pipx"),
        ];

        let missing = resolve(&prober, &requirements);
        let names: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["jq", "pipx"]);
    }

    #[test]
    fn resolve_sorts_missing_set_by_name() {
        let temp = TempDir::new().unwrap();
        let prober = Prober::new(vec![temp.path().to_path_buf()], None);
        let requirements = vec![
            PackageRequirement::command("zsh"),
            PackageRequirement::command("curl"),
            PackageRequirement::command("jq"),
        ];

        let missing = resolve(&prober, &requirements);
        let names: Vec<&str> = missing.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["curl", "jq", "zsh"]);
    }

    #[test]
    fn resolve_collapses_duplicates_by_logical_name() {
        let temp = TempDir::new().unwrap();
        let prober = Prober::new(vec![temp.path().to_path_buf()], None);
        let requirements = vec![
            PackageRequirement::command("jq"),
            PackageRequirement::command("jq"),
        ];

        let missing = resolve(&prober, &requirements);
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn resolve_has_no_memoization_across_calls() {
        let temp = TempDir::new().unwrap();
        let prober = Prober::new(vec![temp.path().to_path_buf()], None);
        let requirements = vec![PackageRequirement::command("jq")];

        assert_eq!(resolve(&prober, &requirements).len(), 1);

        // Host state changes between calls; the result must follow it.
        fake_binary(temp.path(), "jq");
        assert!(resolve(&prober, &requirements).is_empty());
    }

    #[test]
    fn install_missing_is_noop_success_when_empty() {
        let result = install_missing(PackageManager::Apt, &[], &Privilege::User);
        assert!(result.is_ok());
    }

    #[test]
    fn install_missing_fails_fast_without_elevation() {
        let missing = vec![PackageRequirement::command("jq")];
        let err = install_missing(PackageManager::Apt, &missing, &Privilege::User).unwrap_err();
        assert!(matches!(err, SetupError::Permission { .. }));
        assert!(err.to_string().contains("jq"));
    }
}
