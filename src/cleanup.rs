//! Legacy cleanup from earlier tool generations.
//!
//! Every removal attempt is independent: failure to remove one legacy path
//! is reported but never aborts cleanup of the others. Leftover legacy
//! files are a hygiene concern, not a correctness blocker for the new
//! installation.

use crate::profile::SetupProfile;
use crate::requirements::Prober;
use crate::shell::{self, Privilege};
use std::path::{Path, PathBuf};

/// Result of one removal attempt.
#[derive(Debug, Clone)]
pub struct CleanupOutcome {
    pub path: PathBuf,
    /// Whether something existed and was removed.
    pub removed: bool,
    /// Removal failure, when the target existed but could not be removed.
    pub error: Option<String>,
}

/// Remove every known legacy path, best-effort.
///
/// The prober discovers which candidates actually exist; every candidate
/// is reported either way. The legacy config directory is a special case:
/// it is removed only while the new config file does not yet exist, so an
/// old config that might be manually migrated is never destroyed.
pub fn run(profile: &SetupProfile, prober: &Prober, privilege: &Privilege) -> Vec<CleanupOutcome> {
    let existing = prober.find_legacy_paths(profile);
    let mut outcomes: Vec<CleanupOutcome> = profile
        .legacy_paths
        .iter()
        .map(|path| {
            if existing.contains(path) {
                attempt_removal(path, privilege)
            } else {
                CleanupOutcome {
                    path: path.clone(),
                    removed: false,
                    error: None,
                }
            }
        })
        .collect();

    if profile.config_file.exists() {
        tracing::debug!(
            path = %profile.legacy_config_dir.display(),
            "keeping legacy config dir; new config already present"
        );
        outcomes.push(CleanupOutcome {
            path: profile.legacy_config_dir.clone(),
            removed: false,
            error: None,
        });
    } else {
        outcomes.push(attempt_removal(&profile.legacy_config_dir, privilege));
    }

    outcomes
}

fn attempt_removal(path: &Path, privilege: &Privilege) -> CleanupOutcome {
    match shell::remove_path(path, privilege) {
        Ok(removed) => {
            if removed {
                tracing::info!(path = %path.display(), "removed legacy path");
            }
            CleanupOutcome {
                path: path.to_path_buf(),
                removed,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove legacy path");
            CleanupOutcome {
                path: path.to_path_buf(),
                removed: false,
                error: Some(e.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn profile_in(temp: &TempDir) -> SetupProfile {
        let mut profile = SetupProfile::standard();
        profile.legacy_paths = vec![
            temp.path().join("usr-local-bin-hh-cli"),
            temp.path().join("home-bin-hh-cli"),
        ];
        profile.legacy_config_dir = temp.path().join("dot-hhcli");
        profile.config_dir = temp.path().join("config");
        profile.config_file = temp.path().join("config/hh.conf");
        profile
    }

    fn prober() -> Prober {
        Prober::new(vec![], None)
    }

    #[test]
    fn removes_existing_legacy_paths_and_reports_each() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        fs::write(&profile.legacy_paths[0], "old binary").unwrap();

        let outcomes = run(&profile, &prober(), &Privilege::User);

        // Two legacy paths plus the legacy config dir.
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].removed);
        assert!(!outcomes[1].removed);
        assert!(!profile.legacy_paths[0].exists());
    }

    #[test]
    fn removes_legacy_config_dir_when_new_config_absent() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        fs::create_dir_all(&profile.legacy_config_dir).unwrap();
        fs::write(profile.legacy_config_dir.join("old.conf"), "x").unwrap();

        let outcomes = run(&profile, &prober(), &Privilege::User);

        let config_outcome = outcomes.last().unwrap();
        assert!(config_outcome.removed);
        assert!(!profile.legacy_config_dir.exists());
    }

    #[test]
    fn keeps_legacy_config_dir_when_new_config_exists() {
        let temp = TempDir::new().unwrap();
        let profile = profile_in(&temp);
        fs::create_dir_all(&profile.legacy_config_dir).unwrap();
        fs::create_dir_all(&profile.config_dir).unwrap();
        fs::write(&profile.config_file, "migrated=1\n").unwrap();

        let outcomes = run(&profile, &prober(), &Privilege::User);

        let config_outcome = outcomes.last().unwrap();
        assert!(!config_outcome.removed);
        assert!(config_outcome.error.is_none());
        assert!(profile.legacy_config_dir.exists());
    }

    #[cfg(unix)]
    #[test]
    fn per_path_failure_does_not_abort_the_rest() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let mut profile = profile_in(&temp);

        // A path inside a read-only directory cannot be removed.
        let locked_dir = temp.path().join("locked");
        fs::create_dir_all(&locked_dir).unwrap();
        let stuck = locked_dir.join("hh-cli");
        fs::write(&stuck, "x").unwrap();
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o555)).unwrap();

        let removable = temp.path().join("removable");
        fs::write(&removable, "x").unwrap();
        profile.legacy_paths = vec![stuck.clone(), removable.clone()];

        let outcomes = run(&profile, &prober(), &Privilege::User);

        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(outcomes[0].error.is_some());
        assert!(outcomes[1].removed);
        assert!(!removable.exists());
    }
}
