//! Process execution and the privilege boundary.
//!
//! All external programs (the host package manager, the backend package
//! tool, `sudo` itself) are invoked through [`run`], which captures output
//! and exit status. Privilege is resolved exactly once per run via
//! [`Privilege::acquire`]; declining the elevation prompt aborts before any
//! state-mutating step executes.

use crate::error::{Result, SetupError};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Execution duration.
    pub duration: Duration,
    /// Whether the command exited zero.
    pub success: bool,
}

/// How system-path writes are performed for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Privilege {
    /// Process runs as root; writes go direct.
    Root,
    /// A sudo session was validated at run start; privileged commands are
    /// prefixed with `sudo`.
    Sudo,
    /// Unprivileged. Sufficient when the profile's system paths are in fact
    /// user-writable (synthetic profiles, user-local prefixes).
    User,
}

impl Privilege {
    /// Resolve privilege for a run that will write to system paths.
    ///
    /// Root passes through; otherwise one interactive `sudo -v` validates a
    /// session for the rest of the run. The operator declining the prompt is
    /// the run's single cancellation point.
    pub fn acquire() -> Result<Self> {
        if effective_uid() == 0 {
            return Ok(Privilege::Root);
        }
        tracing::debug!("validating sudo session");
        let status = Command::new("sudo").arg("-v").status();
        match status {
            Ok(s) if s.success() => Ok(Privilege::Sudo),
            _ => Err(SetupError::Permission {
                message: "could not obtain elevated privileges (sudo validation failed)".into(),
            }),
        }
    }

    /// Whether system-package installation can proceed under this privilege.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Privilege::Root | Privilege::Sudo)
    }
}

#[cfg(unix)]
fn effective_uid() -> u32 {
    // SAFETY: geteuid has no failure modes and touches no memory.
    unsafe { libc::geteuid() }
}

#[cfg(not(unix))]
fn effective_uid() -> u32 {
    u32::MAX
}

/// Execute a command given as argv, prefixing `sudo` under [`Privilege::Sudo`].
///
/// Returns `Ok` with a failure result when the command runs but exits
/// non-zero; returns `Err` only when the command cannot be spawned.
pub fn run(argv: &[String], privilege: &Privilege) -> Result<CommandResult> {
    let Some((program, args)) = split_argv(argv, privilege) else {
        return Err(SetupError::CommandFailed {
            command: String::new(),
            code: None,
        });
    };

    let start = Instant::now();
    tracing::debug!(command = %argv.join(" "), "executing");

    let output = Command::new(&program)
        .args(&args)
        .output()
        .map_err(|_| SetupError::CommandFailed {
            command: argv.join(" "),
            code: None,
        })?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration: start.elapsed(),
        success: output.status.success(),
    })
}

fn split_argv(argv: &[String], privilege: &Privilege) -> Option<(String, Vec<String>)> {
    let first = argv.first()?;
    if *privilege == Privilege::Sudo {
        Some(("sudo".to_string(), argv.to_vec()))
    } else {
        Some((first.clone(), argv[1..].to_vec()))
    }
}

/// Remove a file or directory tree, reporting whether anything was there.
///
/// Under [`Privilege::Sudo`] removal shells out to `rm -rf` so system paths
/// can be cleared; otherwise the filesystem API is used directly and
/// permission errors surface to the caller.
pub fn remove_path(path: &Path, privilege: &Privilege) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if *privilege == Privilege::Sudo {
        let argv = vec![
            "rm".to_string(),
            "-rf".to_string(),
            path.to_string_lossy().to_string(),
        ];
        let result = run(&argv, privilege)?;
        if !result.success {
            return Err(SetupError::CommandFailed {
                command: format!("rm -rf {}", path.display()),
                code: result.exit_code,
            });
        }
    } else if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn run_captures_stdout() {
        let argv = vec!["echo".to_string(), "hello".to_string()];
        let result = run(&argv, &Privilege::User).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    fn run_reports_nonzero_exit_as_failure_result() {
        let argv = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];
        let result = run(&argv, &Privilege::User).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn run_errors_when_command_cannot_spawn() {
        let argv = vec!["hhsetup-definitely-not-a-binary".to_string()];
        let err = run(&argv, &Privilege::User).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
    }

    #[test]
    fn run_errors_on_empty_argv() {
        let err = run(&[], &Privilege::User).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
    }

    #[test]
    fn split_argv_prefixes_sudo_when_elevated_via_sudo() {
        let argv = vec!["apt-get".to_string(), "update".to_string()];
        let (program, args) = split_argv(&argv, &Privilege::Sudo).unwrap();
        assert_eq!(program, "sudo");
        assert_eq!(args, argv);
    }

    #[test]
    fn split_argv_runs_direct_as_root_or_user() {
        let argv = vec!["apt-get".to_string(), "update".to_string()];
        let (program, args) = split_argv(&argv, &Privilege::Root).unwrap();
        assert_eq!(program, "apt-get");
        assert_eq!(args, vec!["update".to_string()]);
    }

    #[test]
    fn remove_path_returns_false_for_absent_target() {
        let removed = remove_path(&PathBuf::from("/nonexistent/hhsetup-test"), &Privilege::User)
            .unwrap();
        assert!(!removed);
    }

    #[test]
    fn remove_path_removes_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("old-binary");
        fs::write(&file, "x").unwrap();

        let removed = remove_path(&file, &Privilege::User).unwrap();
        assert!(removed);
        assert!(!file.exists());
    }

    #[test]
    fn remove_path_removes_directory_tree() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("legacy-config");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file"), "x").unwrap();

        let removed = remove_path(&dir, &Privilege::User).unwrap();
        assert!(removed);
        assert!(!dir.exists());
    }

    #[test]
    fn privilege_elevation_flags() {
        assert!(Privilege::Root.is_elevated());
        assert!(Privilege::Sudo.is_elevated());
        assert!(!Privilege::User.is_elevated());
    }
}
