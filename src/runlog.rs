//! Timestamped per-run log files.
//!
//! Each orchestration run appends to a file named
//! `{operation}-{YYYYMMDD-HHMMSS}.log` under the profile's log directory.
//! Logging is strictly best-effort: a log that cannot be created or written
//! never aborts the run it describes.

use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only log for one orchestration run.
pub struct RunLog {
    file: Option<File>,
    path: Option<PathBuf>,
}

impl RunLog {
    /// Open a new run log named after the operation and the current time.
    ///
    /// On any failure the log is disabled (with a warning) rather than
    /// failing the run.
    pub fn create(log_dir: &Path, operation: &str) -> Self {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = log_dir.join(format!("{operation}-{stamp}.log"));

        let file = fs::create_dir_all(log_dir)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));

        match file {
            Ok(file) => Self {
                file: Some(file),
                path: Some(path),
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "run log disabled");
                Self {
                    file: None,
                    path: None,
                }
            }
        }
    }

    /// A disabled log that records nothing.
    pub fn disabled() -> Self {
        Self {
            file: None,
            path: None,
        }
    }

    /// Path of the log file, when one was created.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record a step and its outcome.
    pub fn record(&mut self, step: &str, outcome: &str) {
        self.line(&format!("{step}: {outcome}"));
    }

    /// Append one raw line.
    pub fn line(&mut self, text: &str) {
        if let Some(file) = self.file.as_mut() {
            let stamp = Local::now().format("%H:%M:%S");
            if writeln!(file, "[{stamp}] {text}").is_err() {
                tracing::warn!("run log write failed; disabling");
                self.file = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_file_named_by_operation_and_timestamp() {
        let temp = TempDir::new().unwrap();
        let log = RunLog::create(temp.path(), "install");

        let path = log.path().unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("install-"));
        assert!(name.ends_with(".log"));
        // install-YYYYMMDD-HHMMSS.log
        assert_eq!(name.len(), "install-".len() + 15 + ".log".len());
        assert!(path.exists());
    }

    #[test]
    fn records_steps_with_outcomes() {
        let temp = TempDir::new().unwrap();
        let mut log = RunLog::create(temp.path(), "uninstall");
        log.record("remove-executable", "ok");
        log.record("remove-backend", "already absent");

        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        assert!(content.contains("remove-executable: ok"));
        assert!(content.contains("remove-backend: already absent"));
    }

    #[test]
    fn creates_missing_log_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("state/hhcli/logs");
        let log = RunLog::create(&nested, "install");
        assert!(log.path().is_some());
        assert!(nested.exists());
    }

    #[test]
    fn disabled_log_accepts_writes_silently() {
        let mut log = RunLog::disabled();
        log.record("step", "ok");
        assert!(log.path().is_none());
    }
}
