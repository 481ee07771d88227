//! Script patching: injecting dispatch code at marker positions.
//!
//! Patching is a two-phase contract. [`prepare`] locates and validates
//! every anchor against the unmodified script, failing loudly if any is
//! missing; [`PatchPlan::apply`] then inserts only at the validated
//! positions. The search and the mutation are never interleaved, so a
//! drifted artifact fails the run instead of producing a silently
//! unpatched executable.
//!
//! Insertion is positional and append-only: existing lines are never
//! rewritten or removed. Applying a plan to its own output inserts the
//! directives a second time; deduplication is not attempted.

use crate::error::{Result, SetupError};
use crate::profile::{Anchor, PatchDirective};
use crate::shell::{self, Privilege};
use std::fs;
use std::path::Path;

/// One validated insertion point.
#[derive(Debug)]
struct Insertion<'a> {
    /// Index of the anchor line; directive lines go immediately after it.
    after_line: usize,
    lines: &'a [String],
}

/// A set of validated insertions against one script text.
#[derive(Debug)]
pub struct PatchPlan<'a> {
    lines: Vec<&'a str>,
    had_trailing_newline: bool,
    insertions: Vec<Insertion<'a>>,
}

/// Locate every directive's anchor in the script.
///
/// Anchors are resolved against the unmodified text, in directive order.
/// Any missing anchor aborts with `AnchorNotFound` before anything is
/// mutated.
pub fn prepare<'a>(script: &'a str, directives: &'a [PatchDirective]) -> Result<PatchPlan<'a>> {
    let lines: Vec<&str> = script.lines().collect();
    let mut insertions = Vec::with_capacity(directives.len());

    for directive in directives {
        let position = match &directive.anchor {
            Anchor::Line(marker) => lines.iter().position(|line| *line == marker.as_str()),
            Anchor::Substring(marker) => {
                lines.iter().position(|line| line.contains(marker.as_str()))
            }
        };
        let after_line = position.ok_or_else(|| SetupError::AnchorNotFound {
            anchor: directive.anchor.to_string(),
        })?;
        insertions.push(Insertion {
            after_line,
            lines: &directive.lines,
        });
    }

    Ok(PatchPlan {
        lines,
        had_trailing_newline: script.ends_with('\n'),
        insertions,
    })
}

impl PatchPlan<'_> {
    /// Produce the patched text.
    pub fn apply(&self) -> String {
        let mut out: Vec<String> = self.lines.iter().map(|line| line.to_string()).collect();

        // Splice from the bottom up so earlier positions stay valid. For
        // insertions sharing an anchor, later directives go in first, which
        // leaves the final text in directive order.
        let mut order: Vec<usize> = (0..self.insertions.len()).collect();
        order.sort_by(|&a, &b| {
            let ia = &self.insertions[a];
            let ib = &self.insertions[b];
            (ib.after_line, b).cmp(&(ia.after_line, a))
        });

        for index in order {
            let insertion = &self.insertions[index];
            let at = insertion.after_line + 1;
            out.splice(at..at, insertion.lines.iter().cloned());
        }

        let mut text = out.join("\n");
        if self.had_trailing_newline {
            text.push('\n');
        }
        text
    }
}

/// Place patched script text at its final installation path.
///
/// The text is staged next to the destination (or in a temp directory when
/// the move itself must be privileged), given the executable bit, and moved
/// into place in one step. A failed move is a `Relocation` error and leaves
/// no partial file at the destination.
pub fn install_executable(text: &str, dest: &Path, privilege: &Privilege) -> Result<()> {
    let dir = dest.parent().ok_or_else(|| SetupError::Relocation {
        path: dest.to_path_buf(),
        message: "destination has no parent directory".into(),
    })?;
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());

    if *privilege == Privilege::Sudo {
        // The destination directory is not writable by this process; stage
        // in the temp dir and let sudo perform the move.
        let staging = std::env::temp_dir().join(format!(".{}.{}", name, std::process::id()));
        write_executable(&staging, text).map_err(|e| SetupError::Relocation {
            path: dest.to_path_buf(),
            message: format!("failed to stage {}: {e}", staging.display()),
        })?;
        let argv = vec![
            "mv".to_string(),
            "-f".to_string(),
            staging.to_string_lossy().to_string(),
            dest.to_string_lossy().to_string(),
        ];
        let moved = shell::run(&argv, privilege);
        match moved {
            Ok(result) if result.success => Ok(()),
            Ok(result) => {
                let _ = fs::remove_file(&staging);
                Err(SetupError::Relocation {
                    path: dest.to_path_buf(),
                    message: format!(
                        "privileged move failed (exit {:?}): {}",
                        result.exit_code,
                        result.stderr.trim()
                    ),
                })
            }
            Err(e) => {
                let _ = fs::remove_file(&staging);
                Err(SetupError::Relocation {
                    path: dest.to_path_buf(),
                    message: e.to_string(),
                })
            }
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| SetupError::Relocation {
            path: dest.to_path_buf(),
            message: format!("cannot create {}: {e}", dir.display()),
        })?;
        // Same directory as the destination, so the rename is atomic.
        let staging = dir.join(format!(".{}.tmp{}", name, std::process::id()));
        write_executable(&staging, text).map_err(|e| SetupError::Relocation {
            path: dest.to_path_buf(),
            message: format!("failed to stage {}: {e}", staging.display()),
        })?;
        fs::rename(&staging, dest).map_err(|e| {
            let _ = fs::remove_file(&staging);
            SetupError::Relocation {
                path: dest.to_path_buf(),
                message: e.to_string(),
            }
        })
    }
}

fn write_executable(path: &Path, text: &str) -> std::io::Result<()> {
    fs::write(path, text)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    Ok(())
}
