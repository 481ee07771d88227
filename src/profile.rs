//! The immutable setup profile.
//!
//! Every ambient constant the installer relies on, from the dependency list,
//! legacy paths from earlier tool generations, remote artifact URLs, marker
//! strings, to the final filesystem layout, lives in one [`SetupProfile`]
//! value built once at startup and passed into each component. Components
//! never reach for globals, which keeps the resolver, cleanup pass, and
//! patcher testable against synthetic profiles rooted in temp directories.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// How to check whether a requirement is already satisfied on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeMethod {
    /// An executable of this name is resolvable on the search path.
    Command(String),
    /// The host package database records this package as installed.
    ///
    /// On hosts whose package manager offers no query tool, callers fall
    /// back to a command-presence check on the requirement's logical name.
    InstalledPackage(String),
}

/// A package the wrapper script needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequirement {
    /// Logical name, used for deduplication and operator-facing messages.
    pub name: String,
    /// How presence is detected.
    pub probe: ProbeMethod,
    /// Name to hand to the host package manager when installing.
    pub package: String,
}

impl PackageRequirement {
    /// Requirement detected by command presence, installed under the same name.
    pub fn command(name: &str) -> Self {
        Self {
            name: name.to_string(),
            probe: ProbeMethod::Command(name.to_string()),
            package: name.to_string(),
        }
    }

    /// Requirement detected by querying the host package database.
    pub fn installed_package(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            probe: ProbeMethod::InstalledPackage(package.to_string()),
            package: package.to_string(),
        }
    }
}

/// A pair of exact-match marker lines delimiting a region of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    /// Line that opens the region (excluded from the extracted text).
    pub begin: String,
    /// Line that closes the region (excluded from the extracted text).
    pub end: String,
}

impl MarkerPair {
    pub fn new(begin: &str, end: &str) -> Self {
        Self {
            begin: begin.to_string(),
            end: end.to_string(),
        }
    }
}

/// Positional anchor for a patch insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The first line exactly equal to this string.
    Line(String),
    /// The first line containing this substring. Used for targets that
    /// carry executable syntax beyond the marker itself, like the opening
    /// line of a shell `case` construct.
    Substring(String),
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Line(s) | Anchor::Substring(s) => write!(f, "{s}"),
        }
    }
}

/// Literal lines to insert immediately after an anchor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchDirective {
    pub anchor: Anchor,
    pub lines: Vec<String>,
}

impl PatchDirective {
    pub fn after_line(anchor: &str, lines: &[&str]) -> Self {
        Self {
            anchor: Anchor::Line(anchor.to_string()),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn after_substring(anchor: &str, lines: &[&str]) -> Self {
        Self {
            anchor: Anchor::Substring(anchor.to_string()),
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything the orchestrator needs to know about one installation target.
#[derive(Debug, Clone)]
pub struct SetupProfile {
    /// Packages the wrapper script needs, probed before install.
    pub requirements: Vec<PackageRequirement>,

    /// Obsolete file locations from earlier tool generations.
    pub legacy_paths: Vec<PathBuf>,
    /// Old config directory, removed only while the new config is absent.
    pub legacy_config_dir: PathBuf,

    /// URL of the wrapper script artifact.
    pub script_url: String,
    /// Optional separate config-template artifact. When absent, the config
    /// region is extracted from the script artifact itself.
    pub template_url: Option<String>,
    /// Timeout applied to every artifact fetch.
    pub fetch_timeout: Duration,

    /// Markers delimiting the default-config region inside the artifact.
    pub config_markers: MarkerPair,
    /// Guarded config-load injection, applied first.
    pub config_load: PatchDirective,
    /// Dispatch-branch injection, applied second.
    pub dispatch: PatchDirective,

    /// Final location of the wrapper executable.
    pub bin_path: PathBuf,
    /// Per-user config directory.
    pub config_dir: PathBuf,
    /// The config file itself; its existence short-circuits config setup.
    pub config_file: PathBuf,
    /// Per-user data/cache directories, created on install, removed on uninstall.
    pub data_dirs: Vec<PathBuf>,
    /// Directory receiving timestamped run logs.
    pub log_dir: PathBuf,

    /// Backend package name (opaque; installed via the tool below).
    pub backend_package: String,
    /// Command whose presence indicates the backend is installed.
    pub backend_command: String,
    /// Argv invoking the package-installation tool to install the backend.
    pub backend_install: Vec<String>,
    /// Argv invoking the package-installation tool to remove the backend.
    pub backend_uninstall: Vec<String>,
}

/// Base URL the versioned artifacts are served from.
const ARTIFACT_BASE_URL: &str = "https://raw.githubusercontent.com/hhcli/hh/main";

impl SetupProfile {
    /// The production profile for the `hh` wrapper around the `hhcli` backend.
    pub fn standard() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("hhcli");
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| home.join(".local/share"))
            .join("hhcli");
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| home.join(".cache"))
            .join("hhcli");
        let log_dir = dirs::state_dir()
            .unwrap_or_else(|| home.join(".local/state"))
            .join("hhcli")
            .join("logs");

        Self {
            requirements: vec![
                PackageRequirement::command("curl"),
                PackageRequirement::command("jq"),
                PackageRequirement::command("python3"),
                PackageRequirement::command("pipx"),
                PackageRequirement::installed_package("ca-certificates", "ca-certificates"),
            ],
            legacy_paths: vec![
                PathBuf::from("/usr/bin/hh-cli"),
                PathBuf::from("/usr/local/bin/hh-cli"),
                home.join("bin/hh-cli"),
                home.join(".local/bin/hh-cli"),
            ],
            legacy_config_dir: home.join(".hhcli"),
            script_url: format!("{ARTIFACT_BASE_URL}/hh.sh"),
            template_url: None,
            fetch_timeout: Duration::from_secs(30),
            config_markers: MarkerPair::new(
                "# ===== BEGIN DEFAULT CONFIG =====",
                "# ===== END DEFAULT CONFIG =====",
            ),
            config_load: PatchDirective::after_line(
                "# ----- settings -----",
                &[
                    r#"HH_CONFIG="${HH_CONFIG:-$HOME/.config/hhcli/hh.conf}""#,
                    r#"[ -f "$HH_CONFIG" ] && . "$HH_CONFIG""#,
                ],
            ),
            dispatch: PatchDirective::after_substring(
                r#"case "$1" in"#,
                &[
                    r#"    --auth) shift; exec hhcli --auth "$@" ;;"#,
                    r#"    --profile) shift; exec hhcli --profile "$@" ;;"#,
                    r#"    --sync) shift; exec hhcli --sync "$@" ;;"#,
                ],
            ),
            bin_path: PathBuf::from("/usr/local/bin/hh"),
            config_file: config_dir.join("hh.conf"),
            config_dir,
            data_dirs: vec![data_dir, cache_dir],
            log_dir,
            backend_package: "hhcli".to_string(),
            backend_command: "hhcli".to_string(),
            backend_install: vec!["pipx".into(), "install".into(), "hhcli".into()],
            backend_uninstall: vec!["pipx".into(), "uninstall".into(), "hhcli".into()],
        }
    }
}
