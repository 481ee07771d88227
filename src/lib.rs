//! hhsetup - installer and uninstaller for the `hh` job-search CLI.
//!
//! hhsetup brings a host from any prior state (nothing installed, an old
//! version, a partial install) to a known-good state: one `hh` executable
//! patched with config loading and backend dispatch branches, one per-user
//! config file, and the `hhcli` backend package installed via its own
//! package tool. The reverse direction removes all of it cleanly.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and dispatch
//! - [`profile`] - The immutable setup profile (paths, markers, requirements)
//! - [`requirements`] - Environment probing and dependency resolution
//! - [`artifact`] - Remote artifact fetching, extraction, and patching
//! - [`cleanup`] - Best-effort removal of legacy-generation files
//! - [`runner`] - The install/uninstall state machines
//! - [`runlog`] - Timestamped per-run log files
//! - [`shell`] - Process execution and the privilege boundary
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use hhsetup::artifact::extract;
//! use hhsetup::profile::MarkerPair;
//!
//! let markers = MarkerPair::new("# BEGIN", "# END");
//! let text = "# BEGIN\nperiod=7\n# END\n";
//! let region = extract(text, &markers).unwrap();
//! assert_eq!(region, vec!["period=7"]);
//! ```

pub mod artifact;
pub mod cleanup;
pub mod cli;
pub mod error;
pub mod profile;
pub mod requirements;
pub mod runlog;
pub mod runner;
pub mod shell;

pub use error::{Result, SetupError};
