//! Remote artifact handling: fetching, region extraction, and patching.
//!
//! Artifacts are opaque text files (the wrapper script and, optionally, a
//! config template) served from a fixed remote base URL. Their only
//! structure this crate relies on is fixed marker lines, which [`extract`]
//! and [`patch`] treat as positional anchors.

pub mod extract;
pub mod fetch;
pub mod patch;

pub use extract::extract;
pub use fetch::ArtifactFetcher;
