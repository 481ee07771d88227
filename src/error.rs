//! Error types for hhsetup operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SetupError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors
//! - All errors should name the step or resource that failed

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for hhsetup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No known host package manager was found on the search path.
    #[error("Unsupported platform: {message}")]
    UnsupportedPlatform { message: String },

    /// Privilege elevation was required but could not be obtained.
    #[error("Permission denied: {message}")]
    Permission { message: String },

    /// Remote artifact unreachable or served a non-success response.
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Marker-delimited region could not be extracted from an artifact.
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    /// A patch anchor was not found in the subject script.
    #[error("Patch anchor not found: {anchor}")]
    AnchorNotFound { anchor: String },

    /// Moving the patched executable into its final path failed.
    #[error("Failed to install {path}: {message}")]
    Relocation { path: PathBuf, message: String },

    /// The batched dependency install via the host package manager failed.
    #[error("Package manager failed: {message}")]
    PackageManager { message: String },

    /// An external command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for hhsetup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
