//! Host requirement handling: probing, package-manager detection, and
//! dependency resolution.
//!
//! - [`probe`] answers "is this requirement already satisfied?" without
//!   side effects.
//! - [`manager`] identifies the host package manager and drives its
//!   batched update-then-install sequence.
//! - [`resolver`] combines the two: compute the missing set, then install
//!   it in one batch under elevated privilege.

pub mod manager;
pub mod probe;
pub mod resolver;

pub use manager::PackageManager;
pub use probe::Prober;
