//! Tools shared by the `conform` proc-macro crates.
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro crate")]

// -----------------------------------------------------------------------------
// Modules

mod case;
mod manifest;

// -----------------------------------------------------------------------------
// Exports

pub use case::RenameRule;
pub use manifest::Manifest;
