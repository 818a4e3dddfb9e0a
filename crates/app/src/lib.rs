//! # refcheck-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters must implement:
//!   - `ConfigSource`: parsed trees for each logical source, and for any file to check
//! - Derive the identifiers a configuration defines (`deriver`)
//! - Read authoritative identifiers from storage snapshots (`registry`)
//! - Find reference occurrences in arbitrary trees (`scanner`)
//! - Orchestrate the above and accumulate diagnostics (`validator`)
//!
//! ## Dependency rule
//! Depends on `refcheck-domain` only (plus `serde` for typed views of trees).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod deriver;
pub mod ports;
pub mod registry;
pub mod scanner;
pub mod validator;

#[cfg(test)]
mod fake;

pub use validator::ReferenceValidator;
