//! # refcheck-domain
//!
//! Pure domain model for the refcheck entity-reference checker.
//!
//! ## Responsibilities
//! - Foundational types: entity identifiers and their grammars, error conventions
//! - Turn human-readable labels into object ids ([`slug::slugify`])
//! - Hold the **builtin catalog** (always-present entities, exempt domains)
//! - Define the **known-entity set** references are resolved against
//! - Define **references** (occurrences + location) and **diagnostics**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod slug;

pub mod builtin;
pub mod diagnostic;
pub mod entity_id;
pub mod known;
pub mod reference;
pub mod source;
