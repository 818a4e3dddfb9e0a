//! Common error types used across the workspace.
//!
//! Malformed configuration *data* is never an error here: a construct whose
//! identifier cannot be derived simply defines nothing. Errors are reserved
//! for collaborator failures (a file that cannot be read or parsed) and for
//! explicit identifier construction ([`EntityIdError`]).

/// Why a candidate string cannot become an [`EntityId`](crate::entity_id::EntityId).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityIdError {
    /// No `.` separating domain and object id.
    #[error("`{0}` is not of the form domain.object_id")]
    MissingDot(String),

    /// The domain is not a lowercase token.
    #[error("`{0}` is not a valid domain")]
    InvalidDomain(String),

    /// The object id reduced to nothing (e.g. a name made only of punctuation).
    #[error("no object id could be derived for domain `{domain}`")]
    EmptyObjectId { domain: String },

    /// The object id contains characters outside `[a-z0-9_]`.
    #[error("`{object_id}` is not a valid object id for domain `{domain}`")]
    InvalidObjectId { domain: String, object_id: String },
}

/// Top-level error crossing the port boundary.
#[derive(Debug, thiserror::Error)]
pub enum RefCheckError {
    /// An external collaborator (filesystem, parser) failed.
    #[error("configuration source error")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
