use thiserror::Error;

use crate::source::types::SourceId;

/// Failures surfaced by the source workflow.
///
/// Token mismatches are deliberately not errors: the token-gated operations
/// return `Ok(false)` so callers can render a generic invalid-link notice
/// without learning why validation failed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying storage create/read/update failed
    #[error("storage operation failed")]
    Persistence(#[source] anyhow::Error),

    /// Explicit load of a record that does not exist
    #[error("no source record with id {id}")]
    NotFound { id: SourceId },

    /// Unknown token kind or moderation action reached the core. This is a
    /// programming error in the calling adapter, not a user-facing condition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
