//! # Error Types
//!
//! Errors raised while moving the league document to and from its stored
//! JSON form.

use thiserror::Error;

/// The stored bytes could not be turned into a `LeagueDocument`, or back.
#[derive(Debug, Error)]
pub enum DocumentCodecError {
    /// Stored content is not a valid league document.
    #[error("Malformed league document: {0}")]
    Decode(#[source] serde_json::Error),

    /// Document could not be serialized.
    #[error("Failed to encode league document: {0}")]
    Encode(#[source] serde_json::Error),
}
