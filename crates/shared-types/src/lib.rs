//! # Shared Types Crate
//!
//! This crate contains the league document and every entity nested inside
//! it, plus the codec that maps it to the stored JSON blob.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: one aggregate (`LeagueDocument`) holds all
//!   tournament state; there are no side tables.
//! - **Tolerant Reads**: every collection and counter defaults when absent so
//!   older stored documents still load.
//! - **Opaque Versions**: `VersionToken` is whatever the store says it is and
//!   is never parsed.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod time;

pub use codec::{decode_document, encode_document};
pub use entities::*;
pub use errors::*;
pub use time::{Clock, FixedClock, SystemClock};

/// Generate a fresh opaque identifier such as `team_3f2a9c…`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = generate_id("team");
        let b = generate_id("team");
        assert!(a.starts_with("team_"));
        assert_ne!(a, b);
    }
}
