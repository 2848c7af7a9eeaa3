//! # Domain Layer
//!
//! Snapshots, freshness labels and client errors.

pub mod errors;
pub mod freshness;
pub mod snapshot;

pub use errors::{ClientError, SyncError};
pub use freshness::{Freshness, Synced};
pub use snapshot::{PendingEdit, Snapshot};
