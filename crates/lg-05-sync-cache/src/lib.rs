//! # Client Sync Cache (lg-05)
//!
//! Client side of the league server: calls the gateway and keeps the last
//! document it saw, so a client can keep showing the league while the
//! server or its store is down.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Last Known Good | The snapshot only ever holds a document the server returned or accepted |
//! | 2 | Labelled | Every value served from the snapshot is marked `STALE` with its age |
//! | 3 | No Write-Back | The snapshot is never pushed to the server without an explicit call |
//! | 4 | Loud Writes | A failed write is always reported as not landed |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Snapshot, freshness labels, client errors
//! - `ports/` - `LeagueRemote` and `SnapshotStore`
//! - `adapters/` - HTTP client, file and in-memory snapshot stores
//! - `service` - `CachedLeagueClient`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FileSnapshotStore, MemorySnapshotStore};
#[cfg(feature = "http")]
pub use adapters::{HttpClientConfig, HttpLeagueClient};
pub use domain::*;
pub use ports::{LeagueRemote, SnapshotStore};
pub use service::{CachedLeagueClient, StandingsView};
