//! Adapters: HTTP remote, file and memory snapshot stores.

pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;

pub use file::FileSnapshotStore;
#[cfg(feature = "http")]
pub use http::{HttpClientConfig, HttpLeagueClient};
pub use memory::MemorySnapshotStore;
