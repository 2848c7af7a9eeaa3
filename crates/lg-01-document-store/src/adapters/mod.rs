//! # Adapters Module
//!
//! Implementations of the `DocumentStore` port.
//!
//! ## Modules
//!
//! - `memory`: in-process store with call accounting and fault injection
//! - `github`: repository file behind the GitHub contents API

#[cfg(feature = "github")]
pub mod github;
pub mod memory;

#[cfg(feature = "github")]
pub use github::{GitHubContentStore, GitHubStoreConfig};
pub use memory::InMemoryDocumentStore;
