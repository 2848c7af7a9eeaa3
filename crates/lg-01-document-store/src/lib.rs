//! # Document Store Adapter (lg-01)
//!
//! Wraps a remote content API as a single-document, versioned blob store.
//!
//! ## Contract
//!
//! | operation | success | failures |
//! |-----------|---------|----------|
//! | `fetch(path)` | content + version token | `NotFound`, `Transient`, `RateLimited` |
//! | `write(path, content, expected, description)` | new token + commit metadata | `VersionConflict`, `RateLimited`, `Transient` |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Optimistic Lock | A write naming a stale token never lands |
//! | 2 | Whole Replacement | Writes replace the full blob, never patch it |
//! | 3 | No Invention | An absent path is reported, never synthesised |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Store errors and value objects
//! - `ports/` - The `DocumentStore` trait
//! - `adapters/` - GitHub and in-memory backends

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryDocumentStore;
#[cfg(feature = "github")]
pub use adapters::{GitHubContentStore, GitHubStoreConfig};
pub use domain::{CommitMetadata, StoreError, StoredDocument, WriteReceipt};
pub use ports::{content_version, DocumentStore};
