//! # Outbound Ports (Driven Ports)
//!
//! The persistence contract consumed by the action dispatcher.
//!
//! Production: `GitHubContentStore` (adapters/github.rs)
//! Testing: `InMemoryDocumentStore` (adapters/memory.rs)

use crate::domain::{StoreError, StoredDocument, WriteReceipt};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_types::VersionToken;

/// Path-addressed, versioned blob storage.
///
/// Writes are whole-document replacement. A caller must read the document,
/// modify it, and write it back under the token it read, or accept
/// `VersionConflict`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_tag(&self) -> &'static str;

    /// Read the document at `path` together with its version token.
    ///
    /// Fails with `NotFound` when nothing is stored there; the caller decides
    /// whether to initialise it.
    async fn fetch(&self, path: &str) -> Result<StoredDocument, StoreError>;

    /// Replace the document at `path`.
    ///
    /// - `expected = Some(token)`: commit only if the stored revision still
    ///   carries `token`, else `VersionConflict`.
    /// - `expected = None`: create-only; `VersionConflict` if the path
    ///   already holds a document.
    async fn write(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        description: &str,
    ) -> Result<WriteReceipt, StoreError>;
}

/// Content-addressed token for `content`: SHA-256 over a git-style blob
/// header followed by the bytes.
pub fn content_version(content: &[u8]) -> VersionToken {
    let mut hasher = Sha256::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    VersionToken::new(hex::encode(hasher.finalize()))
}
