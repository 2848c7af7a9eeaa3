use crate::domain::{CommitMetadata, StoreError, StoredDocument, WriteReceipt};
use crate::ports::outbound::{content_version, DocumentStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::VersionToken;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory document store for unit tests and local runs.
///
/// Enforces the same expected-version precondition as the remote backend,
/// counts every call, and can be told to fail upcoming calls.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: Mutex<HashMap<String, StoredDocument>>,
    injected_failures: Mutex<VecDeque<StoreError>>,
    fetch_calls: AtomicU64,
    write_calls: AtomicU64,
    commits: AtomicU64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `path` without counting it as a call.
    pub fn with_document(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let version = content_version(&content);
        self.documents
            .lock()
            .insert(path.to_string(), StoredDocument { content, version });
        self
    }

    /// Make the next store call (fetch or write) fail with `error`.
    /// Queued failures are consumed in order.
    pub fn fail_next(&self, error: StoreError) {
        self.injected_failures.lock().push_back(error);
    }

    /// Current content and version at `path`, bypassing call accounting.
    pub fn peek(&self, path: &str) -> Option<StoredDocument> {
        self.documents.lock().get(path).cloned()
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.documents.lock().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u64 {
        self.write_calls.load(Ordering::Relaxed)
    }

    /// Fetches plus writes.
    pub fn call_count(&self) -> u64 {
        self.fetch_count() + self.write_count()
    }

    fn take_injected(&self) -> Option<StoreError> {
        self.injected_failures.lock().pop_front()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, path: &str) -> Result<StoredDocument, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.take_injected() {
            return Err(err);
        }
        self.documents
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        expected: Option<&VersionToken>,
        description: &str,
    ) -> Result<WriteReceipt, StoreError> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = self.take_injected() {
            return Err(err);
        }

        let mut documents = self.documents.lock();
        let current = documents.get(path).map(|d| &d.version);
        match (current, expected) {
            (None, None) => {}
            (Some(stored), Some(expected)) if stored == expected => {}
            _ => {
                return Err(StoreError::VersionConflict {
                    path: path.to_string(),
                })
            }
        }

        let version = content_version(content);
        documents.insert(
            path.to_string(),
            StoredDocument {
                content: content.to_vec(),
                version: version.clone(),
            },
        );
        let commit_no = self.commits.fetch_add(1, Ordering::Relaxed) + 1;

        Ok(WriteReceipt {
            version,
            commit: CommitMetadata {
                sha: Some(format!("mem-{commit_no}")),
                message: description.to_string(),
                url: None,
            },
        })
    }
}
