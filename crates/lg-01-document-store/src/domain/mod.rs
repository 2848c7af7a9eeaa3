//! # Domain Layer
//!
//! Value objects and errors of the document store.

pub mod errors;
pub mod entities;

pub use entities::{CommitMetadata, StoredDocument, WriteReceipt};
pub use errors::StoreError;
