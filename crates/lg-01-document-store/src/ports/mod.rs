//! # Ports
//!
//! - `outbound`: the `DocumentStore` contract the rest of the system depends on.

pub mod outbound;

pub use outbound::{content_version, DocumentStore};
