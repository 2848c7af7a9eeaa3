//! # League Hub Test Suite
//!
//! Cross-crate tests. Per-crate unit tests live beside the code.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── http_flows.rs     # whole league lifecycle through the axum router
//!     ├── properties.rs     # the eight league properties, end to end
//!     └── client_sync.rs    # HTTP client + snapshot cache against a live server
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lg-tests
//! cargo test -p lg-tests integration::client_sync::
//! ```

pub mod integration;
