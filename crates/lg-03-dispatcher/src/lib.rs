//! # Action Dispatcher (lg-03)
//!
//! Maps a closed set of named actions onto document store operations, behind
//! a single shared-secret gate.
//!
//! ## Actions
//!
//! | action | secret | store calls |
//! |--------|--------|-------------|
//! | `get-data` | yes | fetch; create-only write when absent |
//! | `update-data` | yes | fetch token, write (or write under the caller's token) |
//! | `add-notification`, `mark-notifications-read` | yes | read-modify-write |
//! | `stats`, `standings` | yes | fetch |
//! | `health` | no | fetch (probe) |
//! | `backup` | yes | fetch, create-only write to a timestamped path |
//! | `clear-data`, league edits | yes | read-modify-write |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Gate First | A bad or missing secret makes zero store calls |
//! | 2 | All or Nothing | A failed action leaves the stored document intact |
//! | 3 | Bounded Retry | Conflicts re-read at most `conflict_retries` times |
//! | 4 | Bounded Calls | Every store call has a timeout |
//! | 5 | Newest First | Notifications are kept most recent first, capped |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Actions, payloads, replies, errors, notification log
//! - `ports/` - The `ActionHandler` inbound port
//! - `service` - `ActionDispatcher`

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::ActionHandler;
pub use service::ActionDispatcher;
