//! # League API Gateway (lg-04)
//!
//! The HTTP face of the action dispatcher.
//!
//! ```text
//! client ──► CORS ──► Tracing ──► Timeout ──► body limit ──► route
//!                                                            │
//!                                              POST /api/update-data, POST /
//!                                                            │
//!                                                    ActionHandler::dispatch
//! ```
//!
//! ## Status mapping
//!
//! | error | status |
//! |-------|--------|
//! | `Unauthorized` | 401 |
//! | `MissingPayload`, `InvalidAction`, `InvalidPayload` | 400 |
//! | `NotFound` | 404 |
//! | `VersionConflict` | 409 |
//! | `RateLimited` | 429 (+ `Retry-After`) |
//! | `StoreUnavailable` | 502 (504 when the gateway deadline fires) |
//! | `ServerMisconfigured`, `Internal` | 500 |
//!
//! Success bodies are the dispatcher reply with `"success": true` merged in;
//! failures are `{"success": false, "error": {"kind", "message"}}`.
//!
//! ## Usage
//!
//! ```ignore
//! let handler: Arc<dyn ActionHandler> = Arc::new(dispatcher);
//! let mut gateway = GatewayService::new(GatewayConfig::default(), handler)?;
//! let stop = gateway.shutdown_handle();
//! gateway.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;

pub use domain::*;
pub use middleware::{GatewayMetrics, RequestTimer};
pub use router::{build_router, AppState, ACTION_PATH};
pub use service::{GatewayError, GatewayService};
