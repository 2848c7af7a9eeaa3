//! Middleware stack for the gateway.
//!
//! Layer order (outermost first): CORS → Tracing → Timeout → body limit → handler.
//! CORS sits outside everything so preflight requests never reach the
//! dispatcher.

pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{GatewayMetrics, RequestTimer};
pub use timeout::TimeoutLayer;
pub use tracing::{record_action, TracingLayer};
