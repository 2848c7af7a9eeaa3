//! Gateway domain: configuration and the error to HTTP mapping.

pub mod config;
pub mod error;

pub use config::{ConfigError, CorsConfig, GatewayConfig, HttpConfig, LimitsConfig, TimeoutConfig};
pub use error::{status_for, ApiError, ErrorBody, ErrorDetail};
