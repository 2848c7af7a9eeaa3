//! # Domain Layer
//!
//! Action registry, request and reply shapes, the notification log, the
//! secret gate and the closed error taxonomy.

pub mod actions;
pub mod config;
pub mod errors;
pub mod notifications;
pub mod replies;
pub mod requests;
pub mod security;

pub use actions::{supported_actions, Action, ActionInfo, ActionTier, ACTIONS};
pub use config::{DispatcherConfig, DispatcherConfigError};
pub use errors::DispatchError;
pub use notifications::{NotificationLog, DEFAULT_NOTIFICATION_CAP};
pub use replies::{ActionReply, DocumentStats, HealthReport};
pub use requests::*;
pub use security::{check_secret, constant_time_compare, SecretCheck};
