//! # Inbound Ports (Driving Ports)
//!
//! The API the gateway calls. Implemented by `ActionDispatcher`; tests may
//! substitute their own.

use crate::domain::{ActionReply, ActionRequest, DispatchError, HealthReport};
use async_trait::async_trait;

#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Authorise and run one named action.
    async fn dispatch(&self, request: ActionRequest) -> Result<ActionReply, DispatchError>;

    /// Connectivity probe. Needs no secret and never fails.
    async fn health(&self) -> HealthReport;
}
