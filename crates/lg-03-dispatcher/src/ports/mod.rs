//! # Ports Layer
//!
//! - `inbound` - what the HTTP gateway drives

pub mod inbound;

pub use inbound::ActionHandler;
