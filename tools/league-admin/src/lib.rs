//! # League Admin
//!
//! Command-line client for a League Hub server.
//!
//! Reads (`pull`, `standings`) go through the local snapshot cache and
//! print a `[LIVE ...]` or `[STALE ...]` banner first. Writes either land
//! or fail with "the change did not land on the server"; a failed `import`
//! keeps the document as a pending edit that `import` with no file retries.

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Args, Command};
