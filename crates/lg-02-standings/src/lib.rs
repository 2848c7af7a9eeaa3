//! # Standings (lg-02)
//!
//! Ranks teams from their stored counters and owns every edit that changes
//! those counters.
//!
//! ## Ordering
//!
//! Points descending, then goal difference descending, then the order the
//! teams appear in the document. The sort is stable, so two calls on the same
//! input always agree.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Counter Consistency | `played = W + D + L`, `points = 3W + D`, `GD = GF - GA` |
//! | 2 | Single Application | A match result advances counters exactly once |
//! | 3 | Goal Conservation | Sum of `goalsFor` equals goals in played matches |
//! | 4 | Unique Names | Team names never collide ignoring case |

pub mod domain;

pub use domain::*;
