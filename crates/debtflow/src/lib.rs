//! Case allocation engine for debt collection operations.
//!
//! The crate is organized around one synchronous workflow: matching a pool of
//! unassigned debt cases to active collection agents under fairness and
//! capacity constraints, then committing the result as a single atomic batch
//! of case updates and agent notifications.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
