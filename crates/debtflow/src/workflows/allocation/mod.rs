//! Case allocation: matching unassigned debt cases to active collection
//! agents under fairness and capacity constraints.
//!
//! Three stages collaborate inside one synchronous run. The scorer computes a
//! fitness score per agent from historical outcomes, the prioritizer ranks
//! the unassigned pool by urgency, and the matcher distributes ranked cases
//! over scored agents with a per-run fair-share quota and a hard capacity
//! ceiling. The run's output is one atomic batch of case updates paired with
//! agent notifications; either every write lands or none do.

pub mod config;
pub mod domain;
pub mod matcher;
pub mod prioritizer;
pub mod router;
pub mod scorer;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use config::AllocationConfig;
pub use domain::{
    AgentAccount, AgentId, AgentRole, AgentStatus, CaseId, CaseStatus, CustomerSegment, DebtCase,
    Note, UNASSIGNED_AGENCY,
};
pub use matcher::{Assignment, AllocationPlan};
pub use router::allocation_router;
pub use scorer::{AgentStats, ScoredAgent};
pub use service::{AllocationError, AllocationService, AllocationSummary};
pub use store::{
    AgentDirectory, AllocationBatch, CaseAssignmentUpdate, CaseStore, Notification,
    NotificationKind, StoreError,
};
