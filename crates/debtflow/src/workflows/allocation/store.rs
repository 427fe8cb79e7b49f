use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AgentAccount, AgentId, CaseId, DebtCase};

/// Mutation applied to one case when it is matched. Carries the implicit
/// precondition that the case is still allocatable at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseAssignmentUpdate {
    pub case_id: CaseId,
    pub assigned_agency: String,
    pub assigned_agent_id: AgentId,
    pub ai_score: f32,
    pub updated_at: DateTime<Utc>,
}

/// Kinds of records written to the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Assignment,
}

/// Append-only record for downstream display; never read back by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub agent_id: AgentId,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// Everything one allocation run writes: case updates paired one-to-one with
/// notifications, committed together or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationBatch {
    pub case_updates: Vec<CaseAssignmentUpdate>,
    pub notifications: Vec<Notification>,
}

impl AllocationBatch {
    pub fn is_empty(&self) -> bool {
        self.case_updates.is_empty() && self.notifications.is_empty()
    }
}

/// Error enumeration for store and directory failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("case {0} not found")]
    CaseNotFound(String),
    /// A targeted case was assigned by a concurrent run between the read
    /// snapshot and the commit. The whole batch must have been discarded.
    #[error("case {0} is no longer unassigned")]
    AssignmentConflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the external case collection.
///
/// `commit_allocation` is the single transaction boundary of a run: the
/// implementation must apply every update and append every notification
/// atomically, first verifying that each targeted case is still allocatable.
/// On any precondition failure or write error, nothing may be applied.
pub trait CaseStore: Send + Sync {
    fn unassigned_cases(&self) -> Result<Vec<DebtCase>, StoreError>;
    /// Cases with a recorded outcome (anything past `New`), used for scoring.
    fn case_history(&self) -> Result<Vec<DebtCase>, StoreError>;
    fn insert_cases(&self, cases: Vec<DebtCase>) -> Result<usize, StoreError>;
    fn commit_allocation(&self, batch: AllocationBatch) -> Result<(), StoreError>;
}

/// Read abstraction over the external agent directory.
pub trait AgentDirectory: Send + Sync {
    /// Accounts with `role == agent` and `status == active`.
    fn active_agents(&self) -> Result<Vec<AgentAccount>, StoreError>;
}
