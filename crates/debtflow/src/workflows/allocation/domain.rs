use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for debt cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Identifier wrapper for collection agents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Sentinel agency label carried by cases no agency has picked up yet.
pub const UNASSIGNED_AGENCY: &str = "Unassigned";

/// Lifecycle of a debt case from ingestion through resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    New,
    Assigned,
    Contacted,
    #[serde(rename = "PTP")]
    Ptp,
    Paid,
    Dispute,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CaseStatus::New => "New",
            CaseStatus::Assigned => "Assigned",
            CaseStatus::Contacted => "Contacted",
            CaseStatus::Ptp => "PTP",
            CaseStatus::Paid => "Paid",
            CaseStatus::Dispute => "Dispute",
        }
    }

    /// Paid and disputed cases are closed for allocation accounting.
    pub const fn is_terminal(self) -> bool {
        matches!(self, CaseStatus::Paid | CaseStatus::Dispute)
    }

    /// Statuses that count toward an agent's concurrent active load.
    pub const fn counts_toward_load(self) -> bool {
        matches!(
            self,
            CaseStatus::Assigned | CaseStatus::Contacted | CaseStatus::Ptp
        )
    }
}

/// Workload segmentation stamped on a case at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerSegment {
    Standard,
    #[serde(rename = "High Priority")]
    HighPriority,
    #[serde(rename = "Low Balance")]
    LowBalance,
}

/// One interaction logged against a case (call, email, free-form note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub author: String,
    pub text: String,
    #[serde(rename = "date")]
    pub logged_at: DateTime<Utc>,
}

/// A unit of debt tracked through recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtCase {
    pub id: CaseId,
    pub customer_name: String,
    pub amount: f64,
    pub days_overdue: u32,
    /// 0-99, higher means harder to collect and more urgent. Absent for cases
    /// ingested before scoring was introduced; ranked as 0.
    pub risk_score: Option<u8>,
    pub segment: CustomerSegment,
    pub status: CaseStatus,
    pub assigned_agency: String,
    pub assigned_agent_id: Option<AgentId>,
    /// Fitness score of the matched agent, stamped at allocation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f32>,
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebtCase {
    /// A case may be allocated iff it is still new and no agency holds it.
    /// Assignment sets both fields together, so the two checks agree outside
    /// of a torn external write.
    pub fn is_allocatable(&self) -> bool {
        self.status == CaseStatus::New && self.assigned_agency == UNASSIGNED_AGENCY
    }
}

/// Directory roles; only `Agent` accounts receive cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Agent,
    Manager,
    Admin,
}

/// Directory account states; only `Active` accounts receive cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Pending,
    Suspended,
}

/// A human collector as the agent directory describes them. The allocator
/// only ever reads these records; per-run counters live in [`ScoredAgent`].
///
/// [`ScoredAgent`]: super::scorer::ScoredAgent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAccount {
    pub id: AgentId,
    pub agency_name: String,
    pub role: AgentRole,
    pub status: AgentStatus,
}

impl AgentAccount {
    pub fn is_eligible(&self) -> bool {
        self.role == AgentRole::Agent && self.status == AgentStatus::Active
    }
}
