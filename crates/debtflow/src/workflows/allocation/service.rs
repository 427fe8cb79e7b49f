use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::config::AllocationConfig;
use super::matcher::{match_cases, Assignment};
use super::prioritizer::prioritize_cases;
use super::scorer::score_agents;
use super::store::{
    AgentDirectory, AllocationBatch, CaseAssignmentUpdate, CaseStore, Notification,
    NotificationKind, StoreError,
};

/// Service composing the scorer, prioritizer, and matcher over injected
/// store and directory clients.
pub struct AllocationService<S, D> {
    cases: Arc<S>,
    directory: Arc<D>,
    config: AllocationConfig,
    /// Serializes in-process runs; cross-process races are caught by the
    /// store's still-unassigned preconditions at commit time.
    run_lock: Mutex<()>,
}

/// Result of one allocation run, also the HTTP response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    pub assigned_count: usize,
    pub unmatched_count: usize,
    pub total_candidates: usize,
    /// Mean fitness score over the actual assignments; absent when nothing
    /// was assigned. Derived, never a placeholder figure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_assigned_score: Option<f32>,
    pub message: String,
}

impl AllocationSummary {
    fn no_work() -> Self {
        Self {
            assigned_count: 0,
            unmatched_count: 0,
            total_candidates: 0,
            mean_assigned_score: None,
            message: "No unassigned cases found.".to_string(),
        }
    }
}

/// Error raised by an allocation run.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("no active agents available for assignment")]
    NoEligibleAgents,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl<S, D> AllocationService<S, D>
where
    S: CaseStore + 'static,
    D: AgentDirectory + 'static,
{
    pub fn new(cases: Arc<S>, directory: Arc<D>, config: AllocationConfig) -> Self {
        Self {
            cases,
            directory,
            config,
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one allocation run: read the snapshots, score and rank, match,
    /// and commit the whole batch atomically. Safe to retry after any error;
    /// a re-run only ever touches cases that are still unassigned.
    pub fn run(&self) -> Result<AllocationSummary, AllocationError> {
        let _guard = self.run_lock.lock().expect("allocation run lock poisoned");

        let candidates: Vec<_> = self
            .cases
            .unassigned_cases()?
            .into_iter()
            .filter(|case| case.is_allocatable())
            .collect();

        if candidates.is_empty() {
            info!("allocation run found no unassigned cases");
            return Ok(AllocationSummary::no_work());
        }

        let roster: Vec<_> = self
            .directory
            .active_agents()?
            .into_iter()
            .filter(|agent| agent.is_eligible())
            .collect();

        if roster.is_empty() {
            warn!(
                candidates = candidates.len(),
                "allocation run aborted: no eligible agents"
            );
            return Err(AllocationError::NoEligibleAgents);
        }

        let history = self.cases.case_history()?;

        let mut scored = score_agents(&roster, &history, &self.config);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let ranked = prioritize_cases(candidates);
        let total_candidates = ranked.len();

        info!(
            cases = total_candidates,
            agents = scored.len(),
            "allocation run matching"
        );

        let plan = match_cases(&ranked, &mut scored, &self.config);

        let batch = build_batch(&plan.assignments);
        if !batch.is_empty() {
            self.cases.commit_allocation(batch)?;
        }

        let assigned_count = plan.assignments.len();
        let unmatched_count = plan.unmatched.len();
        if unmatched_count > 0 {
            warn!(
                unmatched = unmatched_count,
                fair_share = plan.fair_share,
                "partial allocation: some cases had no agent with quota or capacity"
            );
        }

        let mean_assigned_score = if assigned_count > 0 {
            let sum: f32 = plan
                .assignments
                .iter()
                .map(|assignment| assignment.match_score)
                .sum();
            Some(sum / assigned_count as f32)
        } else {
            None
        };

        Ok(AllocationSummary {
            assigned_count,
            unmatched_count,
            total_candidates,
            mean_assigned_score,
            message: format!(
                "Allocated {} cases to {} agents.",
                assigned_count,
                roster.len()
            ),
        })
    }
}

fn build_batch(assignments: &[Assignment]) -> AllocationBatch {
    let now = Utc::now();

    let case_updates = assignments
        .iter()
        .map(|assignment| CaseAssignmentUpdate {
            case_id: assignment.case_id.clone(),
            assigned_agency: assignment.agency_name.clone(),
            assigned_agent_id: assignment.agent_id.clone(),
            ai_score: assignment.match_score,
            updated_at: now,
        })
        .collect();

    let notifications = assignments
        .iter()
        .map(|assignment| {
            let risk = assignment
                .case_risk
                .map(|risk| risk.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            Notification {
                agent_id: assignment.agent_id.clone(),
                title: "New Case Assigned".to_string(),
                message: format!(
                    "You have been assigned a high-priority case. Risk Score: {}. Match Score: {:.0}%",
                    risk,
                    assignment.match_score * 100.0
                ),
                read: false,
                created_at: now,
                kind: NotificationKind::Assignment,
            }
        })
        .collect();

    AllocationBatch {
        case_updates,
        notifications,
    }
}
