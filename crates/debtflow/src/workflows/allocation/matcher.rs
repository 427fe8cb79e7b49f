use super::config::AllocationConfig;
use super::domain::{AgentId, CaseId, DebtCase};
use super::scorer::ScoredAgent;

/// One matched (case, agent) pair produced by the matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub case_id: CaseId,
    pub agent_id: AgentId,
    pub agency_name: String,
    pub match_score: f32,
    pub case_risk: Option<u8>,
}

/// Outcome of one matching pass over the ranked case list.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub assignments: Vec<Assignment>,
    /// Cases no agent had quota or capacity for; they stay `New` and are
    /// picked up by the next run.
    pub unmatched: Vec<CaseId>,
    pub fair_share: u32,
}

/// Distribute ranked cases over scored agents.
///
/// `agents` must be sorted best-first and non-empty; `cases` most-urgent
/// first. Each agent receives at most `fair_share = ceil(cases / agents)`
/// cases this run and is skipped outright once its concurrent load reaches
/// the hard capacity.
///
/// The scan cursor stays parked on an agent while it keeps accepting, so the
/// best-scored agent takes the highest-risk cases until its fair share is
/// spent, and only then does the cursor rotate on. A case that survives a
/// full rotation without a taker is recorded as unmatched.
pub fn match_cases(
    cases: &[DebtCase],
    agents: &mut [ScoredAgent],
    config: &AllocationConfig,
) -> AllocationPlan {
    debug_assert!(!agents.is_empty(), "caller must reject an empty roster");

    let total_agents = agents.len();
    let fair_share = (cases.len() as u32).div_ceil(total_agents as u32);

    let mut assignments = Vec::with_capacity(cases.len());
    let mut unmatched = Vec::new();
    let mut cursor = 0usize;

    for case in cases {
        let mut attempts = 0usize;
        let mut assigned = false;

        while !assigned && attempts < total_agents {
            let agent = &mut agents[cursor];

            if agent.batch_assigned < fair_share && agent.current_load < config.hard_capacity {
                assignments.push(Assignment {
                    case_id: case.id.clone(),
                    agent_id: agent.id.clone(),
                    agency_name: agent.agency_name.clone(),
                    match_score: agent.score,
                    case_risk: case.risk_score,
                });
                agent.batch_assigned += 1;
                agent.current_load += 1;
                assigned = true;
            } else {
                cursor = (cursor + 1) % total_agents;
                attempts += 1;
            }
        }

        if !assigned {
            unmatched.push(case.id.clone());
        }
    }

    AllocationPlan {
        assignments,
        unmatched,
        fair_share,
    }
}
