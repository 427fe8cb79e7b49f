use std::collections::HashMap;

use super::config::AllocationConfig;
use super::domain::{AgentAccount, AgentId, CaseStatus, DebtCase};

/// Per-agent aggregates derived from the historical case set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentStats {
    /// Cases ever assigned to the agent.
    pub total: u32,
    /// Cases the agent collected in full.
    pub paid: u32,
    /// Cases currently open against the agent.
    pub active: u32,
    /// Sum of risk scores over the agent's cases, for the difficulty proxy.
    pub risk_sum: u64,
}

/// Run-scoped working copy of an agent, carrying the computed fitness score
/// and the counters the matcher mutates. Directory records stay untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAgent {
    pub id: AgentId,
    pub agency_name: String,
    pub score: f32,
    pub current_load: u32,
    pub(crate) batch_assigned: u32,
}

/// Fold the historical case set into per-agent counters. Cases without an
/// assigned agent are skipped; they carry no outcome signal.
pub fn aggregate_history(history: &[DebtCase]) -> HashMap<AgentId, AgentStats> {
    let mut stats: HashMap<AgentId, AgentStats> = HashMap::new();

    for case in history {
        let Some(agent_id) = &case.assigned_agent_id else {
            continue;
        };

        let entry = stats.entry(agent_id.clone()).or_default();
        entry.total += 1;
        if case.status == CaseStatus::Paid {
            entry.paid += 1;
        }
        if case.status.counts_toward_load() {
            entry.active += 1;
        }
        entry.risk_sum += u64::from(case.risk_score.unwrap_or(0));
    }

    stats
}

/// Score every eligible agent, preserving the roster's original order.
///
/// The score estimates collection fitness in `[0.0, score_cap]`:
/// - success rate: paid over total handled, 0.0 with no history (the
///   new-agent boost covers genuinely new agents, so the default only shows
///   at the boundary of a short losing streak);
/// - speed: inverse of current active load against the hard capacity;
/// - difficulty: mean risk of handled cases, neutral without history.
///
/// Every input is a recorded aggregate, so two runs over the same snapshot
/// produce identical scores.
pub fn score_agents(
    roster: &[AgentAccount],
    history: &[DebtCase],
    config: &AllocationConfig,
) -> Vec<ScoredAgent> {
    let stats = aggregate_history(history);

    roster
        .iter()
        .map(|agent| {
            let stats = stats.get(&agent.id).copied().unwrap_or_default();
            ScoredAgent {
                id: agent.id.clone(),
                agency_name: agent.agency_name.clone(),
                score: fitness_score(&stats, config),
                current_load: stats.active,
                batch_assigned: 0,
            }
        })
        .collect()
}

fn fitness_score(stats: &AgentStats, config: &AllocationConfig) -> f32 {
    if stats.total < config.new_agent_threshold {
        return config.new_agent_boost.min(config.score_cap);
    }

    let success_rate = if stats.total > 0 {
        stats.paid as f32 / stats.total as f32
    } else {
        0.0
    };

    let load_ratio = (stats.active as f32 / config.hard_capacity as f32).min(1.0);
    let speed_factor = 1.0 - load_ratio;

    let difficulty_factor = if stats.total > 0 {
        (stats.risk_sum as f32 / stats.total as f32) / 100.0
    } else {
        config.neutral_factor
    };

    let blended = config.success_weight * success_rate
        + config.speed_weight * speed_factor
        + config.difficulty_weight * difficulty_factor;

    blended.min(config.score_cap)
}
