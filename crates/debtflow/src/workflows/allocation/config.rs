use serde::{Deserialize, Serialize};

/// Tuning knobs for agent scoring and the matching loop.
///
/// The weights blend three signals into one fitness score per agent; they are
/// expected to sum to 1.0. `score_cap` keeps the result strictly below 1.0 so
/// a perfect record never reads as certainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub success_weight: f32,
    pub speed_weight: f32,
    pub difficulty_weight: f32,
    /// Agents with fewer historical cases than this are given the boost score
    /// so a missing track record does not starve them of work.
    pub new_agent_threshold: u32,
    pub new_agent_boost: f32,
    /// Stand-in difficulty signal for agents with no resolved history.
    pub neutral_factor: f32,
    pub score_cap: f32,
    /// Absolute ceiling on an agent's concurrent active case count.
    pub hard_capacity: u32,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            success_weight: 0.4,
            speed_weight: 0.3,
            difficulty_weight: 0.3,
            new_agent_threshold: 5,
            new_agent_boost: 0.85,
            neutral_factor: 0.5,
            score_cap: 0.99,
            hard_capacity: 20,
        }
    }
}

impl AllocationConfig {
    /// Default tuning with an operator-supplied capacity ceiling.
    pub fn with_hard_capacity(hard_capacity: u32) -> Self {
        Self {
            hard_capacity,
            ..Self::default()
        }
    }
}
