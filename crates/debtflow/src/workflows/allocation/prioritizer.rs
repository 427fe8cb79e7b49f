use std::cmp::Reverse;

use super::domain::DebtCase;

/// Order allocatable cases most-urgent-first: descending risk score, with a
/// missing score ranked as 0. The sort is stable, so ties keep their fetch
/// order and identical snapshots always rank identically.
pub fn prioritize_cases(mut cases: Vec<DebtCase>) -> Vec<DebtCase> {
    cases.sort_by_key(|case| Reverse(case.risk_score.unwrap_or(0)));
    cases
}
