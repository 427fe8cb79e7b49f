use crate::workflows::allocation::domain::{CaseStatus, CustomerSegment, DebtCase};

/// Heuristic risk score (0-99) for a freshly ingested case.
///
/// Hand-tuned linear rules, deliberately simple: older debt and larger
/// balances are harder to collect.
pub fn risk_score(amount: f64, days_overdue: u32) -> u8 {
    let mut score: u32 = 30;

    if days_overdue > 30 {
        score += 20;
    }
    if days_overdue > 60 {
        score += 20;
    }
    if days_overdue > 90 {
        score += 25;
    }

    if amount > 10_000.0 {
        score += 10;
    }

    score.min(99) as u8
}

/// Segment a case for worklist display and triage.
pub fn classify_segment(amount: f64, risk: u8) -> CustomerSegment {
    if amount < 500.0 {
        CustomerSegment::LowBalance
    } else if risk > 80 {
        CustomerSegment::HighPriority
    } else {
        CustomerSegment::Standard
    }
}

/// SLA breach flag: a case is at risk when it is stagnant (too many attempts
/// without resolution), approaching write-off age, or high value sitting
/// untouched for a month. Paid cases are never at risk.
pub fn sla_risk(case: &DebtCase) -> bool {
    if case.status == CaseStatus::Paid {
        return false;
    }

    let is_stagnant = case.notes.len() > 5;
    let is_old = case.days_overdue > 60;
    let is_high_value_at_risk = case.amount > 3_000.0 && case.days_overdue > 30;

    is_stagnant || is_old || is_high_value_at_risk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::allocation::domain::{CaseId, UNASSIGNED_AGENCY};
    use chrono::Utc;

    fn case(amount: f64, days_overdue: u32, status: CaseStatus, notes: usize) -> DebtCase {
        let now = Utc::now();
        DebtCase {
            id: CaseId("case-000001".to_string()),
            customer_name: "Dana Whitfield".to_string(),
            amount,
            days_overdue,
            risk_score: Some(risk_score(amount, days_overdue)),
            segment: classify_segment(amount, risk_score(amount, days_overdue)),
            status,
            assigned_agency: UNASSIGNED_AGENCY.to_string(),
            assigned_agent_id: None,
            ai_score: None,
            notes: (0..notes)
                .map(|i| crate::workflows::allocation::domain::Note {
                    author: "system".to_string(),
                    text: format!("attempt {i}"),
                    logged_at: now,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn risk_score_grows_with_age_and_amount() {
        assert_eq!(risk_score(100.0, 0), 30);
        assert_eq!(risk_score(100.0, 45), 50);
        assert_eq!(risk_score(100.0, 75), 70);
        assert_eq!(risk_score(100.0, 120), 95);
        assert_eq!(risk_score(15_000.0, 120), 99, "capped at 99");
    }

    #[test]
    fn segments_follow_amount_then_risk() {
        assert_eq!(classify_segment(250.0, 95), CustomerSegment::LowBalance);
        assert_eq!(classify_segment(2_000.0, 95), CustomerSegment::HighPriority);
        assert_eq!(classify_segment(2_000.0, 40), CustomerSegment::Standard);
    }

    #[test]
    fn paid_cases_are_never_sla_risky() {
        assert!(!sla_risk(&case(9_000.0, 200, CaseStatus::Paid, 10)));
    }

    #[test]
    fn sla_risk_triggers_on_any_criterion() {
        assert!(sla_risk(&case(100.0, 10, CaseStatus::New, 6)), "stagnant");
        assert!(sla_risk(&case(100.0, 61, CaseStatus::New, 0)), "old");
        assert!(
            sla_risk(&case(3_500.0, 31, CaseStatus::Assigned, 0)),
            "high value at risk"
        );
        assert!(!sla_risk(&case(100.0, 10, CaseStatus::New, 0)));
    }
}
