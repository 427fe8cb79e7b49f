//! Bulk case intake: enrich raw debt records with heuristic risk scores and
//! segmentation, then insert them as unassigned `New` cases.

pub mod risk;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::workflows::allocation::domain::{CaseId, CaseStatus, DebtCase, UNASSIGNED_AGENCY};
use crate::workflows::allocation::store::{CaseStore, StoreError};

/// Raw case payload as submitted by an upstream importer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDraft {
    pub customer_name: String,
    pub amount: f64,
    pub days_overdue: u32,
}

/// Error raised by the intake workflow.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("case {index} has a non-positive amount")]
    InvalidAmount { index: usize },
    #[error(transparent)]
    Store(#[from] StoreError),
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

/// Service scoring and persisting incoming case drafts.
pub struct IntakeService<S> {
    store: Arc<S>,
}

impl<S> IntakeService<S>
where
    S: CaseStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate, enrich, and insert a batch of drafts. The whole batch is
    /// rejected before any write when a draft carries a non-positive amount.
    pub fn ingest(&self, drafts: Vec<CaseDraft>) -> Result<usize, IntakeError> {
        for (index, draft) in drafts.iter().enumerate() {
            if !draft.amount.is_finite() || draft.amount <= 0.0 {
                return Err(IntakeError::InvalidAmount { index });
            }
        }

        let now = Utc::now();
        let cases: Vec<DebtCase> = drafts
            .into_iter()
            .map(|draft| {
                let risk = risk::risk_score(draft.amount, draft.days_overdue);
                DebtCase {
                    id: next_case_id(),
                    customer_name: draft.customer_name,
                    amount: draft.amount,
                    days_overdue: draft.days_overdue,
                    risk_score: Some(risk),
                    segment: risk::classify_segment(draft.amount, risk),
                    status: CaseStatus::New,
                    assigned_agency: UNASSIGNED_AGENCY.to_string(),
                    assigned_agent_id: None,
                    ai_score: None,
                    notes: Vec::new(),
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();

        let accepted = self.store.insert_cases(cases)?;
        info!(accepted, "ingested and scored case batch");
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::allocation::domain::CustomerSegment;
    use crate::workflows::allocation::store::AllocationBatch;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        inserted: Mutex<Vec<DebtCase>>,
    }

    impl CaseStore for RecordingStore {
        fn unassigned_cases(&self) -> Result<Vec<DebtCase>, StoreError> {
            Ok(Vec::new())
        }

        fn case_history(&self) -> Result<Vec<DebtCase>, StoreError> {
            Ok(Vec::new())
        }

        fn insert_cases(&self, cases: Vec<DebtCase>) -> Result<usize, StoreError> {
            let mut guard = self.inserted.lock().expect("store mutex poisoned");
            let count = cases.len();
            guard.extend(cases);
            Ok(count)
        }

        fn commit_allocation(&self, _batch: AllocationBatch) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn draft(name: &str, amount: f64, days_overdue: u32) -> CaseDraft {
        CaseDraft {
            customer_name: name.to_string(),
            amount,
            days_overdue,
        }
    }

    #[test]
    fn ingest_enriches_and_inserts_drafts() {
        let store = Arc::new(RecordingStore::default());
        let service = IntakeService::new(store.clone());

        let accepted = service
            .ingest(vec![
                draft("Priya Nair", 12_500.0, 95),
                draft("Tom Alvarez", 320.0, 12),
            ])
            .expect("batch accepted");
        assert_eq!(accepted, 2);

        let inserted = store.inserted.lock().expect("store mutex poisoned");
        assert_eq!(inserted.len(), 2);

        let high = &inserted[0];
        assert_eq!(high.status, CaseStatus::New);
        assert_eq!(high.assigned_agency, UNASSIGNED_AGENCY);
        assert_eq!(high.risk_score, Some(99));
        assert_eq!(high.segment, CustomerSegment::HighPriority);
        assert!(high.notes.is_empty());

        let low = &inserted[1];
        assert_eq!(low.risk_score, Some(30));
        assert_eq!(low.segment, CustomerSegment::LowBalance);
        assert_ne!(high.id, low.id, "store-assigned ids are unique");
    }

    #[test]
    fn ingest_rejects_non_positive_amounts_before_writing() {
        let store = Arc::new(RecordingStore::default());
        let service = IntakeService::new(store.clone());

        match service.ingest(vec![draft("ok", 100.0, 5), draft("bad", 0.0, 5)]) {
            Err(IntakeError::InvalidAmount { index: 1 }) => {}
            other => panic!("expected invalid amount at index 1, got {other:?}"),
        }

        assert!(
            store.inserted.lock().expect("store mutex poisoned").is_empty(),
            "no partial insert on validation failure"
        );
    }
}
