use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use debtflow::workflows::allocation::{
    AgentAccount, AllocationBatch, AgentDirectory, CaseId, CaseStatus, CaseStore, DebtCase,
    Notification, StoreError,
};
use debtflow::workflows::intake::IntakeService;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Handle threaded to the intake route as a request extension.
#[derive(Clone)]
pub(crate) struct IntakeHandle(pub(crate) Arc<IntakeService<InMemoryCaseStore>>);

/// Reference case store backing the service binary. Ordered by case id so
/// fetch order, and therefore tie-breaking, is stable across runs.
#[derive(Default)]
pub(crate) struct InMemoryCaseStore {
    cases: Mutex<BTreeMap<CaseId, DebtCase>>,
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryCaseStore {
    pub(crate) fn seed(&self, cases: Vec<DebtCase>) {
        let mut guard = self.cases.lock().expect("case store mutex poisoned");
        for case in cases {
            guard.insert(case.id.clone(), case);
        }
    }

    pub(crate) fn all_cases(&self) -> Vec<DebtCase> {
        self.cases
            .lock()
            .expect("case store mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl CaseStore for InMemoryCaseStore {
    fn unassigned_cases(&self) -> Result<Vec<DebtCase>, StoreError> {
        let guard = self.cases.lock().expect("case store mutex poisoned");
        Ok(guard
            .values()
            .filter(|case| case.is_allocatable())
            .cloned()
            .collect())
    }

    fn case_history(&self) -> Result<Vec<DebtCase>, StoreError> {
        let guard = self.cases.lock().expect("case store mutex poisoned");
        Ok(guard
            .values()
            .filter(|case| case.status != CaseStatus::New)
            .cloned()
            .collect())
    }

    fn insert_cases(&self, cases: Vec<DebtCase>) -> Result<usize, StoreError> {
        let mut guard = self.cases.lock().expect("case store mutex poisoned");
        let count = cases.len();
        for case in cases {
            guard.insert(case.id.clone(), case);
        }
        Ok(count)
    }

    /// Single transaction boundary: every precondition is checked before the
    /// first write, under one lock, so the batch lands whole or not at all.
    fn commit_allocation(&self, batch: AllocationBatch) -> Result<(), StoreError> {
        let mut cases = self.cases.lock().expect("case store mutex poisoned");
        let mut notifications = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");

        for update in &batch.case_updates {
            let case = cases
                .get(&update.case_id)
                .ok_or_else(|| StoreError::CaseNotFound(update.case_id.0.clone()))?;
            if !case.is_allocatable() {
                return Err(StoreError::AssignmentConflict(update.case_id.0.clone()));
            }
        }

        for update in batch.case_updates {
            if let Some(case) = cases.get_mut(&update.case_id) {
                case.assigned_agency = update.assigned_agency;
                case.assigned_agent_id = Some(update.assigned_agent_id);
                case.ai_score = Some(update.ai_score);
                case.status = CaseStatus::Assigned;
                case.updated_at = update.updated_at;
            }
        }
        notifications.extend(batch.notifications);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryAgentDirectory {
    accounts: Mutex<Vec<AgentAccount>>,
}

impl InMemoryAgentDirectory {
    pub(crate) fn seed(&self, accounts: Vec<AgentAccount>) {
        let mut guard = self.accounts.lock().expect("directory mutex poisoned");
        guard.extend(accounts);
    }
}

impl AgentDirectory for InMemoryAgentDirectory {
    fn active_agents(&self) -> Result<Vec<AgentAccount>, StoreError> {
        let guard = self.accounts.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|account| account.is_eligible())
            .cloned()
            .collect())
    }
}
