use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::allocation::config::AllocationConfig;
use crate::workflows::allocation::domain::{
    AgentAccount, AgentId, AgentRole, AgentStatus, CaseId, CaseStatus, CustomerSegment, DebtCase,
    UNASSIGNED_AGENCY,
};
use crate::workflows::allocation::scorer::ScoredAgent;
use crate::workflows::allocation::service::AllocationService;
use crate::workflows::allocation::store::{
    AgentDirectory, AllocationBatch, CaseStore, Notification, StoreError,
};

pub(super) fn allocation_config() -> AllocationConfig {
    AllocationConfig::default()
}

pub(super) fn unassigned_case(id: &str, risk: Option<u8>) -> DebtCase {
    let now = Utc::now();
    DebtCase {
        id: CaseId(id.to_string()),
        customer_name: format!("Customer {id}"),
        amount: 1_200.0,
        days_overdue: 45,
        risk_score: risk,
        segment: CustomerSegment::Standard,
        status: CaseStatus::New,
        assigned_agency: UNASSIGNED_AGENCY.to_string(),
        assigned_agent_id: None,
        ai_score: None,
        notes: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn handled_case(
    id: &str,
    agent_id: &AgentId,
    status: CaseStatus,
    risk: u8,
) -> DebtCase {
    let now = Utc::now();
    DebtCase {
        id: CaseId(id.to_string()),
        customer_name: format!("Customer {id}"),
        amount: 2_400.0,
        days_overdue: 80,
        risk_score: Some(risk),
        segment: CustomerSegment::Standard,
        status,
        assigned_agency: "Meridian Recovery".to_string(),
        assigned_agent_id: Some(agent_id.clone()),
        ai_score: Some(0.7),
        notes: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn agent(id: &str, agency_name: &str) -> AgentAccount {
    AgentAccount {
        id: AgentId(id.to_string()),
        agency_name: agency_name.to_string(),
        role: AgentRole::Agent,
        status: AgentStatus::Active,
    }
}

pub(super) fn scored(id: &str, score: f32, current_load: u32) -> ScoredAgent {
    ScoredAgent {
        id: AgentId(id.to_string()),
        agency_name: format!("Agency {id}"),
        score,
        current_load,
        batch_assigned: 0,
    }
}

/// In-memory case store with the atomic, precondition-checked commit the
/// store contract requires. Keyed by a BTreeMap so fetch order is stable.
#[derive(Default)]
pub(super) struct MemoryCaseStore {
    cases: Mutex<BTreeMap<CaseId, DebtCase>>,
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryCaseStore {
    pub(super) fn seed(&self, cases: Vec<DebtCase>) {
        let mut guard = self.cases.lock().expect("case store mutex poisoned");
        for case in cases {
            guard.insert(case.id.clone(), case);
        }
    }

    pub(super) fn case(&self, id: &CaseId) -> Option<DebtCase> {
        self.cases
            .lock()
            .expect("case store mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn all_cases(&self) -> Vec<DebtCase> {
        self.cases
            .lock()
            .expect("case store mutex poisoned")
            .values()
            .cloned()
            .collect()
    }

    pub(super) fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl CaseStore for MemoryCaseStore {
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

    fn commit_allocation(&self, batch: AllocationBatch) -> Result<(), StoreError> {
        let mut cases = self.cases.lock().expect("case store mutex poisoned");
        let mut notifications = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");

        // Validate every precondition before touching anything.
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
pub(super) struct MemoryDirectory {
    accounts: Mutex<Vec<AgentAccount>>,
}

impl MemoryDirectory {
    pub(super) fn seed(&self, accounts: Vec<AgentAccount>) {
        let mut guard = self.accounts.lock().expect("directory mutex poisoned");
        guard.extend(accounts);
    }
}

impl AgentDirectory for MemoryDirectory {
    fn active_agents(&self) -> Result<Vec<AgentAccount>, StoreError> {
        let guard = self.accounts.lock().expect("directory mutex poisoned");
        Ok(guard
            .iter()
            .filter(|account| account.is_eligible())
            .cloned()
            .collect())
    }
}

/// Store whose reads succeed but whose commit is rejected, for atomicity
/// checks at the service boundary.
pub(super) struct FailingCommitStore {
    pub(super) inner: Arc<MemoryCaseStore>,
}

impl CaseStore for FailingCommitStore {
    fn unassigned_cases(&self) -> Result<Vec<DebtCase>, StoreError> {
        self.inner.unassigned_cases()
    }

    fn case_history(&self) -> Result<Vec<DebtCase>, StoreError> {
        self.inner.case_history()
    }

    fn insert_cases(&self, cases: Vec<DebtCase>) -> Result<usize, StoreError> {
        self.inner.insert_cases(cases)
    }

    fn commit_allocation(&self, _batch: AllocationBatch) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("batch write rejected".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl CaseStore for UnavailableStore {
    fn unassigned_cases(&self) -> Result<Vec<DebtCase>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn case_history(&self) -> Result<Vec<DebtCase>, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn insert_cases(&self, _cases: Vec<DebtCase>) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }

    fn commit_allocation(&self, _batch: AllocationBatch) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AllocationService<MemoryCaseStore, MemoryDirectory>,
    Arc<MemoryCaseStore>,
    Arc<MemoryDirectory>,
) {
    let store = Arc::new(MemoryCaseStore::default());
    let directory = Arc::new(MemoryDirectory::default());
    let service = AllocationService::new(store.clone(), directory.clone(), allocation_config());
    (service, store, directory)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
