use crate::infra::{InMemoryAgentDirectory, InMemoryCaseStore};
use chrono::Utc;
use clap::Args;
use debtflow::error::AppError;
use debtflow::workflows::allocation::{
    AgentAccount, AgentId, AgentRole, AgentStatus, AllocationConfig, AllocationService, CaseId,
    CaseStatus, CustomerSegment, DebtCase, UNASSIGNED_AGENCY,
};
use debtflow::workflows::intake::{CaseDraft, IntakeService};
use std::collections::BTreeMap;
use std::sync::Arc;

pub(crate) const DEFAULT_CASES: usize = 12;
pub(crate) const DEFAULT_AGENTS: usize = 3;

const AGENCIES: [&str; 5] = [
    "Meridian Recovery",
    "Atlas Collections",
    "Harbor Credit Services",
    "Summit Receivables",
    "Beacon Adjusters",
];

const CUSTOMERS: [&str; 6] = [
    "Priya Nair",
    "Tom Alvarez",
    "Dana Whitfield",
    "Marcus Lee",
    "Ines Fontaine",
    "Yusuf Adeyemi",
];

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of unassigned cases to seed
    #[arg(long, default_value_t = DEFAULT_CASES)]
    pub(crate) cases: usize,
    /// Number of active agents to seed
    #[arg(long, default_value_t = DEFAULT_AGENTS)]
    pub(crate) agents: usize,
}

/// Seed deterministic sample data: a roster of active agents, a closed-out
/// history giving each a distinct track record, and a pool of fresh cases
/// pushed through intake scoring.
pub(crate) fn seed_sample_data(
    store: &Arc<InMemoryCaseStore>,
    directory: &Arc<InMemoryAgentDirectory>,
    cases: usize,
    agents: usize,
) -> Result<(), AppError> {
    let now = Utc::now();

    let roster: Vec<AgentAccount> = (0..agents)
        .map(|i| AgentAccount {
            id: AgentId(format!("ag-{:03}", i + 1)),
            agency_name: AGENCIES[i % AGENCIES.len()].to_string(),
            role: AgentRole::Agent,
            status: AgentStatus::Active,
        })
        .collect();

    // Each agent past the first gets a worked history; the first stays a
    // rookie so the demo shows the new-agent boost in action.
    let mut history = Vec::new();
    for (index, agent) in roster.iter().enumerate().skip(1) {
        let handled = 5 + index * 3;
        for n in 0..handled {
            let status = match n % 4 {
                0 | 1 => CaseStatus::Paid,
                2 => CaseStatus::Contacted,
                _ => CaseStatus::Dispute,
            };
            history.push(DebtCase {
                id: CaseId(format!("hist-{:03}-{n:03}", index + 1)),
                customer_name: CUSTOMERS[(index + n) % CUSTOMERS.len()].to_string(),
                amount: 800.0 + 400.0 * n as f64,
                days_overdue: 20 + 9 * n as u32,
                risk_score: Some(((25 + 13 * n) % 100) as u8),
                segment: CustomerSegment::Standard,
                status,
                assigned_agency: agent.agency_name.clone(),
                assigned_agent_id: Some(agent.id.clone()),
                ai_score: Some(0.7),
                notes: Vec::new(),
                created_at: now,
                updated_at: now,
            });
        }
    }

    directory.seed(roster);
    store.seed(history);

    let intake = IntakeService::new(store.clone());
    let drafts: Vec<CaseDraft> = (0..cases)
        .map(|i| CaseDraft {
            customer_name: CUSTOMERS[i % CUSTOMERS.len()].to_string(),
            amount: 180.0 + 730.0 * i as f64,
            days_overdue: (5 + 11 * i as u32) % 120,
        })
        .collect();
    intake.ingest(drafts)?;

    Ok(())
}

/// Run the full workflow against seeded in-memory collaborators and print
/// the outcome, including the per-agent distribution.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(InMemoryCaseStore::default());
    let directory = Arc::new(InMemoryAgentDirectory::default());
    seed_sample_data(&store, &directory, args.cases, args.agents)?;

    println!(
        "Seeded {} unassigned cases and {} active agents",
        args.cases, args.agents
    );

    let service = AllocationService::new(
        store.clone(),
        directory,
        AllocationConfig::default(),
    );
    let summary = service.run()?;

    println!("{}", summary.message);
    println!(
        "  assigned: {} / {}  (unmatched: {})",
        summary.assigned_count, summary.total_candidates, summary.unmatched_count
    );
    if let Some(mean) = summary.mean_assigned_score {
        println!("  mean assigned score: {mean:.2}");
    }

    let mut per_agency: BTreeMap<String, usize> = BTreeMap::new();
    for case in store.all_cases() {
        if case.status == CaseStatus::Assigned && case.assigned_agency != UNASSIGNED_AGENCY {
            *per_agency.entry(case.assigned_agency).or_default() += 1;
        }
    }
    println!("Distribution:");
    for (agency, count) in &per_agency {
        println!("  {agency}: {count}");
    }
    println!("Notifications queued: {}", store.notifications().len());

    Ok(())
}
