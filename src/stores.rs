use std::sync::Arc;

use ledgerdesk_core::{
    BalanceCheck, CommonCode, Employee, Ledger, Project, Record, Repository, Task, Tenant, User,
};
use ledgerdesk_memory::{seed, InMemoryRepository};
use ledgerdesk_workspace::{FileSlot, PersistedWorkspace, WorkspaceError};
use tokio::sync::Mutex;

use crate::{
    api::SharedWorkspace,
    config::{Config, WorkspaceConfig},
};

/// One repository per record domain.
#[derive(Clone)]
pub struct Stores {
    pub ledgers: Arc<dyn Repository<Ledger>>,
    pub employees: Arc<dyn Repository<Employee>>,
    pub projects: Arc<dyn Repository<Project>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub tenants: Arc<dyn Repository<Tenant>>,
    pub users: Arc<dyn Repository<User>>,
    pub common_codes: Arc<dyn Repository<CommonCode>>,
}

fn memory<R: Record>(seeded: bool, fixtures: fn() -> Vec<R>) -> InMemoryRepository<R> {
    let records = if seeded { fixtures() } else { Vec::new() };
    tracing::debug!(kind = R::KIND, count = records.len(), "In-memory store ready");
    InMemoryRepository::with_records(records)
}

impl Stores {
    pub fn in_memory(config: &Config) -> Self {
        let seeded = config.store.seed;

        let mut ledgers = memory(seeded, seed::ledgers);
        if config.ledger.enforce_balance {
            ledgers = ledgers.with_check(Arc::new(BalanceCheck));
        }

        Self {
            ledgers: Arc::new(ledgers),
            employees: Arc::new(memory(seeded, seed::employees)),
            projects: Arc::new(memory(seeded, seed::projects)),
            tasks: Arc::new(memory(seeded, seed::tasks)),
            tenants: Arc::new(memory(seeded, seed::tenants)),
            users: Arc::new(memory(seeded, seed::users)),
            common_codes: Arc::new(memory(seeded, seed::common_codes)),
        }
    }
}

/// Open the workspace state persisted under `state_dir`.
pub fn open_workspace(config: &WorkspaceConfig) -> Result<SharedWorkspace, WorkspaceError> {
    let slot = FileSlot::new(&config.state_dir, &config.storage_name);
    tracing::info!(path = %slot.path().display(), "Workspace state slot");
    let workspace = PersistedWorkspace::open(Box::new(slot), config.activation, config.matching)?;
    Ok(Arc::new(Mutex::new(workspace)))
}
