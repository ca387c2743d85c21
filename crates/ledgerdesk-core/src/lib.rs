//! Core types and traits for LedgerDesk storage backends.
//!
//! This crate provides the `Record` and `Repository` traits and the domain
//! records served by the admin API, enabling pluggable repository
//! implementations in separate crates.

pub mod models;
pub mod storage;

// Re-export key types at crate root for convenience
pub use models::hrm::{Employee, EmployeeDraft, EmployeePatch, EmployeeStatus};
pub use models::ledger::{
    BalanceCheck, BalanceReport, Ledger, LedgerAction, LedgerDraft, LedgerLine, LedgerLineDraft,
    LedgerPatch, LedgerStatus, LedgerType,
};
pub use models::pms::{
    Project, ProjectDraft, ProjectPatch, ProjectStatus, Task, TaskDraft, TaskPatch, TaskPriority,
    TaskStatus,
};
pub use models::system::{
    CommonCode, CommonCodeDraft, CommonCodePatch, Tenant, TenantDraft, TenantPatch, User,
    UserDraft, UserPatch, UserRole,
};
pub use storage::{ListFilter, Record, RecordCheck, Repository, StoreError};
