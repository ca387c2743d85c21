//! Demo fixtures loaded into the in-memory repositories at startup.

use ledgerdesk_core::{
    CommonCode, Employee, EmployeeStatus, Ledger, LedgerLine, LedgerStatus, LedgerType, Project,
    ProjectStatus, Task, TaskPriority, TaskStatus, Tenant, User, UserRole,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{
    macros::{date, datetime},
    OffsetDateTime,
};

const SEEDED_AT: OffsetDateTime = datetime!(2024-01-02 09:00 UTC);

fn line(id: &str, code: &str, name: &str, debit: Decimal, credit: Decimal) -> LedgerLine {
    LedgerLine {
        id: id.to_string(),
        account_code: code.to_string(),
        account_name: name.to_string(),
        description: String::new(),
        debit_amount: debit,
        credit_amount: credit,
    }
}

pub fn ledgers() -> Vec<Ledger> {
    vec![
        Ledger {
            id: "l-1".to_string(),
            tenant_id: "tn-1".to_string(),
            transaction_date: date!(2024 - 01 - 15),
            description: "Consulting fee received".to_string(),
            ledger_type: LedgerType::Revenue,
            status: LedgerStatus::Approved,
            total_amount: dec!(5000000),
            lines: vec![
                line("l-1-1", "1010", "Cash", dec!(5000000), Decimal::ZERO),
                line("l-1-2", "4010", "Service Revenue", Decimal::ZERO, dec!(5000000)),
            ],
            created_by: "u-1".to_string(),
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
        },
        Ledger {
            id: "l-2".to_string(),
            tenant_id: "tn-1".to_string(),
            transaction_date: date!(2024 - 01 - 20),
            description: "Office supplies".to_string(),
            ledger_type: LedgerType::Expense,
            status: LedgerStatus::Pending,
            total_amount: dec!(350000),
            lines: vec![
                line("l-2-1", "5110", "Supplies Expense", dec!(350000), Decimal::ZERO),
                line("l-2-2", "1010", "Cash", Decimal::ZERO, dec!(350000)),
            ],
            created_by: "u-2".to_string(),
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
        },
        Ledger {
            id: "l-3".to_string(),
            tenant_id: "tn-2".to_string(),
            transaction_date: date!(2024 - 02 - 01),
            description: "Move operating cash to savings".to_string(),
            ledger_type: LedgerType::Transfer,
            status: LedgerStatus::Draft,
            total_amount: dec!(1000000),
            lines: vec![
                line("l-3-1", "1020", "Savings Account", dec!(1000000), Decimal::ZERO),
                line("l-3-2", "1010", "Cash", Decimal::ZERO, dec!(1000000)),
            ],
            created_by: "u-3".to_string(),
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
        },
    ]
}

pub fn employees() -> Vec<Employee> {
    let employee = |id: &str, no: &str, name: &str, department: &str, position: &str| Employee {
        id: id.to_string(),
        tenant_id: "tn-1".to_string(),
        employee_no: no.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", no.to_lowercase()),
        department: department.to_string(),
        position: position.to_string(),
        hire_date: date!(2021 - 03 - 02),
        status: EmployeeStatus::Active,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
    };
    vec![
        employee("e-1", "EMP001", "Kim Minsu", "Finance", "Accountant"),
        employee("e-2", "EMP002", "Lee Jiwon", "Engineering", "Developer"),
        employee("e-3", "EMP003", "Park Soyeon", "Engineering", "Project Manager"),
    ]
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: "p-1".to_string(),
            tenant_id: "tn-1".to_string(),
            code: "PRJ-2024-001".to_string(),
            name: "Citizen Portal Renewal".to_string(),
            description: "Rebuild the public service portal".to_string(),
            manager_id: Some("e-3".to_string()),
            start_date: date!(2024 - 01 - 08),
            end_date: Some(date!(2024 - 06 - 28)),
            status: ProjectStatus::InProgress,
            progress: 35,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
        },
        Project {
            id: "p-2".to_string(),
            tenant_id: "tn-1".to_string(),
            code: "PRJ-2024-002".to_string(),
            name: "ERP Migration".to_string(),
            description: String::new(),
            manager_id: None,
            start_date: date!(2024 - 04 - 01),
            end_date: None,
            status: ProjectStatus::Planning,
            progress: 0,
            created_at: SEEDED_AT,
            updated_at: SEEDED_AT,
        },
    ]
}

pub fn tasks() -> Vec<Task> {
    let task = |id: &str, project_id: &str, title: &str, status: TaskStatus| Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        assignee_id: Some("e-2".to_string()),
        priority: TaskPriority::Medium,
        status,
        due_date: Some(date!(2024 - 03 - 29)),
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
    };
    vec![
        task("t-1", "p-1", "Collect requirements", TaskStatus::Done),
        task("t-2", "p-1", "Design login flow", TaskStatus::InProgress),
        task("t-3", "p-2", "Inventory legacy modules", TaskStatus::Todo),
    ]
}

pub fn tenants() -> Vec<Tenant> {
    let tenant = |id: &str, code: &str, name: &str| Tenant {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        is_active: true,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
    };
    vec![
        tenant("tn-1", "SEOUL", "Seoul Metropolitan Office"),
        tenant("tn-2", "BUSAN", "Busan City Hall"),
    ]
}

pub fn users() -> Vec<User> {
    let user = |id: &str, tenant_id: &str, username: &str, name: &str, role: UserRole| User {
        id: id.to_string(),
        tenant_id: tenant_id.to_string(),
        username: username.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", username),
        role,
        is_active: true,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
    };
    vec![
        user("u-1", "tn-1", "admin", "System Admin", UserRole::Admin),
        user("u-2", "tn-1", "manager", "Finance Manager", UserRole::Manager),
        user("u-3", "tn-2", "clerk", "Busan Clerk", UserRole::User),
    ]
}

pub fn common_codes() -> Vec<CommonCode> {
    let code = |id: &str, group: &str, code: &str, name: &str, sort_order: i32| CommonCode {
        id: id.to_string(),
        group_code: group.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        sort_order,
        is_active: true,
        created_at: SEEDED_AT,
        updated_at: SEEDED_AT,
    };
    vec![
        code("cc-1", "DEPARTMENT", "FIN", "Finance", 1),
        code("cc-2", "DEPARTMENT", "ENG", "Engineering", 2),
        code("cc-3", "ACCOUNT", "1010", "Cash", 1),
        code("cc-4", "ACCOUNT", "4010", "Service Revenue", 2),
        code("cc-5", "ACCOUNT", "5110", "Supplies Expense", 3),
    ]
}
