use std::fmt::Display;

use prettytable::{row, Table};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use super::{calendar, require};
use crate::storage::{ListFilter, Record, RecordCheck, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerType {
    Revenue,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

/// A workflow step on a ledger's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LedgerAction {
    Submit,
    Approve,
    Reject,
    Reopen,
}

impl LedgerStatus {
    pub fn next(self, action: LedgerAction) -> Result<LedgerStatus, StoreError> {
        let next = match (self, action) {
            (LedgerStatus::Draft, LedgerAction::Submit) => LedgerStatus::Pending,
            (LedgerStatus::Pending, LedgerAction::Approve) => LedgerStatus::Approved,
            (LedgerStatus::Pending, LedgerAction::Reject) => LedgerStatus::Rejected,
            (LedgerStatus::Rejected, LedgerAction::Reopen) => LedgerStatus::Draft,
            (from, action) => {
                return Err(StoreError::InvalidTransition {
                    from: from.to_string(),
                    action: action.to_string(),
                })
            }
        };
        Ok(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLine {
    pub id: String,
    pub account_code: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub debit_amount: Decimal,
    #[serde(default)]
    pub credit_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerLineDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub account_code: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub debit_amount: Decimal,
    #[serde(default)]
    pub credit_amount: Decimal,
}

impl LedgerLineDraft {
    fn into_line(self, ledger_id: &str, position: usize) -> LedgerLine {
        LedgerLine {
            id: self.id.unwrap_or_else(|| format!("{}-{}", ledger_id, position + 1)),
            account_code: self.account_code,
            account_name: self.account_name,
            description: self.description,
            debit_amount: self.debit_amount,
            credit_amount: self.credit_amount,
        }
    }
}

fn build_lines(ledger_id: &str, drafts: Vec<LedgerLineDraft>) -> Vec<LedgerLine> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, d)| d.into_line(ledger_id, i))
        .collect()
}

/// A double-entry accounting transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub id: String,
    pub tenant_id: String,
    #[serde(with = "calendar")]
    pub transaction_date: Date,
    pub description: String,
    #[serde(rename = "type")]
    pub ledger_type: LedgerType,
    pub status: LedgerStatus,
    pub total_amount: Decimal,
    pub lines: Vec<LedgerLine>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDraft {
    pub tenant_id: String,
    #[serde(with = "calendar")]
    pub transaction_date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ledger_type: LedgerType,
    pub total_amount: Decimal,
    #[serde(default)]
    pub lines: Vec<LedgerLineDraft>,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerPatch {
    pub tenant_id: Option<String>,
    #[serde(default, with = "calendar::option")]
    pub transaction_date: Option<Date>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ledger_type: Option<LedgerType>,
    pub status: Option<LedgerStatus>,
    pub total_amount: Option<Decimal>,
    pub lines: Option<Vec<LedgerLineDraft>>,
    pub created_by: Option<String>,
}

impl LedgerPatch {
    pub fn status(status: LedgerStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

/// Debit and credit totals of a ledger, with every way it breaks the
/// double-entry invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub total_amount: Decimal,
    pub balanced: bool,
    pub problems: Vec<String>,
}

impl Ledger {
    pub fn balance(&self) -> BalanceReport {
        let mut problems = Vec::new();
        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;

        for line in &self.lines {
            if line.account_code.trim().is_empty() {
                problems.push(format!("line {} has no account code", line.id));
            }
            if line.debit_amount.is_sign_negative() || line.credit_amount.is_sign_negative() {
                problems.push(format!("line {} has a negative amount", line.id));
            }
            match (line.debit_amount.is_zero(), line.credit_amount.is_zero()) {
                (true, true) => problems.push(format!("line {} has neither a debit nor a credit", line.id)),
                (false, false) => problems.push(format!("line {} has both a debit and a credit", line.id)),
                _ => {}
            }
            debit_total += line.debit_amount;
            credit_total += line.credit_amount;
        }

        if debit_total != credit_total {
            problems.push(format!("debits {} do not equal credits {}", debit_total, credit_total));
        }
        if debit_total != self.total_amount {
            problems.push(format!("debits {} do not equal total amount {}", debit_total, self.total_amount));
        }

        BalanceReport {
            debit_total,
            credit_total,
            total_amount: self.total_amount,
            balanced: problems.is_empty(),
            problems,
        }
    }

    pub fn check_balance(&self) -> Result<(), StoreError> {
        let report = self.balance();
        if report.balanced {
            return Ok(());
        }
        Err(StoreError::validation(format!(
            "ledger {} is not balanced: {}",
            self.id,
            report.problems.join("; ")
        )))
    }

    /// Move the ledger one step through its approval workflow. Submitting
    /// requires the ledger to balance.
    pub fn transition(&self, action: LedgerAction) -> Result<LedgerStatus, StoreError> {
        let next = self.status.next(action)?;
        if action == LedgerAction::Submit {
            self.check_balance()?;
        }
        Ok(next)
    }
}

impl Record for Ledger {
    type Draft = LedgerDraft;
    type Patch = LedgerPatch;

    const KIND: &'static str = "ledger";
    const ID_PREFIX: &'static str = "l";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: LedgerDraft, now: OffsetDateTime) -> Result<Self, StoreError> {
        require("tenantId", &draft.tenant_id)?;
        let lines = build_lines(&id, draft.lines);
        Ok(Ledger {
            id,
            tenant_id: draft.tenant_id,
            transaction_date: draft.transaction_date,
            description: draft.description,
            ledger_type: draft.ledger_type,
            status: LedgerStatus::Draft,
            total_amount: draft.total_amount,
            lines,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: LedgerPatch, now: OffsetDateTime) -> Result<(), StoreError> {
        if let Some(tenant_id) = patch.tenant_id {
            require("tenantId", &tenant_id)?;
            self.tenant_id = tenant_id;
        }
        if let Some(date) = patch.transaction_date {
            self.transaction_date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(ledger_type) = patch.ledger_type {
            self.ledger_type = ledger_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(total_amount) = patch.total_amount {
            self.total_amount = total_amount;
        }
        if let Some(lines) = patch.lines {
            self.lines = build_lines(&self.id, lines);
        }
        if let Some(created_by) = patch.created_by {
            self.created_by = created_by;
        }
        self.updated_at = now;
        Ok(())
    }

    fn matches(&self, filter: &ListFilter) -> bool {
        filter.accepts("tenantId", &self.tenant_id)
            && filter.accepts("status", self.status.as_ref())
            && filter.accepts("type", self.ledger_type.as_ref())
    }
}

/// Rejects ledgers whose lines do not balance against `totalAmount`.
pub struct BalanceCheck;

impl RecordCheck<Ledger> for BalanceCheck {
    fn check(&self, record: &Ledger) -> Result<(), StoreError> {
        record.check_balance()
    }
}

impl Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} {} {} [{}] {}",
            self.id, self.transaction_date, self.ledger_type, self.status, self.description
        )?;

        let mut table = Table::new();
        table.add_row(row!["Account", "Name", "Description", "Debit", "Credit"]);
        table.add_empty_row();
        for line in &self.lines {
            table.add_row(row![
                line.account_code,
                line.account_name,
                line.description,
                line.debit_amount,
                line.credit_amount
            ]);
        }
        let report = self.balance();
        table.add_empty_row();
        table.add_row(row!["", "", "Total", report.debit_total, report.credit_total]);

        write!(f, "{}", table)
    }
}
