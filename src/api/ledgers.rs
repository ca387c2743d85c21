use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use ledgerdesk_core::{BalanceReport, Ledger, LedgerAction, LedgerPatch, Repository, StoreError};

use crate::error::ApiError;

type Ledgers = State<Arc<dyn Repository<Ledger>>>;

/// Approval workflow and balance checks on top of the plain ledger routes.
pub fn routes(base: &str, repo: Arc<dyn Repository<Ledger>>) -> Router {
    Router::new()
        .route(&format!("{}/:id/balance", base), get(balance))
        .route(&format!("{}/:id/:action", base), post(transition))
        .with_state(repo)
}

async fn balance(State(repo): Ledgers, Path(id): Path<String>) -> Result<Json<BalanceReport>, ApiError> {
    let ledger = repo.get(&id)?;
    Ok(Json(ledger.balance()))
}

async fn transition(
    State(repo): Ledgers,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<Ledger>, ApiError> {
    let action: LedgerAction = action
        .parse()
        .map_err(|_| StoreError::validation(format!("unknown ledger action `{}`", action)))?;

    let mut from = None;
    let updated = repo.update_with(&id, &mut |ledger: &Ledger| {
        let next = ledger.transition(action)?;
        from = Some(ledger.status);
        Ok(LedgerPatch::status(next))
    })?;

    metrics::increment_counter!("ledgerdesk_ledger_transitions_total", "action" => action.to_string());
    if let Some(from) = from {
        tracing::info!(id = %id, %action, %from, to = %updated.status, "Ledger status changed");
    }
    Ok(Json(updated))
}
