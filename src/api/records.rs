//! The uniform list/get/create/update/delete surface shared by every
//! record domain.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use ledgerdesk_core::{ListFilter, Record, Repository};
use serde_json::Value;

use crate::error::ApiError;

type Repo<R> = State<Arc<dyn Repository<R>>>;

fn count(kind: &'static str, operation: &'static str) {
    metrics::increment_counter!("ledgerdesk_requests_total", "kind" => kind, "operation" => operation);
}

pub fn routes<R: Record>(base: &str, repo: Arc<dyn Repository<R>>) -> Router {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", base),
            get(fetch::<R>).put(update::<R>).delete(remove::<R>),
        )
        .with_state(repo)
}

async fn list<R: Record>(
    State(repo): Repo<R>,
    Query(filter): Query<BTreeMap<String, String>>,
) -> Json<Vec<R>> {
    count(R::KIND, "list");
    Json(repo.list(&ListFilter::from(filter)))
}

async fn fetch<R: Record>(State(repo): Repo<R>, Path(id): Path<String>) -> Result<Json<R>, ApiError> {
    count(R::KIND, "get");
    Ok(Json(repo.get(&id)?))
}

async fn create<R: Record>(
    State(repo): Repo<R>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<R>), ApiError> {
    count(R::KIND, "create");
    let draft: R::Draft = serde_json::from_value(body)?;
    let record = repo.create(draft)?;
    tracing::info!(kind = R::KIND, id = record.id(), "Created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<R: Record>(
    State(repo): Repo<R>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<R>, ApiError> {
    count(R::KIND, "update");
    let patch: R::Patch = serde_json::from_value(body)?;
    let record = repo.update(&id, patch)?;
    tracing::info!(kind = R::KIND, id = %id, "Updated");
    Ok(Json(record))
}

async fn remove<R: Record>(State(repo): Repo<R>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    count(R::KIND, "delete");
    repo.delete(&id)?;
    tracing::info!(kind = R::KIND, id = %id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}
