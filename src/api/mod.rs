use axum::{extract::State, routing::get, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::stores::Stores;

pub mod ledgers;
pub mod records;
pub mod workspace;

pub use workspace::SharedWorkspace;

pub const LEDGERS: &str = "/api/finance/ledgers";
pub const EMPLOYEES: &str = "/api/hrm/employees";
pub const PROJECTS: &str = "/api/pms/projects";
pub const TASKS: &str = "/api/pms/tasks";
pub const TENANTS: &str = "/api/system/tenants";
pub const USERS: &str = "/api/system/users";
pub const COMMON_CODES: &str = "/api/system/common-codes";

pub fn router(stores: Stores, workspace: SharedWorkspace, metrics: Option<PrometheusHandle>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .merge(records::routes(LEDGERS, stores.ledgers.clone()))
        .merge(ledgers::routes(LEDGERS, stores.ledgers))
        .merge(records::routes(EMPLOYEES, stores.employees))
        .merge(records::routes(PROJECTS, stores.projects))
        .merge(records::routes(TASKS, stores.tasks))
        .merge(records::routes(TENANTS, stores.tenants))
        .merge(records::routes(USERS, stores.users))
        .merge(records::routes(COMMON_CODES, stores.common_codes))
        .merge(workspace::routes(workspace));

    if let Some(handle) = metrics {
        app = app.merge(Router::new().route("/metrics", get(render_metrics)).with_state(handle));
    }

    app.layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn render_metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
