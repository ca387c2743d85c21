//! HTTP access to the persisted workspace tab state. Every route answers
//! with the full state after the change.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use ledgerdesk_workspace::{PersistedWorkspace, Tab, WorkspaceState};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::ApiError;

pub type SharedWorkspace = Arc<Mutex<PersistedWorkspace>>;

type Workspace = State<SharedWorkspace>;
type Reply = Result<Json<WorkspaceState>, ApiError>;

#[derive(Deserialize)]
struct ActiveTab {
    id: Option<String>,
}

#[derive(Deserialize)]
struct Sidebar {
    open: bool,
}

#[derive(Deserialize)]
struct Location {
    location: String,
}

pub fn routes(workspace: SharedWorkspace) -> Router {
    Router::new()
        .route("/api/workspace", get(show))
        .route(
            "/api/workspace/tabs",
            post(add_tab).put(reorder_tabs).delete(close_all_tabs),
        )
        .route("/api/workspace/tabs/:id", delete(remove_tab))
        .route("/api/workspace/tabs/:id/close-others", post(close_other_tabs))
        .route("/api/workspace/active", put(set_active_tab))
        .route("/api/workspace/sidebar", put(set_sidebar))
        .route("/api/workspace/location", post(sync_location))
        .with_state(workspace)
}

async fn show(State(workspace): Workspace) -> Json<WorkspaceState> {
    Json(workspace.lock().await.state().clone())
}

async fn add_tab(State(workspace): Workspace, Json(tab): Json<Tab>) -> Reply {
    let mut workspace = workspace.lock().await;
    let id = tab.id.clone();
    if workspace.add_tab(tab)? {
        tracing::debug!(tab = %id, "Tab opened");
    }
    Ok(Json(workspace.state().clone()))
}

async fn reorder_tabs(State(workspace): Workspace, Json(tabs): Json<Vec<Tab>>) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.reorder_tabs(tabs)?;
    Ok(Json(workspace.state().clone()))
}

async fn close_all_tabs(State(workspace): Workspace) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.close_all_tabs()?;
    Ok(Json(workspace.state().clone()))
}

async fn remove_tab(State(workspace): Workspace, Path(id): Path<String>) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.remove_tab(&id)?;
    Ok(Json(workspace.state().clone()))
}

async fn close_other_tabs(State(workspace): Workspace, Path(id): Path<String>) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.close_other_tabs(&id)?;
    Ok(Json(workspace.state().clone()))
}

async fn set_active_tab(State(workspace): Workspace, Json(body): Json<ActiveTab>) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.set_active_tab(body.id)?;
    Ok(Json(workspace.state().clone()))
}

async fn set_sidebar(State(workspace): Workspace, Json(body): Json<Sidebar>) -> Reply {
    let mut workspace = workspace.lock().await;
    workspace.set_sidebar_open(body.open)?;
    Ok(Json(workspace.state().clone()))
}

async fn sync_location(State(workspace): Workspace, Json(body): Json<Location>) -> Reply {
    let mut workspace = workspace.lock().await;
    if let Some(id) = workspace.sync_location(&body.location)? {
        tracing::debug!(tab = %id, location = %body.location, "Tab activated from location");
    }
    Ok(Json(workspace.state().clone()))
}
