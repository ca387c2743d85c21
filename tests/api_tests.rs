use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ledgerdesk::{api, config::Config, stores::Stores};
use ledgerdesk_workspace::{ActivationPolicy, MemorySlot, PersistedWorkspace};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    slot: MemorySlot,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let slot = MemorySlot::new();
        let workspace = PersistedWorkspace::open(
            Box::new(slot.clone()),
            config.workspace.activation,
            config.workspace.matching,
        )
        .expect("failed to open workspace");
        let router = api::router(Stores::in_memory(&config), Arc::new(Mutex::new(workspace)), None);
        Self { router, slot }
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, content_type, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, bytes) = self.request(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_task_then_filter_by_project() {
    let app = TestApp::new();

    let (status, task) = app
        .json(Method::POST, "/api/pms/tasks", Some(json!({ "title": "Write report", "projectId": "p-1" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "TODO");
    assert_eq!(task["title"], "Write report");
    let id = task["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("t-"));
    assert!(task["createdAt"].is_string());
    assert!(task["updatedAt"].is_string());

    let (status, tasks) = app.json(Method::GET, "/api/pms/tasks?projectId=p-1", None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = tasks.as_array().unwrap();
    assert!(tasks.iter().any(|t| t["id"] == id.as_str()));
    assert!(tasks.iter().all(|t| t["projectId"] == "p-1"));

    let (_, other) = app.json(Method::GET, "/api/pms/tasks?projectId=p-2", None).await;
    assert!(other.as_array().unwrap().iter().all(|t| t["id"] != id.as_str()));
}

#[tokio::test]
async fn test_update_ledger_total() {
    let app = TestApp::new();

    let (status, ledger) = app
        .json(Method::PUT, "/api/finance/ledgers/l-1", Some(json!({ "totalAmount": 99999 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["id"], "l-1");
    assert_eq!(ledger["totalAmount"].as_f64(), Some(99999.0));
    assert_eq!(ledger["description"], "Consulting fee received");

    let (status, _) = app
        .json(Method::PUT, "/api/finance/ledgers/l-404", Some(json!({ "totalAmount": 99999 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_record_is_plain_text_404() {
    let app = TestApp::new();
    let (status, content_type, body) = app.request(Method::GET, "/api/finance/ledgers/l-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(String::from_utf8(body).unwrap(), "ledger not found: l-404");
}

#[tokio::test]
async fn test_delete_then_get() {
    let app = TestApp::new();

    let (status, _, body) = app.request(Method::DELETE, "/api/hrm/employees/e-1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = app.json(Method::GET, "/api/hrm/employees/e-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.json(Method::DELETE, "/api/hrm/employees/e-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_patch_field_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .json(Method::PUT, "/api/pms/projects/p-1", Some(json!({ "name": "Renamed", "budget": 10 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (_, project) = app.json(Method::GET, "/api/pms/projects/p-1", None).await;
    assert_eq!(project["name"], "Citizen Portal Renewal");
}

#[tokio::test]
async fn test_create_ledger_defaults_to_draft() {
    let app = TestApp::new();
    let (status, ledger) = app
        .json(
            Method::POST,
            "/api/finance/ledgers",
            Some(json!({
                "tenantId": "tn-1",
                "transactionDate": "2024-03-01T00:00:00.000Z",
                "description": "Printer lease",
                "type": "EXPENSE",
                "totalAmount": 150000,
                "status": "APPROVED",
                "lines": [
                    { "accountCode": "5120", "accountName": "Lease Expense", "debitAmount": 150000 },
                    { "accountCode": "1010", "accountName": "Cash", "creditAmount": 150000 }
                ],
                "createdBy": "u-2"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ledger["status"], "DRAFT");
    assert_eq!(ledger["transactionDate"], "2024-03-01");
    let id = ledger["id"].as_str().unwrap();
    assert_eq!(ledger["lines"][0]["id"], format!("{}-1", id));

    let (status, fetched) = app.json(Method::GET, &format!("/api/finance/ledgers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, ledger);
}

#[tokio::test]
async fn test_balance_enforcement() {
    let unbalanced = json!({
        "tenantId": "tn-1",
        "transactionDate": "2024-03-01",
        "type": "EXPENSE",
        "totalAmount": 100,
        "lines": [{ "accountCode": "5120", "debitAmount": 100 }]
    });

    let lenient = TestApp::new();
    let (status, _) = lenient.json(Method::POST, "/api/finance/ledgers", Some(unbalanced.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut config = Config::default();
    config.ledger.enforce_balance = true;
    let strict = TestApp::with_config(config);

    let (status, body) = strict.json(Method::POST, "/api/finance/ledgers", Some(unbalanced)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("not balanced"));

    let (status, _) = strict
        .json(Method::PUT, "/api/finance/ledgers/l-1", Some(json!({ "totalAmount": 99999 })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ledger_workflow() {
    let app = TestApp::new();

    let (status, ledger) = app.json(Method::POST, "/api/finance/ledgers/l-3/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["status"], "PENDING");

    let (status, ledger) = app.json(Method::POST, "/api/finance/ledgers/l-3/approve", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledger["status"], "APPROVED");

    let (status, _) = app.json(Method::POST, "/api/finance/ledgers/l-3/reject", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.json(Method::POST, "/api/finance/ledgers/l-3/archive", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.json(Method::POST, "/api/finance/ledgers/l-404/submit", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unbalanced_ledger_cannot_be_submitted() {
    let app = TestApp::new();
    app.json(Method::PUT, "/api/finance/ledgers/l-3", Some(json!({ "totalAmount": 1 })))
        .await;

    let (status, report) = app.json(Method::GET, "/api/finance/ledgers/l-3/balance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["balanced"], false);
    assert_eq!(report["debitTotal"].as_f64(), Some(1000000.0));

    let (status, _) = app.json(Method::POST, "/api/finance/ledgers/l-3/submit", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_filters_per_domain() {
    let app = TestApp::new();

    let (_, codes) = app.json(Method::GET, "/api/system/common-codes?groupCode=ACCOUNT", None).await;
    assert_eq!(codes.as_array().unwrap().len(), 3);

    let (_, users) = app.json(Method::GET, "/api/system/users?tenantId=tn-1", None).await;
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (_, ledgers) = app.json(Method::GET, "/api/finance/ledgers?status=PENDING", None).await;
    let ledgers = ledgers.as_array().unwrap();
    assert_eq!(ledgers.len(), 1);
    assert_eq!(ledgers[0]["id"], "l-2");

    let (_, tenants) = app.json(Method::GET, "/api/system/tenants", None).await;
    assert_eq!(tenants.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unseeded_store_starts_empty() {
    let mut config = Config::default();
    config.store.seed = false;
    let app = TestApp::with_config(config);

    let (status, ledgers) = app.json(Method::GET, "/api/finance/ledgers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ledgers, json!([]));
}

#[tokio::test]
async fn test_workspace_tabs() {
    let app = TestApp::new();

    let (status, state) = app.json(Method::GET, "/api/workspace", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state, json!({ "sidebarOpen": true, "tabs": [], "activeTabId": null }));

    app.json(
        Method::POST,
        "/api/workspace/tabs",
        Some(json!({ "id": "projects", "title": "Projects", "href": "/pms/projects" })),
    )
    .await;
    app.json(
        Method::POST,
        "/api/workspace/tabs",
        Some(json!({ "id": "ledgers", "title": "Ledgers", "url": "/finance/ledgers" })),
    )
    .await;
    let (_, state) = app
        .json(
            Method::POST,
            "/api/workspace/tabs",
            Some(json!({ "id": "projects", "title": "Projects", "href": "/pms/projects" })),
        )
        .await;
    assert_eq!(state["tabs"].as_array().unwrap().len(), 2);
    assert_eq!(state["activeTabId"], "projects");

    let (_, state) = app
        .json(Method::POST, "/api/workspace/location", Some(json!({ "location": "/finance/ledgers/l-1" })))
        .await;
    assert_eq!(state["activeTabId"], "ledgers");

    let (_, state) = app
        .json(Method::POST, "/api/workspace/location", Some(json!({ "location": "/hrm/employees" })))
        .await;
    assert_eq!(state["activeTabId"], "ledgers");

    let (_, state) = app.json(Method::DELETE, "/api/workspace/tabs/ledgers", None).await;
    assert_eq!(state["activeTabId"], "projects");

    let (_, state) = app.json(Method::PUT, "/api/workspace/sidebar", Some(json!({ "open": false }))).await;
    assert_eq!(state["sidebarOpen"], false);

    let stored: Value = serde_json::from_str(&app.slot.raw().unwrap()).unwrap();
    assert_eq!(stored["sidebarOpen"], false);
    assert_eq!(stored["activeTabId"], "projects");
}

#[tokio::test]
async fn test_workspace_bulk_close() {
    let app = TestApp::new();
    for id in ["a", "b", "c"] {
        app.json(
            Method::POST,
            "/api/workspace/tabs",
            Some(json!({ "id": id, "title": id, "href": format!("/{}", id) })),
        )
        .await;
    }

    let (_, state) = app.json(Method::POST, "/api/workspace/tabs/b/close-others", None).await;
    assert_eq!(state["tabs"].as_array().unwrap().len(), 1);
    assert_eq!(state["activeTabId"], "b");

    let (_, state) = app.json(Method::PUT, "/api/workspace/active", Some(json!({ "id": null }))).await;
    assert_eq!(state["activeTabId"], Value::Null);

    let (_, state) = app.json(Method::DELETE, "/api/workspace/tabs", None).await;
    assert_eq!(state["tabs"], json!([]));
    assert_eq!(state["activeTabId"], Value::Null);
}

#[tokio::test]
async fn test_null_clears_optional_task_fields() {
    let app = TestApp::new();

    let (status, task) = app
        .json(Method::PUT, "/api/pms/tasks/t-1", Some(json!({ "assigneeId": null, "dueDate": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["assigneeId"], Value::Null);
    assert_eq!(task["dueDate"], Value::Null);

    let (_, fetched) = app.json(Method::GET, "/api/pms/tasks/t-1", None).await;
    assert_eq!(fetched["assigneeId"], Value::Null);

    let (_, untouched) = app
        .json(Method::PUT, "/api/pms/tasks/t-2", Some(json!({ "title": "Design sign-in flow" })))
        .await;
    assert_eq!(untouched["assigneeId"], "e-2");
    assert_eq!(untouched["dueDate"], "2024-03-29");

    let (_, unassigned) = app.json(Method::GET, "/api/pms/tasks?assigneeId=e-2", None).await;
    assert!(unassigned.as_array().unwrap().iter().all(|t| t["id"] != "t-1"));
}

#[tokio::test]
async fn test_null_clears_project_end_date() {
    let app = TestApp::new();
    let (status, project) = app
        .json(Method::PUT, "/api/pms/projects/p-1", Some(json!({ "endDate": null, "managerId": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["endDate"], Value::Null);
    assert_eq!(project["managerId"], Value::Null);
    assert_eq!(project["startDate"], "2024-01-08");
}

#[tokio::test]
async fn test_workspace_reorder_tabs() {
    let app = TestApp::new();
    for id in ["a", "b", "c"] {
        app.json(
            Method::POST,
            "/api/workspace/tabs",
            Some(json!({ "id": id, "title": id, "href": format!("/{}", id) })),
        )
        .await;
    }

    let (status, state) = app
        .json(
            Method::PUT,
            "/api/workspace/tabs",
            Some(json!([
                { "id": "c", "title": "c", "href": "/c" },
                { "id": "a", "title": "a", "href": "/a" },
                { "id": "c", "title": "dup", "href": "/c" }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = state["tabs"].as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["c", "a"]);
    assert_eq!(state["activeTabId"], "c");

    let (_, state) = app
        .json(Method::PUT, "/api/workspace/tabs", Some(json!([{ "id": "a", "title": "a", "href": "/a" }])))
        .await;
    assert_eq!(state["activeTabId"], Value::Null);

    let stored: Value = serde_json::from_str(&app.slot.raw().unwrap()).unwrap();
    assert_eq!(stored["tabs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_workspace_activation_policy() {
    async fn close_active_after_visits(app: &TestApp) -> Value {
        for id in ["a", "b", "c"] {
            app.json(
                Method::POST,
                "/api/workspace/tabs",
                Some(json!({ "id": id, "title": id, "href": format!("/{}", id) })),
            )
            .await;
        }
        app.json(Method::PUT, "/api/workspace/active", Some(json!({ "id": "a" }))).await;
        app.json(Method::PUT, "/api/workspace/active", Some(json!({ "id": "b" }))).await;
        let (_, state) = app.json(Method::DELETE, "/api/workspace/tabs/b", None).await;
        state["activeTabId"].clone()
    }

    let last_remaining = TestApp::new();
    assert_eq!(close_active_after_visits(&last_remaining).await, "c");

    let mut config = Config::default();
    config.workspace.activation = ActivationPolicy::PreviousActive;
    let previous_active = TestApp::with_config(config);
    assert_eq!(close_active_after_visits(&previous_active).await, "a");
}
