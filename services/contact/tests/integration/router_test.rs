use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};

use folio_contact::router::build_router;
use folio_contact::state::AppState;
use folio_contact_schema::submissions;
use folio_core::storage::Storage;
use folio_domain::id::SubmissionId;
use folio_domain::submission::SubmissionStatus;

use crate::helpers::stored_row;

/// Server with no database and no mail relay configured.
fn offline_server() -> TestServer {
    let state = AppState {
        storage: Storage::new(),
        notifier: None,
    };
    TestServer::new(build_router(state)).unwrap()
}

/// Server whose storage is connected to `db`, with no mail relay.
fn connected_server(db: DatabaseConnection) -> TestServer {
    let state = AppState {
        storage: Storage::connected(db),
        notifier: None,
    };
    TestServer::new(build_router(state)).unwrap()
}

fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn no_rows() -> Vec<submissions::Model> {
    Vec::new()
}

fn valid_body() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "Hello there",
    })
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_disconnected_database_in_health() {
    let server = offline_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["database"]["status"], "disconnected");
    assert_eq!(body["database"]["connected"], false);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn should_answer_liveness_probe() {
    let server = offline_server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let server = offline_server();
    let response = server.get("/healthz").await;
    assert!(response.headers().get("x-request-id").is_some());
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_valid_submission_without_storage_or_mail() {
    let server = offline_server();

    let response = server.post("/submissions").json(&valid_body()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message received successfully!");
    assert_eq!(body["savedToDatabase"], false);
    assert_eq!(body["emailSent"], false);
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn should_accept_submission_on_legacy_endpoint() {
    let server = offline_server();

    let response = server.post("/send-email").json(&valid_body()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn should_reject_missing_field() {
    let server = offline_server();

    let response = server
        .post("/submissions")
        .json(&json!({ "name": "Ada", "email": "ada@example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    assert_eq!(body["message"], "All fields are required.");
    assert_eq!(
        body["errors"],
        json!([{ "field": "message", "reason": "required" }])
    );
}

#[tokio::test]
async fn should_pass_whitespace_values_through() {
    let server = offline_server();

    let response = server
        .post("/submissions")
        .json(&json!({ "name": "   ", "email": "ada@example.com", "message": "hi" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let server = offline_server();

    let response = server
        .post("/submissions")
        .json(&json!({ "name": "Ada", "email": "ada@example", "message": "hi" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    assert_eq!(body["message"], "Invalid email format.");
}

#[tokio::test]
async fn should_reject_non_json_body() {
    let server = offline_server();

    let response = server.post("/submissions").text("name=Ada").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "INVALID_BODY");
}

// ── Storage-backed endpoints ─────────────────────────────────────────────────

#[tokio::test]
async fn should_return_service_unavailable_without_database() {
    let server = offline_server();
    let id = folio_domain::id::SubmissionId::generate().to_string();

    let responses = [
        server.get("/submissions").await,
        server.get("/submissions/stats").await,
        server.get(&format!("/submissions/{id}")).await,
        server
            .patch(&format!("/submissions/{id}"))
            .json(&json!({ "status": "read" }))
            .await,
        server.delete(&format!("/submissions/{id}")).await,
    ];

    for response in responses {
        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "STORAGE_UNAVAILABLE");
        assert_eq!(body["message"], "database not connected");
    }
}

// ── Fallback ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_json_not_found_for_unknown_route() {
    let server = offline_server();

    let response = server.get("/nope").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "NOT_FOUND");
}

// ── Connected storage ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_connected_database_in_health() {
    let server = connected_server(mock_db().into_connection());

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["database"]["status"], "connected");
    assert_eq!(body["database"]["connected"], true);
}

#[tokio::test]
async fn should_save_submission_when_storage_is_connected() {
    let row = stored_row("Ada", SubmissionStatus::New, 0);
    let server = connected_server(
        mock_db()
            .append_query_results([vec![row.clone()]])
            .into_connection(),
    );

    let response = server.post("/submissions").json(&valid_body()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["savedToDatabase"], true);
    assert_eq!(body["emailSent"], false);
    assert_eq!(body["id"], row.id.to_string());
}

#[tokio::test]
async fn should_reject_malformed_id_with_storage_connected() {
    let server = connected_server(mock_db().into_connection());

    let responses = [
        server.get("/submissions/123").await,
        server
            .patch("/submissions/123")
            .json(&json!({ "status": "read" }))
            .await,
        server.delete("/submissions/123").await,
    ];

    for response in responses {
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "INVALID_ID");
    }
}

#[tokio::test]
async fn should_return_not_found_for_unknown_id() {
    let server = connected_server(
        mock_db()
            .append_query_results([no_rows()])
            .append_query_results([no_rows()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection(),
    );
    let id = SubmissionId::generate();

    let responses = [
        server.get(&format!("/submissions/{id}")).await,
        server
            .patch(&format!("/submissions/{id}"))
            .json(&json!({ "status": "read" }))
            .await,
        server.delete(&format!("/submissions/{id}")).await,
    ];

    for response in responses {
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "SUBMISSION_NOT_FOUND");
    }
}

#[tokio::test]
async fn should_reject_unknown_status_before_touching_storage() {
    let server = connected_server(mock_db().into_connection());
    let id = SubmissionId::generate();

    let response = server
        .patch(&format!("/submissions/{id}"))
        .json(&json!({ "status": "spam" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_STATUS");
}

#[tokio::test]
async fn should_render_stored_submission() {
    let row = stored_row("Ada", SubmissionStatus::Replied, 0);
    let server = connected_server(
        mock_db()
            .append_query_results([vec![row.clone()]])
            .into_connection(),
    );

    let response = server.get(&format!("/submissions/{}", row.id)).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], row.id.to_string());
    assert_eq!(body["data"]["status"], "replied");
    assert_eq!(body["data"]["createdAt"], "2025-06-01T12:00:00.000Z");
    assert_eq!(body["data"]["updatedAt"], "2025-06-01T12:00:00.000Z");
}

#[tokio::test]
async fn should_list_first_page_with_pagination_summary() {
    let server = connected_server(
        mock_db()
            .append_query_results([vec![BTreeMap::from([(
                "num_items",
                sea_orm::Value::from(5_i64),
            )])]])
            .append_query_results([vec![
                stored_row("E", SubmissionStatus::New, 4),
                stored_row("D", SubmissionStatus::New, 3),
            ]])
            .into_connection(),
    );

    let response = server.get("/submissions?page=1&limit=2").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["E", "D"]);
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 2, "total": 5, "pages": 3 })
    );
}

#[tokio::test]
async fn should_reject_unknown_status_filter() {
    let server = connected_server(mock_db().into_connection());

    let response = server.get("/submissions?status=spam").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_STATUS");
}

#[tokio::test]
async fn should_report_stats_per_status() {
    let row = |status: &str, count: i64| {
        BTreeMap::from([
            ("status", sea_orm::Value::from(status)),
            ("count", sea_orm::Value::from(count)),
        ])
    };
    let server = connected_server(
        mock_db()
            .append_query_results([vec![row("new", 3), row("read", 1)]])
            .into_connection(),
    );

    let response = server.get("/submissions/stats").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["data"],
        json!({ "total": 4, "new": 3, "read": 1, "replied": 0, "archived": 0 })
    );
}

#[tokio::test]
async fn should_apply_paging_defaults_and_clamp_limit() {
    let empty_count = || {
        vec![BTreeMap::from([("num_items", sea_orm::Value::from(0_i64))])]
    };
    let server = connected_server(
        mock_db()
            .append_query_results([empty_count()])
            .append_query_results([no_rows()])
            .append_query_results([empty_count()])
            .append_query_results([no_rows()])
            .into_connection(),
    );

    let defaults: Value = server.get("/submissions").await.json();
    assert_eq!(
        defaults["pagination"],
        json!({ "page": 1, "limit": 50, "total": 0, "pages": 0 })
    );

    let clamped: Value = server.get("/submissions?page=0&limit=500").await.json();
    assert_eq!(clamped["pagination"]["page"], 1);
    assert_eq!(clamped["pagination"]["limit"], 100);
}

#[tokio::test]
async fn should_reject_non_numeric_paging() {
    let server = connected_server(mock_db().into_connection());

    let response = server.get("/submissions?page=abc").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "INVALID_QUERY");
}
