//! HTTP surface tests against a memory-backed registry.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use vault_api::state::AppState;
use vault_core::config::AppConfig;
use vault_registry::service::FileRegistry;
use vault_registry::staging::StagingService;
use vault_storage::providers::MemoryObjectStore;

fn test_app() -> Router {
    let config = Arc::new(AppConfig::default());
    let store = Arc::new(MemoryObjectStore::new("main"));
    let staging_store = Arc::new(MemoryObjectStore::new("staging"));

    let registry = Arc::new(FileRegistry::new(store, config.registry.clone()));
    let staging = Arc::new(StagingService::new(staging_store, config.staging.clone()));

    vault_api::build_router(AppState {
        config,
        registry,
        staging,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn write_body(filename: &str, content: &[u8]) -> Value {
    json!({
        "content_type": "application/pdf",
        "filename": filename,
        "file": BASE64.encode(content),
    })
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = test_app();
    let (status, body) = send(&app, get_request("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_get_update_delete_lifecycle() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            write_body("report.pdf", b"first"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "File created.");
    let v1 = body["version_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get_request("/api/contracts/c-100/files/report.pdf")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["filename"], "report.pdf");
    assert_eq!(
        BASE64.decode(body["encoded_file"].as_str().unwrap()).unwrap(),
        b"first"
    );

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/contracts/c-100/files/report.pdf",
            json!({ "content_type": "application/pdf", "file": BASE64.encode(b"second") }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "File updated.");

    let (status, body) = send(
        &app,
        get_request("/api/contracts/c-100/files/report.pdf/versions"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let versions = body.as_array().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["is_latest"], true);
    assert_eq!(versions[1]["is_latest"], false);

    // Pinned read of the first version still answers the old content.
    let (status, body) = send(
        &app,
        get_request(&format!(
            "/api/contracts/c-100/files/report.pdf?version_id={v1}"
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        BASE64.decode(body["encoded_file"].as_str().unwrap()).unwrap(),
        b"first"
    );

    let delete_request = Request::builder()
        .method("DELETE")
        .uri("/api/contracts/c-100/files/report.pdf")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File deleted.");

    let (status, body) = send(&app, get_request("/api/contracts/c-100/files")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["filename"], "report");
}

#[tokio::test]
async fn duplicate_create_is_a_bad_request() {
    let app = test_app();
    send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            write_body("report.pdf", b"x"),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            write_body("report.pdf", b"y"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "A filename already exists in that contract_number.");
}

#[tokio::test]
async fn invalid_filenames_and_bodies_are_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            write_body("a/b.pdf", b"x"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A filename cant have '/' on it.");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            json!({ "filename": "report.pdf" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_resources_answer_404() {
    let app = test_app();

    let (status, body) = send(&app, get_request("/api/contracts/c-100/files")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contract Number not found.");

    let (status, body) = send(&app, get_request("/api/contracts/c-100/files/none.pdf")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "File not found.");

    let (status, body) = send(
        &app,
        get_request("/api/contracts/c-100/files/none.pdf/versions"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Filename not found.");
}

#[tokio::test]
async fn archiving_makes_a_file_unreadable() {
    let app = test_app();
    let (_, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files",
            write_body("report.pdf", b"x"),
        ),
    )
    .await;
    let version_id = body["version_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files/report.pdf/archive",
            json!({ "version_id": version_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File updated succesfully.");
    assert_eq!(body["data"]["version_id"], version_id);

    let (status, body) = send(&app, get_request("/api/contracts/c-100/files/report.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "File is in Glacier storage, you must restore it first."
    );

    // Re-archiving the same version conflicts.
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/contracts/c-100/files/report.pdf/archive",
            json!({ "version_id": version_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn contract_archive_reports_every_file() {
    let app = test_app();
    for filename in ["alpha.pdf", "beta.pdf"] {
        send(
            &app,
            json_request(
                "POST",
                "/api/contracts/c-100/files",
                write_body(filename, b"x"),
            ),
        )
        .await;
    }

    let archive_request = Request::builder()
        .method("POST")
        .uri("/api/contracts/c-100/archive")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, archive_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File updated succesfully.");
    assert_eq!(body["data"]["archived"].as_array().unwrap().len(), 2);
    assert!(body["data"]["skipped"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn upload_tickets_point_at_the_staging_bucket() {
    let app = test_app();
    let ticket_request = Request::builder()
        .method("POST")
        .uri("/api/contracts/c-100/files/report.pdf/upload-ticket")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, ticket_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["method"], "PUT");
    assert!(body["key"].as_str().unwrap().starts_with("c-100/report/"));
    assert!(body["url"].as_str().unwrap().contains("staging"));
}
