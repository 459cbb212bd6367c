//! Integration tests for the REST API against the in-memory store

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use heartwatch::adapters::store::{MemoryStore, RecordStore};
use heartwatch::api::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    router(AppState::new(store), true)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, value)
}

async fn seed(app: &Router) {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/patients",
        Some(json!({"patient_id": "P0001", "age": 54, "gender": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        Method::POST,
        "/api/medical-records",
        Some(json!({
            "record_id": "R0001",
            "patient_id": "P0001",
            "heart_rate": 72,
            "systolic_blood_pressure": 120,
            "diastolic_blood_pressure": 80,
            "blood_sugar": 95
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app,
        Method::POST,
        "/api/heart-attack-tests",
        Some(json!({
            "test_id": "T0001",
            "record_id": "R0001",
            "ck_mb": 5.2,
            "troponin": 0.03,
            "result": "negative",
            "test_date": "2024-03-01T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_latest_entry_empty_store_is_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/latest-entry", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "No heart attack tests found"}));
}

#[tokio::test]
async fn test_latest_entry_joins_all_three() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/latest-entry", None).await;
    assert_eq!(status, StatusCode::OK);
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(body["patient"]["patient_id"], "P0001");
    assert_eq!(body["patient"]["gender"], 1);
    assert_eq!(body["medical_record"]["heart_rate"], 72);
    assert_eq!(body["heart_attack_test"]["troponin"], 0.03);
    assert_eq!(body["heart_attack_test"]["result"], "negative");
}

#[tokio::test]
async fn test_latest_entry_with_dangling_record_link() {
    let app = app();
    seed(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/heart-attack-tests",
        Some(json!({
            "test_id": "T0002",
            "record_id": "R9999",
            "ck_mb": 1.0,
            "troponin": 0.01,
            "result": "negative",
            "test_date": "2024-04-01T12:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/api/latest-entry", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["heart_attack_test"]["test_id"], "T0002");
    assert!(body["medical_record"].is_null());
    assert!(body["patient"].is_null());
}

#[tokio::test]
async fn test_patient_crud() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({"age": 40, "gender": "female"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["inserted_id"].as_str().unwrap().to_string();
    assert!(id.starts_with('P'));
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, &format!("/api/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gender"], 0);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/patients/{id}"),
        Some(json!({"age": 41})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched_count"], 1);
    assert_eq!(body["modified_count"], 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/patients/{id}"),
        Some(json!({"age": 41})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modified_count"], 0);

    let (status, body) = send(&app, Method::GET, "/api/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_count"], 1);

    let (status, body) = send(&app, Method::GET, &format!("/api/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_duplicate_patient_is_409() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({"patient_id": "P0001", "age": 30, "gender": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_out_of_range_age_is_422() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({"age": 131, "gender": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("age"));
}

#[tokio::test]
async fn test_record_for_unknown_patient_is_404() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/medical-records",
        Some(json!({
            "patient_id": "P4242",
            "heart_rate": 72,
            "systolic_blood_pressure": 120,
            "diastolic_blood_pressure": 80,
            "blood_sugar": 95
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filtered_listings() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/medical-records/patient/P0001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/medical-records/patient/P0002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/api/heart-attack-tests/record/R0001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["test_id"], "T0001");

    let (status, _) = send(&app, Method::GET, "/api/heart-attack-tests/record/R0002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_heart_attack_test() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/heart-attack-tests/T0001",
        Some(json!({"result": "positive"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modified_count"], 1);

    let (_, body) = send(&app, Method::GET, "/api/heart-attack-tests/T0001", None).await;
    assert_eq!(body["result"], "positive");

    let (status, _) = send(&app, Method::DELETE, "/api/heart-attack-tests/T0001", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/api/heart-attack-tests/T0001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_fields_are_rejected_with_detail() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/patients",
        Some(json!({"age": 40, "gender": 1, "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("unknown field"));
}

#[tokio::test]
async fn test_wrong_field_type_is_422_with_detail() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/patients/P0001",
        Some(json!({"age": "forty"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_unparseable_body_is_400_with_detail() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/heart-attack-tests")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["detail"].is_string());
}
