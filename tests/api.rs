use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use modgate::api::{build_router, AppState, MAX_UPLOAD_BYTES};
use modgate::db::Database;
use modgate::errors::GatewayError;
use modgate::moderation::rules::{CategoryRule, SIGHTENGINE_RULES};
use modgate::moderation::{
    ClassificationReport, Classifier, ClassifierOutcome, ImageUpload, ModerationEngine, ThresholdTable,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];

struct StubClassifier {
    outcome: fn() -> Result<ClassifierOutcome, GatewayError>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _upload: &ImageUpload) -> Result<ClassifierOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
    fn rules(&self) -> &'static [CategoryRule] { SIGHTENGINE_RULES }
    fn provider_name(&self) -> &str { "stub" }
}

fn report_outcome(value: Value) -> Result<ClassifierOutcome, GatewayError> {
    Ok(ClassifierOutcome::Report(ClassificationReport::from_value(value)?))
}

fn safe_outcome() -> Result<ClassifierOutcome, GatewayError> {
    report_outcome(json!({
        "status": "success",
        "nudity": {"sexual_activity": 0.01, "sexual_display": 0.01, "erotica": 0.01, "suggestive": 0.01},
        "weapon": {"classes": {"firearm": 0.01, "knife": 0.01}},
        "alcohol": {"prob": 0.01},
        "recreational_drug": {"prob": 0.01},
        "offensive": {"nazi": 0.01, "supremacist": 0.01, "terrorist": 0.01},
        "gore": {"prob": 0.01},
        "tobacco": {"prob": 0.01},
        "violence": {"prob": 0.01},
        "self-harm": {"prob": 0.01}
    }))
}

fn weapon_outcome() -> Result<ClassifierOutcome, GatewayError> {
    report_outcome(json!({
        "status": "success",
        "weapon": {"classes": {"firearm": 0.9, "knife": 0.01}}
    }))
}

fn rejected_outcome() -> Result<ClassifierOutcome, GatewayError> {
    Ok(ClassifierOutcome::Rejected { message: "Incorrect API user or secret".into() })
}

fn failing_outcome() -> Result<ClassifierOutcome, GatewayError> {
    Err(GatewayError::Network("connection refused".into()))
}

fn create_test_state(outcome: fn() -> Result<ClassifierOutcome, GatewayError>) -> (AppState, Arc<StubClassifier>) {
    let db = Database::in_memory().unwrap();
    let stub = Arc::new(StubClassifier { outcome, calls: AtomicUsize::new(0) });
    let engine = ModerationEngine::new(stub.clone(), Arc::new(ThresholdTable::default()));
    (AppState::new(db, engine), stub)
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> axum::http::Request<Body> {
    let mut builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {}", t));
    }

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn upload_request(token: Option<&str>, field: &str, filename: &str, bytes: &[u8]) -> axum::http::Request<Body> {
    let boundary = "modgate-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    ).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut builder = axum::http::Request::builder()
        .method("POST")
        .uri("/api/moderate")
        .header("content-type", format!("multipart/form-data; boundary={}", boundary));
    if let Some(t) = token {
        builder = builder.header("Authorization", format!("Bearer {}", t));
    }
    builder.body(Body::from(body)).unwrap()
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_root_and_health() {
    let (state, _) = create_test_state(safe_outcome);

    let response = app(&state).oneshot(make_request("GET", "/", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["message"], "Welcome to Image Moderation API");

    let response = app(&state).oneshot(make_request("GET", "/api/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "modgate");
    assert_eq!(body["provider"], "stub");
}

#[tokio::test]
async fn test_bootstrap_token_without_auth() {
    let (state, _) = create_test_state(safe_outcome);

    let req = make_request("POST", "/api/auth/tokens", None, Some(json!({"isAdmin": true})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["isAdmin"], true);
    assert!(body["createdAt"].is_string());
    let token = body["token"].as_str().unwrap();
    assert!(state.db.get_token(token).unwrap().is_some());
}

#[tokio::test]
async fn test_token_creation_after_bootstrap_requires_admin() {
    let (state, _) = create_test_state(safe_outcome);
    let admin = state.db.create_token(true).unwrap();
    let user = state.db.create_token(false).unwrap();

    let req = make_request("POST", "/api/auth/tokens", None, Some(json!({"isAdmin": false})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = make_request("POST", "/api/auth/tokens", Some(&user.token), Some(json!({"isAdmin": false})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response_json(response).await["error"], "Admin privileges required");

    let req = make_request("POST", "/api/auth/tokens", Some(&admin.token), Some(json!({"isAdmin": false})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_json(response).await["isAdmin"], false);
    assert_eq!(state.db.count_tokens().unwrap(), 3);
}

#[tokio::test]
async fn test_list_tokens_admin_only() {
    let (state, _) = create_test_state(safe_outcome);
    let admin = state.db.create_token(true).unwrap();
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(make_request("GET", "/api/auth/tokens", Some(&admin.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app(&state).oneshot(make_request("GET", "/api/auth/tokens", Some(&user.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_and_invalid_bearer() {
    let (state, _) = create_test_state(safe_outcome);

    let response = app(&state).oneshot(make_request("GET", "/api/auth/tokens", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response_json(response).await["error"], "Not authenticated");

    let response = app(&state).oneshot(make_request("GET", "/api/auth/usage/my-usage", Some("forged"), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response_json(response).await["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_delete_token() {
    let (state, _) = create_test_state(safe_outcome);
    let admin = state.db.create_token(true).unwrap();
    let victim = state.db.create_token(false).unwrap();
    let uri = format!("/api/auth/tokens/{}", victim.token);

    let response = app(&state).oneshot(make_request("DELETE", &uri, Some(&admin.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["message"], "Token deleted successfully");
    assert!(state.db.get_token(&victim.token).unwrap().is_none());

    let response = app(&state).oneshot(make_request("DELETE", &uri, Some(&admin.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "Token not found");
}

#[tokio::test]
async fn test_moderate_safe_image() {
    let (state, stub) = create_test_state(safe_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["is_safe"], true);
    assert_eq!(body["message"], "Image is safe");
    assert!(body["details"]["violations"].as_array().unwrap().is_empty());
    assert_eq!(body["details"]["content_analysis"]["status"], "success");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_moderate_unsafe_image() {
    let (state, _) = create_test_state(weapon_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["is_safe"], false);
    assert_eq!(body["message"], "Image contains inappropriate content");
    assert_eq!(body["details"]["violations"], json!(["weapon"]));
}

#[tokio::test]
async fn test_moderate_non_image_skips_classifier() {
    let (state, stub) = create_test_state(safe_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state)
        .oneshot(upload_request(Some(&user.token), "file", "disguised.png", b"just some text, not pixels"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body, json!({
        "is_safe": false,
        "message": "File is not a valid image",
        "details": {"error": "Invalid file type"}
    }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_moderate_provider_rejection() {
    let (state, _) = create_test_state(rejected_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["is_safe"], false);
    assert_eq!(body["message"], "Error analyzing image");
    assert_eq!(body["details"]["error"], "Incorrect API user or secret");
}

#[tokio::test]
async fn test_moderate_classifier_fault_is_500() {
    let (state, _) = create_test_state(failing_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Error processing image"), "got {}", error);
    assert!(error.contains("connection refused"));
}

#[tokio::test]
async fn test_moderate_missing_file_field() {
    let (state, stub) = create_test_state(safe_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "image", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_moderate_oversized_upload_is_413() {
    let (state, stub) = create_test_state(safe_outcome);
    let user = state.db.create_token(false).unwrap();

    let mut bytes = PNG_BYTES.to_vec();
    bytes.resize(MAX_UPLOAD_BYTES + 1, 0);
    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "huge.png", &bytes)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error = response_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Upload too large"), "got {}", error);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_moderate_requires_token() {
    let (state, stub) = create_test_state(safe_outcome);

    let response = app(&state).oneshot(upload_request(None, "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_usage_is_recorded_and_queryable() {
    let (state, _) = create_test_state(safe_outcome);
    let admin = state.db.create_token(true).unwrap();
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(upload_request(Some(&user.token), "file", "test.png", PNG_BYTES)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    state.usage.flush().await;
    let recorded = state.db.list_usages_by_token(&user.token).unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].endpoint, "/moderate");

    let response = app(&state).oneshot(make_request("GET", "/api/auth/usage/my-usage", Some(&user.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body.as_array().unwrap().iter().any(|u| u["endpoint"] == "/moderate"));

    let uri = format!("/api/auth/usage/token/{}", user.token);
    let response = app(&state).oneshot(make_request("GET", &uri, Some(&admin.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body.as_array().unwrap().iter().all(|u| u["token"] == user.token.as_str()));

    let response = app(&state).oneshot(make_request("GET", "/api/auth/usage/endpoint/moderate", Some(&admin.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["endpoint"], "/moderate");
    assert!(records[0]["timestamp"].is_string());
}

#[tokio::test]
async fn test_usage_queries_admin_only() {
    let (state, _) = create_test_state(safe_outcome);
    let user = state.db.create_token(false).unwrap();

    let response = app(&state).oneshot(make_request("GET", "/api/auth/usage/endpoint/moderate", Some(&user.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let uri = format!("/api/auth/usage/token/{}", user.token);
    let response = app(&state).oneshot(make_request("GET", &uri, Some(&user.token), None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
