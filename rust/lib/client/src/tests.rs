//! Client tests against a real axum server on an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use jobboard_core::{ApplicationForm, JobBoard, JobId, JobStore, NoticeLevel, Resume};
use serde_json::{json, Value};

use super::*;

const TOKEN: &str = "employer-jwt";

#[tokio::test]
async fn no_auth_returns_none() {
    let ts = NoAuth;
    assert!(ts.token().await.unwrap().is_none());
}

#[tokio::test]
async fn static_token_returns_value() {
    let ts = StaticToken::new("my-jwt-token");
    assert_eq!(ts.token().await.unwrap(), Some("my-jwt-token".to_string()));
}

#[test]
fn error_message_prefers_message_then_error() {
    let s = reqwest::StatusCode::BAD_REQUEST;
    assert_eq!(error_message(r#"{"message":"bad","error":"worse"}"#, s), "bad");
    assert_eq!(error_message(r#"{"error":"Job not found"}"#, s), "Job not found");
    assert_eq!(error_message("plain failure", s), "plain failure");
    assert_eq!(error_message("", s), "Bad Request");
}

#[test]
fn receipt_reads_nested_or_flat_id() {
    let r = receipt_from(&json!({"message": "ok", "application": {"id": "app-1"}}));
    assert_eq!(r.application_id.as_deref(), Some("app-1"));
    let r = receipt_from(&json!({"applicationId": 42}));
    assert_eq!(r.application_id.as_deref(), Some("42"));
    assert_eq!(r.message, "Application submitted");
}

// ========================================================================
// Test server
// ========================================================================

#[derive(Clone, Default)]
struct Recorded {
    likes: Arc<Mutex<HashMap<String, u32>>>,
    submitted: Arc<Mutex<Vec<(String, String)>>>,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn list_jobs(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "jobs": [
                {
                    "_id": "r1",
                    "title": "Rust Engineer",
                    "company": "Ferrous",
                    "location": "Remote",
                    "job_type": "Full Time",
                    "salary_min": 2000000,
                    "salary_max": 3000000,
                    "likes_count": 4,
                    "status": "open"
                },
                {
                    "id": "r2",
                    "title": "Platform Intern",
                    "company": "Oxide",
                    "job_type": "Internship",
                    "status": "closed"
                }
            ],
            "total": 2
        },
        "query": params,
    }))
}

async fn get_job(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "r1" {
        (StatusCode::OK, Json(json!({"id": "r1", "title": "Rust Engineer"})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "Job not found"})))
    }
}

fn like_reply(rec: &Recorded, id: &str, delta: i64) -> Json<Value> {
    let mut likes = rec.likes.lock().unwrap();
    let count = likes.entry(id.to_string()).or_insert(4);
    *count = (*count as i64 + delta).max(0) as u32;
    Json(json!({"message": "ok", "isLiked": delta > 0, "likesCount": *count}))
}

async fn like(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if bearer(&headers) != Some(TOKEN) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Authentication required"})),
        ));
    }
    Ok(like_reply(&rec, &id, 1))
}

async fn unlike(State(rec): State<Recorded>, Path(id): Path<String>) -> Json<Value> {
    like_reply(&rec, &id, -1)
}

async fn like_status(State(rec): State<Recorded>, Path(id): Path<String>) -> Json<Value> {
    let count = rec.likes.lock().unwrap().get(&id).copied().unwrap_or(0);
    Json(json!({"is_liked": count > 0, "likes_count": count}))
}

async fn submit(State(rec): State<Recorded>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let file = field.file_name().unwrap_or_default().to_string();
            let ct = field.content_type().unwrap_or_default().to_string();
            let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            fields.push((name, format!("{file}|{ct}|{len}")));
        } else {
            let value = field.text().await.unwrap_or_default();
            fields.push((name, value));
        }
    }
    let has_name = fields.iter().any(|(k, v)| k == "fullName" && !v.is_empty());
    *rec.submitted.lock().unwrap() = fields;
    if !has_name {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Full name is required"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "Application submitted successfully", "application": {"id": "app-9"}})),
    )
}

async fn start_test_server() -> (String, Recorded) {
    let rec = Recorded::default();
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/{id}", get(get_job))
        .route("/api/jobs/{id}/like", post(like).delete(unlike).get(like_status))
        .route("/api/applications", post(submit))
        .with_state(rec.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = format!("http://{addr}");
    let http = reqwest::Client::new();
    for _ in 0..50 {
        if http.get(format!("{base_url}/api/health")).send().await.is_ok() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    (base_url, rec)
}

fn client(base_url: &str) -> JobBoardClient {
    JobBoardClient::new(base_url, Arc::new(StaticToken::new(TOKEN)))
}

fn application_form() -> ApplicationForm {
    ApplicationForm {
        full_name: "Priya Sharma".into(),
        email: "priya@example.com".into(),
        phone: "+91 98765 43210".into(),
        experience: "3-5".into(),
        notice_period: "30 days".into(),
        expected_salary: "24 LPA".into(),
        why_interested: "Systems work".into(),
        available_for_interview: "yes".into(),
        resume: Some(Resume::new("cv.pdf", vec![7u8; 2048])),
        ..Default::default()
    }
}

// ========================================================================
// Endpoints
// ========================================================================

#[tokio::test]
async fn health_and_trailing_slash() {
    let (base, _) = start_test_server().await;
    let client = JobBoardClient::new(format!("{base}/"), Arc::new(NoAuth));
    assert_eq!(client.base_url(), base);
    assert_eq!(client.health().await.unwrap()["status"], "ok");
}

#[tokio::test]
async fn list_jobs_sends_query() {
    let (base, _) = start_test_server().await;
    let query = JobQuery {
        page: 2,
        limit: 10,
        status: Some("open".into()),
        job_type: None,
    };
    let body = client(&base).list_jobs(&query).await.unwrap();
    assert_eq!(body["query"]["page"], "2");
    assert_eq!(body["query"]["limit"], "10");
    assert_eq!(body["query"]["status"], "open");
    assert_eq!(body["query"]["simple"], "true");
    assert!(body["query"].get("job_type").is_none());
    assert_eq!(body["data"]["jobs"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn not_found_carries_error_field() {
    let (base, _) = start_test_server().await;
    let c = client(&base);
    assert_eq!(c.get_job("r1").await.unwrap()["title"], "Rust Engineer");
    match c.get_job("gone").await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Job not found");
        }
        other => panic!("expected 404, got {other:?}"),
    }
}

#[tokio::test]
async fn like_requires_bearer_token() {
    let (base, _) = start_test_server().await;
    let anon = JobBoardClient::new(&base, Arc::new(NoAuth));
    match anon.like_job("r1").await {
        Err(ApiError::Server { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication required");
        }
        other => panic!("expected 401, got {other:?}"),
    }

    let state = client(&base).like_job("r1").await.unwrap();
    assert_eq!(
        state,
        LikeState {
            is_liked: true,
            likes_count: 5
        }
    );
}

#[tokio::test]
async fn unlike_and_status() {
    let (base, _) = start_test_server().await;
    let c = client(&base);
    c.like_job("r1").await.unwrap();
    let state = c.unlike_job("r1").await.unwrap();
    assert!(!state.is_liked);
    assert_eq!(state.likes_count, 4);

    // Snake-case body is accepted as well.
    let status = c.like_status("r1").await.unwrap();
    assert_eq!(status.likes_count, 4);
}

#[tokio::test]
async fn submit_application_multipart() {
    let (base, rec) = start_test_server().await;
    let job = JobStore::seeded().get(&JobId::Local(1)).unwrap();
    let application = application_form().into_application(&job).unwrap();

    let receipt = client(&base).submit_application(&application).await.unwrap();
    assert_eq!(receipt.message, "Application submitted successfully");
    assert_eq!(receipt.application_id.as_deref(), Some("app-9"));

    let fields = rec.submitted.lock().unwrap().clone();
    let get = |k: &str| fields.iter().find(|(n, _)| n == k).map(|(_, v)| v.clone());
    assert_eq!(get("jobId").as_deref(), Some("1"));
    assert_eq!(get("fullName").as_deref(), Some("Priya Sharma"));
    assert_eq!(get("availableForInterview").as_deref(), Some("yes"));
    assert_eq!(get("resume").as_deref(), Some("cv.pdf|application/pdf|2048"));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = JobBoardClient::new(format!("http://{addr}"), Arc::new(NoAuth));
    let err = c.health().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(matches!(BackendError::from(err), BackendError::Network(_)));
}

// ========================================================================
// Board over HTTP
// ========================================================================

#[tokio::test]
async fn board_loads_and_likes_over_http() {
    let (base, _) = start_test_server().await;
    let board = JobBoard::new(Arc::new(JobStore::new())).with_backend(Arc::new(client(&base)));

    assert_eq!(board.load(&JobQuery::default()).await.unwrap(), 2);
    assert_eq!(board.store().len(), 2);

    // The closed record is stored but not listed.
    let listed = board.listing();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Rust Engineer");
    assert_eq!(listed[0].compensation.display(), "₹20-30 LPA");

    let id = JobId::Remote("r1".into());
    let state = board.toggle_like(&id).await.unwrap().unwrap();
    assert!(state.is_liked);
    assert_eq!(board.get(&id).unwrap().likes_count, 5);

    let notices = board.drain_notices();
    assert!(notices
        .iter()
        .any(|n| n.level == NoticeLevel::Info && n.title == "Added to favorites"));
}

#[tokio::test]
async fn board_apply_over_http() {
    let (base, rec) = start_test_server().await;
    let board = JobBoard::new(Arc::new(JobStore::seeded())).with_backend(Arc::new(client(&base)));

    let receipt = board.apply(&JobId::Local(3), application_form()).await.unwrap();
    assert_eq!(receipt.application_id.as_deref(), Some("app-9"));
    assert!(rec
        .submitted
        .lock()
        .unwrap()
        .iter()
        .any(|(k, v)| k == "company" && v == "Amazon"));
}
