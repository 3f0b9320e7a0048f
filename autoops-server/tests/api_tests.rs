//! HTTP API tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use autoops_core::{AutoOpsError, EventStore};
use autoops_server::supervisor::{ShiftMissingRequest, SupervisorRecommendation};
use autoops_server::{AppState, AutoOpsServer, ServerConfig, Supervisor, WebhookSupervisor};

enum StubSupervisor {
    Replace,
    Fail,
}

#[async_trait]
impl Supervisor for StubSupervisor {
    fn name(&self) -> &str {
        "stub"
    }

    async fn recommend(
        &self,
        request: &ShiftMissingRequest,
    ) -> autoops_core::Result<SupervisorRecommendation> {
        match self {
            StubSupervisor::Replace => Ok(serde_json::from_value(json!({
                "replacement_employee_id": "emp_002",
                "replacement_employee_name": "Alex Kim",
                "confidence": 0.84,
                "reasoning": [format!("Covers {}", request.shift_id)],
                "all_candidates": [
                    {"id": "emp_002", "name": "Alex Kim", "score": 0.84, "reasons": ["available"]},
                    {"id": "emp_009", "name": "Jo Park", "score": 0.2, "reasons": ["on leave"]}
                ]
            }))
            .unwrap()),
            StubSupervisor::Fail => Err(AutoOpsError::SupervisorFailed {
                reason: "Supervisor timed out".to_string(),
            }),
        }
    }
}

fn app() -> Router {
    AutoOpsServer::with_state(AppState::new(EventStore::demo()), ServerConfig::default()).router()
}

fn app_with(supervisor: StubSupervisor) -> Router {
    let state = AppState::new(EventStore::demo()).with_supervisor(Arc::new(supervisor));
    AutoOpsServer::with_state(state, ServerConfig::default()).router()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "autoops-api");
}

#[tokio::test]
async fn test_list_events() {
    let (status, body) = send(&app(), get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);

    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0]["id"], "evt_1001");
    assert_eq!(events[0]["type"], "shift_coverage");
    assert_eq!(events[0]["shift_id"], 42);
}

#[tokio::test]
async fn test_event_detail_with_and_without_decision() {
    let app = app();

    let (status, body) = send(&app, get("/api/events/evt_1001")).await;
    assert_eq!(status, StatusCode::OK);
    let alternatives = body["decision"]["alternatives"].as_array().unwrap();
    let selected: Vec<_> = alternatives
        .iter()
        .filter(|a| a["selected"] == json!(true))
        .collect();
    assert_eq!(selected.len(), 1);

    let (status, body) = send(&app, get("/api/events/evt_1003")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("decision").is_none());
}

#[tokio::test]
async fn test_unknown_event_is_404() {
    let (status, body) = send(&app(), get("/api/events/evt_9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn test_override_resolves_event() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/events/evt_1002/override",
            json!({"reason": "Approved by regional manager", "new_selection": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["event_id"], "evt_1002");
    assert!(body["overridden_at"].is_string());

    let (_, detail) = send(&app, get("/api/events/evt_1002")).await;
    assert_eq!(detail["event"]["status"], "resolved");
    assert_eq!(detail["decision"]["selected"], "Approve automatically");
    assert_eq!(detail["decision"]["override"]["reason"], "Approved by regional manager");

    let (_, list) = send(&app, get("/api/events")).await;
    let payout = list["events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == "evt_1002")
        .unwrap()
        .clone();
    assert_eq!(payout["status"], "resolved");
}

#[tokio::test]
async fn test_override_rejections() {
    let app = app();

    let (status, body) = send(
        &app,
        post_json("/api/events/evt_1002/override", json!({"reason": "123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "REASON_TOO_SHORT");

    let (status, _) = send(
        &app,
        post_json("/api/events/evt_9999/override", json!({"reason": "Unknown event here"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        post_json("/api/events/evt_1003/override", json!({"reason": "Nothing to override"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "NO_DECISION");

    let (_, detail) = send(&app, get("/api/events/evt_1002")).await;
    assert_eq!(detail["event"]["status"], "pending");
}

#[tokio::test]
async fn test_intake_without_supervisor_is_503() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/intake/shift-missing",
            json!({"shift_id": "shift_123", "missing_employee_id": "emp_001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SUPERVISOR_UNAVAILABLE");
}

#[tokio::test]
async fn test_intake_records_supervisor_decision() {
    let app = app_with(StubSupervisor::Replace);

    let (status, body) = send(
        &app,
        post_json(
            "/api/intake/shift-missing",
            json!({"event_type": "shift_missing", "shift_id": "shift_123", "missing_employee_id": "emp_001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["replacement_employee_id"], "emp_002");
    assert!(body.get("error").is_none());

    let event_id = body["event_id"].as_str().unwrap().to_string();
    let (status, detail) = send(&app, get(&format!("/api/events/{}", event_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["event"]["type"], "shift_coverage");
    assert_eq!(detail["event"]["status"], "resolved");
    assert_eq!(detail["decision"]["selected"], "Alex Kim");
    assert_eq!(detail["decision"]["alternatives"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_intake_failure_is_escalated() {
    let app = app_with(StubSupervisor::Fail);

    let (status, body) = send(
        &app,
        post_json(
            "/api/intake/shift-missing",
            json!({"shift_id": "shift_123", "missing_employee_id": "emp_001"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], true);
    assert_eq!(body["confidence"], 0.0);

    let event_id = body["event_id"].as_str().unwrap().to_string();
    let (_, detail) = send(&app, get(&format!("/api/events/{}", event_id))).await;
    assert_eq!(detail["event"]["status"], "needs_review");
    assert_eq!(detail["decision"]["action"], "Escalated to manager");
}

#[tokio::test]
async fn test_intake_validation() {
    let app = app_with(StubSupervisor::Replace);
    let (status, body) = send(
        &app,
        post_json(
            "/api/intake/shift-missing",
            json!({"event_type": "payout", "shift_id": "s", "missing_employee_id": "e"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INTAKE");
}

async fn spawn_fake_supervisor(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, router).await.expect("serve app") });
    format!("http://{}/workflow", addr)
}

#[tokio::test]
async fn test_webhook_supervisor_round_trip() {
    let url = spawn_fake_supervisor(Router::new().route(
        "/workflow",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "replacement_employee_id": "emp_002",
                "confidence": 0.9,
                "reasoning": [format!("shift {}", body["shift_id"].as_str().unwrap_or(""))]
            }))
        }),
    ))
    .await;

    let supervisor = WebhookSupervisor::new(url, 5_000).unwrap();
    let rec = supervisor
        .recommend(&ShiftMissingRequest {
            shift_id: "shift_123".to_string(),
            missing_employee_id: "emp_001".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(rec.replacement_employee_id.as_deref(), Some("emp_002"));
    assert_eq!(rec.reasoning, vec!["shift shift_123".to_string()]);
}

#[tokio::test]
async fn test_webhook_supervisor_http_error() {
    let url = spawn_fake_supervisor(Router::new().route(
        "/workflow",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;

    let supervisor = WebhookSupervisor::new(url, 5_000).unwrap();
    let err = supervisor
        .recommend(&ShiftMissingRequest {
            shift_id: "shift_123".to_string(),
            missing_employee_id: "emp_001".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("status 500"));
}

#[tokio::test]
async fn test_webhook_supervisor_timeout() {
    let url = spawn_fake_supervisor(Router::new().route(
        "/workflow",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({}))
        }),
    ))
    .await;

    let supervisor = WebhookSupervisor::new(url, 50).unwrap();
    let err = supervisor
        .recommend(&ShiftMissingRequest {
            shift_id: "shift_123".to_string(),
            missing_employee_id: "emp_001".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "SUPERVISOR_FAILED");
    assert!(err.to_string().contains("timed out"));
}
