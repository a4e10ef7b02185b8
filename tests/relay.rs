//! Relay endpoint behavior: field validation, the backup sequence, and the
//! two forwarding endpoints.

use axum::body::Body;
use axum::extract::RawQuery;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use smsgate::config::Settings;
use smsgate::encoding::text_to_hex;
use smsgate::relay::{router, RelayState};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

fn relay_app(settings: Settings) -> Router {
    router(RelayState::new(Arc::new(settings)))
}

fn post_request(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Binds a stub upstream on an ephemeral port and serves it in the background.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn missing_message_field_rejected() {
    let app = relay_app(Settings::default());
    let payload = json!({"senderid": "S", "pe_id": "P", "number": "1", "content_id": "C"});

    let response = app
        .oneshot(post_request("/process-message", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required fields: message");
}

#[tokio::test]
async fn empty_fields_count_as_missing() {
    let app = relay_app(Settings::default());
    let payload = json!({"senderid": "", "pe_id": "P", "number": "1", "content_id": "C", "message": ""});

    let response = app
        .oneshot(post_request("/process-message", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required fields: senderid, message");
}

#[tokio::test]
async fn backup_sequence_hex_encodes_and_combines() {
    let seen_verify: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_verify);

    let upstream = Router::new()
        .route(
            "/scrub",
            post(|| async { Json(json!({"status": true, "data": {"authcode": "AC-77"}})) }),
        )
        .route(
            "/verify",
            post(move |Json(body): Json<Value>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().expect("verify lock") = Some(body);
                    Json(json!({"status": "ok"}))
                }
            }),
        );
    let base = spawn_stub(upstream).await;

    let settings = Settings {
        relay_scrubbing_url: format!("{base}/scrub"),
        relay_verify_url: format!("{base}/verify"),
        ..Settings::default()
    };
    let app = relay_app(settings);

    let payload = json!({
        "senderid": "S",
        "pe_id": "P",
        "number": "8459188977",
        "content_id": "C",
        "message": "Hi",
    });
    let response = app
        .oneshot(post_request("/process-message", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["init_response"]["data"]["authcode"], "AC-77");
    assert_eq!(body["verify_response"]["status"], "ok");

    let verify = seen_verify
        .lock()
        .expect("verify lock")
        .clone()
        .expect("verify upstream must be called");
    assert_eq!(verify["authcode"], "AC-77");
    assert_eq!(verify["pe_id"], "P");
    assert_eq!(verify["message_hex"], text_to_hex("Hi"));
    assert_eq!(verify["message_hex"], "00480069");
}

#[tokio::test]
async fn init_failure_stops_the_sequence() {
    let upstream = Router::new().route(
        "/scrub",
        post(|| async { Json(json!({"status": false, "message": "blocked"})) }),
    );
    let base = spawn_stub(upstream).await;

    let settings = Settings {
        relay_scrubbing_url: format!("{base}/scrub"),
        // Unroutable on purpose: the verify upstream must never be reached.
        relay_verify_url: "http://127.0.0.1:1/verify".to_string(),
        ..Settings::default()
    };
    let app = relay_app(settings);

    let payload = json!({
        "senderid": "S",
        "pe_id": "P",
        "number": "1",
        "content_id": "C",
        "message": "Hi",
    });
    let response = app
        .oneshot(post_request("/process-message", &payload))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "INIT-API call failed");
    assert_eq!(body["details"]["message"], "blocked");
}

#[tokio::test]
async fn scrubbing_relay_forwards_query() {
    let upstream = Router::new().route(
        "/scrub",
        get(|RawQuery(query): RawQuery| async move {
            Json(json!({"status": true, "echo": query.unwrap_or_default()}))
        }),
    );
    let base = spawn_stub(upstream).await;

    let settings = Settings {
        relay_scrubbing_url: format!("{base}/scrub"),
        ..Settings::default()
    };
    let app = relay_app(settings);

    let response = app
        .oneshot(get_request("/api/scrubbing-logs?coverage=91&number=8459188977"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let echo = body["echo"].as_str().expect("echo string");
    assert!(echo.contains("coverage=91"));
    assert!(echo.contains("number=8459188977"));
}

#[tokio::test]
async fn sms_relay_wraps_raw_text_upstream() {
    let upstream = Router::new().route("/sms", get(|| async { "SMS-SHOOT-ID-999".to_string() }));
    let base = spawn_stub(upstream).await;

    let settings = Settings {
        relay_sms_url: format!("{base}/sms"),
        ..Settings::default()
    };
    let app = relay_app(settings);

    let response = app
        .oneshot(get_request("/api/send-sms?key=K&contacts=1"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, Value::String("SMS-SHOOT-ID-999".to_string()));
}

#[tokio::test]
async fn unreachable_upstream_reports_proxy_error() {
    let settings = Settings {
        relay_scrubbing_url: "http://127.0.0.1:1/scrub".to_string(),
        ..Settings::default()
    };
    let app = relay_app(settings);

    let response = app
        .oneshot(get_request("/api/scrubbing-logs?coverage=91"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["status"], false);
    let message = body["message"].as_str().expect("message string");
    assert!(message.starts_with("Proxy error:"));
}
