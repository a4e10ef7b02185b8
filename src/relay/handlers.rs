//! Relay endpoint handlers.
//!
//! Two GET endpoints forward the primary-path queries unchanged; the POST
//! endpoint runs the full backup sequence (scrubbing init, hex transform,
//! verification) server-side and returns both responses combined.

use super::RelayState;
use crate::api::backup::missing_fields;
use crate::api::scrubbing::authcode;
use crate::encoding::text_to_hex;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// GET relay for the authorization-lookup query.
pub(crate) async fn scrubbing_logs(
    State(state): State<RelayState>,
    RawQuery(query): RawQuery,
) -> Response {
    let url = with_query(&state.settings.relay_scrubbing_url, query.as_deref());
    forward_json(&state.client, &url).await
}

/// GET relay for the dispatch query; this upstream may answer raw text.
pub(crate) async fn send_sms(
    State(state): State<RelayState>,
    RawQuery(query): RawQuery,
) -> Response {
    let url = with_query(&state.settings.relay_sms_url, query.as_deref());
    forward_text_or_json(&state.client, &url).await
}

/// POST endpoint performing the two-phase backup sequence.
pub(crate) async fn process_message(
    State(state): State<RelayState>,
    Json(payload): Json<Value>,
) -> Response {
    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("Missing required fields: {}", missing.join(", ")),
            })),
        )
            .into_response();
    }

    let number = payload
        .get("number")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    info!(number = %number, "process-message: starting backup sequence");

    let init =
        match post_json(&state.client, &state.settings.relay_scrubbing_url, &payload).await {
            Ok(body) => body,
            Err(e) => return e.into_response(),
        };

    let Some(code) = authcode(&init).map(ToString::to_string) else {
        error!(number = %number, "scrubbing init call failed");
        return (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": "INIT-API call failed", "details": init})),
        )
            .into_response();
    };

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let verify_payload = json!({
        "authcode": code,
        "senderid": payload["senderid"],
        "pe_id": payload["pe_id"],
        "number": payload["number"],
        "content_id": payload["content_id"],
        "message_hex": text_to_hex(message),
    });

    debug!(number = %number, "process-message: calling verify upstream");
    let verify =
        match post_json(&state.client, &state.settings.relay_verify_url, &verify_payload).await {
            Ok(body) => body,
            Err(e) => return e.into_response(),
        };

    info!(number = %number, "process-message: backup sequence complete");
    (
        StatusCode::OK,
        Json(json!({"init_response": init, "verify_response": verify})),
    )
        .into_response()
}

/// Upstream call failure surfaced as a 502 carrying the upstream error body.
struct UpstreamError {
    message: String,
    details: Option<Value>,
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        error!(message = %self.message, "upstream call failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": self.message, "details": self.details})),
        )
            .into_response()
    }
}

fn with_query(base: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{base}?{q}"),
        _ => base.to_string(),
    }
}

async fn forward_json(client: &HttpClient, url: &str) -> Response {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.json::<Value>().await {
                    Ok(body) => (StatusCode::OK, Json(body)).into_response(),
                    Err(e) => proxy_error(StatusCode::BAD_GATEWAY, &e.to_string(), None),
                }
            } else {
                let details = response.json::<Value>().await.ok();
                proxy_error(status, &format!("upstream returned {status}"), details)
            }
        }
        Err(e) => proxy_error(StatusCode::BAD_GATEWAY, &e.to_string(), None),
    }
}

async fn forward_text_or_json(client: &HttpClient, url: &str) -> Response {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.text().await {
                    Ok(text) => {
                        // Non-JSON upstream bodies come back JSON-encoded as
                        // a plain string.
                        let body = serde_json::from_str::<Value>(&text)
                            .unwrap_or(Value::String(text));
                        (StatusCode::OK, Json(body)).into_response()
                    }
                    Err(e) => proxy_error(StatusCode::BAD_GATEWAY, &e.to_string(), None),
                }
            } else {
                let details = response.json::<Value>().await.ok();
                proxy_error(status, &format!("upstream returned {status}"), details)
            }
        }
        Err(e) => proxy_error(StatusCode::BAD_GATEWAY, &e.to_string(), None),
    }
}

async fn post_json(client: &HttpClient, url: &str, body: &Value) -> Result<Value, UpstreamError> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| UpstreamError {
            message: e.to_string(),
            details: None,
        })?;

    let status = response.status();
    if !status.is_success() {
        let details = response.json::<Value>().await.ok();
        return Err(UpstreamError {
            message: format!("Request failed with status code {}", status.as_u16()),
            details,
        });
    }

    response.json::<Value>().await.map_err(|e| UpstreamError {
        message: e.to_string(),
        details: None,
    })
}

fn proxy_error(status: StatusCode, message: &str, error: Option<Value>) -> Response {
    error!(%status, message, "proxy error");
    (
        status,
        Json(json!({
            "status": false,
            "message": format!("Proxy error: {message}"),
            "error": error,
        })),
    )
        .into_response()
}
