//! Backup-path client.
//!
//! Submits one request to the relay's `process-message` endpoint, which runs
//! the full two-phase sequence server-side and returns both intermediate
//! responses combined.

use crate::api::ApiError;
use crate::session::FormParameters;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::debug;

/// Fields the relay requires in a `process-message` payload.
pub const REQUIRED_FIELDS: [&str; 5] = ["senderid", "pe_id", "number", "content_id", "message"];

/// Client for the relay's backup endpoint.
pub struct BackupClient {
    endpoint: String,
    client: HttpClient,
}

impl BackupClient {
    /// Creates a client for the given relay endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: HttpClient::new(),
        }
    }

    /// Runs the combined backup sequence for one contact.
    ///
    /// Required fields are validated locally before any request is made,
    /// mirroring the relay's own check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidResponse` when a required field is empty,
    /// `ApiError::Network`/`ApiError::Status` on transport or status
    /// failures, and `ApiError::Api` when the relay reports an error body.
    pub async fn process(
        &self,
        params: &FormParameters,
        number: &str,
    ) -> Result<Value, ApiError> {
        let payload = json!({
            "senderid": params.senderid,
            "pe_id": params.pe_id,
            "number": number,
            "content_id": params.content_id,
            "message": params.message,
        });

        let missing = missing_fields(&payload);
        if !missing.is_empty() {
            return Err(ApiError::InvalidResponse(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        debug!(endpoint = %self.endpoint, number = %number, "backup process-message");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                service: "Backup API",
                status,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Json(e.to_string()))?;

        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(ApiError::Api(error.to_string()));
        }

        Ok(body)
    }
}

/// Lists required fields that are absent or empty in `payload`.
#[must_use]
pub fn missing_fields(payload: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .filter(|field| !payload.get(**field).is_some_and(is_present))
        .copied()
        .collect()
}

// Empty strings, null, false, and zero all count as missing.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
