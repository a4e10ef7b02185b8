//! Authorization-lookup (scrubbing) client.
//!
//! First phase of the primary path: validates a message/recipient pair and
//! returns a one-time authorization code.

use crate::api::ApiError;
use crate::session::FormParameters;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

/// Client for the scrubbing service.
pub struct ScrubbingClient {
    endpoint: String,
    client: HttpClient,
}

impl ScrubbingClient {
    /// Creates a client for the given endpoint.
    ///
    /// No request timeout is set: the workflow loop simply waits for each
    /// call to resolve, and only the relay bounds its outbound calls.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: HttpClient::new(),
        }
    }

    /// Issues the authorization lookup for one contact.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` on connectivity failure,
    /// `ApiError::Status` on a non-success status, or `ApiError::Json` if
    /// the body is not JSON.
    pub async fn lookup(
        &self,
        params: &FormParameters,
        number: &str,
    ) -> Result<Value, ApiError> {
        debug!(endpoint = %self.endpoint, number = %number, "scrubbing lookup");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("coverage", params.coverage.as_str()),
                ("routes", params.routes.as_str()),
                ("senderid", params.senderid.as_str()),
                ("pe_id", params.pe_id.as_str()),
                ("number", number),
                ("content_id", params.content_id.as_str()),
                ("message", params.message.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                service: "Scrubbing API",
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Json(e.to_string()))
    }
}

/// Extracts the authorization code from a scrubbing response.
///
/// The response must carry a truthy `status` flag and a `data.authcode`
/// string; anything else yields `None`.
#[must_use]
pub fn authcode(response: &Value) -> Option<&str> {
    if response.get("status").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    response
        .get("data")
        .and_then(|data| data.get("authcode"))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn authcode_extracted_when_status_true() {
        let response = json!({"status": true, "data": {"authcode": "A1B2"}});
        assert_eq!(authcode(&response), Some("A1B2"));
    }

    #[test]
    fn authcode_missing_when_status_false() {
        let response = json!({"status": false, "data": {"authcode": "A1B2"}});
        assert_eq!(authcode(&response), None);
    }

    #[test]
    fn authcode_missing_when_data_absent() {
        let response = json!({"status": true});
        assert_eq!(authcode(&response), None);
    }
}
