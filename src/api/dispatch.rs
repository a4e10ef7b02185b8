//! SMS dispatch client.
//!
//! Second phase of the primary path: queues the SMS for delivery using the
//! authorization code from the scrubbing lookup. The dispatch service
//! answers with JSON, a shoot-id line, or opaque text.

use crate::api::ApiError;
use crate::config::Settings;
use crate::session::FormParameters;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Sentinel prefix marking a non-JSON success response.
pub const SHOOT_ID_PREFIX: &str = "SMS-SHOOT-ID";

/// Decoded dispatch response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchResponse {
    /// Body parsed as JSON.
    Json(Value),
    /// Raw text beginning with [`SHOOT_ID_PREFIX`], preserved verbatim.
    ShootId(String),
    /// Any other raw text, treated as an opaque success.
    Raw(String),
}

impl DispatchResponse {
    /// Decodes a raw dispatch body.
    #[must_use]
    pub fn decode(text: String) -> Self {
        if text.starts_with(SHOOT_ID_PREFIX) {
            return Self::ShootId(text);
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Raw(text),
        }
    }

    /// The raw text for non-JSON responses.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::ShootId(text) | Self::Raw(text) => Some(text),
            Self::Json(_) => None,
        }
    }
}

/// Client for the SMS dispatch service.
pub struct DispatchClient {
    endpoint: String,
    key: String,
    campaign: String,
    client: HttpClient,
}

impl DispatchClient {
    /// Creates a client from the configured endpoint, key, and campaign.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: settings.sms_api_url.clone(),
            key: settings.sms_api_key.clone(),
            campaign: settings.sms_campaign.clone(),
            client: HttpClient::new(),
        }
    }

    /// Queues the SMS for one contact using `authcode` from the lookup.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` on connectivity failure or
    /// `ApiError::Status` on a non-success status. Any 2xx body decodes to
    /// a successful [`DispatchResponse`].
    pub async fn send(
        &self,
        params: &FormParameters,
        number: &str,
        authcode: &str,
    ) -> Result<DispatchResponse, ApiError> {
        debug!(endpoint = %self.endpoint, number = %number, "sms dispatch");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.key.as_str()),
                ("campaign", self.campaign.as_str()),
                ("routeid", params.routes.as_str()),
                ("type", "text"),
                ("contacts", number),
                ("peid", params.pe_id.as_str()),
                ("cid", params.content_id.as_str()),
                ("contentid", params.content_id.as_str()),
                ("senderid", params.senderid.as_str()),
                ("authcode", authcode),
                ("msg", params.message.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                service: "SMS API",
                status,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(DispatchResponse::decode(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shoot_id_prefix_wins_over_json() {
        let decoded = DispatchResponse::decode("SMS-SHOOT-ID-12345".to_string());
        assert_eq!(decoded, DispatchResponse::ShootId("SMS-SHOOT-ID-12345".to_string()));
        assert_eq!(decoded.raw_text(), Some("SMS-SHOOT-ID-12345"));
    }

    #[test]
    fn json_body_parses() {
        let decoded = DispatchResponse::decode(r#"{"queued": true}"#.to_string());
        assert_eq!(decoded, DispatchResponse::Json(json!({"queued": true})));
    }

    #[test]
    fn other_text_is_opaque_success() {
        let decoded = DispatchResponse::decode("OK 1234".to_string());
        assert_eq!(decoded, DispatchResponse::Raw("OK 1234".to_string()));
    }
}
