//! Configuration and settings management
//!
//! Loads settings from environment variables (and optional `config/` files),
//! every field carrying a deployment default.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Authorization-lookup (scrubbing) endpoint used by the primary path.
    #[serde(default = "default_scrubbing_api_url")]
    pub scrubbing_api_url: String,
    /// SMS dispatch endpoint used by the primary path.
    #[serde(default = "default_sms_api_url")]
    pub sms_api_url: String,
    /// Relay `process-message` endpoint used by the backup path.
    #[serde(default = "default_backup_api_url")]
    pub backup_api_url: String,

    /// API key sent with every dispatch call.
    #[serde(default = "default_sms_api_key")]
    pub sms_api_key: String,
    /// Campaign identifier sent with every dispatch call.
    #[serde(default = "default_sms_campaign")]
    pub sms_campaign: String,

    /// Transport for the next batch: `primary` or `backup`.
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Named message template overriding the message body.
    pub message_template: Option<String>,

    /// Coverage code override for the per-batch form parameters.
    pub coverage: Option<String>,
    /// Route identifier override.
    pub routes: Option<String>,
    /// Sender id override.
    pub senderid: Option<String>,
    /// Principal-entity id override.
    pub pe_id: Option<String>,
    /// Content id override.
    pub content_id: Option<String>,
    /// Message body override.
    pub message: Option<String>,

    /// Timeout for the relay's upstream calls, in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Main relay listening port.
    #[serde(default = "default_relay_port")]
    pub relay_port: u16,
    /// Compatibility relay listening port kept for older clients.
    #[serde(default = "default_relay_backup_port")]
    pub relay_backup_port: u16,
    /// Scrubbing upstream the relay forwards to.
    #[serde(default = "default_relay_scrubbing_url")]
    pub relay_scrubbing_url: String,
    /// SMS upstream the relay forwards to.
    #[serde(default = "default_sms_api_url")]
    pub relay_sms_url: String,
    /// Verification upstream for the backup sequence.
    #[serde(default = "default_relay_verify_url")]
    pub relay_verify_url: String,

    /// `development` (CORS open) or `production` (origin allow-list).
    #[serde(default = "default_run_mode")]
    pub run_mode: String,
    /// Comma-separated list of allowed CORS origins for production.
    #[serde(rename = "allowed_origins")]
    pub allowed_origins_str: Option<String>,
}

fn default_scrubbing_api_url() -> String {
    "https://smartping-backend.goflipo.com/api/main/scrubbing-logs".to_string()
}

fn default_sms_api_url() -> String {
    "https://relit.in/app/smsapisr/index.php".to_string()
}

fn default_backup_api_url() -> String {
    "http://localhost:5001/process-message".to_string()
}

fn default_sms_api_key() -> String {
    "566321AF6EB69D".to_string()
}

fn default_sms_campaign() -> String {
    "245".to_string()
}

fn default_transport() -> String {
    "primary".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

const fn default_relay_port() -> u16 {
    5002
}

const fn default_relay_backup_port() -> u16 {
    5001
}

fn default_relay_scrubbing_url() -> String {
    "https://stage-smartping-backend.goflipo.com/api/main/scrubbing-logs".to_string()
}

fn default_relay_verify_url() -> String {
    "http://143.110.242.221:8080/process-verify".to_string()
}

fn default_run_mode() -> String {
    "development".to_string()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Optional checked-in defaults
            .add_source(File::with_name("config/default").required(false))
            // Optional local overrides; this file shouldn't be checked into git
            .add_source(File::with_name("config/local").required(false))
            // Environment variables win; UPPER_SNAKE_CASE maps to snake_case.
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        s.try_deserialize()
    }

    /// Whether the relay should run with open CORS.
    #[must_use]
    pub fn is_development(&self) -> bool {
        self.run_mode != "production"
    }

    /// Returns the configured CORS origin allow-list.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins_str
            .as_ref()
            .map(|s| {
                s.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scrubbing_api_url: default_scrubbing_api_url(),
            sms_api_url: default_sms_api_url(),
            backup_api_url: default_backup_api_url(),
            sms_api_key: default_sms_api_key(),
            sms_campaign: default_sms_campaign(),
            transport: default_transport(),
            message_template: None,
            coverage: None,
            routes: None,
            senderid: None,
            pe_id: None,
            content_id: None,
            message: None,
            http_timeout_secs: default_http_timeout_secs(),
            relay_port: default_relay_port(),
            relay_backup_port: default_relay_backup_port(),
            relay_scrubbing_url: default_relay_scrubbing_url(),
            relay_sms_url: default_sms_api_url(),
            relay_verify_url: default_relay_verify_url(),
            run_mode: default_run_mode(),
            allowed_origins_str: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings = Settings::default();
        assert_eq!(settings.relay_port, 5002);
        assert_eq!(settings.relay_backup_port, 5001);
        assert_eq!(settings.transport, "primary");
        assert_eq!(settings.sms_campaign, "245");
        assert!(settings.is_development());
    }

    #[test]
    fn origin_list_splits_on_commas_and_whitespace() {
        let settings = Settings {
            allowed_origins_str: Some(
                "http://localhost:3000, https://peinterface.goflipo.in".to_string(),
            ),
            ..Settings::default()
        };
        assert_eq!(
            settings.allowed_origins(),
            vec!["http://localhost:3000", "https://peinterface.goflipo.in"]
        );
    }
}
