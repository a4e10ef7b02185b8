//! Transport selection for a batch.
//!
//! The primary path performs the two-call sequence directly; the backup path
//! delegates both steps to the relay. The choice is made once per batch and
//! carried as a [`Transport`] value; [`SendStrategy`] is the seam the runner
//! (and the tests) work against.

use crate::api::backup::BackupClient;
use crate::api::dispatch::DispatchClient;
use crate::api::scrubbing::{authcode, ScrubbingClient};
use crate::api::ApiError;
use crate::config::Settings;
use crate::session::{FormParameters, WorkflowResult};
use crate::workflow::WorkflowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Request strategy chosen once per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Direct two-call sequence: authorization lookup, then dispatch.
    Primary,
    /// Single call to the relay, which runs both steps server-side.
    Backup,
}

impl Transport {
    /// Short label used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Backup => "backup",
        }
    }

    /// Builds the send strategy for this transport.
    #[must_use]
    pub fn strategy(self, settings: &Settings) -> Box<dyn SendStrategy> {
        match self {
            Self::Primary => Box::new(PrimarySend::from_settings(settings)),
            Self::Backup => Box::new(BackupSend::from_settings(settings)),
        }
    }
}

impl FromStr for Transport {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "backup" => Ok(Self::Backup),
            other => Err(WorkflowError::UnknownTransport(other.to_string())),
        }
    }
}

/// One send attempt for a single contact.
#[async_trait]
pub trait SendStrategy: Send + Sync {
    /// Runs the full send sequence for `number` with the given parameters.
    async fn send(
        &self,
        params: &FormParameters,
        number: &str,
    ) -> Result<WorkflowResult, ApiError>;
}

/// Primary path: scrubbing lookup followed by dispatch.
pub struct PrimarySend {
    scrubbing: ScrubbingClient,
    dispatch: DispatchClient,
}

impl PrimarySend {
    /// Builds the primary strategy from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scrubbing: ScrubbingClient::new(&settings.scrubbing_api_url),
            dispatch: DispatchClient::from_settings(settings),
        }
    }
}

#[async_trait]
impl SendStrategy for PrimarySend {
    async fn send(
        &self,
        params: &FormParameters,
        number: &str,
    ) -> Result<WorkflowResult, ApiError> {
        let scrubbing = self.scrubbing.lookup(params, number).await?;

        let Some(code) = authcode(&scrubbing).map(ToString::to_string) else {
            return Err(ApiError::InvalidResponse(
                "Failed to get valid authcode from scrubbing API".to_string(),
            ));
        };

        let sms = self.dispatch.send(params, number, &code).await?;

        Ok(WorkflowResult::Primary { scrubbing, sms })
    }
}

/// Backup path: one relay call covering both steps.
pub struct BackupSend {
    client: BackupClient,
}

impl BackupSend {
    /// Builds the backup strategy from settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            client: BackupClient::new(&settings.backup_api_url),
        }
    }
}

#[async_trait]
impl SendStrategy for BackupSend {
    async fn send(
        &self,
        params: &FormParameters,
        number: &str,
    ) -> Result<WorkflowResult, ApiError> {
        let combined = self.client.process(params, number).await?;
        Ok(WorkflowResult::Backup(combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_parses_known_modes() {
        assert_eq!("primary".parse::<Transport>().ok(), Some(Transport::Primary));
        assert_eq!("backup".parse::<Transport>().ok(), Some(Transport::Backup));
        assert!("carrier-pigeon".parse::<Transport>().is_err());
    }
}
