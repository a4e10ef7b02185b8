//! Session state for a sending batch.
//!
//! A [`SmsSession`] is the explicit context handed to the workflow runner:
//! one snapshot of message parameters, the ordered contact list, and the
//! transport chosen for the batch. Nothing in the workflow relies on ambient
//! globals.

use crate::api::dispatch::DispatchResponse;
use crate::config::Settings;
use crate::templates;
use crate::workflow::Transport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Message parameters applied to every contact in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormParameters {
    /// Coverage code (`91` on the primary path, `+91` on the backup path).
    pub coverage: String,
    /// Route identifier for the dispatch service.
    pub routes: String,
    /// Sender id (header) the SMS is sent under.
    pub senderid: String,
    /// Principal-entity id registered with the scrubbing service.
    pub pe_id: String,
    /// Content template id registered with the scrubbing service.
    pub content_id: String,
    /// Message body.
    pub message: String,
}

impl FormParameters {
    /// Built-in parameter defaults for the given transport.
    #[must_use]
    pub fn defaults_for(transport: Transport) -> Self {
        let coverage = match transport {
            Transport::Primary => "91",
            Transport::Backup => "+91",
        };

        Self {
            coverage: coverage.to_string(),
            routes: "testr".to_string(),
            senderid: "SANJUP".to_string(),
            pe_id: "1501550540000010698".to_string(),
            content_id: "1507167577648640421".to_string(),
            message: templates::lookup(templates::DEFAULT_TEMPLATE)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Builds parameters from the defaults, applying any overrides and the
    /// selected message template from [`Settings`].
    #[must_use]
    pub fn from_settings(settings: &Settings, transport: Transport) -> Self {
        let mut params = Self::defaults_for(transport);

        let overrides = [
            (&mut params.coverage, &settings.coverage),
            (&mut params.routes, &settings.routes),
            (&mut params.senderid, &settings.senderid),
            (&mut params.pe_id, &settings.pe_id),
            (&mut params.content_id, &settings.content_id),
            (&mut params.message, &settings.message),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                value.clone_into(field);
            }
        }

        // A named template wins over a literal message override.
        if let Some(name) = &settings.message_template {
            if let Some(body) = templates::lookup(name) {
                params.message = body.to_string();
            }
        }

        params
    }
}

/// Lifecycle of a contact within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Not yet picked up by the runner.
    Pending,
    /// Send in flight.
    Processing,
    /// Send completed, result recorded.
    Success,
    /// Send failed, error recorded.
    Error,
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Success => "success",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Combined responses recorded on a contact after a successful send.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowResult {
    /// Primary path: the authorization lookup and dispatch responses.
    Primary {
        /// Scrubbing (authorization lookup) response.
        scrubbing: Value,
        /// Dispatch response.
        sms: DispatchResponse,
    },
    /// Backup path: the relay's combined response.
    Backup(Value),
}

/// One recipient entry in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    /// Phone number as entered.
    pub number: String,
    /// Current lifecycle status.
    pub status: ContactStatus,
    /// Combined result, set on success.
    pub result: Option<WorkflowResult>,
    /// Error message, set on failure.
    pub error: Option<String>,
}

impl Contact {
    /// Creates a pending contact for `number`.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            status: ContactStatus::Pending,
            result: None,
            error: None,
        }
    }
}

/// Mutable state for one sending batch.
#[derive(Debug, Clone)]
pub struct SmsSession {
    /// Parameter snapshot applied to every contact.
    pub params: FormParameters,
    /// Ordered recipient list.
    pub contacts: Vec<Contact>,
    /// Transport chosen for this batch.
    pub transport: Transport,
}

impl SmsSession {
    /// Creates a session over the given numbers.
    #[must_use]
    pub fn new(params: FormParameters, numbers: Vec<String>, transport: Transport) -> Self {
        Self {
            params,
            contacts: numbers.into_iter().map(Contact::new).collect(),
            transport,
        }
    }

    /// Puts every contact back to pending and clears previous outcomes.
    pub fn reset_outcomes(&mut self) {
        for contact in &mut self.contacts {
            contact.status = ContactStatus::Pending;
            contact.result = None;
            contact.error = None;
        }
    }

    /// Discards all contacts and restores default parameters.
    pub fn reset(&mut self) {
        self.params = FormParameters::defaults_for(self.transport);
        self.contacts.clear();
    }
}

/// Splits bulk input into numbers, one per line, dropping blanks.
#[must_use]
pub fn parse_bulk_numbers(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
