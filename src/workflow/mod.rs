//! Batch workflow runner.
//!
//! Processes a session's contacts strictly one at a time, in input order,
//! recording each outcome on the contact. A transport-level failure aborts
//! the remainder of the batch; every other error stays on its contact.

mod transport;

pub use transport::{BackupSend, PrimarySend, SendStrategy, Transport};

use crate::api::ApiError;
use crate::session::{ContactStatus, SmsSession};
use lazy_regex::regex_is_match;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that block a batch before any HTTP call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// A contact with an empty number was submitted.
    #[error("Please enter all contact numbers")]
    BlankContactNumber,
    /// The batch has no contacts at all.
    #[error("Please enter at least one phone number")]
    NoContacts,
    /// The configured transport mode is not recognized.
    #[error("Unknown transport mode: {0}")]
    UnknownTransport(String),
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of contacts in the batch.
    pub total: usize,
    /// Contacts that ended in success.
    pub succeeded: usize,
    /// Contacts that ended in error.
    pub failed: usize,
    /// Whether a transport failure stopped the batch early.
    pub aborted: bool,
    /// Human-readable summary.
    pub message: String,
}

/// Warning shown when a transport failure aborts the batch.
pub const TRANSPORT_FAILURE_WARNING: &str =
    "Transport error: unable to reach the API directly. \
     Check network access or switch transport mode.";

/// Runs the batch over every contact in the session.
///
/// Contacts are validated up front, then visited in order; each ends in
/// exactly one of success or error. Statuses and outcomes are recorded on
/// the contacts themselves.
///
/// # Errors
///
/// Returns a [`WorkflowError`] when validation fails; in that case no HTTP
/// call has been issued and no contact has been touched.
pub async fn run_batch(
    session: &mut SmsSession,
    strategy: &dyn SendStrategy,
) -> Result<BatchReport, WorkflowError> {
    if session.contacts.is_empty() {
        return Err(WorkflowError::NoContacts);
    }
    if session
        .contacts
        .iter()
        .any(|contact| contact.number.trim().is_empty())
    {
        return Err(WorkflowError::BlankContactNumber);
    }

    session.reset_outcomes();

    let params = session.params.clone();
    let total = session.contacts.len();
    let mode = session.transport.label();
    let mut succeeded = 0;
    let mut failed = 0;
    let mut aborted = false;

    info!(total, mode, "processing batch");

    for contact in &mut session.contacts {
        contact.status = ContactStatus::Processing;
        let number = contact.number.clone();
        debug!(number = %number, "processing contact");

        match strategy.send(&params, &number).await {
            Ok(result) => {
                contact.status = ContactStatus::Success;
                contact.result = Some(result);
                succeeded += 1;
            }
            Err(error) => {
                contact.status = ContactStatus::Error;
                contact.error = Some(error.to_string());
                failed += 1;

                if is_transport_failure(&error) {
                    warn!(number = %number, %error, "transport failure, aborting batch");
                    aborted = true;
                    break;
                }
                warn!(number = %number, %error, "contact failed");
            }
        }
    }

    let message = if aborted {
        TRANSPORT_FAILURE_WARNING.to_string()
    } else {
        format!("Successfully sent SMS to {succeeded} out of {total} contact(s) using {mode} mode")
    };

    Ok(BatchReport {
        total,
        succeeded,
        failed,
        aborted,
        message,
    })
}

/// Classifies an error as a batch-aborting transport/origin failure.
///
/// Network-level failures always qualify; anything else qualifies only when
/// its message matches the known network/CORS failure patterns.
#[must_use]
pub fn is_transport_failure(error: &ApiError) -> bool {
    if matches!(error, ApiError::Network(_)) {
        return true;
    }
    regex_is_match!(
        r"(?i)network|cors|failed to fetch|connection|timed out",
        &error.to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_always_abort() {
        let error = ApiError::Network("error sending request".to_string());
        assert!(is_transport_failure(&error));
    }

    #[test]
    fn cors_text_aborts() {
        let error = ApiError::Api("CORS Error: Unable to access the API directly.".to_string());
        assert!(is_transport_failure(&error));
    }

    #[test]
    fn plain_api_errors_do_not_abort() {
        let error =
            ApiError::InvalidResponse("Failed to get valid authcode from scrubbing API".to_string());
        assert!(!is_transport_failure(&error));
    }
}
