//! Batch SMS sending over a two-phase scrubbing + dispatch workflow.
//!
//! The primary path calls the authorization-lookup and dispatch services
//! directly; the backup path goes through a same-origin relay that runs both
//! steps server-side. The relay itself lives in [`relay`] and ships as a
//! second binary.

/// Clients for the external scrubbing, dispatch, and relay services.
pub mod api;
/// Configuration management.
pub mod config;
/// Text transforms for the verification upstream.
pub mod encoding;
/// CORS relay server.
pub mod relay;
/// Session state: form parameters and the contact list.
pub mod session;
/// Canned message bodies.
pub mod templates;
/// Batch workflow runner and transports.
pub mod workflow;
