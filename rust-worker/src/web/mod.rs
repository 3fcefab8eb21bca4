//! Web server module for the artifact upload webhook.
//!
//! This module provides:
//! - The inbound request view and its classifier
//! - `X-Hub-Signature` verification
//! - axum handlers and the router

pub mod classifier;
pub mod handlers;
pub mod request;
pub mod signature;

pub use classifier::classify;
pub use handlers::{artifact_webhook, health, process_request, router, AppState, HealthResponse};
pub use request::InboundRequest;
pub use signature::{check_signature, verify_signature, SignatureCheck, SIGNATURE_HEADER};
