//! Artifact webhook receiver.
//!
//! Receives signed `project.web_sdk_artifact_upload` callbacks and records
//! `project_id → data` in EdgeKV for edge logic to read later.
//!
//! ## Architecture
//!
//! ```text
//! POST → classify → verify X-Hub-Signature → ingest → KvStore::put
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod kv;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError, EdgeKvToken, WebhookSecret};
pub use error::WebhookError;
pub use ingest::{ingest, IngestOutcome, StoredRecord, WebhookPayload, ARTIFACT_UPLOAD_EVENT};
pub use kv::{EdgeKvClient, KvError, KvStore, MemoryKvStore};
pub use web::{router, AppState};
