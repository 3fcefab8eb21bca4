//! Artifact ingestion module.
//!
//! Turns a verified webhook payload into at most one key-value write.
//!
//! ## Flow
//!
//! ```text
//! WebhookPayload → event filter → StoredRecord → KvStore::put
//! ```

pub mod payload;

use tracing::{error, info, warn};

use crate::error::WebhookError;
use crate::kv::KvStore;

pub use payload::{StoredRecord, WebhookPayload};

/// The only event type that results in a write.
pub const ARTIFACT_UPLOAD_EVENT: &str = "project.web_sdk_artifact_upload";

/// Successful end states of an ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The event is not one we record. Nothing was written.
    Ignored { event: Option<String> },
    /// The record was written under `key`.
    Stored { key: String },
}

/// Apply a verified payload to the store.
///
/// Performs exactly one `put` for an artifact upload with a usable key and
/// value, and none otherwise. Store failures are reported once, without retry.
pub async fn ingest(
    store: &dyn KvStore,
    payload: WebhookPayload,
) -> Result<IngestOutcome, WebhookError> {
    if payload.event.as_deref() != Some(ARTIFACT_UPLOAD_EVENT) {
        info!(event = ?payload.event, "webhook_event_ignored");
        return Ok(IngestOutcome::Ignored {
            event: payload.event,
        });
    }

    let record = StoredRecord::from_payload(&payload)
        .map_err(|e| WebhookError::Internal(format!("failed to serialize data: {e}")))?
        .ok_or_else(|| {
            warn!(
                has_project_id = payload.project_id.is_some(),
                has_data = payload.data.is_some(),
                "artifact_record_incomplete"
            );
            WebhookError::MissingKeyOrValue
        })?;

    if let Err(e) = store.put(&record.key, &record.value).await {
        error!(key = %record.key, error = %e, "artifact_store_failed");
        return Err(WebhookError::Storage(e));
    }

    info!(
        key = %record.key,
        value_length = record.value.len(),
        "artifact_stored"
    );

    Ok(IngestOutcome::Stored { key: record.key })
}
