//! Key-value store module.
//!
//! This module provides:
//! - The [`KvStore`] contract the ingestion pipeline writes through
//! - An in-memory store for local runs and tests
//! - An EdgeKV HTTP client for deployments
//!
//! Writes are unconditional overwrites. Ordering between concurrent writes to
//! the same key is decided by the store (last writer wins).

pub mod edgekv;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use edgekv::EdgeKvClient;
pub use memory::MemoryKvStore;

/// Errors reported by a key-value store.
#[derive(Debug, Error)]
pub enum KvError {
    /// The store could not be reached or the request did not complete.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store responded with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The store client is misconfigured.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Store-specific failure.
    #[error("{0}")]
    Unavailable(String),
}

/// Write side of a key-value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), KvError>;
}
