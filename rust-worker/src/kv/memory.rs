//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{KvError, KvStore};

/// Process-local store backed by a `HashMap`.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current value for `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.items.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut items = self.items.write().await;
        let replaced = items.insert(key.to_string(), value.to_string()).is_some();
        debug!(key = %key, value_length = value.len(), replaced, "memory_kv_put");
        Ok(())
    }
}
