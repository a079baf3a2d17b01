//! In-memory key-value store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::errors::AppResult;

#[derive(Debug, Default)]
struct Inner {
    values: BTreeMap<String, String>,
    revision: i64,
}

/// Non-durable store with the same semantics as [`super::SqliteStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.inner.read().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.values.insert(key.to_string(), value.to_string());
        inner.revision += 1;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.values.remove(key).is_some();
        if removed {
            inner.revision += 1;
        }
        Ok(removed)
    }

    async fn revision(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.revision)
    }
}
