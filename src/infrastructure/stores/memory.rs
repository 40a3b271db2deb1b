use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Map;
use serde_json::Value;

use crate::domain::models::KeyValueStore;

/// Process-local storage. Used by `--store memory` sessions and by tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, Value>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let mut res = Map::new();
        for key in keys {
            if let Some(val) = self.entries.get(*key) {
                res.insert(key.to_string(), val.clone());
            }
        }

        return Ok(res);
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        for (key, val) in items {
            self.entries.insert(key, val);
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        return Ok(());
    }
}
