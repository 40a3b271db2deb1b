#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::models::KeyValueStore;

/// Storage backed by a single JSON document on disk. Every write rewrites the
/// whole document.
pub struct FileStore {
    pub file_path: path::PathBuf,
    lock: Mutex<()>,
}

impl Default for FileStore {
    fn default() -> FileStore {
        let file_path = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("cses-companion/storage.json");

        return FileStore::new(file_path);
    }
}

impl FileStore {
    pub fn new(file_path: path::PathBuf) -> FileStore {
        return FileStore {
            file_path,
            lock: Mutex::new(()),
        };
    }

    async fn read(&self) -> Result<Map<String, Value>> {
        if !self.file_path.exists() {
            return Ok(Map::new());
        }

        let payload = fs::read_to_string(&self.file_path).await?;
        if payload.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&payload)? {
            Value::Object(map) => return Ok(map),
            _ => bail!(format!(
                "Storage file {} does not contain a JSON object",
                self.file_path.display()
            )),
        }
    }

    async fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.sync_all().await?;

        return Ok(());
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    #[allow(clippy::implicit_return)]
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let _guard = self.lock.lock().await;
        let entries = self.read().await?;

        let res = entries
            .into_iter()
            .filter(|(key, _)| return keys.contains(&key.as_str()))
            .collect::<Map<String, Value>>();

        return Ok(res);
    }

    #[allow(clippy::implicit_return)]
    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        for (key, val) in items {
            entries.insert(key, val);
        }

        return self.write(&entries).await;
    }

    #[allow(clippy::implicit_return)]
    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }

        return self.write(&entries).await;
    }
}
