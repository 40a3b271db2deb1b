use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

pub const LANGUAGE_KEY: &str = "language";
pub const FONT_SIZE_KEY: &str = "fontSize";
pub const TEMPLATES_KEY: &str = "templates";
pub const CODE_TO_SUBMIT_KEY: &str = "codeToSubmit";

pub fn saved_code_key(problem_id: &str) -> String {
    return format!("savedCode-{problem_id}");
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StoreName {
    File,
    Memory,
}

impl StoreName {
    pub fn parse(text: &str) -> Option<StoreName> {
        return StoreName::iter().find(|e| return e.to_string() == text);
    }
}

/// Extension-scoped key-value storage. Each key is written atomically, nothing
/// is transactional across keys.
#[async_trait]
pub trait KeyValueStore {
    /// Returns the entries that exist for `keys`. Missing keys are absent from
    /// the result.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>>;

    async fn set(&self, items: Map<String, Value>) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

pub type StoreBox = Arc<dyn KeyValueStore + Send + Sync>;
