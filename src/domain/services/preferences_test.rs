use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use serde_json::Map;

use super::Preferences;
use crate::domain::models::KeyValueStore;
use crate::domain::models::LanguageName;
use crate::domain::models::UserPreferences;
use crate::infrastructure::stores::memory::MemoryStore;

#[tokio::test]
async fn it_defaults_to_cpp_at_16px() -> Result<()> {
    let prefs = Preferences::new(Arc::new(MemoryStore::default())).load().await?;
    assert_eq!(prefs, UserPreferences::default());
    assert_eq!(prefs.language, LanguageName::Cpp);
    assert_eq!(prefs.font_size, 16);
    return Ok(());
}

#[tokio::test]
async fn it_persists_selector_values() -> Result<()> {
    let memory = Arc::new(MemoryStore::default());
    let prefs = Preferences::new(memory.clone());

    prefs.set_language(LanguageName::Java).await?;
    prefs.set_font_size(20).await?;

    let raw = memory.get(&["language", "fontSize"]).await?;
    assert_eq!(raw["language"], json!("java"));
    assert_eq!(raw["fontSize"], json!("20px"));

    let loaded = prefs.load().await?;
    assert_eq!(loaded.language, LanguageName::Java);
    assert_eq!(loaded.font_size, 20);
    return Ok(());
}

#[tokio::test]
async fn it_ignores_unknown_stored_values() -> Result<()> {
    let memory = Arc::new(MemoryStore::default());
    let mut items = Map::new();
    items.insert("language".to_string(), json!("cobol"));
    items.insert("fontSize".to_string(), json!("13px"));
    memory.set(items).await?;

    let loaded = Preferences::new(memory).load().await?;
    assert_eq!(loaded, UserPreferences::default());
    return Ok(());
}
