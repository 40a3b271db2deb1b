#[cfg(test)]
#[path = "preferences_test.rs"]
mod tests;

use anyhow::Result;
use serde_json::Map;
use serde_json::Value;

use crate::domain::models::format_font_size;
use crate::domain::models::parse_font_size;
use crate::domain::models::LanguageName;
use crate::domain::models::StoreBox;
use crate::domain::models::UserPreferences;
use crate::domain::models::FONT_SIZE_KEY;
use crate::domain::models::LANGUAGE_KEY;

pub struct Preferences {
    store: StoreBox,
}

impl Preferences {
    pub fn new(store: StoreBox) -> Preferences {
        return Preferences { store };
    }

    /// Reads the stored preferences. Missing or unreadable values fall back to
    /// the defaults.
    pub async fn load(&self) -> Result<UserPreferences> {
        let res = self.store.get(&[LANGUAGE_KEY, FONT_SIZE_KEY]).await?;
        let mut prefs = UserPreferences::default();

        if let Some(language) = res.get(LANGUAGE_KEY).and_then(|e| return e.as_str()) {
            match LanguageName::parse(language) {
                Some(language) => prefs.language = language,
                None => tracing::warn!(language, "Ignoring unknown stored language"),
            }
        }

        if let Some(font_size) = res.get(FONT_SIZE_KEY).and_then(|e| return e.as_str()) {
            match parse_font_size(font_size) {
                Some(font_size) => prefs.font_size = font_size,
                None => tracing::warn!(font_size, "Ignoring unknown stored font size"),
            }
        }

        return Ok(prefs);
    }

    pub async fn set_language(&self, language: LanguageName) -> Result<()> {
        let mut items = Map::new();
        items.insert(LANGUAGE_KEY.to_string(), Value::from(language.to_string()));
        return self.store.set(items).await;
    }

    pub async fn set_font_size(&self, font_size: u32) -> Result<()> {
        let mut items = Map::new();
        items.insert(FONT_SIZE_KEY.to_string(), Value::from(format_font_size(font_size)));
        return self.store.set(items).await;
    }
}
