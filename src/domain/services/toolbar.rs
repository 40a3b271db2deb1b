#[cfg(test)]
#[path = "toolbar_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use super::Preferences;
use super::TemplateStore;
use crate::domain::models::saved_code_key;
use crate::domain::models::EditorHandleBox;
use crate::domain::models::LanguageName;
use crate::domain::models::StoreBox;
use crate::domain::models::Template;
use crate::domain::models::UserPreferences;
use crate::domain::models::FONT_SIZES;

static TASK_ID: Lazy<Regex> = Lazy::new(|| return Regex::new(r"task/([0-9]+)").unwrap());

/// Reads the problem id out of a task URL such as
/// `https://cses.fi/problemset/task/1068`.
pub fn problem_id_from_url(url: &str) -> Option<String> {
    return TASK_ID
        .captures(url)
        .and_then(|captures| return captures.get(1))
        .map(|e| return e.as_str().to_string());
}

/// The toolbar above the editor: language, font size and template selectors.
/// Everything it does to the editor goes through the bridge.
pub struct Toolbar {
    editor: EditorHandleBox,
    store: StoreBox,
    preferences: Preferences,
    templates: TemplateStore,
    problem_id: Option<String>,
    current: UserPreferences,
}

impl Toolbar {
    pub fn new(editor: EditorHandleBox, store: StoreBox, problem_id: Option<String>) -> Toolbar {
        return Toolbar {
            editor,
            preferences: Preferences::new(store.clone()),
            templates: TemplateStore::new(store.clone()),
            store,
            problem_id,
            current: UserPreferences::default(),
        };
    }

    pub fn preferences(&self) -> UserPreferences {
        return self.current;
    }

    /// Loads the stored preferences and pushes them to the editor together with
    /// the saved code of this problem.
    pub async fn initialize(&mut self) -> Result<()> {
        self.current = self.preferences.load().await?;
        tracing::debug!(
            language = %self.current.language,
            font_size = self.current.font_size,
            "Toolbar initialized"
        );

        return self.sync_editor().await;
    }

    /// Re-sends the toolbar state. Called whenever the editor announces itself,
    /// since anything posted before that was lost.
    pub async fn sync_editor(&self) -> Result<()> {
        let profile = self.current.language.profile();
        self.editor.set_language(profile.editor_language_id).await?;
        self.editor.set_font(self.current.font_size).await?;
        self.restore_saved_code().await?;

        return Ok(());
    }

    /// Loads the saved code of this problem into the editor. Returns whether
    /// there was anything to restore.
    pub async fn restore_saved_code(&self) -> Result<bool> {
        let problem_id = match &self.problem_id {
            Some(problem_id) => problem_id,
            None => return Ok(false),
        };

        let key = saved_code_key(problem_id);
        let res = self.store.get(&[&key]).await?;
        if let Some(code) = res.get(&key).and_then(|e| return e.as_str()) {
            self.editor.set_value(code).await?;
            tracing::debug!(problem_id = %problem_id, "Restored saved code");
            return Ok(true);
        }

        return Ok(false);
    }

    /// Switches the editor to `language`, remembers the choice and returns the
    /// templates available for it.
    pub async fn select_language(&mut self, language: LanguageName) -> Result<Vec<Template>> {
        self.editor
            .set_language(language.profile().editor_language_id)
            .await?;
        self.preferences.set_language(language).await?;
        self.current.language = language;

        return self.templates().await;
    }

    pub async fn select_font_size(&mut self, font_size: u32) -> Result<()> {
        if !FONT_SIZES.contains(&font_size) {
            bail!(format!(
                "Font size {font_size}px is not one of {}",
                FONT_SIZES
                    .iter()
                    .map(|e| return format!("{e}px"))
                    .collect::<Vec<String>>()
                    .join(", ")
            ));
        }

        self.editor.set_font(font_size).await?;
        self.preferences.set_font_size(font_size).await?;
        self.current.font_size = font_size;

        return Ok(());
    }

    pub async fn templates(&self) -> Result<Vec<Template>> {
        return self.templates.list(self.current.language).await;
    }

    /// Replaces the editor buffer with the template code. Picking the empty
    /// placeholder entry does nothing.
    pub async fn apply_template(&self, template: &Template) -> Result<bool> {
        if template.code.is_empty() {
            return Ok(false);
        }

        self.editor.set_value(&template.code).await?;
        tracing::debug!(id = %template.id, name = %template.name, "Template applied");

        return Ok(true);
    }
}
