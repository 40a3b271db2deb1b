#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::CodeRequest;

pub const INITIAL_EDITOR_VALUE: &str = "// Write your code here";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum EditorTheme {
    #[strum(serialize = "vs-dark")]
    Dark,
    #[strum(serialize = "vs")]
    Light,
}

impl EditorTheme {
    pub fn from_dark(is_dark: bool) -> EditorTheme {
        if is_dark {
            return EditorTheme::Dark;
        }

        return EditorTheme::Light;
    }

    pub fn is_dark(&self) -> bool {
        return *self == EditorTheme::Dark;
    }
}

/// Everything the page-world editor knows about itself. Only the page-world
/// side ever holds one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    pub value: String,
    pub language_id: String,
    pub font_size: u32,
    pub theme: EditorTheme,
}

impl EditorState {
    pub fn initial(theme: EditorTheme) -> EditorState {
        return EditorState {
            value: INITIAL_EDITOR_VALUE.to_string(),
            language_id: "cpp".to_string(),
            font_size: 16,
            theme,
        };
    }
}

/// The third party code editor as the page world sees it. Calls are
/// synchronous, the editor lives in the same context as its caller.
pub trait CodeEditor: Send {
    fn get_value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn language(&self) -> String;

    /// Switches the syntax mode. Each call is an observable mode switch.
    fn set_language(&mut self, language_id: &str);

    fn font_size(&self) -> u32;

    fn set_font_size(&mut self, font_size: u32);

    fn theme(&self) -> EditorTheme;

    fn set_theme(&mut self, theme: EditorTheme);
}

/// How the toolbar talks to the editor. Every call is marshalled into a bridge
/// message, nothing is read or written directly.
#[async_trait]
pub trait EditorHandle {
    /// Switches the editor's syntax mode. `language_id` is the editor's own
    /// language id, not the toolbar's language name.
    async fn set_language(&self, language_id: &str) -> Result<()>;

    async fn set_font(&self, font_size: u32) -> Result<()>;

    /// Replaces the whole buffer.
    async fn set_value(&self, code: &str) -> Result<()>;

    /// Asks the editor for its current contents and waits for the matching
    /// response. Never times out, a request the editor never sees stays
    /// pending until a newer request of the same kind supersedes it.
    async fn get_value(&self, kind: CodeRequest) -> Result<String>;

    async fn set_theme(&self, is_dark: bool) -> Result<()>;
}

pub type EditorHandleBox = Arc<dyn EditorHandle + Send + Sync>;
