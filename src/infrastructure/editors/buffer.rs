#[cfg(test)]
#[path = "buffer_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::domain::models::CodeEditor;
use crate::domain::models::EditorState;
use crate::domain::models::EditorTheme;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditorCounters {
    pub language_switches: usize,
    pub value_writes: usize,
    pub theme_switches: usize,
}

struct Inner {
    state: EditorState,
    counters: EditorCounters,
}

/// In-process editor used by headless sessions. Clones share the same buffer,
/// so whoever holds a clone sees what the page world sees.
#[derive(Clone)]
pub struct BufferEditor {
    inner: Arc<Mutex<Inner>>,
}

impl BufferEditor {
    pub fn new(state: EditorState) -> BufferEditor {
        return BufferEditor {
            inner: Arc::new(Mutex::new(Inner {
                state,
                counters: EditorCounters::default(),
            })),
        };
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned buffer is still a valid buffer.
        return self.inner.lock().unwrap_or_else(|err| return err.into_inner());
    }

    pub fn state(&self) -> EditorState {
        return self.lock().state.clone();
    }

    pub fn counters(&self) -> EditorCounters {
        return self.lock().counters.clone();
    }

    /// Simulates the user typing into the editor.
    pub fn type_text(&self, text: &str) {
        self.lock().state.value = text.to_string();
    }
}

impl CodeEditor for BufferEditor {
    fn get_value(&self) -> String {
        return self.lock().state.value.to_string();
    }

    fn set_value(&mut self, value: &str) {
        let mut inner = self.lock();
        inner.state.value = value.to_string();
        inner.counters.value_writes += 1;
    }

    fn language(&self) -> String {
        return self.lock().state.language_id.to_string();
    }

    fn set_language(&mut self, language_id: &str) {
        let mut inner = self.lock();
        inner.state.language_id = language_id.to_string();
        inner.counters.language_switches += 1;
    }

    fn font_size(&self) -> u32 {
        return self.lock().state.font_size;
    }

    fn set_font_size(&mut self, font_size: u32) {
        self.lock().state.font_size = font_size;
    }

    fn theme(&self) -> EditorTheme {
        return self.lock().state.theme;
    }

    fn set_theme(&mut self, theme: EditorTheme) {
        let mut inner = self.lock();
        inner.state.theme = theme;
        inner.counters.theme_switches += 1;
    }
}
