#[cfg(test)]
#[path = "editor_host_test.rs"]
mod tests;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::ThemeDetector;
use super::Window;
use super::WindowListener;
use crate::domain::models::BridgeMessage;
use crate::domain::models::CodeEditor;
use crate::domain::models::EditorState;
use crate::domain::models::EditorTheme;
use crate::domain::models::HostPage;
use crate::domain::models::LanguageProfile;

/// The page-world half of the bridge. Owns the editor and answers bridge
/// messages posted on the same window.
pub struct EditorHost {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl EditorHost {
    /// Creates the editor inside the page's editor container and starts
    /// handling bridge messages, then announces itself with `ready`. Without a
    /// container nothing is mounted and the toolbar keeps running against a
    /// bridge nobody answers.
    pub fn mount<E, F>(window: &Window, page: &dyn HostPage, create: F) -> Option<EditorHost>
    where
        E: CodeEditor + 'static,
        F: FnOnce(EditorState) -> E,
    {
        if !page.has_editor_container() {
            tracing::warn!(url = %page.url(), "Editor container not found, editor not mounted");
            return None;
        }

        let theme = EditorTheme::from_dark(ThemeDetector::is_dark(&page.style()));
        let editor = create(EditorState::initial(theme));

        let listener = window.listen();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(EditorHost::run(
            window.clone(),
            listener,
            editor,
            cancel.clone(),
        ));

        tracing::debug!(theme = %theme, "Editor mounted");
        window.post_message(&BridgeMessage::Ready);

        return Some(EditorHost { cancel, task });
    }

    async fn run<E: CodeEditor>(
        window: Window,
        mut listener: WindowListener,
        mut editor: E,
        cancel: CancellationToken,
    ) {
        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => None,
                message = listener.next() => message,
            };

            match message {
                Some(message) => EditorHost::handle(&window, &mut editor, message),
                None => return,
            }
        }
    }

    pub fn handle<E: CodeEditor + ?Sized>(window: &Window, editor: &mut E, message: BridgeMessage) {
        match message {
            BridgeMessage::SetLanguage { language } => {
                if LanguageProfile::from_editor_language_id(&language).is_none() {
                    tracing::warn!(language = %language, "Switching to a language without a profile");
                }
                if editor.language() != language {
                    editor.set_language(&language);
                }
            }
            BridgeMessage::SetFont { font_size } => {
                if editor.font_size() != font_size {
                    editor.set_font_size(font_size);
                }
            }
            BridgeMessage::InsertCode { code } => {
                editor.set_value(&code);
            }
            BridgeMessage::UpdateTheme { is_dark_theme } => {
                let theme = EditorTheme::from_dark(is_dark_theme);
                if editor.theme() != theme {
                    editor.set_theme(theme);
                }
            }
            message => {
                if let Some(kind) = message.as_request() {
                    tracing::debug!(kind = %kind, "Answering code request");
                    window.post_message(&BridgeMessage::response(kind, editor.get_value()));
                }
            }
        }
    }

    pub async fn unmount(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::warn!(err = ?err, "Editor host ended abnormally");
        }
    }
}
