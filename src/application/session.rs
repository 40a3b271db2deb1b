#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::io;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::sync::watch;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::parse_font_size;
use crate::domain::models::CodeRequest;
use crate::domain::models::EditorHandle;
use crate::domain::models::HostPage;
use crate::domain::models::LanguageName;
use crate::domain::models::MutationTarget;
use crate::domain::models::NativeFormBox;
use crate::domain::models::StoreBox;
use crate::domain::models::Template;
use crate::domain::services::problem_id_from_url;
use crate::domain::services::AutoSaveTask;
use crate::domain::services::ConfirmationPage;
use crate::domain::services::EditorHost;
use crate::domain::services::EditorProxy;
use crate::domain::services::SubmissionOutcome;
use crate::domain::services::SubmissionPipeline;
use crate::domain::services::ThemeDetector;
use crate::domain::services::ThemeWatchTask;
use crate::domain::services::Toolbar;
use crate::domain::services::Window;
use crate::infrastructure::editors::buffer::BufferEditor;
use crate::infrastructure::host::memory_form::FormRecord;
use crate::infrastructure::host::memory_form::MemoryForm;
use crate::infrastructure::host::static_page::StaticPage;
use crate::infrastructure::stores::StoreManager;

pub const HELP_TEXT: &str = r#"
COMMANDS:
- language [cpp|java|python]: Switch the editor language and list its templates.
- font [12|14|16|18|20]: Change the editor font size.
- templates: List templates for the current language.
- template [id]: Replace the editor contents with a template.
- type [code]: Replace the editor contents as if typed by hand.
- show: Print the editor contents.
- background [color]: Change the page background, e.g. rgb(30, 30, 30).
- class [add|remove] [body|root] [class]: Toggle a class on the page.
- theme: Print the page and editor theme.
- submit: Submit the editor contents through the page form.
- form: Print what the page form received.
- help: Print this help.
- quit: Leave the page.
"#;

pub struct SessionOptions {
    pub store: StoreBox,
    pub background: String,
    pub outbox: Option<path::PathBuf>,
    pub auto_save_interval: Duration,
    pub theme_debounce: Duration,
    /// Whether the task page carries its native submission form.
    pub native_form: bool,
}

impl SessionOptions {
    pub fn from_config(native_form: bool) -> Result<SessionOptions> {
        let store = StoreManager::get(Config::store_name()?, &Config::get(ConfigKey::StoreFile));
        let outbox = Config::get(ConfigKey::OutboxDir);

        return Ok(SessionOptions {
            store,
            background: Config::get(ConfigKey::Background),
            outbox: if outbox.is_empty() {
                None
            } else {
                Some(path::PathBuf::from(outbox))
            },
            auto_save_interval: Config::duration(ConfigKey::AutoSaveInterval)?,
            theme_debounce: Config::duration(ConfigKey::ThemeDebounce)?,
            native_form,
        });
    }
}

/// The path part of a page URL, which is what a native form posts to.
pub fn form_action(url: &str) -> String {
    let without_scheme = url.split("://").last().unwrap_or(url);
    return match without_scheme.find('/') {
        Some(idx) => without_scheme[idx..].to_string(),
        None => "/".to_string(),
    };
}

fn task_form_action(problem_id: Option<&str>) -> String {
    return match problem_id {
        Some(problem_id) => format!("/problemset/submit/{problem_id}/"),
        None => "/problemset/submit/".to_string(),
    };
}

/// One line per template: id, name and the first line of its code.
pub fn format_template(template: &Template) -> String {
    let mut res = format!("- (ID: {}) {}", template.id, template.name);

    let mut line = template
        .code
        .split('\n')
        .next()
        .unwrap_or_default()
        .to_string();

    if line.chars().count() >= 70 {
        line = format!("{}...", line.chars().take(67).collect::<String>());
    }
    if !line.is_empty() {
        res = format!("{res}, {line}");
    }

    return res;
}

fn format_templates(templates: &[Template]) -> String {
    if templates.is_empty() {
        return "No templates for this language.".to_string();
    }

    return templates
        .iter()
        .map(format_template)
        .collect::<Vec<String>>()
        .join("\n");
}

/// Runs the submission-confirmation page at `url` against the parked code.
pub async fn confirm(url: &str, options: &SessionOptions) -> Result<SubmissionOutcome> {
    let mut form = MemoryForm::new(&form_action(url));
    if let Some(outbox) = &options.outbox {
        form = form.with_outbox(outbox.clone());
    }

    return ConfirmationPage::new(options.store.clone())
        .run(url, Some(&form))
        .await;
}

/// One problem page held open in memory, driven by line commands. Both script
/// worlds run as they would in the browser: the editor behind the bridge, the
/// toolbar, auto-save and theme watching in front of it.
pub struct PageSession {
    page: Arc<StaticPage>,
    proxy: Arc<EditorProxy>,
    ready: watch::Receiver<usize>,
    /// Editor announcements the toolbar state already went out for.
    served_ready: usize,
    editor: Option<BufferEditor>,
    host: Option<EditorHost>,
    toolbar: Toolbar,
    form: Option<MemoryForm>,
    pipeline: SubmissionPipeline,
    auto_save: Option<AutoSaveTask>,
    theme_watch: ThemeWatchTask,
}

impl PageSession {
    pub async fn open(url: &str, options: &SessionOptions) -> Result<PageSession> {
        let page = Arc::new(StaticPage::new(url, &options.background));
        let window = Window::new();
        let problem_id = problem_id_from_url(url);

        // The toolbar side listens before the editor announces itself.
        let proxy = Arc::new(EditorProxy::connect(&window));
        let ready = proxy.ready();

        let mut editor: Option<BufferEditor> = None;
        let host = EditorHost::mount(&window, page.as_ref(), |state| {
            let created = BufferEditor::new(state);
            editor = Some(created.clone());
            return created;
        });

        let theme_watch = ThemeWatchTask::start(window.clone(), page.clone(), options.theme_debounce);

        let mut toolbar = Toolbar::new(proxy.clone(), options.store.clone(), problem_id.clone());
        if let Err(err) = toolbar.initialize().await {
            tracing::warn!(err = ?err, "Toolbar failed to load preferences, using defaults");
        }

        let form = if options.native_form {
            let mut form = MemoryForm::new(&task_form_action(problem_id.as_deref()));
            if let Some(outbox) = &options.outbox {
                form = form.with_outbox(outbox.clone());
            }
            Some(form)
        } else {
            None
        };

        let pipeline = SubmissionPipeline::new(
            proxy.clone(),
            options.store.clone(),
            form.clone().map(|form| return Box::new(form) as NativeFormBox),
        );

        let auto_save = problem_id.as_deref().map(|problem_id| {
            return AutoSaveTask::start(
                proxy.clone(),
                options.store.clone(),
                problem_id,
                options.auto_save_interval,
            );
        });

        tracing::info!(
            url,
            problem_id = ?problem_id,
            editor = host.is_some(),
            "Page session opened"
        );

        // The editor mounted above already got the toolbar state.
        let served_ready = usize::from(host.is_some());

        return Ok(PageSession {
            page,
            proxy,
            ready,
            served_ready,
            editor,
            host,
            toolbar,
            form,
            pipeline,
            auto_save,
            theme_watch,
        });
    }

    pub fn editor(&self) -> Option<&BufferEditor> {
        return self.editor.as_ref();
    }

    pub fn form_record(&self) -> Option<FormRecord> {
        return self.form.as_ref().map(|form| return form.record());
    }

    fn require_editor(&self) -> Result<&BufferEditor> {
        match &self.editor {
            Some(editor) => return Ok(editor),
            None => bail!("No editor on this page"),
        }
    }

    fn parse_target(text: &str) -> Result<MutationTarget> {
        match text {
            "body" => return Ok(MutationTarget::Body),
            "root" => return Ok(MutationTarget::Root),
            _ => bail!(format!("Unknown element '{text}', expected body or root")),
        }
    }

    /// Runs one command line. Returns `None` once the page should close.
    pub async fn handle(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => return Ok(Some("".to_string())),
            "help" => return Ok(Some(HELP_TEXT.trim().to_string())),
            "quit" | "exit" => return Ok(None),
            "language" => {
                let language = match LanguageName::parse(rest) {
                    Some(language) => language,
                    None => bail!(format!("Unknown language '{rest}'")),
                };

                let templates = self.toolbar.select_language(language).await?;
                return Ok(Some(format!(
                    "Language set to {}\n{}",
                    language.profile().display_name,
                    format_templates(&templates)
                )));
            }
            "font" => {
                let font_size = match parse_font_size(rest) {
                    Some(font_size) => font_size,
                    None => bail!(format!("Unknown font size '{rest}'")),
                };

                self.toolbar.select_font_size(font_size).await?;
                return Ok(Some(format!("Font size set to {font_size}px")));
            }
            "templates" => {
                let templates = self.toolbar.templates().await?;
                return Ok(Some(format_templates(&templates)));
            }
            "template" => {
                let templates = self.toolbar.templates().await?;
                let template = match templates.iter().find(|e| return e.id == rest) {
                    Some(template) => template,
                    None => bail!(format!("No template with id '{rest}'")),
                };

                if !self.toolbar.apply_template(template).await? {
                    return Ok(Some(format!("Template {} is empty", template.name)));
                }
                return Ok(Some(format!("Inserted template {}", template.name)));
            }
            "type" => {
                self.require_editor()?.type_text(&rest.replace("\\n", "\n"));
                return Ok(Some("".to_string()));
            }
            "show" => {
                self.require_editor()?;
                let code = self.proxy.get_value(CodeRequest::Run).await?;
                return Ok(Some(code));
            }
            "background" => {
                self.page.set_background_color(rest);
                return Ok(Some("".to_string()));
            }
            "class" => {
                let parts = rest.split_whitespace().collect::<Vec<&str>>();
                if parts.len() != 3 {
                    bail!("Usage: class [add|remove] [body|root] [class]");
                }

                let target = PageSession::parse_target(parts[1])?;
                match parts[0] {
                    "add" => self.page.add_class(target, parts[2]),
                    "remove" => self.page.remove_class(target, parts[2]),
                    other => bail!(format!("Unknown class action '{other}'")),
                }
                return Ok(Some("".to_string()));
            }
            "theme" => {
                let page_theme = if ThemeDetector::is_dark(&self.page.style()) {
                    "dark"
                } else {
                    "light"
                };

                let mut res = format!("Page: {page_theme}");
                if let Some(editor) = &self.editor {
                    res = format!("{res}\nEditor: {}", editor.state().theme);
                }
                return Ok(Some(res));
            }
            "submit" => {
                let language = self.toolbar.preferences().language;
                let outcome = self.pipeline.submit(language).await?;
                return Ok(Some(format!("Submission {outcome}")));
            }
            "form" => {
                let record = match self.form_record() {
                    Some(record) => record,
                    None => return Ok(Some("This page has no form".to_string())),
                };

                let file = record
                    .attached_file
                    .map(|file| return file.filename)
                    .unwrap_or_else(|| return "none".to_string());

                return Ok(Some(format!(
                    "Language: {}\nFile: {file}\nSubmissions: {}",
                    record.selected_language.unwrap_or_else(|| return "none".to_string()),
                    record.submissions
                )));
            }
            _ => bail!(format!("Unknown command '{command}', try help")),
        }
    }

    /// Reads commands from `input` until it ends or `quit`. Whenever the editor
    /// remounts the toolbar state is sent again.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        let mut ready_open = true;

        loop {
            tokio::select! {
                res = self.ready.changed(), if ready_open => {
                    if res.is_err() {
                        ready_open = false;
                        continue;
                    }

                    let count = *self.ready.borrow_and_update();
                    if count <= self.served_ready {
                        tracing::trace!(count, "Editor announcement already served");
                        continue;
                    }
                    self.served_ready = count;

                    if let Err(err) = self.toolbar.sync_editor().await {
                        tracing::warn!(err = ?err, "Failed to re-send toolbar state");
                    }
                }
                line = lines.next_line() => {
                    let line = match line? {
                        Some(line) => line,
                        None => return Ok(()),
                    };

                    match self.handle(&line).await {
                        Ok(Some(out)) => {
                            if !out.is_empty() {
                                println!("{out}");
                            }
                        }
                        Ok(None) => return Ok(()),
                        Err(err) => eprintln!("{}", Paint::red(err.to_string())),
                    }
                }
            }
        }
    }

    pub async fn close(self) {
        if let Some(auto_save) = self.auto_save {
            auto_save.stop().await;
        }

        self.theme_watch.stop().await;
        if let Some(host) = self.host {
            host.unmount().await;
        }
        self.proxy.disconnect();

        tracing::info!(url = %self.page.url(), "Page session closed");
    }
}

/// Opens the page at `url` and drives it from stdin.
pub async fn start(url: &str, native_form: bool) -> Result<()> {
    let options = SessionOptions::from_config(native_form)?;

    if ConfirmationPage::applies_to(url) {
        let outcome = confirm(url, &options).await?;
        println!("Submission {outcome}");
        return Ok(());
    }

    let mut session = PageSession::open(url, &options).await?;
    println!("{}", HELP_TEXT.trim());

    let res = session.run(io::BufReader::new(io::stdin())).await;
    session.close().await;

    return res;
}
