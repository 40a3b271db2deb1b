#[cfg(test)]
#[path = "memory_form_test.rs"]
mod tests;

use std::path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::LanguageProfile;
use crate::domain::models::NativeForm;
use crate::domain::models::SubmissionFile;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormRecord {
    pub selected_language: Option<String>,
    pub attached_file: Option<SubmissionFile>,
    pub submissions: usize,
    pub hidden: bool,
}

struct Inner {
    language_options: Vec<String>,
    has_file_input: bool,
    record: FormRecord,
}

/// A native submission form held in memory. When an outbox directory is set,
/// submitting writes the attached file there instead of posting it anywhere.
#[derive(Clone)]
pub struct MemoryForm {
    action: String,
    outbox: Option<path::PathBuf>,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryForm {
    pub fn new(action: &str) -> MemoryForm {
        let language_options = LanguageProfile::all()
            .iter()
            .map(|profile| return profile.submission_label.to_string())
            .collect::<Vec<String>>();

        return MemoryForm {
            action: action.to_string(),
            outbox: None,
            inner: Arc::new(Mutex::new(Inner {
                language_options,
                has_file_input: true,
                record: FormRecord::default(),
            })),
        };
    }

    pub fn with_outbox(mut self, outbox: path::PathBuf) -> MemoryForm {
        self.outbox = Some(outbox);
        return self;
    }

    pub fn without_file_input(self) -> MemoryForm {
        self.lock().has_file_input = false;
        return self;
    }

    pub fn without_language_select(self) -> MemoryForm {
        self.lock().language_options = vec![];
        return self;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        return self.inner.lock().unwrap_or_else(|err| return err.into_inner());
    }

    pub fn record(&self) -> FormRecord {
        return self.lock().record.clone();
    }
}

#[async_trait]
impl NativeForm for MemoryForm {
    fn action(&self) -> String {
        return self.action.to_string();
    }

    fn select_language(&self, label: &str) -> bool {
        let mut inner = self.lock();
        if !inner.language_options.iter().any(|e| return e == label) {
            return false;
        }

        inner.record.selected_language = Some(label.to_string());
        return true;
    }

    fn attach_file(&self, file: SubmissionFile) -> Result<()> {
        let mut inner = self.lock();
        if !inner.has_file_input {
            bail!("File input not found on the form");
        }

        inner.record.attached_file = Some(file);
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn submit(&self) -> Result<()> {
        let attached = {
            let mut inner = self.lock();
            inner.record.submissions += 1;
            inner.record.attached_file.clone()
        };

        if let (Some(outbox), Some(file)) = (&self.outbox, attached) {
            if !outbox.exists() {
                fs::create_dir_all(outbox).await?;
            }

            let file_path = outbox.join(&file.filename);
            let mut out = fs::File::create(&file_path).await?;
            out.write_all(file.content.as_bytes()).await?;
            out.sync_all().await?;

            tracing::info!(
                action = %self.action,
                file_path = ?file_path,
                "Submitted form to outbox"
            );
        }

        return Ok(());
    }

    fn hide(&self) {
        self.lock().record.hidden = true;
    }
}
