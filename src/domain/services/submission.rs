#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;

use anyhow::Result;
use serde_json::Map;

use crate::domain::models::CodeRequest;
use crate::domain::models::EditorHandleBox;
use crate::domain::models::LanguageName;
use crate::domain::models::NativeForm;
use crate::domain::models::NativeFormBox;
use crate::domain::models::PendingSubmission;
use crate::domain::models::StoreBox;
use crate::domain::models::SubmissionFile;
use crate::domain::models::SubmissionPackage;
use crate::domain::models::CODE_TO_SUBMIT_KEY;
use crate::domain::models::SUBMISSION_MIME;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubmissionOutcome {
    /// The native form was filled in and submitted.
    Submitted,
    /// No native form on this page, the code was parked for the
    /// submission-confirmation page.
    Deferred,
    /// Something on the form was missing. Logged, the user has to retry.
    Aborted,
    /// Nothing to do on this page.
    Skipped,
}

/// Turns code into what the native form expects: a file named after the
/// language's canonical filename and the form's label for the language.
pub fn package_submission(language: LanguageName, code: &str) -> SubmissionPackage {
    let profile = language.profile();
    return SubmissionPackage {
        file: SubmissionFile {
            filename: profile.filename.to_string(),
            content: code.to_string(),
            mime: SUBMISSION_MIME.to_string(),
        },
        language_label: profile.submission_label.to_string(),
    };
}

/// The task page's own form posts to `/problemset/...`.
pub fn is_task_form(action: &str) -> bool {
    return action.starts_with("/problemset/");
}

pub fn is_submit_form(action: &str) -> bool {
    return action.contains("/submit");
}

/// Selects the language and attaches the file. Returns the attached filename,
/// or `None` when the form has no file input.
fn fill_form(form: &dyn NativeForm, package: SubmissionPackage) -> Option<String> {
    if !form.select_language(&package.language_label) {
        tracing::warn!(
            label = %package.language_label,
            "Could not select the language on the native form"
        );
    }

    let filename = package.file.filename.to_string();
    if let Err(err) = form.attach_file(package.file) {
        tracing::error!(err = ?err, filename = %filename, "Failed to attach the submission file");
        return None;
    }

    return Some(filename);
}

async fn submit_form(form: &dyn NativeForm, filename: &str) -> SubmissionOutcome {
    if let Err(err) = form.submit().await {
        tracing::error!(err = ?err, filename, "Native form submission failed");
        return SubmissionOutcome::Aborted;
    }

    tracing::info!(filename, action = %form.action(), "Submitted");
    return SubmissionOutcome::Submitted;
}

/// Submits whatever is in the editor through the task page's native form.
pub struct SubmissionPipeline {
    editor: EditorHandleBox,
    store: StoreBox,
    form: Option<NativeFormBox>,
}

impl SubmissionPipeline {
    /// `form` is the page's native form, if the page has one. Forms that
    /// don't post to the problem set are not ours to use.
    pub fn new(editor: EditorHandleBox, store: StoreBox, form: Option<NativeFormBox>) -> SubmissionPipeline {
        let form = form.filter(|form| {
            if is_task_form(&form.action()) {
                return true;
            }

            tracing::warn!(action = %form.action(), "Ignoring form that is not a task submission form");
            return false;
        });

        if let Some(form) = &form {
            form.hide();
        }

        return SubmissionPipeline {
            editor,
            store,
            form,
        };
    }

    pub async fn submit(&self, language: LanguageName) -> Result<SubmissionOutcome> {
        let code = self.editor.get_value(CodeRequest::Submission).await?;
        let package = package_submission(language, &code);

        if let Some(form) = &self.form {
            let filename = match fill_form(form.as_ref(), package) {
                Some(filename) => filename,
                None => return Ok(SubmissionOutcome::Aborted),
            };

            return Ok(submit_form(form.as_ref(), &filename).await);
        }

        let pending = PendingSubmission {
            code,
            language,
            filename: package.file.filename,
        };

        let mut items = Map::new();
        items.insert(CODE_TO_SUBMIT_KEY.to_string(), serde_json::to_value(&pending)?);
        self.store.set(items).await?;

        tracing::info!(
            language = %language,
            "No native form on this page, parked the code for the submit page"
        );
        return Ok(SubmissionOutcome::Deferred);
    }
}

/// The submission-confirmation page. Picks up code parked by the task page and
/// submits it through this page's form.
pub struct ConfirmationPage {
    store: StoreBox,
}

impl ConfirmationPage {
    pub fn new(store: StoreBox) -> ConfirmationPage {
        return ConfirmationPage { store };
    }

    pub fn applies_to(url: &str) -> bool {
        return url.contains("/submit");
    }

    pub async fn pending(&self) -> Result<Option<PendingSubmission>> {
        let mut res = self.store.get(&[CODE_TO_SUBMIT_KEY]).await?;
        let raw = match res.remove(CODE_TO_SUBMIT_KEY) {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_value::<PendingSubmission>(raw) {
            Ok(pending) => return Ok(Some(pending)),
            Err(err) => {
                tracing::warn!(err = ?err, "Ignoring unreadable pending submission");
                return Ok(None);
            }
        }
    }

    pub async fn run(&self, url: &str, form: Option<&dyn NativeForm>) -> Result<SubmissionOutcome> {
        if !ConfirmationPage::applies_to(url) {
            return Ok(SubmissionOutcome::Skipped);
        }

        let pending = match self.pending().await? {
            Some(pending) => pending,
            None => return Ok(SubmissionOutcome::Skipped),
        };

        let form = match form.filter(|form| return is_submit_form(&form.action())) {
            Some(form) => form,
            None => {
                tracing::error!(url, "Submission form not found");
                return Ok(SubmissionOutcome::Aborted);
            }
        };

        let package = package_submission(pending.language, &pending.code);
        if package.file.filename != pending.filename {
            tracing::debug!(
                parked = %pending.filename,
                canonical = %package.file.filename,
                "Parked filename differs, using the canonical one"
            );
        }

        let filename = match fill_form(form, package) {
            Some(filename) => filename,
            None => return Ok(SubmissionOutcome::Aborted),
        };

        // The parked slot is consumed exactly once.
        self.store.remove(CODE_TO_SUBMIT_KEY).await?;

        return Ok(submit_form(form, &filename).await);
    }
}
