use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::LanguageName;

pub const SUBMISSION_MIME: &str = "text/plain";

/// A file as the native form's file input receives it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionFile {
    pub filename: String,
    pub content: String,
    pub mime: String,
}

/// Everything needed to fill in and submit the native form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionPackage {
    pub file: SubmissionFile,
    pub language_label: String,
}

/// Code parked for the submission-confirmation page. Consumed exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub code: String,
    pub language: LanguageName,
    pub filename: String,
}
