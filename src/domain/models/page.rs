use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use super::SubmissionFile;

/// The computed styling the theme detector looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageStyle {
    pub background_color: String,
    pub body_classes: Vec<String>,
    pub root_classes: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationTarget {
    Body,
    Root,
}

/// An attribute change on the body or the document root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMutation {
    pub target: MutationTarget,
    pub attribute: String,
}

impl AttributeMutation {
    pub fn new(target: MutationTarget, attribute: &str) -> AttributeMutation {
        return AttributeMutation {
            target,
            attribute: attribute.to_string(),
        };
    }
}

/// The host problem page, as far as the companion depends on it.
pub trait HostPage: Send + Sync {
    fn url(&self) -> String;

    fn style(&self) -> PageStyle;

    fn has_editor_container(&self) -> bool;

    /// Subscribes to attribute mutations on body and root.
    fn observe(&self) -> mpsc::UnboundedReceiver<AttributeMutation>;
}

/// The site's native submission form.
#[async_trait]
pub trait NativeForm: Send + Sync {
    fn action(&self) -> String;

    /// Picks `label` in the language select. Returns false when the form has
    /// no language select or the label isn't one of its options.
    fn select_language(&self, label: &str) -> bool;

    /// Puts `file` into the form's file input.
    fn attach_file(&self, file: SubmissionFile) -> Result<()>;

    async fn submit(&self) -> Result<()>;

    fn hide(&self);
}

pub type NativeFormBox = Box<dyn NativeForm>;
