#[cfg(test)]
#[path = "static_page_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use tokio::sync::mpsc;

use crate::domain::models::AttributeMutation;
use crate::domain::models::HostPage;
use crate::domain::models::MutationTarget;
use crate::domain::models::PageStyle;

struct Inner {
    style: PageStyle,
    has_editor_container: bool,
    observers: Vec<mpsc::UnboundedSender<AttributeMutation>>,
}

/// A problem page held in memory. Style changes are reported to observers the
/// way a mutation observer would report them.
#[derive(Clone)]
pub struct StaticPage {
    url: String,
    inner: Arc<Mutex<Inner>>,
}

impl StaticPage {
    pub fn new(url: &str, background_color: &str) -> StaticPage {
        return StaticPage {
            url: url.to_string(),
            inner: Arc::new(Mutex::new(Inner {
                style: PageStyle {
                    background_color: background_color.to_string(),
                    body_classes: vec![],
                    root_classes: vec![],
                },
                has_editor_container: true,
                observers: vec![],
            })),
        };
    }

    pub fn without_editor_container(self) -> StaticPage {
        self.lock().has_editor_container = false;
        return self;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        return self.inner.lock().unwrap_or_else(|err| return err.into_inner());
    }

    fn notify(inner: &mut Inner, mutation: AttributeMutation) {
        inner
            .observers
            .retain(|observer| return observer.send(mutation.clone()).is_ok());
    }

    pub fn set_background_color(&self, color: &str) {
        let mut inner = self.lock();
        inner.style.background_color = color.to_string();
        StaticPage::notify(
            &mut inner,
            AttributeMutation::new(MutationTarget::Body, "style"),
        );
    }

    pub fn add_class(&self, target: MutationTarget, class: &str) {
        let mut inner = self.lock();
        let classes = match target {
            MutationTarget::Body => &mut inner.style.body_classes,
            MutationTarget::Root => &mut inner.style.root_classes,
        };
        if !classes.iter().any(|e| return e == class) {
            classes.push(class.to_string());
        }
        StaticPage::notify(&mut inner, AttributeMutation::new(target, "class"));
    }

    pub fn remove_class(&self, target: MutationTarget, class: &str) {
        let mut inner = self.lock();
        let classes = match target {
            MutationTarget::Body => &mut inner.style.body_classes,
            MutationTarget::Root => &mut inner.style.root_classes,
        };
        classes.retain(|e| return e != class);
        StaticPage::notify(&mut inner, AttributeMutation::new(target, "class"));
    }

    /// Reports a change to any other attribute without touching the style.
    pub fn touch_attribute(&self, target: MutationTarget, attribute: &str) {
        let mut inner = self.lock();
        StaticPage::notify(&mut inner, AttributeMutation::new(target, attribute));
    }
}

impl HostPage for StaticPage {
    fn url(&self) -> String {
        return self.url.to_string();
    }

    fn style(&self) -> PageStyle {
        return self.lock().style.clone();
    }

    fn has_editor_container(&self) -> bool {
        return self.lock().has_editor_container;
    }

    fn observe(&self) -> mpsc::UnboundedReceiver<AttributeMutation> {
        let (tx, rx) = mpsc::unbounded_channel::<AttributeMutation>();
        self.lock().observers.push(tx);
        return rx;
    }
}
