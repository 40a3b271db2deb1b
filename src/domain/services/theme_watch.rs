#[cfg(test)]
#[path = "theme_watch_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::ThemeDetector;
use super::Window;
use crate::domain::models::AttributeMutation;
use crate::domain::models::BridgeMessage;
use crate::domain::models::HostPage;

pub const WATCHED_ATTRIBUTES: [&str; 3] = ["class", "style", "data-theme"];

/// A burst of mutations delays re-evaluation by at most this many debounce
/// periods.
pub const MAX_DEBOUNCE_ROUNDS: u32 = 5;

/// Keeps the editor theme in step with the host page. Attribute mutations on
/// body and root are debounced, then the page is re-classified and the result
/// goes out as `update-theme`. A page that never settles is still
/// re-classified once `MAX_DEBOUNCE_ROUNDS` periods have passed.
pub struct ThemeWatchTask {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ThemeWatchTask {
    pub fn start(
        window: Window,
        page: Arc<dyn HostPage>,
        debounce: Duration,
    ) -> ThemeWatchTask {
        let mutations = page.observe();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(ThemeWatchTask::run(
            window,
            page,
            mutations,
            debounce,
            cancel.clone(),
        ));

        return ThemeWatchTask { cancel, task };
    }

    pub fn is_relevant(mutation: &AttributeMutation) -> bool {
        return WATCHED_ATTRIBUTES.contains(&mutation.attribute.as_str());
    }

    async fn run(
        window: Window,
        page: Arc<dyn HostPage>,
        mut mutations: mpsc::UnboundedReceiver<AttributeMutation>,
        debounce: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            let mutation = tokio::select! {
                _ = cancel.cancelled() => return,
                mutation = mutations.recv() => mutation,
            };

            match mutation {
                None => return,
                Some(mutation) if !ThemeWatchTask::is_relevant(&mutation) => continue,
                Some(_) => {}
            }

            let deadline = time::Instant::now() + debounce * MAX_DEBOUNCE_ROUNDS;
            let sleep = time::sleep(debounce);
            tokio::pin!(sleep);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = &mut sleep => break,
                    mutation = mutations.recv() => match mutation {
                        Some(mutation) if ThemeWatchTask::is_relevant(&mutation) => {
                            let next = time::Instant::now() + debounce;
                            sleep.as_mut().reset(next.min(deadline));
                        }
                        Some(_) => {}
                        None => break,
                    },
                }
            }

            let is_dark = ThemeDetector::is_dark(&page.style());
            tracing::debug!(is_dark, "Host page theme re-evaluated");
            window.post_message(&BridgeMessage::UpdateTheme {
                is_dark_theme: is_dark,
            });
        }
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::warn!(err = ?err, "Theme watch task ended abnormally");
        }
    }
}
