#[cfg(test)]
#[path = "auto_save_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use futures::future;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Map;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::saved_code_key;
use crate::domain::models::CodeRequest;
use crate::domain::models::EditorHandleBox;
use crate::domain::models::StoreBox;

pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5);

/// Every interval, asks the editor for its code and stores it as the saved
/// code of the current problem. A request still unanswered at the next tick is
/// superseded, never queued behind.
pub struct AutoSaveTask {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl AutoSaveTask {
    pub fn start(
        editor: EditorHandleBox,
        store: StoreBox,
        problem_id: &str,
        interval: Duration,
    ) -> AutoSaveTask {
        let interval = if interval.is_zero() {
            tracing::warn!("Auto-save interval can't be zero, using the default");
            AUTO_SAVE_INTERVAL
        } else {
            interval
        };

        let cancel = CancellationToken::new();
        let task = tokio::spawn(AutoSaveTask::run(
            editor,
            store,
            saved_code_key(problem_id),
            interval,
            cancel.clone(),
        ));

        return AutoSaveTask { cancel, task };
    }

    async fn run(
        editor: EditorHandleBox,
        store: StoreBox,
        key: String,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        let mut in_flight: Option<BoxFuture<'static, Result<String>>> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    if in_flight.is_some() {
                        tracing::debug!("Previous auto-save request unanswered, asking again");
                    }

                    let editor = editor.clone();
                    in_flight = Some(
                        async move {
                            return editor.get_value(CodeRequest::Save).await;
                        }
                        .boxed(),
                    );
                }
                res = async {
                    match in_flight.as_mut() {
                        Some(request) => return request.await,
                        None => return future::pending::<Result<String>>().await,
                    }
                } => {
                    in_flight = None;
                    match res {
                        Ok(code) => AutoSaveTask::persist(&store, &key, code).await,
                        Err(err) => tracing::debug!(err = ?err, "Auto-save request dropped"),
                    }
                }
            }
        }
    }

    async fn persist(store: &StoreBox, key: &str, code: String) {
        let mut items = Map::new();
        items.insert(key.to_string(), Value::from(code));

        if let Err(err) = store.set(items).await {
            tracing::warn!(err = ?err, key, "Auto-save failed to persist code");
            return;
        }

        tracing::trace!(key, "Auto-saved");
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            tracing::warn!(err = ?err, "Auto-save task ended abnormally");
        }
    }
}
