#[cfg(test)]
#[path = "editor_proxy_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::Window;
use super::WindowListener;
use crate::domain::models::BridgeMessage;
use crate::domain::models::CodeRequest;
use crate::domain::models::EditorHandle;

#[derive(Default)]
struct PendingRequest {
    /// Requests of this kind posted and not answered yet.
    outstanding: usize,
    /// Whoever asked last. Earlier callers have been superseded.
    waiter: Option<oneshot::Sender<String>>,
}

type PendingRequests = Arc<Mutex<HashMap<CodeRequest, PendingRequest>>>;

fn lock(pending: &PendingRequests) -> MutexGuard<'_, HashMap<CodeRequest, PendingRequest>> {
    return pending.lock().unwrap_or_else(|err| return err.into_inner());
}

/// The toolbar half of the bridge. Turns `EditorHandle` calls into bridge
/// messages and matches code responses back to the caller waiting for them.
///
/// Responses carry no correlation id, so at most one caller waits per request
/// kind. A response is handed over only once every request of its kind has
/// been answered, which means the waiter always gets the answer to the last
/// request it made and never an older one.
pub struct EditorProxy {
    window: Window,
    pending: PendingRequests,
    ready: watch::Receiver<usize>,
    cancel: CancellationToken,
}

impl EditorProxy {
    pub fn connect(window: &Window) -> EditorProxy {
        let pending: PendingRequests = Arc::default();
        let (ready_tx, ready_rx) = watch::channel(0usize);
        let cancel = CancellationToken::new();

        tokio::spawn(EditorProxy::listen(
            window.clone(),
            window.listen(),
            pending.clone(),
            ready_tx,
            cancel.clone(),
        ));

        return EditorProxy {
            window: window.clone(),
            pending,
            ready: ready_rx,
            cancel,
        };
    }

    /// Counts how many times the editor announced itself. Changes whenever the
    /// page-world editor (re)mounts.
    pub fn ready(&self) -> watch::Receiver<usize> {
        return self.ready.clone();
    }

    /// Stops listening and fails every pending request.
    pub fn disconnect(&self) {
        self.cancel.cancel();
        lock(&self.pending).clear();
    }

    async fn listen(
        window: Window,
        mut listener: WindowListener,
        pending: PendingRequests,
        ready: watch::Sender<usize>,
        cancel: CancellationToken,
    ) {
        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => None,
                message = listener.next() => message,
            };

            match message {
                Some(BridgeMessage::Ready) => {
                    EditorProxy::resend_pending(&window, &pending);
                    ready.send_modify(|count| *count += 1);
                }
                Some(message) => {
                    if let Some((kind, code)) = message.as_response() {
                        EditorProxy::resolve(&pending, kind, code);
                    }
                }
                None => return,
            }
        }
    }

    fn resolve(pending: &PendingRequests, kind: CodeRequest, code: &str) {
        let mut pending = lock(pending);
        let entry = match pending.get_mut(&kind) {
            Some(entry) if entry.outstanding > 0 => entry,
            _ => {
                tracing::trace!(kind = %kind, "Ignored unsolicited code response");
                return;
            }
        };

        entry.outstanding -= 1;
        if entry.outstanding > 0 {
            tracing::debug!(
                kind = %kind,
                outstanding = entry.outstanding,
                "Dropped stale code response"
            );
            return;
        }

        if let Some(waiter) = entry.waiter.take() {
            if waiter.send(code.to_string()).is_err() {
                tracing::debug!(kind = %kind, "Code response arrived after its caller left");
            }
        }
    }

    /// Requests posted before the editor mounted were lost. Ask again for the
    /// ones somebody is still waiting on.
    fn resend_pending(window: &Window, pending: &PendingRequests) {
        let mut pending = lock(pending);
        for (kind, entry) in pending.iter_mut() {
            if entry.waiter.is_none() {
                entry.outstanding = 0;
                continue;
            }

            entry.outstanding = 1;
            window.post_message(&BridgeMessage::request(*kind));
        }
    }
}

impl Drop for EditorProxy {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl EditorHandle for EditorProxy {
    #[allow(clippy::implicit_return)]
    async fn set_language(&self, language_id: &str) -> Result<()> {
        self.window.post_message(&BridgeMessage::SetLanguage {
            language: language_id.to_string(),
        });
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn set_font(&self, font_size: u32) -> Result<()> {
        self.window
            .post_message(&BridgeMessage::SetFont { font_size });
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn set_value(&self, code: &str) -> Result<()> {
        self.window.post_message(&BridgeMessage::InsertCode {
            code: code.to_string(),
        });
        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_value(&self, kind: CodeRequest) -> Result<String> {
        let rx = {
            let mut pending = lock(&self.pending);
            let entry = pending.entry(kind).or_default();
            if entry.waiter.is_some() {
                tracing::debug!(kind = %kind, "Superseding pending code request");
            }

            let (tx, rx) = oneshot::channel::<String>();
            entry.waiter = Some(tx);
            entry.outstanding += 1;
            rx
        };

        self.window.post_message(&BridgeMessage::request(kind));

        match rx.await {
            Ok(code) => return Ok(code),
            Err(_) => bail!(format!(
                "The {kind} code request was superseded before the editor answered"
            )),
        }
    }

    #[allow(clippy::implicit_return)]
    async fn set_theme(&self, is_dark: bool) -> Result<()> {
        self.window.post_message(&BridgeMessage::UpdateTheme {
            is_dark_theme: is_dark,
        });
        return Ok(());
    }
}
