#[cfg(test)]
#[path = "window_test.rs"]
mod tests;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::models::BridgeMessage;

const BUS_CAPACITY: usize = 256;

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> WindowId {
        return WindowId(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed));
    }
}

#[derive(Clone, Debug)]
pub struct WindowMessage {
    pub source: WindowId,
    pub data: Value,
}

/// A same-window broadcast bus. The toolbar and the page-world editor each hold
/// a clone of the same window, other frames embedded in the page share the bus
/// but post under their own id.
#[derive(Clone)]
pub struct Window {
    id: WindowId,
    bus: broadcast::Sender<WindowMessage>,
}

impl Default for Window {
    fn default() -> Window {
        return Window::new();
    }
}

impl Window {
    pub fn new() -> Window {
        let (bus, _) = broadcast::channel::<WindowMessage>(BUS_CAPACITY);
        return Window {
            id: WindowId::next(),
            bus,
        };
    }

    pub fn id(&self) -> WindowId {
        return self.id;
    }

    /// Another frame on the same page.
    pub fn frame(&self) -> Window {
        return Window {
            id: WindowId::next(),
            bus: self.bus.clone(),
        };
    }

    pub fn post_message(&self, message: &BridgeMessage) {
        self.post_raw(message.to_value());
    }

    /// Posts arbitrary data. Nobody listening means the message is lost.
    pub fn post_raw(&self, data: Value) {
        let message = WindowMessage {
            source: self.id,
            data,
        };

        if self.bus.send(message).is_err() {
            tracing::trace!("No window listeners, message dropped");
        }
    }

    /// Starts listening. Only messages posted after this call are seen.
    pub fn listen(&self) -> WindowListener {
        return WindowListener {
            window: self.id,
            rx: self.bus.subscribe(),
        };
    }
}

pub struct WindowListener {
    window: WindowId,
    rx: broadcast::Receiver<WindowMessage>,
}

impl WindowListener {
    /// Waits for the next bridge message posted by this listener's own window.
    /// Messages from other frames and anything that doesn't parse as a bridge
    /// message are skipped. Returns `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<BridgeMessage> {
        loop {
            let message = match self.rx.recv().await {
                Ok(message) => message,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Window listener lagged, messages lost");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            };

            if message.source != self.window {
                tracing::trace!(source = ?message.source, "Discarded message from another window");
                continue;
            }

            if let Some(bridge_message) = BridgeMessage::parse(&message.data) {
                return Some(bridge_message);
            }

            tracing::trace!(data = %message.data, "Ignored unknown window message");
        }
    }
}
