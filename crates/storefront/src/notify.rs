//! User-facing notifications.
//!
//! The cart store reports every failed operation through a
//! [`NotificationSink`] in addition to returning an error, so a UI that only
//! shows toasts does not have to inspect results.

use std::sync::{Mutex, PoisonError};

/// Fire-and-forget sink for user-facing error messages.
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Sends notifications to the log at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notification = message, "Cart notification");
    }
}

/// Buffers notifications until a UI layer drains them.
#[derive(Debug, Default)]
pub struct NotificationLog {
    messages: Mutex<Vec<String>>,
}

impl NotificationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take all buffered messages, leaving the log empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl NotificationSink for NotificationLog {
    fn error(&self, message: &str) {
        tracing::debug!(notification = message, "Buffered cart notification");
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
