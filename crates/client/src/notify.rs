//! Shared user-notification channel (toasts).
//!
//! Store operations report user-facing outcomes here instead of returning
//! errors to the UI. The hub is a broadcast channel: any number of UI
//! consumers subscribe, and publishing never blocks a store even when nobody
//! is listening.

use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Severity of a notification, mapped to toast styling by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
    /// An operation is in flight; the UI shows a spinner toast until the
    /// matching Success/Error arrives.
    Loading,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Shared notification hub. Cheap to clone.
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<Notification>,
}

impl NotificationHub {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to notifications. Only notifications published after the
    /// call are received.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Error, message.into());
    }

    pub fn loading(&self, message: impl Into<String>) {
        self.publish(NotificationLevel::Loading, message.into());
    }

    fn publish(&self, level: NotificationLevel, message: String) {
        debug!(?level, %message, "notification");
        // A send error only means no subscriber is currently listening.
        let _ = self.tx.send(Notification { level, message });
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
