use crate::core::Notifier;
use crate::domain::model::{Notice, Notification, Severity};
use std::sync::{Arc, Mutex};

/// Sends notifications to the tracing subscriber only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(
                "🔔 {} ({:?})",
                notification.message,
                notification.notice
            ),
        }
    }
}

/// Prints notifications to stderr for the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let icon = match notification.severity {
            Severity::Error => "❌",
        };
        eprintln!("{} {}", icon, notification.message);
        TracingNotifier.notify(notification);
    }
}

/// Keeps every notification in memory, e.g. as a toast queue for a UI to drain.
#[derive(Debug, Clone, Default)]
pub struct CollectingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notifications()
            .iter()
            .map(|notification| notification.notice)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications().is_empty()
    }

    /// Removes and returns everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut received| std::mem::take(&mut *received))
            .unwrap_or_default()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}
