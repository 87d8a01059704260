//! Observer interface for user-facing notifications.

use crate::models::{Notification, NotificationKind};
use tokio::sync::mpsc;

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Routes notifications into the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                log::info!("✅ {}: {}", notification.title, notification.message)
            }
            NotificationKind::Warning => {
                log::warn!("⚠️  {}: {}", notification.title, notification.message)
            }
            NotificationKind::Error => {
                log::error!("❌ {}: {}", notification.title, notification.message)
            }
        }
    }
}

/// Forwards notifications to a channel, e.g. for a UI event loop.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            log::trace!("Notification dropped, receiver closed");
        }
    }
}
