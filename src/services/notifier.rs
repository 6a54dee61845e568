//! Notification capability injected into the bookmark store.
//!
//! The store only decides *what* to say; displaying it belongs to the host.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

use crate::types::notification::{Notification, NotificationIcon};

/// Something that can surface a short message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, icon: NotificationIcon);
}

/// Emits notifications as `tracing` events. Used by headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, icon: NotificationIcon) {
        info!(icon = icon.as_str(), "{}", message);
    }
}

/// Records notifications until the host drains them.
///
/// Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct BufferedNotifier {
    pending: Arc<Mutex<Vec<Notification>>>,
}

impl BufferedNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything recorded so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, message: &str, icon: NotificationIcon) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification {
                message: message.to_string(),
                icon,
            });
    }
}
