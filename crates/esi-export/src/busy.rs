//! Shared busy indicator.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Cloneable handle over a boolean "busy" signal.
///
/// Every clone drives the same indicator; observers follow it through
/// [`BusyIndicator::subscribe`].
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    tx: Arc<watch::Sender<bool>>,
    shown_at: Arc<Mutex<Option<Instant>>>,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator {
    /// Create a hidden indicator.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            shown_at: Arc::new(Mutex::new(None)),
        }
    }

    /// Follow indicator changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Whether the indicator is currently shown.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Show the indicator and remember when.
    pub fn show(&self) {
        *self.shown_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        self.tx.send_replace(true);
    }

    /// Hide the indicator immediately.
    pub fn hide(&self) {
        *self.shown_at.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.tx.send_replace(false);
    }

    /// Hide the indicator, but no earlier than `min_visible` after the last
    /// [`show`](Self::show).
    pub async fn clear_after(&self, min_visible: Duration) {
        let shown_at = *self.shown_at.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(shown_at) = shown_at {
            tokio::time::sleep_until(shown_at + min_visible).await;
        }
        self.hide();
    }
}
