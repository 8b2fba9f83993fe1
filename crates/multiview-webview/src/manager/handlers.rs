//! Surface callbacks and how the manager applies them.
//!
//! Surfaces may report navigation progress and page messages from any
//! thread. Each callback is turned into a `SurfaceNotification` and queued;
//! the manager applies queued notifications from its own serialized context.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::WebviewEvent;
use crate::ipc;
use crate::surface::{MessageBridge, NavigationObserver, SurfaceFactory};

use super::MultiWebviewManager;

pub type NotificationSender = mpsc::UnboundedSender<SurfaceNotification>;
pub type NotificationReceiver = mpsc::UnboundedReceiver<SurfaceNotification>;

/// Channel connecting surface observers to the manager's owner.
pub fn notification_channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

/// A callback from one surface, tagged with the entry generation it was
/// created for.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNotification {
    pub id: String,
    pub generation: u64,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    Started { url: String },
    Finished { url: String },
    Failed { url: String, error: Option<String> },
    Message { raw: String },
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Observer handed to each surface. Only queues; never touches manager state.
pub(crate) struct SurfaceObserver {
    id: String,
    generation: u64,
    tx: NotificationSender,
}

impl SurfaceObserver {
    pub(crate) fn new(id: &str, generation: u64, tx: NotificationSender) -> Self {
        Self {
            id: id.to_string(),
            generation,
            tx,
        }
    }

    fn send(&self, kind: NotificationKind) {
        let notification = SurfaceNotification {
            id: self.id.clone(),
            generation: self.generation,
            kind,
        };
        if self.tx.send(notification).is_err() {
            debug!(id = %self.id, "notification dropped: manager is gone");
        }
    }
}

impl NavigationObserver for SurfaceObserver {
    fn on_started(&self, url: &str) {
        self.send(NotificationKind::Started {
            url: url.to_string(),
        });
    }

    fn on_finished(&self, url: &str) {
        self.send(NotificationKind::Finished {
            url: url.to_string(),
        });
    }

    fn on_failed(&self, url: &str, error: Option<&str>) {
        self.send(NotificationKind::Failed {
            url: url.to_string(),
            error: error.map(str::to_string),
        });
    }
}

impl MessageBridge for SurfaceObserver {
    fn post_message(&self, raw: &str) {
        self.send(NotificationKind::Message {
            raw: raw.to_string(),
        });
    }
}

// =============================================================================
// APPLYING NOTIFICATIONS
// =============================================================================

impl<F: SurfaceFactory> MultiWebviewManager<F> {
    /// Apply one queued surface callback.
    ///
    /// Callbacks for destroyed entries, or for an earlier entry that reused
    /// the same id, are dropped.
    pub fn apply_notification(&mut self, notification: SurfaceNotification) {
        let SurfaceNotification {
            id,
            generation,
            kind,
        } = notification;

        let entry = match self.state.registry.get_mut(&id) {
            Ok(entry) => entry,
            Err(_) => {
                warn!(id = %id, "notification for unknown webview dropped");
                return;
            }
        };
        if entry.generation != generation {
            debug!(
                id = %id,
                generation,
                current = entry.generation,
                "stale notification dropped"
            );
            return;
        }

        match kind {
            NotificationKind::Started { url } => {
                debug!(id = %id, url = %url, "load started");
                self.emit(WebviewEvent::LoadStart { id, url });
            }
            NotificationKind::Finished { url } => {
                entry.current_url = Some(url.clone());
                debug!(id = %id, url = %url, "load finished");
                self.emit(WebviewEvent::LoadFinish { id, url });
            }
            NotificationKind::Failed { url, error } => {
                warn!(id = %id, url = %url, error = ?error, "load failed");
                self.emit(WebviewEvent::LoadError { id, url, error });
            }
            NotificationKind::Message { raw } => match ipc::parse_inbound_message(&raw) {
                Some(data) => {
                    debug!(id = %id, body_len = raw.len(), "message from page");
                    self.emit(WebviewEvent::Message { id, data });
                }
                None => {
                    warn!(
                        id = %id,
                        body_len = raw.len(),
                        "page message rejected: invalid JSON"
                    );
                }
            },
        }
    }
}
