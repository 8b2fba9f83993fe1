//! Events the manager pushes to whoever observes the host.

use std::sync::{Arc, Mutex};

use multiview_common::EventBus;
use serde::{Deserialize, Serialize};

/// Lifecycle, navigation and message notifications.
///
/// Serialized as `{"event": "<name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum WebviewEvent {
    WebviewCreated {
        id: String,
    },
    WebviewFocused {
        id: String,
    },
    WebviewDestroyed {
        id: String,
    },
    LoadStart {
        id: String,
        url: String,
    },
    LoadFinish {
        id: String,
        url: String,
    },
    /// `error` is absent when the platform gave no description.
    LoadError {
        id: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Script-originated message, already parsed as JSON.
    Message {
        id: String,
        data: serde_json::Value,
    },
}

impl WebviewEvent {
    /// The webview the event is about.
    pub fn id(&self) -> &str {
        match self {
            Self::WebviewCreated { id }
            | Self::WebviewFocused { id }
            | Self::WebviewDestroyed { id }
            | Self::LoadStart { id, .. }
            | Self::LoadFinish { id, .. }
            | Self::LoadError { id, .. }
            | Self::Message { id, .. } => id,
        }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::WebviewCreated { .. } => "webviewCreated",
            Self::WebviewFocused { .. } => "webviewFocused",
            Self::WebviewDestroyed { .. } => "webviewDestroyed",
            Self::LoadStart { .. } => "loadStart",
            Self::LoadFinish { .. } => "loadFinish",
            Self::LoadError { .. } => "loadError",
            Self::Message { .. } => "message",
        }
    }
}

/// Receives events emitted by the manager. Emission never fails.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: WebviewEvent);
}

impl EventSink for EventBus<WebviewEvent> {
    fn emit(&self, event: WebviewEvent) {
        // Zero subscribers is fine; nobody is listening yet.
        self.publish(event);
    }
}

/// Pull-style sink: events accumulate until the host drains them.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Arc<Mutex<Vec<WebviewEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&self) -> Vec<WebviewEvent> {
        match self.events.lock() {
            Ok(mut evts) => std::mem::take(&mut *evts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|evts| evts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventQueue {
    fn emit(&self, event: WebviewEvent) {
        if let Ok(mut evts) = self.events.lock() {
            evts.push(event);
        }
    }
}
