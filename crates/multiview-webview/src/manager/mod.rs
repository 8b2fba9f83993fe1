//! Webview lifecycle management.
//!
//! `MultiWebviewManager` owns every live webview: it allocates surfaces from a
//! `SurfaceFactory`, keeps them in a `Registry`, arbitrates focus through the
//! `FocusController` and reports what happened to an `EventSink`. It is the
//! only writer of that state and is not thread-safe by itself; wrap it in a
//! `WebviewService` to get a serialized, multi-caller front end.

use std::sync::Arc;

use multiview_common::Color;

use crate::events::{EventSink, WebviewEvent};
use crate::surface::{SurfaceFactory, SurfaceHooks};

mod commands;
mod focus;
mod handle;
pub mod handlers;
mod lifecycle;
mod registry;
mod types;


pub use commands::PendingScript;
pub use focus::FocusController;
pub use handle::WebviewEntry;
pub use handlers::{
    notification_channel, NotificationKind, NotificationReceiver, NotificationSender,
    SurfaceNotification,
};
pub use registry::Registry;
pub use types::{CreateOptions, EntryState, WebviewInfo};

/// Registry plus focus pointer. Kept together so that nothing touches one
/// without the other being at hand.
pub struct ManagerState<S> {
    pub registry: Registry<S>,
    pub focus: FocusController,
}

impl<S> Default for ManagerState<S> {
    fn default() -> Self {
        Self {
            registry: Registry::new(),
            focus: FocusController::new(),
        }
    }
}

/// Orchestrates all webviews of one host.
pub struct MultiWebviewManager<F: SurfaceFactory> {
    factory: F,
    state: ManagerState<F::Surface>,
    events: Arc<dyn EventSink>,
    /// Cloned into every surface observer.
    notifications: NotificationSender,
    background: Color,
    next_generation: u64,
}

impl<F: SurfaceFactory> MultiWebviewManager<F> {
    /// Create a manager. Surface callbacks are sent to `notifications`; feed
    /// them back through [`apply_notification`](Self::apply_notification).
    pub fn new(factory: F, events: Arc<dyn EventSink>, notifications: NotificationSender) -> Self {
        Self {
            factory,
            state: ManagerState::default(),
            events,
            notifications,
            background: Color::WHITE,
            next_generation: 0,
        }
    }

    /// Background colour applied to every surface before it is attached.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn state(&self) -> &ManagerState<F::Surface> {
        &self.state
    }

    fn emit(&self, event: WebviewEvent) {
        self.events.emit(event);
    }

    fn hooks_for(&self, id: &str, generation: u64) -> SurfaceHooks {
        let observer = Arc::new(handlers::SurfaceObserver::new(
            id,
            generation,
            self.notifications.clone(),
        ));
        SurfaceHooks {
            navigation: observer.clone(),
            messages: observer,
        }
    }
}
