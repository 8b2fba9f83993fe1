//! Multi-webview registry and focus/visibility state machine.
//!
//! Manages any number of independent web-rendering surfaces inside one host,
//! each addressed by a caller-chosen id:
//! - Create, destroy, show, hide and focus surfaces (at most one focused)
//! - Navigate, evaluate scripts and post messages to pages
//! - Lifecycle, navigation and page-message events
//! - A serialized service loop plus a JSON command protocol
//!
//! Rendering itself is pluggable through [`surface::SurfaceFactory`]; a
//! headless backend ships by default and a `wry` backend behind the `wry`
//! feature.

pub mod backends;
pub mod events;
pub mod ipc;
pub mod manager;
pub mod protocol;
pub mod service;
pub mod surface;

pub use events::{EventQueue, EventSink, WebviewEvent};
pub use manager::{CreateOptions, EntryState, MultiWebviewManager, PendingScript, WebviewInfo};
pub use protocol::{dispatch, parse_request, Request, Response};
pub use service::{WebviewClient, WebviewService};
pub use surface::{
    MessageBridge, NavigationObserver, RenderSurface, SurfaceError, SurfaceFactory, SurfaceHooks,
    SurfaceOptions,
};
