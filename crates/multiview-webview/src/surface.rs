//! The rendering capability the manager orchestrates.
//!
//! A `RenderSurface` is one embeddable web-rendering instance. The manager
//! never looks inside it: it only drives the operations below and listens to
//! the two callback channels (`NavigationObserver`, `MessageBridge`) it hands
//! to the factory when the surface is allocated.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use multiview_common::{Color, Rect};

/// Errors reported by a surface backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The backend could not parse or accept the URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Script evaluation failed inside the engine.
    #[error("{0}")]
    Script(String),

    /// Any other platform failure.
    #[error("{0}")]
    Platform(String),
}

/// Result of a script evaluation that has been started but not finished.
pub type ScriptFuture = BoxFuture<'static, Result<String, SurfaceError>>;

/// Everything a factory needs to allocate a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Id of the entry the surface will belong to. Informational only.
    pub id: String,
    /// Initial frame. `None` fills the host.
    pub frame: Option<Rect>,
    pub javascript: bool,
    pub file_access: bool,
    pub user_agent: Option<String>,
}

/// Navigation progress reported by a surface. May be called from any thread.
pub trait NavigationObserver: Send + Sync {
    fn on_started(&self, url: &str);
    fn on_finished(&self, url: &str);
    /// `error` is `None` when the platform cannot describe the failure.
    fn on_failed(&self, url: &str, error: Option<&str>);
}

/// Script-originated messages. `raw` is the single string argument the page
/// passed to the bridge; it is untrusted.
pub trait MessageBridge: Send + Sync {
    fn post_message(&self, raw: &str);
}

/// Callback endpoints bound to one surface.
#[derive(Clone)]
pub struct SurfaceHooks {
    pub navigation: Arc<dyn NavigationObserver>,
    pub messages: Arc<dyn MessageBridge>,
}

/// One embeddable web-rendering instance.
///
/// Implementations are usually bound to the host UI thread, so nothing here
/// requires `Send`; the manager only ever calls them from its serialized
/// context.
pub trait RenderSurface {
    /// Insert into the host view hierarchy. Called once, before the surface
    /// is first made visible.
    fn attach(&mut self) -> Result<(), SurfaceError>;

    /// Remove from the host view hierarchy. Called once, right before `destroy`.
    fn detach(&mut self) -> Result<(), SurfaceError>;

    /// Start navigating. Progress is reported through the `NavigationObserver`.
    fn load(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Start evaluating `code`. Evaluation begins immediately; the returned
    /// future only observes the outcome, so dropping it does not cancel.
    fn evaluate_script(&mut self, code: &str) -> ScriptFuture;

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;

    /// `None` fills the host.
    fn set_frame(&mut self, frame: Option<Rect>) -> Result<(), SurfaceError>;

    fn set_background_color(&mut self, color: Color) -> Result<(), SurfaceError>;

    /// Raise above sibling surfaces. No-op for backends without layering.
    fn bring_to_front(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Release all resources.
    fn destroy(self);
}

/// Allocates surfaces for the manager.
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    fn create_surface(
        &self,
        options: &SurfaceOptions,
        hooks: SurfaceHooks,
    ) -> Result<Self::Surface, SurfaceError>;
}
