//! In-process surface backend with no rendering.
//!
//! Loads complete synchronously: `load` reports started and then finished
//! (or failed) through the surface's observer before returning. A factory
//! built with [`HeadlessFactory::recording`] also keeps a log of every
//! surface operation so tests can assert exactly what the manager asked of
//! its surfaces. The host binary uses the plain factory, which keeps no
//! history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{self, FutureExt};
use multiview_common::{Color, Rect};
use tracing::debug;

use crate::surface::{
    MessageBridge, NavigationObserver, RenderSurface, ScriptFuture, SurfaceError,
    SurfaceFactory, SurfaceHooks, SurfaceOptions,
};

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Created { id: String, options: SurfaceOptions },
    Attach { id: String },
    Detach { id: String },
    Load { id: String, url: String },
    Script { id: String, code: String },
    Visible { id: String, visible: bool },
    Front { id: String },
    Frame { id: String, frame: Option<Rect> },
    Background { id: String, color: Color },
    Destroy { id: String },
}

type Responder = Arc<dyn Fn(&str) -> Result<String, SurfaceError> + Send + Sync>;

struct Shared {
    recording: bool,
    calls: Vec<SurfaceCall>,
    live: usize,
    capacity: Option<usize>,
    failing_prefixes: Vec<String>,
    responder: Responder,
    hooks: HashMap<String, SurfaceHooks>,
}

/// Factory for [`HeadlessSurface`]s. Clones share the call log.
#[derive(Clone)]
pub struct HeadlessFactory {
    shared: Arc<Mutex<Shared>>,
}

impl Shared {
    fn record(&mut self, call: SurfaceCall) {
        if self.recording {
            self.calls.push(call);
        }
    }
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                recording: false,
                calls: Vec::new(),
                live: 0,
                capacity: None,
                failing_prefixes: Vec::new(),
                responder: Arc::new(|_| Ok("null".to_string())),
                hooks: HashMap::new(),
            })),
        }
    }

    /// A factory that logs every surface operation, for [`calls`],
    /// [`scripts`] and [`visibility`].
    ///
    /// [`calls`]: Self::calls
    /// [`scripts`]: Self::scripts
    /// [`visibility`]: Self::visibility
    pub fn recording() -> Self {
        let factory = Self::new();
        factory.lock().recording = true;
        factory
    }

    /// Refuse to allocate once `max` surfaces are alive.
    pub fn with_capacity(self, max: usize) -> Self {
        self.lock().capacity = Some(max);
        self
    }

    /// Loads of URLs starting with `prefix` report a failure instead of
    /// finishing.
    pub fn with_failing_prefix(self, prefix: impl Into<String>) -> Self {
        self.lock().failing_prefixes.push(prefix.into());
        self
    }

    /// Compute script results. The default answers `"null"` to everything.
    pub fn with_script_responder<R>(self, responder: R) -> Self
    where
        R: Fn(&str) -> Result<String, SurfaceError> + Send + Sync + 'static,
    {
        self.lock().responder = Arc::new(responder);
        self
    }

    /// A surface not allocated through the factory, for external
    /// registration. Its callbacks go nowhere.
    pub fn external_surface(&self, id: &str) -> HeadlessSurface {
        let hooks = SurfaceHooks {
            navigation: Arc::new(Unobserved),
            messages: Arc::new(Unobserved),
        };
        let mut shared = self.lock();
        shared.live += 1;
        HeadlessSurface {
            id: id.to_string(),
            hooks,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Every recorded call, oldest first. Empty unless built with
    /// [`recording`](Self::recording).
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.lock().calls.clone()
    }

    /// Scripts evaluated on surfaces created for `id`.
    pub fn scripts(&self, id: &str) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Script { id: sid, code } if sid == id => Some(code.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last visibility requested for `id`, if any.
    pub fn visibility(&self, id: &str) -> Option<bool> {
        self.lock().calls.iter().rev().find_map(|call| match call {
            SurfaceCall::Visible { id: sid, visible } if sid == id => Some(*visible),
            _ => None,
        })
    }

    /// Surfaces allocated and not yet destroyed.
    pub fn live(&self) -> usize {
        self.lock().live
    }

    /// Callbacks given to the live surface created for `id`. Lets a caller
    /// play the page side, e.g. post a message.
    pub fn hooks(&self, id: &str) -> Option<SurfaceHooks> {
        self.lock().hooks.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceFactory for HeadlessFactory {
    type Surface = HeadlessSurface;

    fn create_surface(
        &self,
        options: &SurfaceOptions,
        hooks: SurfaceHooks,
    ) -> Result<HeadlessSurface, SurfaceError> {
        let mut shared = self.lock();
        if let Some(max) = shared.capacity {
            if shared.live >= max {
                return Err(SurfaceError::Platform(format!(
                    "surface limit of {max} reached"
                )));
            }
        }
        shared.live += 1;
        shared.record(SurfaceCall::Created {
            id: options.id.clone(),
            options: options.clone(),
        });
        shared.hooks.insert(options.id.clone(), hooks.clone());
        debug!(id = %options.id, live = shared.live, "headless surface created");

        Ok(HeadlessSurface {
            id: options.id.clone(),
            hooks,
            shared: Arc::clone(&self.shared),
        })
    }
}

/// Recording surface produced by [`HeadlessFactory`].
pub struct HeadlessSurface {
    id: String,
    hooks: SurfaceHooks,
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessSurface {
    pub fn id(&self) -> &str {
        &self.id
    }

    fn record(&self, call: SurfaceCall) {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(call);
    }
}

impl RenderSurface for HeadlessSurface {
    fn attach(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Attach {
            id: self.id.clone(),
        });
        Ok(())
    }

    fn detach(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Detach {
            id: self.id.clone(),
        });
        Ok(())
    }

    fn load(&mut self, url: &str) -> Result<(), SurfaceError> {
        // Anything without a scheme is rejected up front.
        if !url.contains(':') {
            return Err(SurfaceError::InvalidUrl(url.to_string()));
        }
        self.record(SurfaceCall::Load {
            id: self.id.clone(),
            url: url.to_string(),
        });

        let fails = {
            let shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
            shared.failing_prefixes.iter().any(|p| url.starts_with(p))
        };
        self.hooks.navigation.on_started(url);
        if fails {
            self.hooks
                .navigation
                .on_failed(url, Some("host unreachable"));
        } else {
            self.hooks.navigation.on_finished(url);
        }
        Ok(())
    }

    fn evaluate_script(&mut self, code: &str) -> ScriptFuture {
        self.record(SurfaceCall::Script {
            id: self.id.clone(),
            code: code.to_string(),
        });
        let responder = Arc::clone(
            &self
                .shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .responder,
        );
        future::ready(responder(code)).boxed()
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Visible {
            id: self.id.clone(),
            visible,
        });
        Ok(())
    }

    fn set_frame(&mut self, frame: Option<Rect>) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Frame {
            id: self.id.clone(),
            frame,
        });
        Ok(())
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Background {
            id: self.id.clone(),
            color,
        });
        Ok(())
    }

    fn bring_to_front(&mut self) -> Result<(), SurfaceError> {
        self.record(SurfaceCall::Front {
            id: self.id.clone(),
        });
        Ok(())
    }

    fn destroy(self) {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.live = shared.live.saturating_sub(1);
        let owned = shared
            .hooks
            .get(&self.id)
            .is_some_and(|h| Arc::ptr_eq(&h.navigation, &self.hooks.navigation));
        if owned {
            shared.hooks.remove(&self.id);
        }
        shared.record(SurfaceCall::Destroy { id: self.id });
    }
}

struct Unobserved;

impl NavigationObserver for Unobserved {
    fn on_started(&self, _url: &str) {}
    fn on_finished(&self, _url: &str) {}
    fn on_failed(&self, _url: &str, _error: Option<&str>) {}
}

impl MessageBridge for Unobserved {
    fn post_message(&self, _raw: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(id: &str) -> SurfaceOptions {
        SurfaceOptions {
            id: id.into(),
            frame: None,
            javascript: true,
            file_access: false,
            user_agent: None,
        }
    }

    #[test]
    fn capacity_limits_live_surfaces() {
        let factory = HeadlessFactory::recording().with_capacity(2);
        // External surfaces count towards the limit too.
        let external = factory.external_surface("x");
        let hooks = external.hooks.clone();
        let first = factory.create_surface(&options("a"), hooks.clone()).unwrap();
        assert_eq!(factory.live(), 2);
        assert!(factory.create_surface(&options("b"), hooks.clone()).is_err());

        first.destroy();
        assert_eq!(factory.live(), 1);
        assert!(factory.create_surface(&options("b"), hooks).is_ok());
    }

    #[test]
    fn plain_factory_keeps_no_history() {
        let factory = HeadlessFactory::new();
        let hooks = factory.external_surface("x").hooks.clone();
        for _ in 0..100 {
            let mut surface = factory.create_surface(&options("a"), hooks.clone()).unwrap();
            surface.attach().unwrap();
            surface.load("https://example.com").unwrap();
            surface.destroy();
        }

        assert!(factory.calls().is_empty());
        assert!(factory.hooks("a").is_none());
        assert_eq!(factory.live(), 1);
    }

    #[test]
    fn destroy_releases_hooks_of_that_surface_only() {
        let factory = HeadlessFactory::recording();
        let hooks = factory.external_surface("x").hooks.clone();
        let first = factory.create_surface(&options("a"), hooks.clone()).unwrap();
        first.destroy();
        assert!(factory.hooks("a").is_none());

        let other = factory.external_surface("y").hooks.clone();
        let second = factory.create_surface(&options("b"), other).unwrap();
        let stale = HeadlessSurface {
            id: "b".into(),
            hooks: hooks.clone(),
            shared: Arc::clone(&factory.shared),
        };
        stale.destroy();
        assert!(factory.hooks("b").is_some());

        second.destroy();
        assert!(factory.hooks("b").is_none());
        assert_eq!(factory.calls().len(), 5);
    }

    #[test]
    fn rejects_url_without_scheme() {
        let factory = HeadlessFactory::recording();
        let mut surface = factory.external_surface("a");
        assert_eq!(
            surface.load("example.com"),
            Err(SurfaceError::InvalidUrl("example.com".into()))
        );
        assert!(surface.load("https://example.com").is_ok());
    }

    #[tokio::test]
    async fn scripts_use_responder() {
        let factory = HeadlessFactory::recording().with_script_responder(|code| {
            if code.contains("throw") {
                Err(SurfaceError::Script("boom".into()))
            } else {
                Ok(code.len().to_string())
            }
        });
        let mut surface = factory.external_surface("a");
        assert_eq!(surface.evaluate_script("1+1").await.unwrap(), "3");
        assert!(surface.evaluate_script("throw 1").await.is_err());
        assert_eq!(factory.scripts("a"), vec!["1+1", "throw 1"]);
    }
}
