//! Native child webviews built on `wry`.
//!
//! Surfaces are children of one host window and are bound to the thread that
//! owns it, so a manager over `WryFactory` must run on that thread (e.g. a
//! `tokio::task::LocalSet` driven by the UI loop).
//!
//! wry reports page-load start and finish but has no failure callback, so
//! this backend never produces `loadError`.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use futures_util::future::FutureExt;
use multiview_common::{Color, Rect};
use tokio::sync::oneshot;
use tracing::{debug, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::ipc::BRIDGE_INIT_SCRIPT;
use crate::surface::{
    RenderSurface, ScriptFuture, SurfaceError, SurfaceFactory, SurfaceHooks, SurfaceOptions,
};

// =============================================================================
// COORDINATE CONVERSION
// =============================================================================

/// Convert a logical `Rect` to a wry `Rect`.
pub fn to_wry_rect(rect: &Rect) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(rect.x, rect.y)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(rect.width, rect.height)),
    }
}

fn platform(err: wry::Error) -> SurfaceError {
    SurfaceError::Platform(err.to_string())
}

// =============================================================================
// FACTORY
// =============================================================================

/// Creates child webviews inside `window`.
pub struct WryFactory<W: HasWindowHandle> {
    window: Rc<W>,
    /// Area a surface without an explicit frame fills.
    host: Rc<Cell<Rect>>,
}

impl<W: HasWindowHandle> WryFactory<W> {
    pub fn new(window: Rc<W>, host: Rect) -> Self {
        Self {
            window,
            host: Rc::new(Cell::new(host)),
        }
    }

    /// Update the host area after the window is resized. Surfaces without an
    /// explicit frame pick it up on their next frame update.
    pub fn set_host_bounds(&self, host: Rect) {
        self.host.set(host);
    }
}

impl<W: HasWindowHandle> SurfaceFactory for WryFactory<W> {
    type Surface = WrySurface;

    fn create_surface(
        &self,
        options: &SurfaceOptions,
        hooks: SurfaceHooks,
    ) -> Result<WrySurface, SurfaceError> {
        let bounds = options.frame.unwrap_or_else(|| self.host.get());

        if !options.javascript {
            warn!(id = %options.id, "wry cannot disable JavaScript; ignoring");
        }
        if options.file_access {
            debug!(id = %options.id, "file access is governed by the platform engine");
        }

        let mut builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(&bounds))
            .with_visible(false)
            .with_focused(false)
            .with_initialization_script(BRIDGE_INIT_SCRIPT);

        if let Some(ua) = &options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        let messages = Arc::clone(&hooks.messages);
        builder = builder.with_ipc_handler(move |request| {
            messages.post_message(request.body());
        });

        let navigation = Arc::clone(&hooks.navigation);
        builder = builder.with_on_page_load_handler(move |event, url| match event {
            PageLoadEvent::Started => navigation.on_started(&url),
            PageLoadEvent::Finished => navigation.on_finished(&url),
        });

        let webview = builder
            .build_as_child(self.window.as_ref())
            .map_err(platform)?;
        debug!(id = %options.id, "wry surface created");

        Ok(WrySurface {
            id: options.id.clone(),
            webview,
            host: Rc::clone(&self.host),
        })
    }
}

// =============================================================================
// SURFACE
// =============================================================================

pub struct WrySurface {
    id: String,
    webview: WebView,
    host: Rc<Cell<Rect>>,
}

impl RenderSurface for WrySurface {
    /// `build_as_child` already inserted the webview; it stays invisible
    /// until the manager decides otherwise.
    fn attach(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn detach(&mut self) -> Result<(), SurfaceError> {
        self.webview.set_visible(false).map_err(platform)
    }

    fn load(&mut self, url: &str) -> Result<(), SurfaceError> {
        self.webview.load_url(url).map_err(platform)
    }

    fn evaluate_script(&mut self, code: &str) -> ScriptFuture {
        let (tx, rx) = oneshot::channel();
        // wry takes an `Fn`, but answers once.
        let slot = Mutex::new(Some(tx));
        let started = self
            .webview
            .evaluate_script_with_callback(code, move |result| {
                if let Some(tx) = slot.lock().ok().and_then(|mut s| s.take()) {
                    let _ = tx.send(result);
                }
            });

        match started {
            Ok(()) => rx
                .map(|result| {
                    result.map_err(|_| SurfaceError::Script("webview dropped the result".into()))
                })
                .boxed(),
            Err(e) => futures_util::future::ready(Err(SurfaceError::Script(e.to_string()))).boxed(),
        }
    }

    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
        self.webview.set_visible(visible).map_err(platform)
    }

    fn set_frame(&mut self, frame: Option<Rect>) -> Result<(), SurfaceError> {
        let bounds = frame.unwrap_or_else(|| self.host.get());
        self.webview
            .set_bounds(to_wry_rect(&bounds))
            .map_err(platform)
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), SurfaceError> {
        self.webview
            .set_background_color((color.r, color.g, color.b, color.a))
            .map_err(platform)
    }

    /// wry has no z-order control between siblings; give the surface input
    /// focus instead.
    fn bring_to_front(&mut self) -> Result<(), SurfaceError> {
        self.webview.focus().map_err(platform)
    }

    fn destroy(self) {
        debug!(id = %self.id, "wry surface destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_converts_to_logical_wry_rect() {
        let wry_rect = to_wry_rect(&Rect::new(100.0, 50.0, 800.0, 600.0));

        match wry_rect.position {
            wry::dpi::Position::Logical(pos) => {
                assert!((pos.x - 100.0).abs() < f64::EPSILON);
                assert!((pos.y - 50.0).abs() < f64::EPSILON);
            }
            _ => panic!("expected logical position"),
        }
        match wry_rect.size {
            wry::dpi::Size::Logical(size) => {
                assert!((size.width - 800.0).abs() < f64::EPSILON);
                assert!((size.height - 600.0).abs() < f64::EPSILON);
            }
            _ => panic!("expected logical size"),
        }
    }
}
