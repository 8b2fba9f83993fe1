use futures_util::future::{BoxFuture, FutureExt};
use multiview_common::{Rect, WebviewError};
use tracing::{debug, error};

use crate::events::WebviewEvent;
use crate::ipc;
use crate::surface::{RenderSurface, SurfaceError, SurfaceFactory};

use super::handle::WebviewEntry;
use super::types::{EntryState, WebviewInfo};
use super::MultiWebviewManager;

/// Script evaluation started by the manager, to be awaited by the caller.
pub type PendingScript = BoxFuture<'static, Result<String, WebviewError>>;

impl<F: SurfaceFactory> MultiWebviewManager<F> {
    // ===== VISIBILITY =====

    pub fn focus(&mut self, id: &str) -> Result<(), WebviewError> {
        self.state.focus.focus(&mut self.state.registry, id)?;
        self.emit(WebviewEvent::WebviewFocused { id: id.to_string() });
        Ok(())
    }

    /// Hide a webview. Hiding the focused one leaves nothing focused.
    pub fn hide(&mut self, id: &str) -> Result<(), WebviewError> {
        self.conceal(id)?;
        if self.state.focus.clear_focus_if_matches(id) {
            debug!(id, "focused webview hidden, focus cleared");
        }
        Ok(())
    }

    /// Show a webview without giving it focus.
    pub fn show(&mut self, id: &str) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        entry.hidden = false;
        if let Err(e) = entry.surface.set_visible(true) {
            error!(id, error = %e, "failed to show surface");
        }
        Ok(())
    }

    // ===== CONTENT =====

    /// Start navigating. Returns once the load has been initiated; progress
    /// arrives as `loadStart`/`loadFinish`/`loadError` events.
    pub fn navigate(&mut self, id: &str, url: &str) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        if url.is_empty() {
            return Err(WebviewError::InvalidArgument("Must provide url".into()));
        }
        match entry.surface.load(url) {
            Ok(()) => {
                debug!(id, url = %url, "navigation started");
                Ok(())
            }
            Err(SurfaceError::InvalidUrl(reason)) => Err(WebviewError::InvalidArgument(reason)),
            Err(e) => {
                self.report_load_failure(id, url, &e);
                Ok(())
            }
        }
    }

    pub fn set_frame(&mut self, id: &str, frame: Rect) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        if !frame.is_valid() {
            return Err(WebviewError::InvalidArgument(format!(
                "invalid frame: {frame:?}"
            )));
        }
        if let Err(e) = entry.surface.set_frame(Some(frame)) {
            error!(id, error = %e, "failed to apply frame");
        }
        entry.frame = Some(frame);
        Ok(())
    }

    /// Start evaluating `code`. The returned future resolves with the
    /// engine's result; it is not cancelled if the webview is destroyed.
    pub fn evaluate_script(&mut self, id: &str, code: &str) -> Result<PendingScript, WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        if code.is_empty() {
            return Err(WebviewError::InvalidArgument(
                "Must provide code to execute".into(),
            ));
        }
        debug!(id, code_len = code.len(), "evaluating script");
        let pending = entry.surface.evaluate_script(code);
        Ok(pending
            .map(|result| result.map_err(|e| WebviewError::ScriptError(e.to_string())))
            .boxed())
    }

    /// Dispatch `payload` to the page as a `multiwebview-message` event.
    pub fn send_message(&mut self, id: &str, payload: &serde_json::Value) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        let script = ipc::message_dispatch_script(payload);
        // Fire and forget: delivery has no result worth waiting for.
        drop(entry.surface.evaluate_script(&script));
        debug!(id, script_len = script.len(), "message dispatched");
        Ok(())
    }

    // ===== QUERIES =====

    /// Ids in creation order.
    pub fn list(&self) -> Vec<String> {
        self.state.registry.ids()
    }

    pub fn focused(&self) -> Option<&str> {
        self.state.focus.current()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.registry.contains(id)
    }

    pub fn len(&self) -> usize {
        self.state.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.registry.is_empty()
    }

    pub fn info(&self, id: &str) -> Result<WebviewInfo, WebviewError> {
        let entry = self.state.registry.get(id)?;
        Ok(self.snapshot(entry))
    }

    pub fn info_all(&self) -> Vec<WebviewInfo> {
        self.state
            .registry
            .all()
            .map(|entry| self.snapshot(entry))
            .collect()
    }

    /// Ids whose current URL equals `query` (`exact`) or contains it.
    /// Comparison is case-sensitive; entries without a URL never match, and
    /// an empty substring query matches every entry that has one.
    pub fn find_by_url(&self, query: &str, exact: bool) -> Vec<String> {
        self.state
            .registry
            .all()
            .filter(|entry| match entry.current_url() {
                Some(url) if exact => url == query,
                Some(url) => url.contains(query),
                None => false,
            })
            .map(|entry| entry.id().to_string())
            .collect()
    }

    pub fn state_of(&self, id: &str) -> Result<EntryState, WebviewError> {
        let entry = self.state.registry.get(id)?;
        Ok(if entry.hidden {
            EntryState::Hidden
        } else if self.focused() == Some(id) {
            EntryState::VisibleFocused
        } else {
            EntryState::VisibleUnfocused
        })
    }

    fn snapshot(&self, entry: &WebviewEntry<F::Surface>) -> WebviewInfo {
        WebviewInfo {
            id: entry.id.clone(),
            url: entry.current_url.clone(),
            hidden: entry.hidden,
            focused: self.focused() == Some(entry.id.as_str()),
            frame: entry.frame,
        }
    }
}
