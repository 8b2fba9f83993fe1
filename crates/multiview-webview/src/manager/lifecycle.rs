use multiview_common::WebviewError;
use tracing::{debug, error, info, warn};

use crate::events::WebviewEvent;
use crate::surface::{RenderSurface, SurfaceError, SurfaceFactory, SurfaceOptions};

use super::handle::WebviewEntry;
use super::types::CreateOptions;
use super::MultiWebviewManager;

const MISSING_ID: &str = "Must provide webview id";

impl<F: SurfaceFactory> MultiWebviewManager<F> {
    /// Allocate, attach and register a new webview, then start loading its
    /// URL if one was given.
    ///
    /// The new entry takes focus when `auto_focus` is set or when it is the
    /// only entry and nothing is focused; otherwise it starts hidden.
    pub fn create(&mut self, id: &str, options: CreateOptions) -> Result<(), WebviewError> {
        if id.is_empty() {
            return Err(WebviewError::InvalidArgument(MISSING_ID.into()));
        }
        if self.state.registry.contains(id) {
            return Err(WebviewError::DuplicateId(id.to_string()));
        }
        if let Some(frame) = options.frame.filter(|f| !f.is_valid()) {
            return Err(WebviewError::InvalidArgument(format!(
                "invalid frame: {frame:?}"
            )));
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let surface_options = SurfaceOptions {
            id: id.to_string(),
            frame: options.frame,
            javascript: options.javascript,
            file_access: options.file_access,
            user_agent: options.user_agent.clone(),
        };
        let hooks = self.hooks_for(id, generation);

        let mut surface = self
            .factory
            .create_surface(&surface_options, hooks)
            .map_err(|e| {
                error!(id, error = %e, "surface allocation refused");
                WebviewError::SurfaceCreation(e.to_string())
            })?;

        if let Err(e) = surface.set_background_color(self.background) {
            warn!(id, error = %e, "failed to set background colour");
        }
        if let Err(e) = surface.attach() {
            error!(id, error = %e, "failed to attach surface");
            surface.destroy();
            return Err(WebviewError::SurfaceCreation(e.to_string()));
        }

        self.state
            .registry
            .insert(WebviewEntry::new(id, surface, options.frame, generation))?;

        let take_focus = options.auto_focus
            || (self.state.focus.current().is_none() && self.state.registry.len() == 1);
        if take_focus {
            self.state.focus.focus(&mut self.state.registry, id)?;
        } else {
            self.conceal(id)?;
        }

        info!(id, generation, focused = take_focus, "webview created");
        self.emit(WebviewEvent::WebviewCreated { id: id.to_string() });

        if let Some(url) = options.url.filter(|u| !u.is_empty()) {
            let entry = self.state.registry.get_mut(id)?;
            match entry.surface.load(&url) {
                Ok(()) => debug!(id, url = %url, "initial load started"),
                Err(e) => self.report_load_failure(id, &url, &e),
            }
        }
        Ok(())
    }

    /// Adopt a surface that was created elsewhere.
    ///
    /// The entry starts hidden and unfocused, with `url` recorded as its
    /// current URL. No hooks are installed; the surface keeps whatever
    /// callbacks its creator gave it. A rejected surface is destroyed
    /// before the error is returned.
    pub fn register_external(
        &mut self,
        id: &str,
        surface: F::Surface,
        url: Option<String>,
    ) -> Result<(), WebviewError> {
        let rejected = if id.is_empty() {
            Some(WebviewError::InvalidArgument(MISSING_ID.into()))
        } else if self.state.registry.contains(id) {
            Some(WebviewError::DuplicateId(id.to_string()))
        } else {
            None
        };
        if let Some(err) = rejected {
            warn!(id, error = %err, "external surface rejected");
            surface.destroy();
            return Err(err);
        }

        self.next_generation += 1;
        let mut entry = WebviewEntry::new(id, surface, None, self.next_generation);
        entry.current_url = url.filter(|u| !u.is_empty());
        entry.external = true;
        self.state.registry.insert(entry)?;
        self.conceal(id)?;

        info!(id, "external webview registered");
        self.emit(WebviewEvent::WebviewCreated { id: id.to_string() });
        Ok(())
    }

    /// Detach, release and unregister a webview. Focus is dropped if it held it.
    ///
    /// The entry is moved out of the registry and its surface consumed in
    /// one step, since `RenderSurface::destroy` takes the surface by value.
    pub fn destroy(&mut self, id: &str) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        if let Err(e) = entry.surface.detach() {
            error!(id, error = %e, "failed to detach surface");
        }

        let entry = self.state.registry.remove(id)?;
        entry.into_surface().destroy();
        let had_focus = self.state.focus.clear_focus_if_matches(id);

        info!(id, had_focus, "webview destroyed");
        self.emit(WebviewEvent::WebviewDestroyed { id: id.to_string() });
        Ok(())
    }

    /// Destroy every webview in insertion order. Used during shutdown.
    pub fn destroy_all(&mut self) {
        for id in self.state.registry.ids() {
            if let Err(e) = self.destroy(&id) {
                warn!(id = %id, error = %e, "destroy during shutdown failed");
            }
        }
    }

    /// Mark `id` hidden and tell its surface. Does not touch focus.
    pub(super) fn conceal(&mut self, id: &str) -> Result<(), WebviewError> {
        let entry = self.state.registry.get_mut(id)?;
        entry.hidden = true;
        if let Err(e) = entry.surface.set_visible(false) {
            error!(id, error = %e, "failed to hide surface");
        }
        Ok(())
    }

    /// A load that could not start is reported the same way as one that
    /// failed midway.
    pub(super) fn report_load_failure(&self, id: &str, url: &str, err: &SurfaceError) {
        warn!(id, url = %url, error = %err, "load could not start");
        self.emit(WebviewEvent::LoadError {
            id: id.to_string(),
            url: url.to_string(),
            error: Some(err.to_string()),
        });
    }
}
