use multiview_common::WebviewError;
use tracing::{debug, error};

use crate::surface::RenderSurface;

use super::registry::Registry;

/// Tracks the single focused webview and keeps every entry's `hidden` flag
/// consistent with it. The focused entry is always visible; focusing one
/// entry hides all the others.
#[derive(Debug, Default)]
pub struct FocusController {
    focused: Option<String>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the focused entry: hide every other entry, then show and
    /// raise the target. Surface failures are logged; the state still moves.
    pub fn focus<S: RenderSurface>(
        &mut self,
        registry: &mut Registry<S>,
        id: &str,
    ) -> Result<(), WebviewError> {
        if !registry.contains(id) {
            return Err(WebviewError::NotFound(id.to_string()));
        }

        for entry in registry.all_mut().filter(|e| e.id != id) {
            entry.hidden = true;
            if let Err(e) = entry.surface.set_visible(false) {
                error!(id = %entry.id, error = %e, "failed to hide surface");
            }
        }

        let target = registry.get_mut(id)?;
        target.hidden = false;
        if let Err(e) = target.surface.set_visible(true) {
            error!(id, error = %e, "failed to show surface");
        }
        if let Err(e) = target.surface.bring_to_front() {
            error!(id, error = %e, "failed to raise surface");
        }

        debug!(id, previous = ?self.focused, "focus moved");
        self.focused = Some(id.to_string());
        Ok(())
    }

    /// Drop focus if `id` holds it. Returns whether focus was cleared.
    pub fn clear_focus_if_matches(&mut self, id: &str) -> bool {
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}
