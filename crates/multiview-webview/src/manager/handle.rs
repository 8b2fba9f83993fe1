use multiview_common::Rect;

/// State record for one managed webview. Owns its surface exclusively.
pub struct WebviewEntry<S> {
    pub(super) id: String,
    pub(super) surface: S,
    /// Written only when the surface reports a finished navigation.
    pub(super) current_url: Option<String>,
    pub(super) hidden: bool,
    pub(super) frame: Option<Rect>,
    /// Distinguishes this entry from earlier entries that used the same id.
    pub(super) generation: u64,
    pub(super) external: bool,
}

impl<S> WebviewEntry<S> {
    pub(super) fn new(id: impl Into<String>, surface: S, frame: Option<Rect>, generation: u64) -> Self {
        Self {
            id: id.into(),
            surface,
            current_url: None,
            hidden: true,
            frame,
            generation,
            external: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// `None` means the surface fills the host.
    pub fn frame(&self) -> Option<Rect> {
        self.frame
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True for surfaces adopted through `register_external`.
    pub fn is_external(&self) -> bool {
        self.external
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give up the entry, handing back the surface for release.
    pub(super) fn into_surface(self) -> S {
        self.surface
    }
}

impl<S> std::fmt::Debug for WebviewEntry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebviewEntry")
            .field("id", &self.id)
            .field("current_url", &self.current_url)
            .field("hidden", &self.hidden)
            .field("frame", &self.frame)
            .field("generation", &self.generation)
            .field("external", &self.external)
            .finish_non_exhaustive()
    }
}
