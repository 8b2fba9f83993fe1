use multiview_common::WebviewError;

use super::handle::WebviewEntry;

/// Id-to-entry mapping. Knows nothing about surface semantics; the manager
/// finalizes whatever `remove` hands back.
///
/// Entries are kept in insertion order so listings are deterministic.
pub struct Registry<S> {
    entries: Vec<WebviewEntry<S>>,
}

impl<S> Registry<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry. Never replaces a live entry with the same id.
    pub fn insert(&mut self, entry: WebviewEntry<S>) -> Result<(), WebviewError> {
        if self.contains(&entry.id) {
            return Err(WebviewError::DuplicateId(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&WebviewEntry<S>, WebviewError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| WebviewError::NotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut WebviewEntry<S>, WebviewError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| WebviewError::NotFound(id.to_string()))
    }

    /// Detach an entry and return it to the caller.
    pub fn remove(&mut self, id: &str) -> Result<WebviewEntry<S>, WebviewError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WebviewError::NotFound(id.to_string()))?;
        Ok(self.entries.remove(index))
    }

    pub fn all(&self) -> impl Iterator<Item = &WebviewEntry<S>> {
        self.entries.iter()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut WebviewEntry<S>> {
        self.entries.iter_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}
