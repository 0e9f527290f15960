use std::collections::HashSet;

/// Per-restaurant favorite flags, keyed by restaurant id.
///
/// Where the flags live (platform preferences, a file, a database) is up to the
/// implementation; the controller only reads and writes through this trait.
pub trait FavoriteStore: Send + Sync {
    fn is_favorite(&self, id: &str) -> bool;

    /// Setting `false` removes the entry rather than storing a negative flag.
    fn set_favorite(&mut self, id: &str, favorite: bool);

    /// Flip the flag and return the new value.
    fn toggle_favorite(&mut self, id: &str) -> bool {
        let favorite = !self.is_favorite(id);
        self.set_favorite(id, favorite);
        favorite
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFavorites {
    ids: HashSet<String>,
}

impl InMemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FavoriteStore for InMemoryFavorites {
    fn is_favorite(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn set_favorite(&mut self, id: &str, favorite: bool) {
        if favorite {
            self.ids.insert(id.to_string());
        } else {
            self.ids.remove(id);
        }
    }
}
