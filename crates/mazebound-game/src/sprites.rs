//! Shared sprite store.
//!
//! Visual assets are identified by name and cached on first request. The
//! store is created once at process start, wrapped in an `Arc`, and handed
//! to every factory that needs it — it survives session resets unchanged,
//! so rebuilding a game never reloads assets.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A handle to a named visual asset.
///
/// Rendering is a collaborator's concern; the orchestration layer only
/// needs stable, shareable handles to hand to the factories.
#[derive(Debug)]
pub struct Sprite {
    name: String,
}

impl Sprite {
    /// The asset name this sprite was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Lazily populated cache of [`Sprite`] handles.
///
/// Read-shared across all constructions; entries are only ever added,
/// never replaced, so repeated lookups for the same name return the same
/// handle.
#[derive(Debug, Default)]
pub struct SpriteStore {
    cache: RwLock<HashMap<String, Arc<Sprite>>>,
}

impl SpriteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a sprite by name, loading it into the cache on first use.
    pub fn sprite(&self, name: &str) -> Arc<Sprite> {
        if let Some(sprite) = self.cache.read().expect("sprite cache poisoned").get(name) {
            return Arc::clone(sprite);
        }

        let mut cache = self.cache.write().expect("sprite cache poisoned");
        // A racing caller may have inserted it between the read and write locks.
        Arc::clone(cache.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(sprite = name, "sprite loaded");
            Arc::new(Sprite {
                name: name.to_string(),
            })
        }))
    }

    /// Number of distinct sprites loaded so far.
    pub fn len(&self) -> usize {
        self.cache.read().expect("sprite cache poisoned").len()
    }

    /// Whether any sprite has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_loaded_once_and_shared() {
        let store = SpriteStore::new();
        let a = store.sprite("player");
        let b = store.sprite("player");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_names_distinct_sprites() {
        let store = SpriteStore::new();
        let player = store.sprite("player");
        let ghost = store.sprite("ghost");
        assert!(!Arc::ptr_eq(&player, &ghost));
        assert_eq!(player.name(), "player");
        assert_eq!(ghost.name(), "ghost");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_new_store_is_empty() {
        assert!(SpriteStore::new().is_empty());
    }
}
