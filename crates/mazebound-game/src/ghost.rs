//! Ghost adversaries.
//!
//! Ghost behavior (pathfinding, targeting) is a collaborator's concern;
//! the orchestration layer only constructs ghosts and places them on the
//! level.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sprites::{Sprite, SpriteStore};

static NEXT_GHOST_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GhostId(pub u64);

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// A ghost adversary placed on the level.
#[derive(Debug)]
pub struct Ghost {
    id: GhostId,
    sprite: Arc<Sprite>,
}

impl Ghost {
    /// This ghost's unique ID.
    pub fn id(&self) -> GhostId {
        self.id
    }

    /// The sprite the presentation layer draws this ghost with.
    pub fn sprite(&self) -> &Arc<Sprite> {
        &self.sprite
    }
}

/// Builds [`Ghost`]s with their sprites resolved from the shared store.
pub struct GhostFactory {
    sprites: Arc<SpriteStore>,
}

impl GhostFactory {
    /// Creates a factory backed by the shared sprite store.
    pub fn new(sprites: Arc<SpriteStore>) -> Self {
        Self { sprites }
    }

    /// Creates a new ghost with a fresh ID.
    pub fn create_ghost(&self) -> Arc<Ghost> {
        let id = GhostId(NEXT_GHOST_ID.fetch_add(1, Ordering::Relaxed));
        Arc::new(Ghost {
            id,
            sprite: self.sprites.sprite("ghost"),
        })
    }
}
