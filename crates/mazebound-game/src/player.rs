//! Players and the player factory.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::sprites::{Sprite, SpriteStore};

/// Counter for generating unique player IDs, process-wide.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A participant in a [`Game`](crate::Game) session.
///
/// Score and liveness are atomics: the scoring policy updates the score
/// from whichever context issued the move (input path or scheduler task),
/// and readers never need the game lock.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    sprite: Arc<Sprite>,
    score: AtomicU32,
    alive: AtomicBool,
}

impl Player {
    /// This player's unique ID.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The sprite the presentation layer draws this player with.
    pub fn sprite(&self) -> &Arc<Sprite> {
        &self.sprite
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score.load(Ordering::Relaxed)
    }

    /// Adds points to the score. Called by the scoring policy.
    pub fn add_points(&self, points: u32) {
        self.score.fetch_add(points, Ordering::Relaxed);
    }

    /// Whether the player is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Marks the player dead or alive.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Relaxed);
    }
}

/// Builds [`Player`]s with their sprites resolved from the shared store.
pub struct PlayerFactory {
    sprites: Arc<SpriteStore>,
}

impl PlayerFactory {
    /// Creates a factory backed by the shared sprite store.
    pub fn new(sprites: Arc<SpriteStore>) -> Self {
        Self { sprites }
    }

    /// Creates a new player with a fresh ID, zero score, alive.
    pub fn create_player(&self) -> Arc<Player> {
        let id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(player = %id, "player created");
        Arc::new(Player {
            id,
            sprite: self.sprites.sprite("player"),
            score: AtomicU32::new(0),
            alive: AtomicBool::new(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> PlayerFactory {
        PlayerFactory::new(Arc::new(SpriteStore::new()))
    }

    #[test]
    fn test_new_player_starts_clean() {
        let player = factory().create_player();
        assert_eq!(player.score(), 0);
        assert!(player.is_alive());
        assert_eq!(player.sprite().name(), "player");
    }

    #[test]
    fn test_ids_are_unique() {
        let factory = factory();
        let a = factory.create_player();
        let b = factory.create_player();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_score_accumulates() {
        let player = factory().create_player();
        player.add_points(10);
        player.add_points(50);
        assert_eq!(player.score(), 60);
    }
}
