//! The game session.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::direction::Direction;
use crate::error::GameError;
use crate::level::{Level, MoveOutcome};
use crate::player::{Player, PlayerFactory};

/// The lifecycle state of a session.
///
/// Transitions are strictly ordered — no skipping states:
///
/// ```text
/// NotStarted → InProgress → Terminated
/// ```
///
/// - **NotStarted**: The session is assembled but play has not begun.
/// - **InProgress**: Moves are accepted, the auto-movement task is
///   allowed to keep driving the player.
/// - **Terminated**: The level was cleared or play was stopped. Moves
///   are ignored and the auto-movement task retires itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NotStarted,
    InProgress,
    Terminated,
}

impl Progress {
    /// Returns `true` if moves are currently accepted.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Attempts to transition to the next state.
    ///
    /// Returns `Some(next)` if a transition exists, `None` from the
    /// terminal state. This enforces the strict ordering.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::InProgress),
            Self::InProgress => Some(Self::Terminated),
            Self::Terminated => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NotStarted"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Terminated => write!(f, "Terminated"),
        }
    }
}

/// State guarded by the session lock.
struct GameInner {
    level: Level,
    progress: Progress,
}

/// A live game session.
///
/// `Game` is internally synchronized: one mutex guards the level and the
/// progress state, held only for the short, non-blocking body of each
/// operation. `move_player` is therefore safe to call concurrently from
/// the input path and the auto-movement task without any serialization by
/// the caller.
pub struct Game {
    players: Vec<Arc<Player>>,
    inner: Mutex<GameInner>,
}

impl Game {
    fn new(mut level: Level, players: Vec<Arc<Player>>) -> Result<Arc<Self>, GameError> {
        for player in &players {
            level.register_player(player)?;
        }
        Ok(Arc::new(Self {
            players,
            inner: Mutex::new(GameInner {
                level,
                progress: Progress::NotStarted,
            }),
        }))
    }

    /// Begins play. A no-op unless the session is `NotStarted`.
    pub fn start(&self) {
        let mut inner = self.inner.lock().expect("game lock poisoned");
        if inner.progress == Progress::NotStarted {
            inner.progress = Progress::InProgress;
            tracing::info!(players = self.players.len(), "game started");
        }
    }

    /// Ends play. A no-op unless the session is `InProgress`.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().expect("game lock poisoned");
        if inner.progress == Progress::InProgress {
            inner.progress = Progress::Terminated;
            tracing::info!("game stopped");
        }
    }

    /// Whether moves are currently accepted.
    pub fn is_in_progress(&self) -> bool {
        self.progress().is_in_progress()
    }

    /// Current lifecycle state.
    pub fn progress(&self) -> Progress {
        self.inner.lock().expect("game lock poisoned").progress
    }

    /// The participating players, in registration order. The first entry
    /// is "the player" in single-player mode.
    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// Where a player currently stands on the level.
    pub fn position_of(&self, player: &Player) -> Option<(usize, usize)> {
        self.inner
            .lock()
            .expect("game lock poisoned")
            .level
            .position_of(player.id())
    }

    /// Pellets not yet consumed.
    pub fn remaining_pellets(&self) -> usize {
        self.inner
            .lock()
            .expect("game lock poisoned")
            .level
            .remaining_pellets()
    }

    /// Moves `player` one square in `direction`.
    ///
    /// Ignored unless the session is in progress. Walls block. Consuming
    /// the last pellet terminates the session (level cleared).
    pub fn move_player(&self, player: &Player, direction: Direction) {
        let mut inner = self.inner.lock().expect("game lock poisoned");
        if !inner.progress.is_in_progress() {
            tracing::trace!(player = %player.id(), %direction, "move ignored, game not in progress");
            return;
        }

        if let MoveOutcome::Moved { cleared: true } = inner.level.move_player(player, direction) {
            inner.progress = Progress::Terminated;
            tracing::info!(player = %player.id(), score = player.score(), "level cleared");
        }
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("progress", &self.progress())
            .finish_non_exhaustive()
    }
}

/// Builds [`Game`] sessions. Needs the player factory.
pub struct GameFactory {
    players: PlayerFactory,
}

impl GameFactory {
    /// Creates a factory from the player factory.
    pub fn new(players: PlayerFactory) -> Self {
        Self { players }
    }

    /// Produces a session with a single freshly created player.
    pub fn single_player_game(&self, level: Level) -> Result<Arc<Game>, GameError> {
        self.game(level, 1)
    }

    /// Produces a session with `player_count` players.
    ///
    /// Zero players is accepted here — the orchestrator treats an empty
    /// player collection at move time as a contract violation, and tests
    /// exercise that path.
    pub fn game(&self, level: Level, player_count: usize) -> Result<Arc<Game>, GameError> {
        let players = (0..player_count)
            .map(|_| self.players.create_player())
            .collect();
        Game::new(level, players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardFactory;
    use crate::ghost::GhostFactory;
    use crate::level::MapParser;
    use crate::points::{DefaultPointsPolicy, PointsPolicy};
    use crate::sprites::SpriteStore;
    use crate::LevelFactory;

    fn level_from(map: &str) -> Level {
        let sprites = Arc::new(SpriteStore::new());
        let points: Arc<dyn PointsPolicy> = Arc::new(DefaultPointsPolicy);
        MapParser::new(
            LevelFactory::new(
                Arc::clone(&sprites),
                GhostFactory::new(Arc::clone(&sprites)),
                points,
            ),
            BoardFactory::new(Arc::clone(&sprites)),
        )
        .parse_map(map)
        .expect("test map should parse")
    }

    fn single_player_game(map: &str) -> Arc<Game> {
        let sprites = Arc::new(SpriteStore::new());
        GameFactory::new(PlayerFactory::new(sprites))
            .single_player_game(level_from(map))
            .expect("test game should build")
    }

    #[test]
    fn test_progress_next_follows_strict_order() {
        assert_eq!(Progress::NotStarted.next(), Some(Progress::InProgress));
        assert_eq!(Progress::InProgress.next(), Some(Progress::Terminated));
        assert_eq!(Progress::Terminated.next(), None);
    }

    #[test]
    fn test_progress_can_transition_to() {
        assert!(Progress::NotStarted.can_transition_to(Progress::InProgress));
        assert!(!Progress::NotStarted.can_transition_to(Progress::Terminated));
        assert!(!Progress::Terminated.can_transition_to(Progress::NotStarted));
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::NotStarted.to_string(), "NotStarted");
        assert_eq!(Progress::InProgress.to_string(), "InProgress");
        assert_eq!(Progress::Terminated.to_string(), "Terminated");
    }

    #[test]
    fn test_game_starts_not_started() {
        let game = single_player_game("####\n#P.#\n####");
        assert_eq!(game.progress(), Progress::NotStarted);
        assert!(!game.is_in_progress());
    }

    #[test]
    fn test_moves_ignored_before_start() {
        let game = single_player_game("####\n#P.#\n####");
        let player = Arc::clone(&game.players()[0]);
        let before = game.position_of(&player);
        game.move_player(&player, Direction::East);
        assert_eq!(game.position_of(&player), before);
    }

    #[test]
    fn test_move_consumes_pellet_and_scores() {
        let game = single_player_game("#####\n#P..#\n#####");
        game.start();
        let player = Arc::clone(&game.players()[0]);
        assert_eq!(game.position_of(&player), Some((1, 1)));

        game.move_player(&player, Direction::East);
        assert_eq!(game.position_of(&player), Some((2, 1)));
        assert_eq!(player.score(), crate::level::PELLET_VALUE);
        assert_eq!(game.remaining_pellets(), 1);
        assert!(game.is_in_progress());
    }

    #[test]
    fn test_wall_blocks_move() {
        let game = single_player_game("####\n#P.#\n####");
        game.start();
        let player = Arc::clone(&game.players()[0]);
        game.move_player(&player, Direction::North);
        assert_eq!(game.position_of(&player), Some((1, 1)));
    }

    #[test]
    fn test_last_pellet_terminates_game() {
        let game = single_player_game("####\n#P.#\n####");
        game.start();
        let player = Arc::clone(&game.players()[0]);
        game.move_player(&player, Direction::East);
        assert_eq!(game.remaining_pellets(), 0);
        assert_eq!(game.progress(), Progress::Terminated);

        // Further moves are ignored once terminated.
        game.move_player(&player, Direction::West);
        assert_eq!(game.position_of(&player), Some((2, 1)));
    }

    #[test]
    fn test_stop_terminates() {
        let game = single_player_game("####\n#P.#\n####");
        game.start();
        game.stop();
        assert_eq!(game.progress(), Progress::Terminated);
        // start() cannot revive a terminated session.
        game.start();
        assert_eq!(game.progress(), Progress::Terminated);
    }

    #[test]
    fn test_zero_player_game_builds() {
        let sprites = Arc::new(SpriteStore::new());
        let game = GameFactory::new(PlayerFactory::new(sprites))
            .game(level_from("####\n#P.#\n####"), 0)
            .expect("zero-player game should build");
        assert!(game.players().is_empty());
    }
}
