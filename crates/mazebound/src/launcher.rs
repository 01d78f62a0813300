//! The session launcher: lifecycle, bindings, auto-movement arming.
//!
//! The launcher owns the single active session and its presentation
//! shell. Directional input moves the player once and arms the
//! auto-movement scheduler with the same move; "Reset" tears the pair
//! down and rebuilds both through the construction pipeline.

use std::sync::{Arc, Mutex};

use mazebound_game::{Direction, Game, Player, PointsRegistry, SpriteStore};
use mazebound_tick::{AutoMove, AutoMoveTarget};

use crate::config::LauncherConfig;
use crate::error::LaunchError;
use crate::pipeline::{MapSource, Pipeline};
use crate::shell::{Action, HeadlessHub, Key, Shell, ShellBuilder};

/// Produces a fresh shell builder for every (re)build.
pub type ShellFactory = Box<dyn Fn() -> Box<dyn ShellBuilder> + Send + Sync>;

/// The eight input signals and the directions they move in. Arrow keys
/// and letter keys alias to the same four directions.
const DIRECTIONAL_BINDINGS: [(Key, Direction); 8] = [
    (Key::Up, Direction::North),
    (Key::Down, Direction::South),
    (Key::Left, Direction::West),
    (Key::Right, Direction::East),
    (Key::Char('w'), Direction::North),
    (Key::Char('s'), Direction::South),
    (Key::Char('a'), Direction::West),
    (Key::Char('d'), Direction::East),
];

/// The repeated move the scheduler drives: one (session, player,
/// direction) triple, re-issued each tick.
struct DirectionalDrive {
    game: Arc<Game>,
    player: Arc<Player>,
    direction: Direction,
}

impl AutoMoveTarget for DirectionalDrive {
    fn in_progress(&self) -> bool {
        self.game.is_in_progress()
    }

    fn step(&self) {
        self.game.move_player(&self.player, self.direction);
    }
}

/// Resolves "the player" for single-player actions.
///
/// An empty player collection at action time is a contract violation,
/// not a recoverable error.
fn single_player(game: &Game) -> Arc<Player> {
    game.players()
        .first()
        .cloned()
        .expect("session has 0 players")
}

struct Inner {
    pipeline: Pipeline,
    shell_factory: ShellFactory,
    game: Mutex<Option<Arc<Game>>>,
    shell: Mutex<Option<Box<dyn Shell>>>,
    auto: Mutex<AutoMove>,
}

impl Inner {
    fn launch(self: &Arc<Self>) -> Result<(), LaunchError> {
        if self.game.lock().expect("game slot poisoned").is_some() {
            return Err(LaunchError::AlreadyLaunched);
        }

        let game = self.pipeline.make_game()?;
        let mut builder = (self.shell_factory)();
        builder.add_default_controls();
        self.bind_directional_keys(builder.as_mut());
        builder.bind_control("Reset", self.reset_action());
        let mut shell = builder.build(Arc::clone(&game));

        shell.start();
        *self.game.lock().expect("game slot poisoned") = Some(Arc::clone(&game));
        *self.shell.lock().expect("shell slot poisoned") = Some(shell);
        game.start();
        tracing::info!(map = %self.pipeline.map_id(), "session launched");
        Ok(())
    }

    fn reset_game(self: &Arc<Self>) -> Result<(), LaunchError> {
        // Dispose-if-present: a reset from an uninitialized state skips
        // straight to construction.
        if let Some(mut shell) = self.shell.lock().expect("shell slot poisoned").take() {
            shell.dispose();
        }
        // Retire any live auto-move task now rather than letting it
        // discover the stale session on its next tick.
        self.auto.lock().expect("auto-move lock poisoned").disarm();

        let game = self.pipeline.make_game()?;
        let mut builder = (self.shell_factory)();
        builder.add_default_controls();
        self.bind_directional_keys(builder.as_mut());
        builder.bind_control("Start", self.reset_action());
        builder.bind_control("Reset", self.reset_action());
        let mut shell = builder.build(Arc::clone(&game));

        shell.start();
        *self.game.lock().expect("game slot poisoned") = Some(Arc::clone(&game));
        *self.shell.lock().expect("shell slot poisoned") = Some(shell);
        game.start();
        tracing::info!(map = %self.pipeline.map_id(), "session reset");
        Ok(())
    }

    fn dispose(&self) {
        let mut shell = self
            .shell
            .lock()
            .expect("shell slot poisoned")
            .take()
            .expect("dispose called before a shell exists");
        shell.dispose();
        tracing::info!("shell disposed");
    }

    fn bind_directional_keys(self: &Arc<Self>, builder: &mut dyn ShellBuilder) {
        for (key, direction) in DIRECTIONAL_BINDINGS {
            builder.bind_key(key, self.move_towards(direction));
        }
    }

    /// A directional command: move once, then arm the scheduler with the
    /// same move.
    fn move_towards(self: &Arc<Self>, direction: Direction) -> Action {
        let weak = Arc::downgrade(self);
        Action::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.directional_move(direction);
        })
    }

    fn directional_move(&self, direction: Direction) {
        let game = self
            .game
            .lock()
            .expect("game slot poisoned")
            .clone()
            .expect("directional action fired with no active session");
        let player = single_player(&game);

        // The auto-move lock is held across move-and-arm so the pair is
        // atomic with respect to any concurrent re-arm.
        let mut auto = self.auto.lock().expect("auto-move lock poisoned");
        game.move_player(&player, direction);
        auto.arm(DirectionalDrive {
            game: Arc::clone(&game),
            player,
            direction,
        });
        tracing::debug!(%direction, "directional move issued, auto-move armed");
    }

    fn reset_action(self: &Arc<Self>) -> Action {
        let weak = Arc::downgrade(self);
        Action::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = inner.reset_game() {
                tracing::error!(error = %e, "reset failed");
            }
        })
    }
}

/// Builder for a [`Launcher`].
pub struct LauncherBuilder {
    config: LauncherConfig,
    map: Option<MapSource>,
    registry: PointsRegistry,
    shell_factory: Option<ShellFactory>,
}

impl LauncherBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: LauncherConfig::default(),
            map: None,
            registry: PointsRegistry::with_builtins(),
            shell_factory: None,
        }
    }

    /// Applies a loaded configuration.
    pub fn config(mut self, config: LauncherConfig) -> Self {
        self.config = config;
        self
    }

    /// Plays the map in the given file instead of the built-in one.
    pub fn with_map_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.map = Some(MapSource::File(path.into()));
        self
    }

    /// Plays map text supplied directly.
    pub fn with_map_text(mut self, text: impl Into<String>) -> Self {
        self.map = Some(MapSource::Inline(text.into()));
        self
    }

    /// Selects the points policy by registry name.
    pub fn with_points_policy(mut self, name: impl Into<String>) -> Self {
        self.config.points_policy = name.into();
        self
    }

    /// Replaces the points registry (custom policies).
    pub fn registry(mut self, registry: PointsRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the factory producing a fresh shell builder per rebuild.
    pub fn shell(
        mut self,
        factory: impl Fn() -> Box<dyn ShellBuilder> + Send + Sync + 'static,
    ) -> Self {
        self.shell_factory = Some(Box::new(factory));
        self
    }

    /// Builds the launcher. No session exists until [`Launcher::launch`].
    pub fn build(self) -> Launcher {
        let config = self.config.validated();
        let map = self.map.unwrap_or_else(|| {
            config
                .map
                .clone()
                .map(MapSource::File)
                .unwrap_or_default()
        });
        let shell_factory = self.shell_factory.unwrap_or_else(|| {
            let hub = HeadlessHub::new();
            Box::new(move || hub.builder())
        });

        Launcher {
            inner: Arc::new(Inner {
                pipeline: Pipeline::new(
                    Arc::new(SpriteStore::new()),
                    map,
                    config.points_policy.clone(),
                    self.registry,
                ),
                shell_factory,
                game: Mutex::new(None),
                shell: Mutex::new(None),
                auto: Mutex::new(AutoMove::new(config.auto_move())),
            }),
        }
    }
}

impl Default for LauncherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the active session, shell, and auto-movement scheduler.
///
/// Cheap to clone-reference internally: the shell's actions hold weak
/// references back into the launcher, so dropping the launcher retires
/// everything.
pub struct Launcher {
    inner: Arc<Inner>,
}

impl Launcher {
    /// Creates a new builder.
    pub fn builder() -> LauncherBuilder {
        LauncherBuilder::new()
    }

    /// Builds the session and shell and starts play.
    ///
    /// Precondition: no session is active yet. Afterwards exactly one
    /// session and one shell are live.
    pub fn launch(&self) -> Result<(), LaunchError> {
        self.inner.launch()
    }

    /// Replaces the session and shell wholesale.
    ///
    /// Disposing a shell that does not exist is a no-op, so this is safe
    /// to call from an uninitialized state.
    pub fn reset_game(&self) -> Result<(), LaunchError> {
        self.inner.reset_game()
    }

    /// Releases the current shell. Contract: a shell must exist.
    pub fn dispose(&self) {
        self.inner.dispose()
    }

    /// The active session, if any.
    pub fn game(&self) -> Option<Arc<Game>> {
        self.inner.game.lock().expect("game slot poisoned").clone()
    }

    /// Whether the auto-movement scheduler currently has a live handle.
    pub fn auto_move_armed(&self) -> bool {
        self.inner
            .auto
            .lock()
            .expect("auto-move lock poisoned")
            .is_armed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mazebound_game::{
        BoardFactory, GameFactory, GhostFactory, LevelFactory, MapParser, PlayerFactory,
        PointsPolicy, SpriteStore,
    };

    use super::*;

    #[test]
    fn test_binding_table_covers_all_directions_twice() {
        for direction in Direction::ALL {
            let aliases = DIRECTIONAL_BINDINGS
                .iter()
                .filter(|(_, d)| *d == direction)
                .count();
            assert_eq!(aliases, 2, "{direction} should have two input signals");
        }
    }

    #[test]
    #[should_panic(expected = "session has 0 players")]
    fn test_single_player_panics_on_empty_collection() {
        let sprites = Arc::new(SpriteStore::new());
        let points: Arc<dyn PointsPolicy> = Arc::new(mazebound_game::DefaultPointsPolicy);
        let level = MapParser::new(
            LevelFactory::new(
                Arc::clone(&sprites),
                GhostFactory::new(Arc::clone(&sprites)),
                points,
            ),
            BoardFactory::new(Arc::clone(&sprites)),
        )
        .parse_map("###\n#P#\n###")
        .unwrap();
        let game = GameFactory::new(PlayerFactory::new(sprites))
            .game(level, 0)
            .unwrap();

        single_player(&game);
    }
}
