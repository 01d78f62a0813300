//! The construction pipeline: from a map resource to a ready session.
//!
//! The factories must be assembled in dependency order — each one needs
//! the outputs of the previous step. A failed construction is fatal to
//! that attempt only; nothing built here is visible to the launcher until
//! the whole pipeline has succeeded.

use std::path::PathBuf;
use std::sync::Arc;

use mazebound_game::{
    BoardFactory, Game, GameError, GameFactory, GhostFactory, Level, LevelFactory, MapParser,
    PlayerFactory, PointsPolicy, PointsRegistry, SpriteStore,
};

use crate::error::LaunchError;

/// The built-in map, compiled into the binary.
pub const DEFAULT_MAP: &str = include_str!("../maps/default.map");

/// Where the level map comes from.
#[derive(Debug, Clone, Default)]
pub enum MapSource {
    /// The compiled-in default map.
    #[default]
    Builtin,
    /// A map file on disk.
    File(PathBuf),
    /// Map text supplied directly (custom embedded levels, tests).
    Inline(String),
}

impl MapSource {
    /// The identifier reported in configuration errors.
    pub fn id(&self) -> String {
        match self {
            MapSource::Builtin => "builtin:default".to_string(),
            MapSource::File(path) => path.display().to_string(),
            MapSource::Inline(_) => "inline".to_string(),
        }
    }

    fn read(&self) -> std::io::Result<String> {
        match self {
            MapSource::Builtin => Ok(DEFAULT_MAP.to_string()),
            MapSource::File(path) => std::fs::read_to_string(path),
            MapSource::Inline(text) => Ok(text.clone()),
        }
    }
}

/// Builds fully wired [`Game`] sessions.
///
/// The sprite store is the one long-lived piece: it is created once and
/// shared across every construction, so resets never reload assets. The
/// factories themselves are cheap and rebuilt per session.
pub struct Pipeline {
    sprites: Arc<SpriteStore>,
    map: MapSource,
    points_policy: String,
    registry: PointsRegistry,
}

impl Pipeline {
    /// Creates a pipeline.
    pub fn new(
        sprites: Arc<SpriteStore>,
        map: MapSource,
        points_policy: String,
        registry: PointsRegistry,
    ) -> Self {
        Self {
            sprites,
            map,
            points_policy,
            registry,
        }
    }

    /// Identifier of the map this pipeline builds from.
    pub fn map_id(&self) -> String {
        self.map.id()
    }

    fn board_factory(&self) -> BoardFactory {
        BoardFactory::new(Arc::clone(&self.sprites))
    }

    fn ghost_factory(&self) -> GhostFactory {
        GhostFactory::new(Arc::clone(&self.sprites))
    }

    fn player_factory(&self) -> PlayerFactory {
        PlayerFactory::new(Arc::clone(&self.sprites))
    }

    fn load_points(&self) -> Result<Arc<dyn PointsPolicy>, GameError> {
        self.registry.load(&self.points_policy)
    }

    fn level_factory(&self, points: Arc<dyn PointsPolicy>) -> LevelFactory {
        LevelFactory::new(Arc::clone(&self.sprites), self.ghost_factory(), points)
    }

    fn game_factory(&self) -> GameFactory {
        GameFactory::new(self.player_factory())
    }

    /// Resolves and parses the map into a [`Level`].
    pub fn make_level(&self) -> Result<Level, LaunchError> {
        let points = self.load_points()?;
        let parser = MapParser::new(self.level_factory(points), self.board_factory());

        let configuration =
            |source: Box<dyn std::error::Error + Send + Sync>| LaunchError::Configuration {
                map: self.map_id(),
                source,
            };
        let text = self.map.read().map_err(|e| configuration(Box::new(e)))?;
        parser
            .parse_map(&text)
            .map_err(|e| configuration(Box::new(e)))
    }

    /// Runs the full pipeline and produces a single-player session.
    pub fn make_game(&self) -> Result<Arc<Game>, LaunchError> {
        let level = self.make_level()?;
        let game = self.game_factory().single_player_game(level)?;
        tracing::info!(map = %self.map_id(), policy = %self.points_policy, "session constructed");
        Ok(game)
    }
}
