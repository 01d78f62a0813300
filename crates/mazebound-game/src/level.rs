//! Levels and the map parser.
//!
//! A level is a board populated with pellets, ghost starts, and player
//! spawn squares, plus the live player positions once a game is running.
//! Levels are produced by [`MapParser::parse_map`] from a character grid:
//!
//! ```text
//! #   wall
//! ' ' floor
//! .   floor with a pellet
//! P   player spawn
//! G   ghost start
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::board::{Board, BoardFactory, Tile};
use crate::direction::Direction;
use crate::error::GameError;
use crate::ghost::{Ghost, GhostFactory};
use crate::player::{Player, PlayerId};
use crate::points::PointsPolicy;
use crate::sprites::SpriteStore;

/// Face value of a single pellet.
pub const PELLET_VALUE: u32 = 10;

/// Outcome of a single move attempt, reported back to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    /// The destination square is a wall; the player stayed put.
    Blocked,
    /// The player moved. `cleared` is true when the move consumed the
    /// last pellet on the level.
    Moved { cleared: bool },
}

/// A board populated for play.
#[derive(Debug)]
pub struct Level {
    board: Board,
    pellets: HashMap<(usize, usize), u32>,
    player_spawns: Vec<(usize, usize)>,
    ghosts: Vec<(Arc<Ghost>, (usize, usize))>,
    positions: HashMap<PlayerId, (usize, usize)>,
    points: Arc<dyn PointsPolicy>,
}

impl Level {
    /// The underlying board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Pellets not yet consumed.
    pub fn remaining_pellets(&self) -> usize {
        self.pellets.len()
    }

    /// Ghosts and their start squares.
    pub fn ghosts(&self) -> &[(Arc<Ghost>, (usize, usize))] {
        &self.ghosts
    }

    /// Where a registered player currently stands.
    pub fn position_of(&self, player: PlayerId) -> Option<(usize, usize)> {
        self.positions.get(&player).copied()
    }

    /// Places a player on the next free spawn square.
    pub(crate) fn register_player(&mut self, player: &Player) -> Result<(), GameError> {
        let spawn = self
            .player_spawns
            .get(self.positions.len())
            .copied()
            .ok_or(GameError::NoSpawnAvailable(player.id()))?;
        self.positions.insert(player.id(), spawn);
        Ok(())
    }

    /// Attempts to move a registered player one square.
    ///
    /// Walls block; a consumed pellet is reported to the points policy.
    pub(crate) fn move_player(&mut self, player: &Player, direction: Direction) -> MoveOutcome {
        let Some(&(x, y)) = self.positions.get(&player.id()) else {
            // Registration happens at game construction; an unknown player
            // here is a defect.
            panic!("player {} is not on this level", player.id());
        };

        let (nx, ny) = self.board.neighbour(x, y, direction);
        if !self.board.passable(nx, ny) {
            tracing::trace!(player = %player.id(), %direction, "move blocked by wall");
            return MoveOutcome::Blocked;
        }

        self.positions.insert(player.id(), (nx, ny));
        if let Some(value) = self.pellets.remove(&(nx, ny)) {
            self.points.pellet_consumed(player, value);
            tracing::trace!(
                player = %player.id(),
                value,
                remaining = self.pellets.len(),
                "pellet consumed"
            );
        }

        MoveOutcome::Moved {
            cleared: self.pellets.is_empty(),
        }
    }
}

/// Builds [`Level`]s. Needs the sprite store, a ghost factory for the
/// adversaries, and the scoring policy the level reports to.
pub struct LevelFactory {
    sprites: Arc<SpriteStore>,
    ghosts: GhostFactory,
    points: Arc<dyn PointsPolicy>,
}

impl LevelFactory {
    /// Creates a factory from its collaborators.
    pub fn new(
        sprites: Arc<SpriteStore>,
        ghosts: GhostFactory,
        points: Arc<dyn PointsPolicy>,
    ) -> Self {
        Self {
            sprites,
            ghosts,
            points,
        }
    }

    /// Assembles a level from parsed map data.
    pub fn level(
        &self,
        board: Board,
        player_spawns: Vec<(usize, usize)>,
        ghost_starts: Vec<(usize, usize)>,
        pellet_squares: Vec<(usize, usize)>,
    ) -> Level {
        // Warm the cache so every later level shares the same handle.
        self.sprites.sprite("pellet");

        let ghosts = ghost_starts
            .into_iter()
            .map(|square| (self.ghosts.create_ghost(), square))
            .collect();
        let pellets = pellet_squares
            .into_iter()
            .map(|square| (square, PELLET_VALUE))
            .collect();
        Level {
            board,
            pellets,
            player_spawns,
            ghosts,
            positions: HashMap::new(),
            points: Arc::clone(&self.points),
        }
    }
}

/// Parses character-grid map text into a [`Level`].
pub struct MapParser {
    levels: LevelFactory,
    boards: BoardFactory,
}

impl MapParser {
    /// Creates a parser from the two factories it composes.
    pub fn new(levels: LevelFactory, boards: BoardFactory) -> Self {
        Self { levels, boards }
    }

    /// Parses map text into a ready [`Level`].
    ///
    /// All rows must have the width of the first row, every character must
    /// be part of the map grammar, and at least one `P` spawn is required.
    pub fn parse_map(&self, text: &str) -> Result<Level, GameError> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err(GameError::EmptyMap);
        }

        let width = lines[0].chars().count();
        let height = lines.len();
        let mut tiles = Vec::with_capacity(width * height);
        let mut player_spawns = Vec::new();
        let mut ghost_starts = Vec::new();
        let mut pellet_squares = Vec::new();

        for (y, line) in lines.iter().enumerate() {
            let row: Vec<char> = line.chars().collect();
            if row.len() != width {
                return Err(GameError::RaggedMap {
                    line: y + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, glyph) in row.into_iter().enumerate() {
                let tile = match glyph {
                    '#' => Tile::Wall,
                    ' ' => Tile::Floor,
                    '.' => {
                        pellet_squares.push((x, y));
                        Tile::Floor
                    }
                    'P' => {
                        player_spawns.push((x, y));
                        Tile::Floor
                    }
                    'G' => {
                        ghost_starts.push((x, y));
                        Tile::Floor
                    }
                    other => {
                        return Err(GameError::UnknownGlyph {
                            glyph: other,
                            line: y + 1,
                            column: x + 1,
                        });
                    }
                };
                tiles.push(tile);
            }
        }

        if player_spawns.is_empty() {
            return Err(GameError::NoPlayerSpawn);
        }

        let board = self.boards.board(width, height, tiles)?;
        tracing::debug!(
            width,
            height,
            pellets = pellet_squares.len(),
            ghosts = ghost_starts.len(),
            "map parsed"
        );
        Ok(self
            .levels
            .level(board, player_spawns, ghost_starts, pellet_squares))
    }
}
