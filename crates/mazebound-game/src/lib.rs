//! Game domain for Mazebound.
//!
//! This crate holds everything the orchestrator drives through the session
//! command surface: the board grid, levels parsed from character maps,
//! players and ghosts, the scoring policy registry, and the [`Game`]
//! session itself.
//!
//! # Key types
//!
//! - [`Game`] — a live session: players, level, progress state
//! - [`Direction`] — the four grid directions a player can move in
//! - [`MapParser`] — turns a character-grid map into a [`Level`]
//! - [`PointsRegistry`] — resolves a scoring policy by configured name
//! - [`SpriteStore`] — shared, lazily populated visual asset cache

mod board;
mod direction;
mod error;
mod game;
mod ghost;
mod level;
mod player;
mod points;
mod sprites;

pub use board::{Board, BoardFactory, Tile};
pub use direction::Direction;
pub use error::GameError;
pub use game::{Game, GameFactory, Progress};
pub use ghost::{Ghost, GhostFactory, GhostId};
pub use level::{Level, LevelFactory, MapParser, PELLET_VALUE};
pub use player::{Player, PlayerFactory, PlayerId};
pub use points::{DefaultPointsPolicy, PointsPolicy, PointsRegistry};
pub use sprites::{Sprite, SpriteStore};
