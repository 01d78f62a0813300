//! Error types for the game domain.

use crate::player::PlayerId;

/// Errors that can occur while building or running a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The map text contains no squares.
    #[error("map is empty")]
    EmptyMap,

    /// A map row's width differs from the first row's.
    #[error("map row {line} has width {found}, expected {expected}")]
    RaggedMap {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The map contains a character outside the map grammar.
    #[error("unrecognized map glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph {
        glyph: char,
        line: usize,
        column: usize,
    },

    /// The map defines no square a player could spawn on.
    #[error("map defines no player spawn square")]
    NoPlayerSpawn,

    /// More players registered than the level has spawn squares.
    #[error("no spawn square left for player {0}")]
    NoSpawnAvailable(PlayerId),

    /// No points policy is registered under the requested name.
    #[error("unknown points policy {0:?}")]
    UnknownPointsPolicy(String),
}
