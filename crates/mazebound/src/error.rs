//! Top-level error type for the orchestrator.

use mazebound_game::GameError;

/// Errors surfaced by the launcher and its construction pipeline.
///
/// Domain errors from the game crate convert automatically through the
/// `#[from]` variant, so `?` flows across the crate boundary.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// The map resource could not be read or parsed. Fatal to the
    /// construction attempt; any previously running session is untouched.
    #[error("unable to create level, map = {map}")]
    Configuration {
        /// Identifier of the map resource that failed.
        map: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The launcher configuration file could not be read or decoded.
    #[error("unable to read configuration file {path}")]
    Settings {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `launch()` was called while a session is already active.
    #[error("a session is already active")]
    AlreadyLaunched,

    /// A game-domain error (e.g. an unknown points policy).
    #[error(transparent)]
    Game(#[from] GameError),
}
