//! # Mazebound
//!
//! Session orchestrator for a tile-based arcade game.
//!
//! The orchestrator assembles a playable session through a construction
//! pipeline (board, ghosts, player, scoring policy, level parsed from a
//! map), binds input signals to directional and lifecycle actions, and
//! drives the auto-movement scheduler that repeats the last manual move
//! until superseded or the session ends.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mazebound::{HeadlessHub, Launcher};
//!
//! # fn main() -> Result<(), mazebound::LaunchError> {
//! let hub = HeadlessHub::new();
//! let launcher = Launcher::builder()
//!     .shell({
//!         let hub = hub.clone();
//!         move || hub.builder()
//!     })
//!     .build();
//! launcher.launch()?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod launcher;
mod pipeline;
mod shell;

pub use config::LauncherConfig;
pub use error::LaunchError;
pub use launcher::{Launcher, LauncherBuilder, ShellFactory};
pub use pipeline::{MapSource, Pipeline, DEFAULT_MAP};
pub use shell::{Action, HeadlessHub, HeadlessShell, Key, Shell, ShellBuilder};
