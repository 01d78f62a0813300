//! The presentation shell contract, and a headless implementation.
//!
//! The orchestrator does not render anything itself. It populates a
//! [`ShellBuilder`] with key and control bindings, builds a [`Shell`]
//! bound to the current game, and only ever calls its start/dispose
//! contract. [`HeadlessHub`] provides the concrete shell used by the
//! binary's stdin loop and by the integration tests, which inject input
//! through [`HeadlessShell::press`].

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mazebound_game::Game;

/// An input signal a shell can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// A character key, e.g. the `w`/`a`/`s`/`d` movement aliases.
    Char(char),
}

/// A bound, zero-argument command triggered by an input signal.
///
/// Actions are cheap to clone and hold only the data they need; the shell
/// invokes them synchronously when their signal arrives.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn() + Send + Sync>);

impl Action {
    /// Wraps a callable as an action.
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Runs the action.
    pub fn invoke(&self) {
        (self.0)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The callable is opaque; there is nothing more to show.
        f.write_str("Action")
    }
}

/// A realized presentation surface bound to one game.
pub trait Shell: Send {
    /// Makes the shell live (shows the surface, begins delivering input).
    fn start(&mut self);

    /// Releases the shell's resources. After this, no further input is
    /// delivered from it.
    fn dispose(&mut self);
}

/// Collects bindings and produces a [`Shell`] bound to a game.
///
/// A fresh builder is used for every shell; the orchestrator re-populates
/// the same bindings on each rebuild.
pub trait ShellBuilder: Send {
    /// Adds the stock "Start" and "Stop" controls, wired to the game's
    /// lifecycle at build time.
    fn add_default_controls(&mut self);

    /// Binds an input signal to an action.
    fn bind_key(&mut self, key: Key, action: Action);

    /// Binds a labelled control to an action.
    fn bind_control(&mut self, label: &str, action: Action);

    /// Builds the shell bound to `game`, consuming the collected bindings.
    fn build(&mut self, game: Arc<Game>) -> Box<dyn Shell>;
}

// ---------------------------------------------------------------------------
// Headless shell
// ---------------------------------------------------------------------------

struct ShellState {
    keys: HashMap<Key, Action>,
    controls: HashMap<String, Action>,
    started: AtomicBool,
    disposed: AtomicBool,
}

/// A shell with no rendering surface.
///
/// Input is injected programmatically; bindings behave exactly as they
/// would on a real surface.
#[derive(Clone)]
pub struct HeadlessShell {
    state: Arc<ShellState>,
}

impl HeadlessShell {
    /// Delivers an input signal, invoking its bound action.
    ///
    /// Unbound signals and input after disposal are ignored, as a real
    /// surface would drop them.
    pub fn press(&self, key: Key) {
        if self.state.disposed.load(Ordering::SeqCst) {
            return;
        }
        match self.state.keys.get(&key) {
            Some(action) => action.invoke(),
            None => tracing::warn!(?key, "unbound key ignored"),
        }
    }

    /// Activates a labelled control, invoking its bound action.
    pub fn control(&self, label: &str) {
        if self.state.disposed.load(Ordering::SeqCst) {
            return;
        }
        match self.state.controls.get(label) {
            Some(action) => action.invoke(),
            None => tracing::warn!(label, "unbound control ignored"),
        }
    }

    /// Whether `start` has been called.
    pub fn is_started(&self) -> bool {
        self.state.started.load(Ordering::SeqCst)
    }

    /// Whether `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        self.state.disposed.load(Ordering::SeqCst)
    }

    /// The set of keys with a binding. Used by tests to verify the
    /// binding table is fully populated.
    pub fn bound_keys(&self) -> Vec<Key> {
        self.state.keys.keys().copied().collect()
    }
}

impl Shell for HeadlessShell {
    fn start(&mut self) {
        self.state.started.store(true, Ordering::SeqCst);
        tracing::debug!("headless shell started");
    }

    fn dispose(&mut self) {
        self.state.disposed.store(true, Ordering::SeqCst);
        tracing::debug!("headless shell disposed");
    }
}

struct HeadlessShellBuilder {
    hub: HeadlessHub,
    default_controls: bool,
    keys: Vec<(Key, Action)>,
    controls: Vec<(String, Action)>,
}

impl ShellBuilder for HeadlessShellBuilder {
    fn add_default_controls(&mut self) {
        self.default_controls = true;
    }

    fn bind_key(&mut self, key: Key, action: Action) {
        self.keys.push((key, action));
    }

    fn bind_control(&mut self, label: &str, action: Action) {
        self.controls.push((label.to_string(), action));
    }

    fn build(&mut self, game: Arc<Game>) -> Box<dyn Shell> {
        let mut controls: HashMap<String, Action> =
            std::mem::take(&mut self.controls).into_iter().collect();
        if self.default_controls {
            let start_game = Arc::clone(&game);
            controls
                .entry("Start".to_string())
                .or_insert_with(|| Action::new(move || start_game.start()));
            let stop_game = Arc::clone(&game);
            controls
                .entry("Stop".to_string())
                .or_insert_with(|| Action::new(move || stop_game.stop()));
        }

        let shell = HeadlessShell {
            state: Arc::new(ShellState {
                keys: std::mem::take(&mut self.keys).into_iter().collect(),
                controls,
                started: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
            }),
        };
        self.hub.register(shell.clone());
        Box::new(shell)
    }
}

/// Tracks every headless shell built through it.
///
/// The launcher only holds the current shell; the hub lets the binary and
/// the tests reach the live shell to inject input, and lets tests verify
/// that resets never leak a prior shell.
#[derive(Clone, Default)]
pub struct HeadlessHub {
    shells: Arc<Mutex<Vec<HeadlessShell>>>,
}

impl HeadlessHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh builder whose shells register with this hub.
    pub fn builder(&self) -> Box<dyn ShellBuilder> {
        Box::new(HeadlessShellBuilder {
            hub: self.clone(),
            default_controls: false,
            keys: Vec::new(),
            controls: Vec::new(),
        })
    }

    fn register(&self, shell: HeadlessShell) {
        self.shells.lock().expect("hub lock poisoned").push(shell);
    }

    /// The most recently built shell. Panics if none has been built.
    pub fn current(&self) -> HeadlessShell {
        self.shells
            .lock()
            .expect("hub lock poisoned")
            .last()
            .cloned()
            .expect("no shell has been built")
    }

    /// How many shells have been built in total.
    pub fn built_count(&self) -> usize {
        self.shells.lock().expect("hub lock poisoned").len()
    }

    /// How many shells are started and not yet disposed.
    pub fn live_count(&self) -> usize {
        self.shells
            .lock()
            .expect("hub lock poisoned")
            .iter()
            .filter(|s| s.is_started() && !s.is_disposed())
            .count()
    }
}
