//! CLI entry point: launch a session on the headless shell and feed it
//! input from stdin.
//!
//! Commands, one per line: `w`/`a`/`s`/`d` or `up`/`down`/`left`/`right`
//! to move, `reset` to rebuild the session, `quit` to exit.

use mazebound::{HeadlessHub, Key, LaunchError, Launcher, LauncherConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), LaunchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::var("MAZEBOUND_CONFIG") {
        Ok(path) => LauncherConfig::from_file(path)?,
        Err(_) => LauncherConfig::default(),
    };

    let hub = HeadlessHub::new();
    let launcher = Launcher::builder()
        .config(config)
        .shell({
            let hub = hub.clone();
            move || hub.builder()
        })
        .build();
    launcher.launch()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let shell = hub.current();
        match line.trim() {
            "" => {}
            "quit" => break,
            "reset" => shell.control("Reset"),
            "w" | "up" => shell.press(Key::Up),
            "s" | "down" => shell.press(Key::Down),
            "a" | "left" => shell.press(Key::Left),
            "d" | "right" => shell.press(Key::Right),
            other => tracing::warn!(input = other, "unrecognized command"),
        }

        if let Some(game) = launcher.game() {
            let player = &game.players()[0];
            tracing::info!(
                score = player.score(),
                pellets = game.remaining_pellets(),
                progress = %game.progress(),
                "state"
            );
        }
    }

    launcher.dispose();
    Ok(())
}
