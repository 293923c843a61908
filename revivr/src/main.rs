//! revivr: a terminal code editor with an AI review panel.
//!
//! Entry point for the `revivr` binary. Wires together logging (`logging`),
//! configuration (`config`), the persisted session and review controller
//! (`revivr-core`), the terminal lifecycle (`tui`), the event bus (`event`),
//! and rendering (`ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to `.revivr/revivr.log`, then config (file + env overrides).
//! 2. Open the session database and restore the session before the first frame.
//! 3. Enter the terminal through `tui::TerminalGuard`, then spawn the event task.
//!
//! The guard restores the terminal when it drops, whichever way the loop exits.
//! Inside the loop only the draw call may propagate an error.

mod app;
mod config;
mod editor;
mod event;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use revivr_core::db::SqliteStore;
use revivr_core::{HttpReviewClient, MemoryStore, ReviewClient, Session, SlotStore};

use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

const LOG_PATH: &str = ".revivr/revivr.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(Path::new(LOG_PATH))?;
    let config = config::Config::load();
    tracing::info!(api_url = %config.api_url, db = %config.db_path.display(), "starting revivr");

    let theme = theme::Theme::from_name(&config.theme);

    let store = open_store(&config)?;
    let mut state = app::AppState::new(Session::restore(store));

    let client: Arc<dyn ReviewClient> = Arc::new(HttpReviewClient::new(&config.api_url));

    let mut guard = tui::TerminalGuard::enter().context("initialising terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    let result = run_loop(&mut guard, &mut state, &theme, &client, &tx, &mut rx).await;

    drop(guard);
    tracing::info!("revivr exited");
    result
}

/// The session store: SQLite at `db_path`, or memory when persistence is off.
fn open_store(config: &config::Config) -> anyhow::Result<Box<dyn SlotStore>> {
    if !config.persist {
        tracing::info!("persistence disabled; session lives in memory");
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = &config.db_path;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating database directory {}", dir.display()))?;
    }
    let store = SqliteStore::open(path)
        .with_context(|| format!("opening session database {}", path.display()))?;
    Ok(Box::new(store))
}

/// Runs until quit, SIGTERM, or channel close. Only draw errors escape.
async fn run_loop(
    guard: &mut tui::TerminalGuard,
    state: &mut app::AppState,
    theme: &theme::Theme,
    client: &Arc<dyn ReviewClient>,
    tx: &tokio::sync::mpsc::UnboundedSender<AppEvent>,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        guard
                            .terminal_mut()
                            .draw(|frame| ui::render(frame, state, theme))
                            .context("drawing frame")?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, state),
                    Some(AppEvent::Tick) => {
                        state.on_tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::ReviewFinished { token, outcome }) => {
                        state.finish_review(token, outcome);
                        KeyAction::Continue
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };

                match action {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::SendReview(pending) => {
                        event::spawn_review(Arc::clone(client), pending, tx.clone());
                    }
                    KeyAction::Continue => {}
                }
            }
        }
        if guard.terminated() {
            return Ok(());
        }
    }
}
