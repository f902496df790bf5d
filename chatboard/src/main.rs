//! `chatboard` — chat-driven task list overlay.
//!
//! Launches the TUI and, when chat credentials are configured, joins
//! the channel and folds viewer commands into the task store.
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/chatboard/config.toml`).
//!
//! ```bash
//! # Offline mode: render the persisted store only
//! cargo run --bin chatboard
//!
//! # Live mode
//! cargo run --bin chatboard -- --channel somestreamer --login taskbot \
//!     --token-url http://127.0.0.1:3002/refresh-token
//! ```

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use chatboard::app::{App, ConnectionState};
use chatboard::commands;
use chatboard::config::{CliArgs, ClientConfig};
use chatboard::net::{self, NetCommand, NetEvent};
use chatboard::tasks::reducer;
use chatboard::ui;
use chatboard::{persist, ui::overlay};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("chatboard starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("chatboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown
/// to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("chatboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop with optional networking.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let state_file: Option<PathBuf> = config.state_file_path();
    let store = state_file
        .as_deref()
        .map_or_else(chatboard::tasks::TaskStore::new, persist::load);

    let owner_key = config.owner_key();
    let channel = config.channel.clone().unwrap_or_default();
    let mut app = App::new(store, channel, config.scroll_pause_ticks);

    // Attempt to connect to chat if config is complete.
    let (cmd_tx, mut evt_rx) = match config.to_net_config() {
        Some(net_config) => {
            app.set_connection(ConnectionState::Connecting, "");
            let (tx, rx) = net::spawn_net(net_config);
            (Some(tx), Some(rx))
        }
        None => {
            tracing::info!("chat configuration incomplete, running offline");
            (None, None)
        }
    };

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending NetEvents (non-blocking).
        if let Some(ref mut rx) = evt_rx {
            drain_net_events(&mut app, rx, &owner_key, state_file.as_deref());
        }

        // Step 3: Tick the autoscroll.
        let viewport = ui::task_viewport_rows(terminal.size()?.height);
        let content = u16::try_from(overlay::content_line_count(&app.store)).unwrap_or(u16::MAX);
        app.scroll.tick(content, viewport);

        // Step 4: Poll for terminal input events.
        if event::poll(config.tick_interval)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true;
                }
                _ => {}
            }
        }

        if app.should_quit {
            // Send shutdown command to the networking supervisor.
            if let Some(ref tx) = cmd_tx {
                let _ = tx.try_send(NetCommand::Shutdown);
            }
            return Ok(());
        }
    }
}

/// Drain all pending `NetEvent`s from the receiver and apply them to the app.
fn drain_net_events(
    app: &mut App,
    rx: &mut mpsc::Receiver<NetEvent>,
    owner_key: &str,
    state_file: Option<&Path>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            NetEvent::Chat(msg) => {
                let Some(cmd) = commands::parse(&msg.text) else {
                    continue;
                };
                tracing::debug!(
                    user = %msg.sender.username,
                    kind = ?cmd.kind,
                    "applying chat command"
                );
                // The reducer returns a replacement store only for
                // accepted commands; rejected ones change nothing and
                // trigger no persistence.
                if let Some(next) = reducer::apply(&app.store, &msg.sender, owner_key, &cmd) {
                    app.store = next;
                    if let Some(path) = state_file {
                        if let Err(e) = persist::save(path, &app.store) {
                            tracing::warn!(err = %e, "snapshot save failed");
                        }
                    }
                }
            }
            NetEvent::Connected => {
                app.set_connection(ConnectionState::Connected, "");
            }
            NetEvent::Disconnected => {
                app.set_connection(ConnectionState::Reconnecting, "");
            }
            NetEvent::Reconnecting {
                attempt,
                max_attempts,
            } => {
                app.set_connection(
                    ConnectionState::Reconnecting,
                    format!("(attempt {attempt}/{max_attempts})"),
                );
            }
            NetEvent::ReconnectFailed => {
                app.set_connection(ConnectionState::Failed, "reconnect attempts exhausted");
            }
            NetEvent::Error(msg) => {
                tracing::warn!(error = %msg, "network error");
            }
        }
    }
}
