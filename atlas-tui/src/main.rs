//! ATLAS TUI entry point.

use atlas_core::Transport;
use atlas_tui::api_client::RestClient;
use atlas_tui::config::TuiConfig;
use atlas_tui::dispatch::{spawn_dispatch, spawn_health_check};
use atlas_tui::error::TuiError;
use atlas_tui::events::TuiEvent;
use atlas_tui::keys::{map_key, Action};
use atlas_tui::notifications::NotificationLevel;
use atlas_tui::persistence;
use atlas_tui::state::App;
use atlas_tui::telemetry;
use atlas_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const PAGE_LINES: u16 = 10;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = TuiConfig::load()?;
    telemetry::init_logging(&config.log_path)?;
    let transport: Arc<dyn Transport> = Arc::new(RestClient::new(&config)?);

    let mut app = App::new(config);
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring unreadable UI state");
            app.notify(
                NotificationLevel::Warning,
                format!("Saved preferences ignored: {}", err),
            );
        }
    }

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());
    spawn_health_check(transport.clone(), event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    tracing::info!(base_url = %app.config.base_url(), "ATLAS TUI started");

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &transport, &event_tx) {
                    break;
                }
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.snapshot()) {
        tracing::warn!(error = %err, "Failed to save UI state");
    }
    tracing::info!("ATLAS TUI exiting");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            let event = match event::read() {
                Ok(CrosstermEvent::Key(key)) => TuiEvent::Input(key),
                Ok(CrosstermEvent::Resize(width, height)) => TuiEvent::Resize { width, height },
                _ => continue,
            };
            if sender.blocking_send(event).is_err() {
                break;
            }
        }
    });
}

/// Returns true when the app should exit.
fn handle_event(
    app: &mut App,
    event: TuiEvent,
    transport: &Arc<dyn Transport>,
    sender: &mpsc::Sender<TuiEvent>,
) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key) {
                return handle_action(app, action, transport, sender);
            }
        }
        TuiEvent::Settled(settlement) => {
            let failure = settlement.outcome.as_ref().err().map(|err| err.to_string());
            if app.settle(*settlement) {
                if let Some(message) = failure {
                    app.notify(NotificationLevel::Error, format!("Request failed: {}", message));
                }
            }
        }
        TuiEvent::Health(status) => app.set_health(status),
        TuiEvent::Resize { .. } => {}
    }
    false
}

fn handle_action(
    app: &mut App,
    action: Action,
    transport: &Arc<dyn Transport>,
    sender: &mpsc::Sender<TuiEvent>,
) -> bool {
    if app.modal.is_some() && !matches!(action, Action::Quit) {
        app.dismiss();
        return false;
    }
    match action {
        Action::Quit => return true,
        Action::NextView => app.active_view = app.active_view.next(),
        Action::PrevView => app.active_view = app.active_view.previous(),
        Action::Insert(c) => app.insert_char(c),
        Action::Backspace => app.backspace(),
        Action::ClearInput => app.clear_input(),
        Action::Submit => {
            if let Some(dispatch) = app.submit() {
                spawn_dispatch(transport.clone(), dispatch, sender.clone());
            }
        }
        Action::ToggleMode => app.toggle_mode(),
        Action::CycleModel => app.cycle_model(),
        Action::CheckHealth => {
            app.notify(NotificationLevel::Info, "Checking server status...");
            spawn_health_check(transport.clone(), sender.clone());
        }
        Action::ScrollUp => app.scroll_up(1),
        Action::ScrollDown => app.scroll_down(1),
        Action::PageUp => app.scroll_up(PAGE_LINES),
        Action::PageDown => app.scroll_down(PAGE_LINES),
        Action::FollowLatest => app.follow_latest(),
        Action::OpenHelp => app.open_help(),
        Action::Cancel => app.dismiss(),
    }
    false
}
