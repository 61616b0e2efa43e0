// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, settings API results)
// - Running the effects App queues (HTTP calls) on background tasks

pub mod app;
pub mod components;
pub mod forms;
pub mod modal;
pub mod theme;
pub mod ui;
pub mod views;

use crate::config::Config;
use crate::logging::LogBuffer;
use crate::settings::client::SettingsClient;
use anyhow::{Context, Result};
use app::{App, AppMessage, Effect};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and restores the terminal
/// on the way out, even when the loop failed.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let client = SettingsClient::new(&config.settings_api)?;
    tracing::info!("Settings API at {}", client.base_url());

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(&config, log_buffer);
    let result = run_event_loop(&mut terminal, &mut app, client).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on keyboard input, the redraw ticker and results coming back
/// from settings API tasks, whichever is ready first.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: SettingsClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppMessage>(16);
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        app.handle_key(key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick();
            }

            Some(message) = rx.recv() => {
                app.handle_message(message);
            }
        }

        for effect in app.take_effects() {
            spawn_effect(effect, client.clone(), tx.clone());
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Run one effect on a background task and post its result
fn spawn_effect(effect: Effect, client: SettingsClient, tx: mpsc::Sender<AppMessage>) {
    tokio::spawn(async move {
        let message = match effect {
            Effect::LoadSettings { integration } => {
                AppMessage::SettingsLoaded(client.get(&integration).await)
            }
            Effect::SaveSettings {
                integration,
                update,
            } => AppMessage::SettingsSaved(client.save(&integration, &update).await),
        };
        if tx.send(message).await.is_err() {
            tracing::debug!("UI closed before a settings result arrived");
        }
    });
}
