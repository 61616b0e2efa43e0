// trapdoor - Modal focus traps in a terminal console
//
// A small console for an integration's settings API that hosts keyboard
// focus traps: while a modal is open, Tab and Shift+Tab cycle through its
// controls and never escape it.
//
// Architecture:
// - Focus (focus/): element tree, focusable enumeration, wrap policy, trap stack
// - Settings (settings/): typed client for GET/POST /api/settings/{integration}
// - TUI (ratatui): main screen plus modals, each one trapping focus
// - CLI (clap): config management and one-shot settings commands

mod cli;
mod config;
mod focus;
mod logging;
mod settings;
mod tui;

use anyhow::Result;
use cli::CliOutcome;
use config::Config;
use logging::{LogBuffer, LogSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Config subcommands finish here; settings commands need logging first
    let settings_action = match cli::handle_cli() {
        CliOutcome::Handled => return Ok(()),
        CliOutcome::Settings(action) => Some(action),
        CliOutcome::Run => None,
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env();
    let log_buffer = LogBuffer::new();

    // In TUI mode logs go to the buffer so they don't garble the display.
    // The guard must outlive everything that logs, or file output is lost.
    let sink = if config.enable_tui && settings_action.is_none() {
        LogSink::Tui
    } else {
        LogSink::Stderr
    };
    let _file_guard = logging::init(&config.logging, sink, &log_buffer)?;

    if let Some(action) = settings_action {
        return cli::handle_settings(action, &config).await;
    }

    tracing::debug!(
        integration = %config.integration,
        api = %config.settings_api.base_url,
        "Starting trapdoor v{}",
        config::VERSION
    );

    if config.enable_tui {
        tui::run_tui(config, log_buffer).await?;
    } else {
        eprintln!("{}", headless_notice());
    }

    Ok(())
}

/// What headless mode prints before exiting; there is nothing to host a trap in
fn headless_notice() -> &'static str {
    "TUI disabled (TRAPDOOR_NO_TUI). Use `trapdoor settings show` or \
     `trapdoor settings save` for one-shot commands."
}
