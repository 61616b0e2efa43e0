// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - config --show|--path|--reset|--edit|--update: manage the config file
// - settings show|save: talk to the settings API without the TUI

use crate::config::{Config, VERSION};
use crate::settings::{SettingsClient, SettingsUpdate};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::Command;

/// trapdoor - keyboard-trapped settings modals for the terminal
#[derive(Parser)]
#[command(name = "trapdoor")]
#[command(version = VERSION)]
#[command(about = "Terminal settings console with focus-trapped modals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Rewrite config with the current template (preserves values)
        #[arg(long)]
        update: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Read or save integration settings through the settings API
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Print the current settings
    Show {
        /// Integration name (defaults to the configured one)
        #[arg(long)]
        integration: Option<String>,
    },

    /// Test and save new settings
    Save {
        /// Server URL (http or https)
        #[arg(long)]
        url: String,

        /// API key for the integration
        #[arg(long)]
        api_key: String,

        /// Integration name (defaults to the configured one)
        #[arg(long)]
        integration: Option<String>,
    },
}

/// What main should do after argument parsing
pub enum CliOutcome {
    /// A command ran to completion, exit
    Handled,
    /// Run a settings command (async, needs logging and config)
    Settings(SettingsAction),
    /// No subcommand, start the app
    Run,
}

/// Parse arguments and run the synchronous commands
pub fn handle_cli() -> CliOutcome {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            update,
            path,
        }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else if edit {
                handle_config_edit();
            } else if update {
                handle_config_update();
            } else {
                println!("Usage: trapdoor config [--show|--reset|--edit|--update|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --update  Rewrite config with the current template (preserves values)");
                println!("  --path    Show config file path");
            }
            CliOutcome::Handled
        }
        Some(Commands::Settings { action }) => CliOutcome::Settings(action),
        None => CliOutcome::Run,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// settings
// ─────────────────────────────────────────────────────────────────────────────

/// Run a settings subcommand against the configured API
pub async fn handle_settings(action: SettingsAction, config: &Config) -> Result<()> {
    let client =
        SettingsClient::new(&config.settings_api).context("Failed to create settings client")?;

    match action {
        SettingsAction::Show { integration } => {
            let integration = integration.unwrap_or_else(|| config.integration.clone());
            let settings = client
                .get(&integration)
                .await
                .with_context(|| format!("Failed to load settings for '{}'", integration))?;

            println!("[{}]", integration);
            match settings.server_url {
                Some(url) => println!("server_url = {:?}", url),
                None => println!("# server_url not set"),
            }
            println!("api_key_configured = {}", settings.api_key_configured);
        }
        SettingsAction::Save {
            url,
            api_key,
            integration,
        } => {
            let integration = integration.unwrap_or_else(|| config.integration.clone());
            let saved = client
                .save(&integration, &SettingsUpdate::new(url, api_key))
                .await
                .with_context(|| format!("Failed to save settings for '{}'", integration))?;

            println!("{}", saved.message);
        }
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// config
// ─────────────────────────────────────────────────────────────────────────────

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("integration = {:?}", config.integration);
    println!("enable_tui = {}", config.enable_tui);
    println!();
    println!("[settings_api]");
    println!("base_url = {:?}", config.settings_api.base_url);
    println!("token_env = {:?}", config.settings_api.token_env);
    println!(
        "# token {}",
        if config.settings_api.token.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!("timeout_secs = {}", config.settings_api.timeout_secs);
    println!();
    println!("[trap]");
    println!(
        "untracked_forward = {:?}",
        config.trap.untracked_forward.as_str()
    );
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

fn handle_config_update() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
        return;
    }

    let updated = Config::file_layer(Config::load_file_config()).to_toml();

    let backup_path = path.with_extension("toml.bak");
    if let Err(e) = std::fs::copy(&path, &backup_path) {
        eprintln!("Warning: Could not create backup: {}", e);
    } else {
        println!("Backup created: {}", backup_path.display());
    }

    if let Err(e) = std::fs::write(&path, updated) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config updated with latest structure: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_settings_save() {
        let cli = Cli::try_parse_from([
            "trapdoor",
            "settings",
            "save",
            "--url",
            "http://sonarr.local:8989",
            "--api-key",
            "abc",
            "--integration",
            "radarr",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Settings {
                action:
                    SettingsAction::Save {
                        url,
                        api_key,
                        integration,
                    },
            }) => {
                assert_eq!(url, "http://sonarr.local:8989");
                assert_eq!(api_key, "abc");
                assert_eq!(integration.as_deref(), Some("radarr"));
            }
            _ => panic!("expected settings save"),
        }
    }

    #[test]
    fn test_save_requires_url_and_key() {
        assert!(Cli::try_parse_from(["trapdoor", "settings", "save", "--url", "x"]).is_err());
    }
}
