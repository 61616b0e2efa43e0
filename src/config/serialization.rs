//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// A TOML basic string literal, quotes and escapes included
fn quote(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

impl Config {
    /// Render the config file, comments included
    ///
    /// The bearer token is never written, only the name of its env var.
    pub fn to_toml(&self) -> String {
        format!(
            r#"# trapdoor configuration

# Integration edited by the settings modal (letters, digits, '-' and '_')
integration = {integration}

# External settings API (TRAPDOOR_API_URL overrides base_url)
[settings_api]
base_url = {base_url}
# Env var holding the bearer token (sent as "Authorization: Bearer <token>")
token_env = {token_env}
timeout_secs = {timeout}

# Focus trap
[trap]
# Forward Tab while focus is outside the open modal:
#   "native" - leave focus where the terminal puts it
#   "first"  - pull focus to the modal's first element
untracked_forward = {untracked}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = {log_file_rotation}  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            integration = quote(&self.integration),
            base_url = quote(&self.settings_api.base_url),
            token_env = quote(&self.settings_api.token_env),
            timeout = self.settings_api.timeout_secs,
            untracked = quote(self.trap.untracked_forward.as_str()),
            log_level = quote(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quote(&self.logging.file_dir.display().to_string()),
            log_file_rotation = quote(self.logging.file_rotation.as_str()),
            log_file_prefix = quote(&self.logging.file_prefix),
        )
    }
}
