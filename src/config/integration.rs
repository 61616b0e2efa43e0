//! Settings API and focus trap configuration

use serde::Deserialize;
use std::fmt;

use crate::focus::UntrackedForward;

/// Default env var holding the bearer token for the settings API
pub const DEFAULT_TOKEN_ENV: &str = "TRAPDOOR_API_TOKEN";

// ─────────────────────────────────────────────────────────────────────────────
// Settings API
// ─────────────────────────────────────────────────────────────────────────────

/// Where the settings API lives and how to authenticate against it
///
/// The token is resolved from the environment at load time and never
/// written back to the config file.
#[derive(Clone)]
pub struct SettingsApiConfig {
    pub base_url: String,
    /// Name of the env var the token is read from
    pub token_env: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SettingsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for SettingsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsApiConfig")
            .field("base_url", &self.base_url)
            .field("token_env", &self.token_env)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// [settings_api] section as loaded from file
#[derive(Debug, Deserialize, Default)]
pub struct FileSettingsApi {
    pub base_url: Option<String>,
    pub token_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl SettingsApiConfig {
    /// Merge file values with env overrides
    ///
    /// `env` looks up environment variables; injected so tests can fake it.
    pub fn from_file<F>(file: Option<FileSettingsApi>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let base_url = env("TRAPDOOR_API_URL")
            .or(file.base_url)
            .unwrap_or(defaults.base_url);
        let token_env = file.token_env.unwrap_or(defaults.token_env);
        let token = env(&token_env).filter(|t| !t.trim().is_empty());

        Self {
            base_url,
            token_env,
            token,
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Focus Trap
// ─────────────────────────────────────────────────────────────────────────────

/// Focus trap behaviour
#[derive(Debug, Clone, Default)]
pub struct TrapConfig {
    /// Forward Tab while focus sits outside the modal
    pub untracked_forward: UntrackedForward,
}

/// [trap] section as loaded from file
#[derive(Debug, Deserialize, Default)]
pub struct FileTrap {
    pub untracked_forward: Option<String>,
}

impl TrapConfig {
    pub fn from_file(file: Option<FileTrap>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            untracked_forward: file
                .untracked_forward
                .map(|s| UntrackedForward::parse(&s))
                .unwrap_or_default(),
        }
    }
}
