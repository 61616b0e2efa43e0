//! The `[logging]` table: filter level and the optional rolling JSON file

use serde::Deserialize;
use std::path::PathBuf;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized falls back to daily
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("hourly") {
            Self::Hourly
        } else if value.eq_ignore_ascii_case("never") {
            Self::Never
        } else {
            Self::Daily
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
    /// Also write JSON lines to `file_dir`, next to the TUI pane or stderr
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem; the appender adds the date suffix
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "trapdoor".to_string(),
        }
    }
}

/// `[logging]` exactly as written in the file, every key optional
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let Some(file) = file else {
            return Self::default();
        };
        let base = Self::default();

        Self {
            level: file.level.unwrap_or(base.level),
            file_enabled: file.file_enabled.unwrap_or(base.file_enabled),
            file_dir: file.file_dir.map_or(base.file_dir, PathBuf::from),
            file_rotation: file
                .file_rotation
                .as_deref()
                .map_or(base.file_rotation, LogRotation::parse),
            file_prefix: file.file_prefix.unwrap_or(base.file_prefix),
        }
    }
}
