// Theme for the TUI
//
// One palette covering every element the console draws: chrome, modal
// controls, focus highlight and log levels.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::logging::LogLevel;

/// Complete theme definition with all UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,

    /// Modal border and toast accent
    pub highlight: Color,
    pub title: Color,

    // Focus ring on the active element
    pub focus_fg: Color,
    pub focus_bg: Color,

    pub button: Color,
    pub input: Color,
    pub success: Color,
    pub error: Color,

    pub log_error: Color,
    pub log_warn: Color,
    pub log_info: Color,
    pub log_debug: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_type: BorderType::Rounded,

            highlight: Color::Cyan,
            title: Color::Cyan,

            focus_fg: Color::Black,
            focus_bg: Color::Yellow,

            button: Color::LightBlue,
            input: Color::White,
            success: Color::Green,
            error: Color::Red,

            log_error: Color::Red,
            log_warn: Color::Yellow,
            log_info: Color::Blue,
            log_debug: Color::Gray,
        }
    }

    /// Style for the focused element
    pub fn focused(&self) -> Style {
        Style::default()
            .fg(self.focus_fg)
            .bg(self.focus_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn log_level(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Error => Style::default()
                .fg(self.log_error)
                .add_modifier(Modifier::BOLD),
            LogLevel::Warn => Style::default().fg(self.log_warn),
            LogLevel::Info => Style::default().fg(self.log_info),
            LogLevel::Debug | LogLevel::Trace => Style::default().fg(self.log_debug),
        }
    }
}
