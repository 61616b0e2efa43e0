//! Toast notification component
//!
//! A non-blocking overlay that auto-dismisses after a fixed duration.
//! Renders in the bottom-right corner on top of all other content.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Longest message shown; server text can be arbitrarily long
const MAX_MESSAGE_CHARS: usize = 120;

/// First line of `message`, cut to `MAX_MESSAGE_CHARS` with an ellipsis
fn condense(message: &str) -> String {
    let line = message.lines().next().unwrap_or("").trim();
    if line.chars().count() <= MAX_MESSAGE_CHARS {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// A toast notification that auto-dismisses
pub struct Toast {
    pub message: String,
    /// Error toasts use the error color for their border
    pub is_error: bool,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    /// Create a new toast with default 3-second duration
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: condense(&message.into()),
            is_error: false,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(message)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.duration
    }

    /// Render the toast in the bottom-right corner
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        // Border plus margin need at least this much room
        if area.width < 8 || area.height < 5 {
            return;
        }

        // 2 chars padding each side including the border
        let width = self
            .message
            .width()
            .saturating_add(4)
            .min(usize::from(area.width.saturating_sub(4))) as u16;
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area.bottom().saturating_sub(height + 2);
        let toast_area = Rect::new(x, y, width, height);

        let accent = if self.is_error {
            theme.error
        } else {
            theme.highlight
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(theme.background));

        let text = Paragraph::new(self.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.foreground))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(text, toast_area);
    }
}
