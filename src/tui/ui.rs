// UI rendering logic
//
// Everything drawn per frame: title, the main dashboard, the log pane and
// the key hints, then any open modals and the toast on top.

use super::app::App;
use super::views;
use crate::logging::LogEntry;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(7),    // Dashboard
            Constraint::Length(8), // System logs
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_title(f, chunks[0], app);
    render_dashboard(f, chunks[1], app);
    render_logs(f, chunks[2], app);
    render_hints(f, chunks[3], app);

    let depth = app.modals.len();
    for (i, modal) in app.modals.iter().enumerate() {
        views::modal::render(f, modal, app, i + 1 == depth);
    }

    if let Some(toast) = &app.toast {
        let area = f.area();
        toast.render(f, area, &app.theme);
    }
}

fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            " trapdoor ",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{}", crate::config::VERSION),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    f.render_widget(Paragraph::new(title).block(block), area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let label = Style::default().fg(app.theme.muted);
    let value = Style::default().fg(app.theme.foreground);

    let server = app
        .saved_server_url
        .clone()
        .unwrap_or_else(|| "not saved this session".to_string());

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Integration"), label),
            Span::styled(app.integration.clone(), value),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Server"), label),
            Span::styled(server, value),
        ]),
        Line::from(vec![
            Span::styled(format!("  {:<14}", "Date range"), label),
            Span::styled(
                format!("{} (since {})", app.range.preset.label(), app.range.since),
                value,
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
        .title(" Dashboard ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_logs(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .log_buffer
        .recent(visible)
        .iter()
        .map(|entry| {
            ListItem::new(format_log_entry(entry)).style(app.theme.log_level(entry.level))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border))
            .title(" System Logs "),
    );
    f.render_widget(list, area);
}

fn format_log_entry(entry: &LogEntry) -> String {
    let module = entry.target.rsplit("::").next().unwrap_or(&entry.target);
    format!(
        "{} {:5} {:<10} {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        module,
        entry.message
    )
}

fn render_hints(f: &mut Frame, area: Rect, app: &App) {
    let hints = if app.modals.is_empty() {
        " s settings │ d date range │ ? help │ q quit"
    } else {
        " Tab/Shift+Tab move │ Space/Enter activate │ Esc close"
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(app.theme.muted)),
        area,
    );
}
