// Modal overlay rendering
//
// Every modal is drawn from its element subtree: the renderer walks the
// container in document order and turns each visible element into a line
// (consecutive buttons share one row). Stacked modals are drawn bottom to
// top so the topmost one ends up in front.

use crate::focus::{ElementId, ElementKind, ElementTree, InputType};
use crate::tui::app::App;
use crate::tui::forms::{STATUS_BUSY, STATUS_ERR, STATUS_OK};
use crate::tui::modal::Modal;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App, is_top: bool) {
    let (width, height) = modal.size();
    let area = centered_rect(width, height, f.area());

    let border = if is_top {
        app.theme.highlight
    } else {
        app.theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            modal.title(),
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background));

    // Only the top modal shows a focus ring
    let focused = if is_top { app.focus.focused } else { None };
    let lines = element_lines(&app.tree, modal.container(), focused, &app.theme);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Lines for every visible element below `container`
pub(crate) fn element_lines(
    tree: &ElementTree,
    container: ElementId,
    focused: Option<ElementId>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut buttons: Vec<Span<'static>> = Vec::new();

    for id in tree.descendants(container) {
        if tree.is_hidden_within(id, container) {
            continue;
        }
        let Some(el) = tree.get(id) else {
            continue;
        };
        let is_focused = focused == Some(id);

        if el.kind == ElementKind::Button {
            let style = if is_focused {
                theme.focused()
            } else if el.disabled {
                Style::default().fg(theme.muted)
            } else {
                Style::default().fg(theme.button)
            };
            if !buttons.is_empty() {
                buttons.push(Span::raw("  "));
            }
            buttons.push(Span::styled(format!("[ {} ]", el.label), style));
            continue;
        }
        if !buttons.is_empty() {
            lines.push(Line::from(std::mem::take(&mut buttons)));
        }

        let line = match &el.kind {
            ElementKind::Container => continue,
            ElementKind::Text => status_line(&el.label, theme),
            ElementKind::Input(InputType::Radio) | ElementKind::Input(InputType::Checkbox) => {
                let mark = match (&el.kind, el.checked) {
                    (ElementKind::Input(InputType::Radio), true) => "(•)",
                    (ElementKind::Input(InputType::Radio), false) => "( )",
                    (_, true) => "[x]",
                    (_, false) => "[ ]",
                };
                let style = if is_focused {
                    theme.focused()
                } else {
                    Style::default().fg(theme.foreground)
                };
                Line::from(Span::styled(format!("{} {}", mark, el.label), style))
            }
            ElementKind::Input(InputType::Hidden) => continue,
            ElementKind::Input(kind) => {
                let shown = if el.value.is_empty() {
                    Span::styled(el.placeholder.clone(), Style::default().fg(theme.muted))
                } else if *kind == InputType::Password {
                    Span::styled(
                        "•".repeat(el.value.chars().count()),
                        Style::default().fg(theme.input),
                    )
                } else {
                    Span::styled(el.value.clone(), Style::default().fg(theme.input))
                };
                let label_style = if is_focused {
                    theme.focused()
                } else {
                    Style::default().fg(theme.muted)
                };
                let mut spans = vec![
                    Span::styled(format!("{}:", el.label), label_style),
                    Span::raw(" "),
                    shown,
                ];
                if is_focused {
                    spans.push(Span::styled("▏", Style::default().fg(theme.focus_bg)));
                }
                Line::from(spans)
            }
            ElementKind::Select | ElementKind::TextArea | ElementKind::Link { .. } => {
                let style = if is_focused {
                    theme.focused()
                } else {
                    Style::default().fg(theme.foreground)
                };
                Line::from(Span::styled(el.label.clone(), style))
            }
            ElementKind::Button => continue,
        };
        lines.push(line);
    }

    if !buttons.is_empty() {
        lines.push(Line::from(buttons));
    }
    lines
}

/// Static text, colored when it carries a status prefix
fn status_line(text: &str, theme: &Theme) -> Line<'static> {
    let color = if text.starts_with(STATUS_ERR) {
        theme.error
    } else if text.starts_with(STATUS_OK) {
        theme.success
    } else if text.starts_with(STATUS_BUSY) {
        theme.muted
    } else {
        theme.foreground
    };
    Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
}
