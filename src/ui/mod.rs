//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the application's
//! terminal-based user interface using ratatui.

mod browser;
mod passage;

pub use browser::draw_browser;
pub use passage::{draw_passage, draw_presenter};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, AppMode, PromptKind};
use crate::constants::search;

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3), // Command/status bar at bottom
        ])
        .split(f.size());

    match app.mode {
        AppMode::Loading | AppMode::Unavailable => draw_waiting(f, app, chunks[0]),
        AppMode::Browse => draw_browser(f, app, chunks[0]),
        AppMode::Presenter => draw_presenter(f, app, chunks[0]),
    }

    draw_command_bar(f, app, chunks[1]);

    if let Some(error) = &app.error_message {
        draw_error_message(f, error);
        return;
    }

    if app.show_help {
        draw_help_modal(f);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let (title, border_color) = match app.prompt.as_ref().map(|p| p.kind) {
        Some(PromptKind::Keyword) => ("Search", Color::Cyan),
        Some(PromptKind::Reference) => ("Go to reference", Color::Cyan),
        None => ("Commands/Status", Color::Yellow),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(border_color)));
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    if let Some(prompt) = &app.prompt {
        let prefix = match prompt.kind {
            PromptKind::Keyword => " /",
            PromptKind::Reference => " :",
        };
        let mut line = vec![Span::styled(
            format!("{prefix}{}", prompt.buffer),
            Style::default().fg(Color::Cyan),
        )];
        if prompt.buffer.is_empty() {
            line.push(Span::styled(
                format!("  e.g. {}", search::EXAMPLE_QUERIES.join(", ")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(line)), inner_area);
        let cursor = prefix.len() as u16 + text_width(&prompt.buffer);
        f.set_cursor(inner_area.left() + cursor.min(inner_area.width.saturating_sub(1)), inner_area.top());
        return;
    }

    let hints: &[(&str, &str)] = match app.mode {
        AppMode::Loading => &[("q", "Quit")],
        AppMode::Unavailable => &[("r", "Retry"), ("q", "Quit")],
        AppMode::Browse => &[
            ("←/→", "Verse"),
            ("/", "Search"),
            ("g", "Go to"),
            ("s", "Scope"),
            ("p", "Present"),
            ("?", "Help"),
        ],
        AppMode::Presenter => &[("←/→", "Verse"), ("+/-", "Size"), ("Esc", "Back")],
    };

    let mut text = create_help_text(hints);
    let status = format!(" | {} | {}", app.scope.name(), app.status);
    let room = inner_area.width.saturating_sub(spans_width(&text));
    text.push(Span::styled(truncate_to_width(&status, room), Style::default().fg(Color::Gray)));

    f.render_widget(Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Gray)), inner_area);
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")];

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));
        if i + 1 < commands.len() {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let (title_style, border_style) = if is_focused {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (Style::default(), Style::default())
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: u16) -> String {
    let max = usize::from(max);
    if text.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[allow(clippy::cast_possible_truncation)]
fn text_width(text: &str) -> u16 {
    text.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>().min(usize::from(u16::MAX)) as u16
}

fn spans_width(spans: &[Span<'_>]) -> u16 {
    spans.iter().map(|s| text_width(&s.content)).fold(0, u16::saturating_add)
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_waiting(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
        .title(Span::styled(
            format!(" {} v{} ", app.config.app_name(), app.config.app_version()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(block, area);

    let color = if app.mode == AppMode::Unavailable { Color::Red } else { Color::Yellow };
    let lines = vec![
        Line::from(Span::styled(app.status.as_str(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            app.config.data_path.display().to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];
    let inner = centered_rect(area, area.width.saturating_sub(4), 3);
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn draw_error_message(f: &mut Frame, message: &str) {
    let size = f.size();
    let area = centered_rect(size, 60.min(size.width.saturating_sub(4)), 7);

    let block = Block::default()
        .title(Span::styled(" Error ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let lines = vec![
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss", Style::default().fg(Color::Gray))),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }).alignment(Alignment::Center),
        area,
    );
}

// Key bindings, grouped; headers have an empty description
const HELP_LINES: &[(&str, &str, bool)] = &[
    ("── Global ──", "", true),
    ("F1 / ?", "Show this help", false),
    ("q / Ctrl-C", "Quit", false),
    ("r / F5", "Reload Bible data", false),
    ("", "", false),
    ("── Browse ──", "", true),
    ("Tab", "Next pane", false),
    ("↑ / ↓", "Move selection", false),
    ("Enter", "Open book, chapter or verse", false),
    ("← / →", "Previous / next verse", false),
    ("/", "Search (reference or keyword)", false),
    ("g", "Go to reference", false),
    ("s", "Cycle search scope", false),
    ("Esc", "Clear search results", false),
    ("y", "Copy passage", false),
    ("", "", false),
    ("── Presenter ──", "", true),
    ("p", "Toggle presenter view", false),
    ("+ / -", "Display size", false),
];

fn draw_help_modal(f: &mut Frame) {
    let size = f.size();
    let area = centered_rect(size, 60.min(size.width.saturating_sub(4)), 24.min(size.height.saturating_sub(4)));

    let block = Block::default()
        .title(Span::styled(" Help - Keybindings ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));

    let help_text: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, desc, is_header)| {
            if *is_header {
                Line::from(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)))
            } else {
                Line::from(vec![
                    Span::styled(format!("{key:>12}"), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(*desc, Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(help_text).block(block).wrap(Wrap { trim: true }), area);
}
