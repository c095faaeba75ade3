use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::constants::{messages, presenter};

/// Reference and text of the current passage, or the placeholder pair.
fn current_text(app: &App) -> (String, String) {
    app.session
        .as_ref()
        .and_then(|session| session.current_passage())
        .map_or_else(
            || (messages::NO_PASSAGE_REFERENCE.to_string(), messages::NO_PASSAGE_TEXT.to_string()),
            |current| (current.passage.reference().to_string(), current.passage.text().to_string()),
        )
}

pub fn draw_passage(f: &mut Frame, app: &App, area: Rect) {
    let (reference, text) = current_text(app);
    let lines = vec![
        Line::from(Span::styled(reference, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(text),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Passage ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightBlue)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Share of the screen width used for presenter text at `px`.
fn presenter_width_percent(px: u16) -> u16 {
    let span = presenter::MAX_SIZE_PX - presenter::MIN_SIZE_PX;
    40 + (px.saturating_sub(presenter::MIN_SIZE_PX) * 60) / span
}

/// Full-screen presenter view of the current passage.
pub fn draw_presenter(f: &mut Frame, app: &App, area: Rect) {
    let size = app.display_size.get();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(format!(" Presenter {} ", size.css()), Style::default().fg(Color::DarkGray)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let percent = presenter_width_percent(size.px());
    let margin = (100 - percent) / 2;
    let column = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin),
            Constraint::Percentage(percent),
            Constraint::Percentage(margin),
        ])
        .split(inner)[1];

    let (reference, text) = current_text(app);
    let wrapped_rows = UnicodeWidthStr::width(text.as_str()) / usize::from(column.width.max(1)) + 1;
    let lines = vec![
        Line::from(Span::styled(text, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(reference, Style::default().fg(Color::Yellow))),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });

    let height = u16::try_from(wrapped_rows + 3).unwrap_or(u16::MAX).min(column.height);
    let top = column.y + (column.height - height) / 2;
    f.render_widget(paragraph, Rect { y: top, height, ..column });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presenter_width_tracks_size() {
        assert_eq!(presenter_width_percent(presenter::MIN_SIZE_PX), 40);
        assert_eq!(presenter_width_percent(presenter::MAX_SIZE_PX), 100);
        assert!(presenter_width_percent(70) > presenter_width_percent(50));
    }
}
