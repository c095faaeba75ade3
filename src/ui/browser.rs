use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::constants::{messages, ui};
use crate::ui::{create_titled_block, draw_passage, truncate_to_width};

fn highlight() -> Style {
    Style::default().bg(Color::Rgb(80, 80, 120)).add_modifier(Modifier::BOLD)
}

/// Book and chapter pickers, verse list and the current passage.
pub fn draw_browser(f: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(ui::PICKER_WIDTH),
            Constraint::Percentage(100 - ui::PASSAGE_PERCENT),
            Constraint::Percentage(ui::PASSAGE_PERCENT),
        ])
        .split(area);

    let pickers = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);

    draw_books(f, app, pickers[0]);
    draw_chapters(f, app, pickers[1]);
    draw_verses(f, app, columns[1]);
    draw_passage(f, app, columns[2]);
}

fn draw_books(f: &mut Frame, app: &mut App, area: Rect) {
    let width = area.width.saturating_sub(2);
    let items: Vec<ListItem> = app
        .session
        .as_ref()
        .map(|session| {
            session
                .index()
                .books()
                .map(|(_, meta)| ListItem::new(truncate_to_width(meta.display_name(), width)))
                .collect()
        })
        .unwrap_or_default();

    let list = List::new(items)
        .block(create_titled_block("Books", app.focus == Focus::Books))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.book_list_state);
}

fn draw_chapters(f: &mut Frame, app: &mut App, area: Rect) {
    let meta = app
        .session
        .as_ref()
        .zip(app.selected_book.as_ref())
        .and_then(|(session, book)| session.index().book_meta(book));

    let title = meta.map_or_else(|| "Chapters".to_string(), |m| format!("{} chapters", m.display_name()));
    let items: Vec<ListItem> = meta
        .map(|m| m.chapters().iter().map(|c| ListItem::new(format!("Chapter {c}"))).collect())
        .unwrap_or_default();

    let list = List::new(items)
        .block(create_titled_block(&title, app.focus == Focus::Chapters))
        .highlight_style(highlight());
    f.render_stateful_widget(list, area, &mut app.chapter_list_state);
}

fn draw_verses(f: &mut Frame, app: &mut App, area: Rect) {
    let title = app.verse_list_title();
    let focused = app.focus == Focus::Verses;
    let in_results = app.session.as_ref().and_then(|s| s.search_results());
    let subtitle = in_results.map(|results| match results.hits.len() {
        0 => messages::NO_RESULTS.to_string(),
        n => format!("{n} result(s) for \"{}\"", results.query),
    });
    let current = app.session.as_ref().and_then(|s| s.position()).cloned();

    let text_width = area.width.saturating_sub(4);
    let items: Vec<ListItem> = app
        .verse_rows()
        .into_iter()
        .map(|row| {
            let is_current = current.as_ref() == Some(&row.position);
            let label_style = if is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            let label = format!("{:>4} ", row.label);
            let room = text_width.saturating_sub(u16::try_from(label.len()).unwrap_or(u16::MAX));
            ListItem::new(Line::from(vec![
                Span::styled(label, label_style),
                Span::raw(truncate_to_width(row.passage.text(), room)),
            ]))
        })
        .collect();

    let block = create_titled_block(&title, focused);
    if items.is_empty() {
        let fallback = if app.selected_chapter.is_some() { messages::PICK_VERSE } else { messages::PICK_CHAPTER };
        let hint = subtitle.unwrap_or_else(|| fallback.to_string());
        let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray)))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(u16::from(subtitle.is_some())), Constraint::Min(1)])
        .split(block.inner(area));
    f.render_widget(block, area);

    if let Some(subtitle) = subtitle {
        f.render_widget(Paragraph::new(Span::styled(subtitle, Style::default().fg(Color::Gray))), chunks[0]);
    }
    let list = List::new(items).highlight_style(highlight()).highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[1], &mut app.verse_list_state);
}
