//! Task list rendering.
//!
//! Each user gets a block: display name, repeating entries first
//! (unnumbered, `↻`-marked), then normal entries numbered by visible
//! index — the same numbers viewers pass to `!done` and `!deletetask`.
//! Done entries are struck through, the current entry is highlighted.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::tasks::{TaskStore, UserTaskList};

use super::theme;

/// Render the task list with the app's current scroll offset.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Tasks ")
        .borders(Borders::ALL)
        .title_style(theme::panel_title(theme::TASKS_TITLE))
        .border_style(theme::dimmed());

    let paragraph = Paragraph::new(Text::from(store_lines(&app.store)))
        .block(block)
        .scroll((app.scroll.offset(), 0));

    frame.render_widget(paragraph, area);
}

/// Build the display lines for the whole store.
///
/// Also used by the main loop to size the autoscroll: the line count
/// here is the content height behind [`render`].
#[must_use]
pub fn store_lines(store: &TaskStore) -> Vec<Line<'static>> {
    if store.is_empty() {
        return vec![Line::from(Span::styled(
            " No tasks yet!",
            theme::dimmed(),
        ))];
    }

    let mut lines = Vec::new();
    for list in store.values() {
        lines.extend(user_lines(list));
        lines.push(Line::default());
    }
    // Drop the trailing spacer.
    lines.pop();
    lines
}

/// Number of lines [`store_lines`] would produce.
#[must_use]
pub fn content_line_count(store: &TaskStore) -> usize {
    if store.is_empty() {
        return 1;
    }
    let per_user: usize = store.values().map(|list| list.entries.len() + 1).sum();
    // One spacer between consecutive users.
    per_user + store.len() - 1
}

/// Lines for a single user's block.
fn user_lines(list: &UserTaskList) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        list.display_name.clone(),
        theme::panel_title(theme::user_color(&list.display_name)),
    ))];

    // Repeating entries first, unnumbered.
    for entry in list.entries.iter().filter(|e| e.repeating) {
        let style = if entry.done {
            theme::done()
        } else {
            theme::normal()
        };
        lines.push(Line::from(vec![
            Span::styled("  ↻ ", theme::repeating()),
            Span::styled(entry.text.clone(), style),
        ]));
    }

    // Normal entries, numbered by visible index.
    for (visible, entry) in list.entries.iter().filter(|e| !e.repeating).enumerate() {
        let style = if entry.done {
            theme::done()
        } else if entry.current {
            theme::current()
        } else {
            theme::normal()
        };
        let marker = if entry.current { "▶" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker}{}. ", visible + 1), theme::dimmed()),
            Span::styled(entry.text.clone(), style),
        ]));
    }

    lines
}
