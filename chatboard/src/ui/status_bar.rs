//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, ConnectionState};

use super::theme;

/// Render the one-line status bar: connection indicator, channel,
/// task count, and the quit hint.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (color, label) = match app.connection {
        ConnectionState::Offline => (theme::FG_SECONDARY, "Offline".to_string()),
        ConnectionState::Connecting => (theme::WARNING, "Connecting...".to_string()),
        ConnectionState::Connected => (theme::SUCCESS, format!("Live in #{}", app.channel)),
        ConnectionState::Reconnecting => {
            (theme::WARNING, format!("Reconnecting {}", app.status_detail))
        }
        ConnectionState::Failed => (theme::ERROR, "Disconnected".to_string()),
    };

    let mut spans = vec![
        Span::styled(" ● ", ratatui::style::Style::default().fg(color)),
        Span::raw(label),
        Span::raw("  |  "),
        Span::raw(format!(
            "{} users, {} tasks",
            app.store.len(),
            app.task_count()
        )),
    ];
    if !app.status_detail.is_empty() && app.connection == ConnectionState::Failed {
        spans.push(Span::raw(format!("  |  {}", app.status_detail)));
    }
    spans.push(Span::raw("  |  q: quit"));

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(theme::status_bar_bg()), area);
}
