//! Terminal UI rendering.

pub mod overlay;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Task list above, one-line status bar below.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    overlay::render(frame, chunks[0], app);
    status_bar::render(frame, chunks[1], app);
}

/// Lines available inside the task panel for a terminal of `height`
/// rows: the status bar takes one, the panel borders two.
#[must_use]
pub const fn task_viewport_rows(height: u16) -> u16 {
    height.saturating_sub(3)
}
