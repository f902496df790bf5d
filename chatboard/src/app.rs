//! Application state for the overlay.

use crate::tasks::TaskStore;

/// Connection state shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No chat configuration — rendering the persisted store only.
    Offline,
    /// Supervisor started, first connection not yet up.
    Connecting,
    /// Live chat connection.
    Connected,
    /// Between attempts of the current outage.
    Reconnecting,
    /// Reconnect attempts exhausted.
    Failed,
}

/// Bouncing autoscroll for lists taller than the viewport.
///
/// One line per tick, reversing direction at the ends with a short rest,
/// the way the overlay scrolled in its previous life as a browser source.
#[derive(Debug)]
pub struct ScrollState {
    /// Current offset in lines from the top.
    offset: u16,
    /// `true` while scrolling downward.
    downward: bool,
    /// Ticks left to rest at the current end.
    pause: u16,
    /// Rest length applied when an end is reached.
    pause_ticks: u16,
}

impl ScrollState {
    /// Create a scroll state resting at the top.
    #[must_use]
    pub const fn new(pause_ticks: u16) -> Self {
        Self {
            offset: 0,
            downward: true,
            pause: pause_ticks,
            pause_ticks,
        }
    }

    /// Current offset in lines.
    #[must_use]
    pub const fn offset(&self) -> u16 {
        self.offset
    }

    /// Advance one tick for a list of `content` lines in a viewport of
    /// `viewport` lines.
    ///
    /// When the content fits, the offset snaps to the top and stays
    /// there. Content changes between ticks are tolerated: the offset
    /// is clamped before moving.
    pub fn tick(&mut self, content: u16, viewport: u16) {
        let max = content.saturating_sub(viewport);
        if max == 0 {
            self.offset = 0;
            self.downward = true;
            return;
        }
        if self.offset > max {
            self.offset = max;
        }
        if self.pause > 0 {
            self.pause -= 1;
            return;
        }
        if self.downward {
            self.offset += 1;
            if self.offset >= max {
                self.offset = max;
                self.downward = false;
                self.pause = self.pause_ticks;
            }
        } else {
            self.offset -= 1;
            if self.offset == 0 {
                self.downward = true;
                self.pause = self.pause_ticks;
            }
        }
    }
}

/// Main application state.
pub struct App {
    /// The task store, replaced wholesale on every accepted command.
    pub store: TaskStore,
    /// Channel name shown in the title.
    pub channel: String,
    /// Connection state for the status bar.
    pub connection: ConnectionState,
    /// Extra status detail (reconnect attempt, last error).
    pub status_detail: String,
    /// Autoscroll state for the task list.
    pub scroll: ScrollState,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Create the application around a (possibly restored) store.
    #[must_use]
    pub fn new(store: TaskStore, channel: String, scroll_pause_ticks: u16) -> Self {
        Self {
            store,
            channel,
            connection: ConnectionState::Offline,
            status_detail: String::new(),
            scroll: ScrollState::new(scroll_pause_ticks),
            should_quit: false,
        }
    }

    /// Update the connection state and its status-bar detail.
    pub fn set_connection(&mut self, state: ConnectionState, detail: impl Into<String>) {
        self.connection = state;
        self.status_detail = detail.into();
    }

    /// Total task count across all users.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.store.values().map(|list| list.entries.len()).sum()
    }
}
