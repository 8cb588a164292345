//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: terminal pane and a bottom status bar.
pub struct AppLayout {
    pub pane_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // terminal pane
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            pane_area: chunks[0],
            status_area: chunks[1],
        }
    }
}
