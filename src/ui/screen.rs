//! Full-screen composition: the terminal pane with every mounted line, and
//! the status bar.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::layout::AppLayout;
use super::terminal_text::TerminalText;
use super::theme::Theme;
use crate::app::sequencer::Sequencer;
use crate::app::state::AppState;

pub fn draw(frame: &mut Frame, state: &AppState, seq: &Sequencer) {
    let layout = AppLayout::from_area(frame.area());

    let block = Block::default()
        .title(" ~/projects ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style())
        .style(Theme::pane_style());
    let inner = block.inner(layout.pane_area);
    frame.render_widget(block, layout.pane_area);

    let blink_on = state.blink_on(Instant::now());
    let mut y = inner.y;
    let bottom = inner.y + inner.height;

    for (line, handle) in state.script.lines.iter().zip(&state.handles) {
        if y >= bottom {
            break;
        }
        // Lines that have not been mounted take no space yet.
        let Some(mut snapshot) = handle.and_then(|h| seq.snapshot(h)) else {
            continue;
        };
        snapshot.show_cursor &= state.cursor_enabled;

        let widget = TerminalText::new(&line.prefix, &snapshot).cursor_on(blink_on);
        let height = widget.height(inner.width).min(bottom - y);
        frame.render_widget(widget, Rect::new(inner.x, y, inner.width, height));
        y = y.saturating_add(height + 1);
    }

    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}
