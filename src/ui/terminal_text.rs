//! Terminal-text widget — a dim prompt prefix with the typed text below it
//! and a block cursor while typing is in progress.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;
use super::wrap::wrap_words;
use crate::core::typing::TypingSnapshot;

pub const CURSOR_GLYPH: char = '█';

pub struct TerminalText<'a> {
    prefix: &'a str,
    snapshot: &'a TypingSnapshot,
    /// Blink phase.  The cursor cell stays reserved while the glyph is off
    /// so the text does not jitter.
    cursor_on: bool,
}

impl<'a> TerminalText<'a> {
    pub fn new(prefix: &'a str, snapshot: &'a TypingSnapshot) -> Self {
        Self {
            prefix,
            snapshot,
            cursor_on: true,
        }
    }

    pub fn cursor_on(mut self, on: bool) -> Self {
        self.cursor_on = on;
        self
    }

    /// Rows needed at `width`: the prefix plus the wrapped body.
    pub fn height(&self, width: u16) -> u16 {
        let rows = self.body_lines(width).len();
        u16::try_from(rows + 1).unwrap_or(u16::MAX)
    }

    /// Word-wraps the revealed text at `width` cells.
    fn body_lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width.max(1));
        let mut lines: Vec<Line<'static>> = if self.snapshot.revealed_text.is_empty() {
            Vec::new()
        } else {
            wrap_words(&self.snapshot.revealed_text, width)
                .into_iter()
                .map(|row| Line::from(Span::styled(row, Theme::text_style())))
                .collect()
        };

        if self.snapshot.cursor_visible() {
            let glyph = if self.cursor_on { CURSOR_GLYPH } else { ' ' };
            let cursor = Span::styled(glyph.to_string(), Theme::cursor_style());
            match lines.last_mut() {
                Some(last) if last.width() < width => last.spans.push(cursor),
                _ => lines.push(Line::from(cursor)),
            }
        }

        if lines.is_empty() {
            lines.push(Line::default());
        }
        lines
    }
}

impl Widget for TerminalText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let prefix = Line::styled(self.prefix.to_string(), Theme::prefix_style());
        buf.set_line(area.x, area.y, &prefix, area.width);

        for (row, line) in self
            .body_lines(area.width)
            .iter()
            .enumerate()
            .take(usize::from(area.height - 1))
        {
            buf.set_line(area.x, area.y + 1 + row as u16, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::typing::Phase;

    fn snapshot(text: &str, running: bool) -> TypingSnapshot {
        TypingSnapshot {
            revealed_text: text.to_string(),
            cursor_position: text.chars().count(),
            is_running: running,
            phase: if running { Phase::Revealing } else { Phase::Complete },
            show_cursor: true,
        }
    }

    fn rows(widget: TerminalText<'_>, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn draws_prefix_text_and_cursor_while_running() {
        let snap = snapshot("RU", true);
        let out = rows(TerminalText::new("$ run", &snap), 10, 3);
        assert_eq!(out, vec!["$ run", "RU█", ""]);
    }

    #[test]
    fn hides_cursor_once_complete() {
        let snap = snapshot("RUN", false);
        let out = rows(TerminalText::new("$", &snap), 10, 2);
        assert_eq!(out[1], "RUN");
    }

    #[test]
    fn blink_off_keeps_the_cell_blank() {
        let snap = snapshot("ab", true);
        let widget = TerminalText::new("$", &snap).cursor_on(false);
        assert_eq!(widget.height(2), 3);
        let out = rows(widget, 4, 2);
        assert_eq!(out[1], "ab");
    }

    #[test]
    fn wide_characters_are_all_drawn() {
        let text = "日本語テキスト";
        let snap = snapshot(text, false);
        let widget = TerminalText::new("$", &snap);
        assert_eq!(widget.height(4), 5);
        let drawn = rows(widget, 4, 8).concat();
        for ch in text.chars() {
            assert!(drawn.contains(ch), "{ch} missing from {drawn:?}");
        }
    }

    #[test]
    fn wraps_at_word_boundaries_and_keeps_the_cursor_in_width() {
        let snap = snapshot("hello big world", true);
        let out = rows(TerminalText::new("$", &snap), 9, 4);
        assert_eq!(out, vec!["$", "hello big", "world█", ""]);

        let snap = snapshot("hello big", true);
        let out = rows(TerminalText::new("$", &snap), 9, 4);
        assert_eq!(out, vec!["$", "hello big", "█", ""]);
    }

    #[test]
    fn wraps_long_text() {
        let snap = snapshot("abcdefg", false);
        let widget = TerminalText::new("$", &snap);
        assert_eq!(widget.height(3), 4);
        let out = rows(widget, 3, 4);
        assert_eq!(out, vec!["$", "abc", "def", "g"]);
    }
}
