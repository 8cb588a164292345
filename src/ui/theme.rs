//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── terminal pane ──────────────────────────────────────────
    pub fn pane_style() -> Style {
        Style::default().bg(Color::Black).fg(Color::White)
    }

    pub fn prefix_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn cursor_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
