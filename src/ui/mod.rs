//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! Widgets only read [`TypingSnapshot`](crate::core::typing::TypingSnapshot)s;
//! no timers run here.

pub mod layout;
pub mod screen;
pub mod terminal_text;
pub mod theme;
pub mod wrap;
