//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::core::script::Script;
use crate::core::typing::RunHandle;

/// Top-level application state.
pub struct AppState {
    /// Lines to type, in display order.
    pub script: Script,
    /// One entry per script line; `None` until the line has been mounted.
    pub handles: Vec<Option<RunHandle>>,
    /// Global cursor toggle, on top of each line's own `cursor` setting.
    pub cursor_enabled: bool,
    /// Reference point for the cursor blink.
    pub blink_epoch: Instant,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set when terminal input is lost; reported after the terminal is restored.
    pub input_error: Option<String>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(script: Script, config: AppConfig) -> Self {
        Self {
            handles: vec![None; script.lines.len()],
            script,
            cursor_enabled: config.show_cursor,
            blink_epoch: Instant::now(),
            should_quit: false,
            input_error: None,
            status_message: None,
            config,
        }
    }

    /// Position of the line typed by `handle`.
    pub fn line_of(&self, handle: RunHandle) -> Option<usize> {
        self.handles.iter().position(|h| *h == Some(handle))
    }

    /// Whether the blinking cursor is in its visible half at `now`.
    pub fn blink_on(&self, now: Instant) -> bool {
        let phase = Duration::from_millis(self.config.blink_ms.max(1));
        let elapsed = now.saturating_duration_since(self.blink_epoch);
        (elapsed.as_millis() / phase.as_millis()) % 2 == 0
    }
}
