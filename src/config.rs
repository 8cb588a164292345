//! User configuration — typing defaults, keybindings and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/terminal-text/config.toml` (default
//! `~/.config/terminal-text/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::typing::DEFAULT_STEP_INTERVAL_MS;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Replay,
    Skip,
    ToggleCursor,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::Replay,
        Action::Skip,
        Action::ToggleCursor,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::Replay => "replay",
            Action::Skip => "skip",
            Action::ToggleCursor => "cursor",
            Action::Quit => "quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Replay => "replay",
            Action::Skip => "skip",
            Action::ToggleCursor => "toggle_cursor",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT modifiers are compared; SHIFT is already folded into
    /// the character for printable keys.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Config-file / status-bar form, e.g. `"Ctrl+r"`, `"Esc"`, `"q"`.
    pub fn to_config_string(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+r"`, `"Esc"`, `"Space"`, `"q"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        // A trailing "++" is a modifier prefix followed by the `+` key.
        let (mods, key_part) = match s.strip_suffix("++") {
            Some(mods) if !mods.is_empty() => (Some(mods), "+"),
            _ => match s.rsplit_once('+') {
                Some((mods, key)) if !key.is_empty() => (Some(mods), key),
                _ => (None, s),
            },
        };

        for part in mods.into_iter().flat_map(|m| m.split('+')) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Speed for script lines that don't set their own.
    pub default_speed_ms: i64,
    /// Length of one cursor blink phase (on, then off).
    pub blink_ms: u64,
    /// Redraw tick while nothing else happens.
    pub tick_ms: u64,
    pub show_cursor: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            default_speed_ms: DEFAULT_STEP_INTERVAL_MS,
            blink_ms: 500,
            tick_ms: 50,
            show_cursor: true,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(Replay, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Skip, vec![KeyBind::new(Char('s'), n), KeyBind::new(Enter, n)]);
        m.insert(ToggleCursor, vec![KeyBind::new(Char('c'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        Action::ALL.iter().copied().find(|action| {
            self.bindings
                .get(action)
                .is_some_and(|binds| binds.iter().any(|b| b.matches(event)))
        })
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        Action::ALL
            .iter()
            .filter_map(|&action| {
                let bind = self.bindings.get(&action)?.first()?;
                Some(format!("{}: {}", bind.to_config_string(), action.label()))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "unreadable config, using defaults");
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "default_speed_ms" => {
                    if let Ok(v) = value.parse::<i64>() {
                        config.default_speed_ms = v.clamp(0, 1000);
                    }
                    continue;
                }
                "blink_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.blink_ms = v.clamp(100, 5000);
                    }
                    continue;
                }
                "tick_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.tick_ms = v.clamp(10, 1000);
                    }
                    continue;
                }
                "show_cursor" => {
                    config.show_cursor = value == "true";
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "ignoring unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# terminal-text configuration".to_string(),
            String::new(),
            "# Typing".to_string(),
            format!("default_speed_ms = {}", self.default_speed_ms),
            format!("blink_ms = {}", self.blink_ms),
            format!("tick_ms = {}", self.tick_ms),
            format!("show_cursor = {}", self.show_cursor),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/terminal-text/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("terminal-text").join("config.toml")
}
