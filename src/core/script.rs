//! Terminal scripts — an ordered list of prompt lines to type out.
//!
//! Script files are blank-line separated blocks of `key = value` pairs:
//!
//! ```text
//! # comment
//! prefix = $ ls projects/
//! text   = REAL SOLUTIONS, REAL RESULTS
//! speed  = 30
//!
//! prefix = $ cat about_projects.txt
//! text   = Skip the buzzwords.
//! delay  = 1000
//! start  = after-previous
//! ```

use std::path::Path;

use super::error::ScriptError;
use super::typing::SequencerConfig;

/// When a line begins typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    /// As soon as the script launches (its own `delay` still applies).
    #[default]
    Immediately,
    /// Once the previous line reports completion.
    AfterPrevious,
}

impl StartMode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "immediately" | "now" => Some(Self::Immediately),
            "after-previous" | "after_previous" | "chain" => Some(Self::AfterPrevious),
            _ => None,
        }
    }
}

/// One prompt line: a static prefix and the text typed beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub prefix: String,
    pub text: String,
    /// Per-line speed; `None` falls back to the configured default.
    pub step_interval_ms: Option<i64>,
    pub start_delay_ms: i64,
    pub show_cursor: bool,
    pub start: StartMode,
}

impl ScriptLine {
    pub fn new(prefix: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            text: text.into(),
            step_interval_ms: None,
            start_delay_ms: 0,
            show_cursor: true,
            start: StartMode::Immediately,
        }
    }

    /// Sequencer configuration for this line.
    pub fn config(&self, default_step_interval_ms: i64) -> SequencerConfig {
        SequencerConfig::new(self.text.clone())
            .with_step_interval_ms(self.step_interval_ms.unwrap_or(default_step_interval_ms))
            .with_start_delay_ms(self.start_delay_ms)
            .with_cursor(self.show_cursor)
    }
}

/// Ordered set of lines shown in the terminal pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// The header of the projects page.
    pub fn default_projects() -> Self {
        let mut headline = ScriptLine::new("$ ls projects/", "REAL SOLUTIONS, REAL RESULTS");
        headline.step_interval_ms = Some(30);

        let mut motto = ScriptLine::new("$ echo $MOTTO", "> No fluff. Just work that made a difference.");
        motto.step_interval_ms = Some(20);
        motto.start = StartMode::AfterPrevious;
        motto.show_cursor = false;

        let mut about = ScriptLine::new(
            "$ cat about_projects.txt",
            "Skip the buzzwords. Here are real projects where I solved real problems. \
             Each one started with a challenge and ended with measurable results.",
        );
        about.step_interval_ms = Some(10);
        about.start_delay_ms = 1000;

        Self {
            lines: vec![headline, motto, about],
        }
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(s: &str) -> Result<Self, ScriptError> {
        let mut lines = Vec::new();
        let mut block = BlockBuilder::default();

        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                block.finish(lines.len() + 1, &mut lines)?;
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ScriptError::MalformedEntry {
                    line: line_no,
                    content: line.to_string(),
                });
            };
            block.set(line_no, key.trim(), value.trim())?;
        }
        block.finish(lines.len() + 1, &mut lines)?;

        Ok(Self { lines })
    }
}

/// Accumulates the keys of one block until a blank line ends it.
#[derive(Default)]
struct BlockBuilder {
    touched: bool,
    prefix: Option<String>,
    text: Option<String>,
    speed: Option<i64>,
    delay: i64,
    cursor: Option<bool>,
    start: StartMode,
}

impl BlockBuilder {
    fn set(&mut self, line: usize, key: &str, value: &str) -> Result<(), ScriptError> {
        self.touched = true;
        match key {
            "prefix" => self.prefix = Some(value.to_string()),
            "text" => self.text = Some(value.to_string()),
            "speed" => self.speed = Some(parse_number(line, key, value)?),
            "delay" => self.delay = parse_number(line, key, value)?,
            "cursor" => {
                self.cursor = Some(match value {
                    "true" | "on" => true,
                    "false" | "off" => false,
                    _ => return Err(invalid_value(line, key, value)),
                })
            }
            "start" => {
                self.start =
                    StartMode::parse(value).ok_or_else(|| invalid_value(line, key, value))?
            }
            _ => {
                return Err(ScriptError::UnknownKey {
                    line,
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    fn finish(&mut self, block: usize, out: &mut Vec<ScriptLine>) -> Result<(), ScriptError> {
        if !std::mem::take(&mut self.touched) {
            return Ok(());
        }
        let done = std::mem::take(self);
        let text = done.text.ok_or(ScriptError::MissingText { block })?;
        out.push(ScriptLine {
            prefix: done.prefix.unwrap_or_default(),
            text,
            step_interval_ms: done.speed,
            start_delay_ms: done.delay,
            show_cursor: done.cursor.unwrap_or(true),
            start: done.start,
        });
        Ok(())
    }
}

fn parse_number(line: usize, key: &str, value: &str) -> Result<i64, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn invalid_value(line: usize, key: &str, value: &str) -> ScriptError {
    ScriptError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blocks_separated_by_blank_lines() {
        let script = Script::parse(
            "# header\n\
             prefix = $ ls projects/\n\
             text = REAL SOLUTIONS\n\
             speed = 30\n\
             \n\
             \n\
             prefix = $ cat about.txt\n\
             text = a = b\n\
             delay = 1000\n\
             cursor = off\n\
             start = after-previous\n",
        )
        .unwrap();

        assert_eq!(script.lines.len(), 2);
        let first = &script.lines[0];
        assert_eq!(first.prefix, "$ ls projects/");
        assert_eq!(first.text, "REAL SOLUTIONS");
        assert_eq!(first.step_interval_ms, Some(30));
        assert_eq!(first.start, StartMode::Immediately);

        let second = &script.lines[1];
        assert_eq!(second.text, "a = b");
        assert_eq!(second.start_delay_ms, 1000);
        assert!(!second.show_cursor);
        assert_eq!(second.start, StartMode::AfterPrevious);
        assert_eq!(second.step_interval_ms, None);
    }

    #[test]
    fn negative_numbers_parse_and_are_left_to_the_sequencer() {
        let script = Script::parse("text = x\nspeed = -5\n").unwrap();
        let cfg = script.lines[0].config(40);
        assert_eq!(cfg.step_interval_ms, -5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_speed_applies_when_line_has_none() {
        let line = ScriptLine::new("$", "hi");
        assert_eq!(line.config(25).step_interval_ms, 25);
    }

    #[test]
    fn reports_bad_entries() {
        assert!(matches!(
            Script::parse("prefix = $\n"),
            Err(ScriptError::MissingText { block: 1 })
        ));
        assert!(matches!(
            Script::parse("text = a\nspeed = fast\n"),
            Err(ScriptError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            Script::parse("text = a\ncolour = red\n"),
            Err(ScriptError::UnknownKey { line: 2, .. })
        ));
        assert!(matches!(
            Script::parse("text = a\nstart = later\n"),
            Err(ScriptError::InvalidValue { line: 2, .. })
        ));
    }

    #[test]
    fn entry_without_equals_is_rejected_with_its_line() {
        let err = Script::parse("# header
text = a

text REAL
").unwrap_err();
        assert!(matches!(
            &err,
            ScriptError::MalformedEntry { line: 4, content } if content == "text REAL"
        ));
        assert_eq!(err.to_string(), "line 4: expected `key = value`, got `text REAL`");
    }

    #[test]
    fn default_script_chains_the_motto() {
        let script = Script::default_projects();
        assert_eq!(script.lines.len(), 3);
        assert_eq!(script.lines[1].start, StartMode::AfterPrevious);
        assert_eq!(script.lines[2].start_delay_ms, 1000);
    }
}
