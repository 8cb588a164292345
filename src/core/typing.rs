//! Typing state machine — reveals a target string one character at a time.
//!
//! This is the runtime-free half of the typing engine: it knows *what* the
//! next state is but not *when* to move there.  Timers live in
//! [`crate::app::sequencer`], which drives a [`TypingState`] forward.
//!
//! A "unit" is one Unicode scalar value, so `cursor_position` counts `char`s
//! and never splits a multi-byte character.

use std::fmt;
use std::time::Duration;

use super::error::SequencerError;

/// Default delay between two revealed characters.
pub const DEFAULT_STEP_INTERVAL_MS: i64 = 40;

// ───────────────────────────────────────── handle ────────────

/// Opaque identifier of a run slot inside a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunHandle(u64);

impl RunHandle {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RunHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run #{}", self.0)
    }
}

// ───────────────────────────────────────── config ────────────

/// Immutable description of one typing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    pub target_text: String,
    /// Milliseconds between two reveals.  Negative values are rejected.
    pub step_interval_ms: i64,
    /// Milliseconds before the first reveal.  Negative values are rejected.
    pub start_delay_ms: i64,
    pub show_cursor: bool,
}

impl SequencerConfig {
    pub fn new(target_text: impl Into<String>) -> Self {
        Self {
            target_text: target_text.into(),
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            start_delay_ms: 0,
            show_cursor: true,
        }
    }

    pub fn with_step_interval_ms(mut self, ms: i64) -> Self {
        self.step_interval_ms = ms;
        self
    }

    pub fn with_start_delay_ms(mut self, ms: i64) -> Self {
        self.start_delay_ms = ms;
        self
    }

    pub fn with_cursor(mut self, show_cursor: bool) -> Self {
        self.show_cursor = show_cursor;
        self
    }

    /// Check the timing parameters and convert them to durations.
    pub fn validate(&self) -> Result<Timing, SequencerError> {
        let step_interval = u64::try_from(self.step_interval_ms)
            .map_err(|_| SequencerError::NegativeStepInterval(self.step_interval_ms))?;
        let start_delay = u64::try_from(self.start_delay_ms)
            .map_err(|_| SequencerError::NegativeStartDelay(self.start_delay_ms))?;
        Ok(Timing {
            step_interval: Duration::from_millis(step_interval),
            start_delay: Duration::from_millis(start_delay),
        })
    }
}

/// Validated timing of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub step_interval: Duration,
    pub start_delay: Duration,
}

// ───────────────────────────────────────── phases ────────────

/// Lifecycle phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Delaying,
    Revealing,
    Complete,
    Cancelled,
}

impl Phase {
    /// Complete and Cancelled accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Cancelled)
    }
}

/// What a call to [`TypingState::step`] or [`TypingState::begin_reveal`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One more character became visible; more remain.
    Revealed(char),
    /// The run finished during this call.  Reported once per run.
    Completed,
    /// Nothing changed.
    Inert,
}

// ───────────────────────────────────────── state ─────────────

/// Mutable state of a single run.
#[derive(Debug, Clone)]
pub struct TypingState {
    target: String,
    unit_count: usize,
    revealed_text: String,
    cursor_position: usize,
    has_started: bool,
    phase: Phase,
    show_cursor: bool,
}

impl TypingState {
    pub fn new(target: impl Into<String>, show_cursor: bool) -> Self {
        let target = target.into();
        Self {
            unit_count: target.chars().count(),
            target,
            revealed_text: String::new(),
            cursor_position: 0,
            has_started: false,
            phase: Phase::Idle,
            show_cursor,
        }
    }

    pub fn revealed_text(&self) -> &str {
        &self.revealed_text
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` while characters are actively being revealed.
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Revealing
            && self.has_started
            && self.cursor_position < self.unit_count
    }

    /// Idle → Delaying.  Any other phase is left alone.
    pub fn begin_delay(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Delaying;
        }
    }

    /// Idle/Delaying → Revealing.  An empty target goes straight to Complete.
    pub fn begin_reveal(&mut self) -> StepOutcome {
        if !matches!(self.phase, Phase::Idle | Phase::Delaying) {
            return StepOutcome::Inert;
        }
        self.has_started = true;
        if self.unit_count == 0 {
            self.phase = Phase::Complete;
            return StepOutcome::Completed;
        }
        self.phase = Phase::Revealing;
        StepOutcome::Inert
    }

    /// Reveal the next character.
    pub fn step(&mut self) -> StepOutcome {
        if self.phase != Phase::Revealing {
            return StepOutcome::Inert;
        }
        let Some(ch) = self.target[self.revealed_text.len()..].chars().next() else {
            // Only reachable if the target was empty, which begin_reveal handles.
            self.phase = Phase::Complete;
            return StepOutcome::Completed;
        };
        self.revealed_text.push(ch);
        self.cursor_position += 1;
        if self.cursor_position == self.unit_count {
            self.phase = Phase::Complete;
            StepOutcome::Completed
        } else {
            StepOutcome::Revealed(ch)
        }
    }

    /// Freeze the run.  Returns `false` if it had already ended.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = Phase::Cancelled;
        true
    }

    pub fn snapshot(&self) -> TypingSnapshot {
        TypingSnapshot {
            revealed_text: self.revealed_text.clone(),
            cursor_position: self.cursor_position,
            is_running: self.is_running(),
            phase: self.phase,
            show_cursor: self.show_cursor,
        }
    }
}

/// Point-in-time observation of a run, handed to renderers and observers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypingSnapshot {
    pub revealed_text: String,
    pub cursor_position: usize,
    pub is_running: bool,
    pub phase: Phase,
    pub show_cursor: bool,
}

impl TypingSnapshot {
    /// Whether a cursor glyph belongs after the revealed text.
    pub fn cursor_visible(&self) -> bool {
        self.is_running && self.show_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(text: &str) -> TypingState {
        let mut state = TypingState::new(text, true);
        assert_eq!(state.begin_reveal(), StepOutcome::Inert);
        state
    }

    #[test]
    fn reveals_run_one_character_per_step() {
        let mut state = started("RUN");
        assert_eq!(state.revealed_text(), "");
        assert!(state.is_running());

        assert_eq!(state.step(), StepOutcome::Revealed('R'));
        assert_eq!(state.revealed_text(), "R");
        assert_eq!(state.step(), StepOutcome::Revealed('U'));
        assert_eq!(state.revealed_text(), "RU");
        assert_eq!(state.step(), StepOutcome::Completed);
        assert_eq!(state.revealed_text(), "RUN");

        assert!(!state.is_running());
        assert_eq!(state.phase(), Phase::Complete);
        assert_eq!(state.step(), StepOutcome::Inert);
    }

    #[test]
    fn empty_target_completes_on_reveal() {
        let mut state = TypingState::new("", true);
        state.begin_delay();
        assert_eq!(state.phase(), Phase::Delaying);
        assert_eq!(state.begin_reveal(), StepOutcome::Completed);
        assert_eq!(state.revealed_text(), "");
        assert!(!state.is_running());
        assert_eq!(state.begin_reveal(), StepOutcome::Inert);
        assert_eq!(state.step(), StepOutcome::Inert);
    }

    #[test]
    fn not_running_while_delaying() {
        let mut state = TypingState::new("abc", true);
        state.begin_delay();
        assert!(!state.has_started());
        assert!(!state.is_running());
        assert_eq!(state.step(), StepOutcome::Inert);
        assert_eq!(state.cursor_position(), 0);
    }

    #[test]
    fn revealed_text_is_always_a_prefix() {
        let text = "héllo, wörld → ok";
        let mut state = started(text);
        let mut seen = 0;
        while state.step() != StepOutcome::Inert {
            seen += 1;
            let expected: String = text.chars().take(state.cursor_position()).collect();
            assert_eq!(state.revealed_text(), expected);
            assert!(text.starts_with(state.revealed_text()));
            if state.phase() == Phase::Complete {
                break;
            }
        }
        assert_eq!(seen, text.chars().count());
        assert_eq!(state.revealed_text(), text);
    }

    #[test]
    fn cancel_freezes_prefix_and_is_idempotent() {
        let mut state = started("HELLO");
        state.step();
        state.step();

        assert!(state.cancel());
        let frozen = state.snapshot();
        assert!(!state.cancel());
        assert_eq!(state.snapshot(), frozen);

        assert_eq!(frozen.revealed_text, "HE");
        assert!(!frozen.is_running);
        assert_eq!(state.step(), StepOutcome::Inert);
        assert_eq!(state.revealed_text(), "HE");
    }

    #[test]
    fn cancel_after_completion_is_a_no_op() {
        let mut state = started("x");
        assert_eq!(state.step(), StepOutcome::Completed);
        assert!(!state.cancel());
        assert_eq!(state.phase(), Phase::Complete);
    }

    #[test]
    fn cursor_visibility_follows_running_and_flag() {
        let mut state = TypingState::new("ab", false);
        state.begin_reveal();
        assert!(!state.snapshot().cursor_visible());

        let mut state = started("ab");
        assert!(state.snapshot().cursor_visible());
        state.step();
        state.step();
        assert!(!state.snapshot().cursor_visible());
    }

    #[test]
    fn validate_rejects_negative_timing() {
        let cfg = SequencerConfig::new("a").with_step_interval_ms(-1);
        assert_eq!(cfg.validate(), Err(SequencerError::NegativeStepInterval(-1)));

        let cfg = SequencerConfig::new("a").with_start_delay_ms(-20);
        assert_eq!(cfg.validate(), Err(SequencerError::NegativeStartDelay(-20)));
        assert!(cfg.validate().unwrap_err().is_configuration());

        let timing = SequencerConfig::new("a")
            .with_step_interval_ms(0)
            .with_start_delay_ms(50)
            .validate()
            .unwrap();
        assert_eq!(timing.step_interval, Duration::ZERO);
        assert_eq!(timing.start_delay, Duration::from_millis(50));
    }
}
