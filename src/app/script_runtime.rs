//! Script playback — mounts script lines on the sequencer and chains
//! `after-previous` lines off their predecessor's completion.

use crate::core::script::StartMode;

use super::sequencer::{Sequencer, SequencerEvent, SequencerEventKind};
use super::state::AppState;

/// Mount every line that does not wait for a predecessor.
pub fn launch(state: &mut AppState, seq: &mut Sequencer) {
    for idx in 0..state.script.lines.len() {
        if starts_immediately(state, idx) {
            mount_line(state, seq, idx);
        }
    }
}

/// Start every line over: waiting lines are unmounted again, the others are
/// restarted in place.
pub fn replay(state: &mut AppState, seq: &mut Sequencer) {
    for idx in 0..state.script.lines.len() {
        if starts_immediately(state, idx) {
            continue;
        }
        if let Some(handle) = state.handles[idx].take() {
            seq.release(handle);
        }
    }
    state.status_message = None;
    state.blink_epoch = std::time::Instant::now();
    launch(state, seq);
    tracing::info!(lines = state.script.lines.len(), "script replayed");
}

/// Freeze every line where it is.
pub fn skip(state: &mut AppState, seq: &mut Sequencer) {
    seq.cancel_all();
    state.status_message = Some("Skipped".into());
}

/// Apply a sequencer notification.  Returns `true` when a redraw is due.
pub fn apply_event(state: &mut AppState, seq: &mut Sequencer, event: SequencerEvent) -> bool {
    if !seq.is_current(&event) {
        return false;
    }
    if let SequencerEventKind::Completed(_) = event.kind {
        if let Some(idx) = state.line_of(event.handle) {
            on_line_complete(state, seq, idx);
        }
    }
    true
}

fn starts_immediately(state: &AppState, idx: usize) -> bool {
    idx == 0 || state.script.lines[idx].start == StartMode::Immediately
}

fn mount_line(state: &mut AppState, seq: &mut Sequencer, idx: usize) {
    let config = state.script.lines[idx].config(state.config.default_speed_ms);
    let mounted = state.handles[idx];
    let result = match mounted {
        Some(handle) => seq.restart(handle, config),
        None => seq.start(config).map(|handle| {
            state.handles[idx] = Some(handle);
        }),
    };

    if let Err(err) = result {
        tracing::warn!(line = idx + 1, %err, "script line not started");
        let kind = if err.is_configuration() { "bad timing" } else { "not started" };
        state.status_message = Some(format!("line {}: {kind}: {err}", idx + 1));
        // A line that cannot run must not stall the lines chained after it.
        on_line_complete(state, seq, idx);
    }
}

fn on_line_complete(state: &mut AppState, seq: &mut Sequencer, idx: usize) {
    let next = idx + 1;
    let waiting = state
        .script
        .lines
        .get(next)
        .is_some_and(|line| line.start == StartMode::AfterPrevious);
    if waiting && state.handles[next].is_none() {
        mount_line(state, seq, next);
    }
}
