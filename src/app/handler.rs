//! Input handling — maps key events to actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Action;

use super::event::AppEvent;
use super::script_runtime;
use super::sequencer::Sequencer;
use super::state::AppState;

/// Process one terminal event.
pub fn handle_event(state: &mut AppState, seq: &mut Sequencer, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(state, seq, key),
        AppEvent::Resize(_, _) | AppEvent::Tick => {}
        AppEvent::InputFailed(reason) => {
            state.input_error = Some(reason);
            state.should_quit = true;
        }
    }
}

/// Process a key event.
pub fn handle_key(state: &mut AppState, seq: &mut Sequencer, key: KeyEvent) {
    // Ctrl+c always quits, regardless of bindings.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    tracing::debug!(?action, "key action");

    match action {
        Action::Replay => script_runtime::replay(state, seq),
        Action::Skip => script_runtime::skip(state, seq),
        Action::ToggleCursor => {
            state.cursor_enabled = !state.cursor_enabled;
            state.status_message = Some(format!(
                "Cursor {}",
                if state.cursor_enabled { "on" } else { "off" }
            ));
        }
        Action::Quit => state.should_quit = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::script::Script;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn quit_and_cursor_keys() {
        let (mut seq, _rx) = Sequencer::new();
        let mut state = AppState::new(Script::default(), AppConfig::default());

        handle_key(&mut state, &mut seq, press(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!state.cursor_enabled);
        assert_eq!(state.status_message.as_deref(), Some("Cursor off"));

        handle_key(&mut state, &mut seq, press(KeyCode::Char('z'), KeyModifiers::NONE));
        assert!(!state.should_quit);

        handle_key(&mut state, &mut seq, press(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
    }

    #[tokio::test]
    async fn lost_input_quits_with_the_reason() {
        let (mut seq, _rx) = Sequencer::new();
        let mut state = AppState::new(Script::default(), AppConfig::default());

        handle_event(&mut state, &mut seq, AppEvent::Tick);
        assert!(!state.should_quit);

        handle_event(&mut state, &mut seq, AppEvent::InputFailed("tty gone".into()));
        assert!(state.should_quit);
        assert_eq!(state.input_error.as_deref(), Some("tty gone"));
    }
}
