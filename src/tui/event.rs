use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    /// Ctrl+C quits regardless of mode
    ForceQuit,
    Char(char),
    Enter,
    Backspace,
    Esc,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO).ok().flatten()
}

pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let event = match event::read()? {
        Event::Key(key_event) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            translate_key(key_event)
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(event)
}

/// Maps a crossterm key to a `TuiEvent`. Releases and repeats are dropped.
pub fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, _) => None,
        (_, KeyCode::Char(c)) => Some(TuiEvent::Char(c)),
        (_, KeyCode::Enter) => Some(TuiEvent::Enter),
        (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
        (_, KeyCode::Esc) => Some(TuiEvent::Esc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_ctrl_c_is_force_quit() {
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate_key(event), Some(TuiEvent::ForceQuit));
    }

    #[test]
    fn test_plain_chars_and_esc() {
        let event = key(KeyCode::Char('f'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate_key(event), Some(TuiEvent::Char('f')));
        let event = key(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(translate_key(event), Some(TuiEvent::Esc));
    }

    #[test]
    fn test_release_events_are_dropped() {
        let event = key(KeyCode::Char('f'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate_key(event), None);
    }

    #[test]
    fn test_other_control_chords_are_ignored() {
        let event = key(KeyCode::Char('r'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate_key(event), None);
    }
}
