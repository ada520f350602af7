//! Keyboard bindings for interactive playback.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Speed change per `+`/`-` press, in milliseconds.
pub const SPEED_STEP_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Pause a running run, resume a paused one, or start a new run when idle.
    TogglePause,
    Reset,
    /// Shorter step delay.
    Faster,
    /// Longer step delay.
    Slower,
    Quit,
}

/// Map a terminal key event to a playback command.
pub fn map_key(event: KeyEvent) -> Option<KeyCommand> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(KeyCommand::Quit),
            _ => None,
        };
    }
    match event.code {
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(KeyCommand::TogglePause),
        KeyCode::Char('r') => Some(KeyCommand::Reset),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(KeyCommand::Faster),
        KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => Some(KeyCommand::Slower),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyCommand::Quit),
        _ => None,
    }
}

/// New step delay after `command`, before clamping to the configured range.
pub fn adjust_speed(speed_ms: u64, command: KeyCommand) -> u64 {
    match command {
        KeyCommand::Faster => speed_ms.saturating_sub(SPEED_STEP_MS),
        KeyCommand::Slower => speed_ms.saturating_add(SPEED_STEP_MS),
        _ => speed_ms,
    }
}
