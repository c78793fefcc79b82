//! Maps `crossterm` key events onto dispatcher commands, per spec.md
//! §4.8's key table plus the quit/help supplement.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use pgconsole_core::dispatch::{Command, EditStep};

/// What the app loop should do in response to one key event.
pub enum AppAction {
    Dispatch(Command),
    Quit,
    ToggleHelp,
    Noop,
}

/// Maps a key event. `editing_min_age` routes keys through the line-edit
/// subprotocol (ESC/Enter/Backspace/append) instead of the normal
/// command table while the `m` editor is open.
pub fn map_key(key: KeyEvent, editing_min_age: bool) -> AppAction {
    if editing_min_age {
        return match key.code {
            KeyCode::Esc => AppAction::Dispatch(Command::EditMinAge(EditStep::Abort)),
            KeyCode::Enter => AppAction::Dispatch(Command::EditMinAge(EditStep::Commit)),
            KeyCode::Backspace | KeyCode::Delete => {
                AppAction::Dispatch(Command::EditMinAge(EditStep::Backspace))
            }
            KeyCode::Char(c) => AppAction::Dispatch(Command::EditMinAge(EditStep::Append(c))),
            _ => AppAction::Noop,
        };
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => AppAction::Quit,
        KeyCode::Char('q') => AppAction::Quit,
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => AppAction::ToggleHelp,
        KeyCode::Right => AppAction::Dispatch(Command::SortNext),
        KeyCode::Left => AppAction::Dispatch(Command::SortPrev),
        KeyCode::Char('m') => AppAction::Dispatch(Command::StartEditMinAge),
        KeyCode::Char(c) => AppAction::Dispatch(pgconsole_core::dispatch::command_for_key(c)),
        _ => AppAction::Noop,
    }
}
