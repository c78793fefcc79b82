//! Command Dispatcher (C8): turns a single keystroke into a state
//! transition on the active [`Console`]. Pure and UI-agnostic — the
//! `pgconsole` binary's input handler maps `crossterm` key events onto
//! [`Command`] and calls [`dispatch`].

use crate::console::{Console, MAX_CONSOLES};
use crate::view::ViewId;

/// One line-edit step for the `min_age` editor (§4.8: `m` command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStep {
    Append(char),
    Backspace,
    Commit,
    Abort,
}

/// A single dispatchable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectView(ViewId),
    SwitchConsole(usize),
    SortNext,
    SortPrev,
    StartEditMinAge,
    EditMinAge(EditStep),
    Unknown,
}

/// Maps a plain character key to its [`Command`], per the table in
/// spec.md §4.8. Characters not in the table, including digits outside
/// `1..=8`, become [`Command::Unknown`].
pub fn command_for_key(c: char) -> Command {
    match c {
        'd' => Command::SelectView(ViewId::Databases),
        'r' => Command::SelectView(ViewId::Replication),
        't' => Command::SelectView(ViewId::UserTables),
        'i' => Command::SelectView(ViewId::UserIndexes),
        'y' => Command::SelectView(ViewId::StatioUserTables),
        's' => Command::SelectView(ViewId::TableSizes),
        'l' => Command::SelectView(ViewId::LongActivity),
        'f' => Command::SelectView(ViewId::UserFunctions),
        'm' => Command::StartEditMinAge,
        '1'..='8' => {
            let n = c.to_digit(10).expect("1..=8 is ascii digit") as usize;
            Command::SwitchConsole(n - 1)
        }
        _ => Command::Unknown,
    }
}

/// Result of a dispatch, carrying the status-line message to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub message: String,
    /// `true` when a console switch actually changed the active console
    /// (used by the caller to decide which console to sample/query next).
    pub switched_to: Option<usize>,
}

impl DispatchResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            switched_to: None,
        }
    }

    fn switched(console_id: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            switched_to: Some(console_id),
        }
    }
}

/// Applies `cmd` to `console`, returning a status message. `consoles` is
/// the full bank, needed only to validate a console-switch target's
/// `conn_used` flag.
pub fn dispatch(cmd: Command, active: usize, consoles: &mut [Console; MAX_CONSOLES]) -> DispatchResult {
    match cmd {
        Command::SelectView(view) => {
            let label = view.label();
            consoles[active].set_view(view);
            DispatchResult::ok(format!("Show {label}"))
        }
        Command::SwitchConsole(target) => {
            if target == active {
                return DispatchResult::ok(format!("Already on console {}", target + 1));
            }
            if !consoles[target].conn_used {
                return DispatchResult::ok(format!(
                    "Do not switch because no connection associated (stay on console {})",
                    active + 1
                ));
            }
            DispatchResult::switched(target, format!("Switched to console {}", target + 1))
        }
        Command::SortNext => advance_sort(consoles, active, true),
        Command::SortPrev => advance_sort(consoles, active, false),
        Command::StartEditMinAge => {
            if consoles[active].current_view != ViewId::LongActivity {
                DispatchResult::ok("min_age filter only applies to the long-activity view")
            } else {
                DispatchResult::ok("Enter min age (HH:MM:SS), Enter to commit, Esc to cancel")
            }
        }
        Command::EditMinAge(_) => {
            // Stepwise editing is driven by the caller's line-buffer
            // state (see pgconsole's tui::input editor), which calls
            // Console::set_min_age directly on commit.
            DispatchResult::ok("")
        }
        Command::Unknown => DispatchResult::ok("unknown command"),
    }
}

fn advance_sort(
    consoles: &mut [Console; MAX_CONSOLES],
    active: usize,
    increment: bool,
) -> DispatchResult {
    let console = &mut consoles[active];
    let view = console.current_view;
    console.advance_sort(increment);
    // Server-side-sorted views (user-functions) must rebase: the sort
    // happens in the query itself, so the old baseline no longer lines
    // up row-for-row with the new result set.
    if view.spec().server_side_sort {
        console.first_iter = true;
    }
    DispatchResult::ok(format!(
        "Sort by column {}",
        console.sort_state(view).order_key + 1
    ))
}
