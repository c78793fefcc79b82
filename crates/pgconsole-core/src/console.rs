//! Console (C6): per-connection state, up to [`MAX_CONSOLES`] at once.
//!
//! A console owns one server connection, one active view, and one
//! [`SortState`] per view (so switching views remembers where each view
//! was last sorted). Grounded in `original_source/pgcenter.c`'s
//! `screens[]` array: up to eight consoles are addressed by number key,
//! each independently connected and independently scrolled/sorted.

use crate::table::ResultTable;
use crate::view::ViewId;

/// Maximum number of consoles addressable by a single digit key (1-8).
pub const MAX_CONSOLES: usize = 8;

/// Connection parameters for one console, mirroring libpq's keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub dbname: String,
    pub password: Option<String>,
}

impl Default for ConnParams {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: whoami(),
            dbname: whoami(),
            password: None,
        }
    }
}

impl ConnParams {
    /// Builds a libpq key=value connection string. Values are quoted and
    /// internal `\` and `'` escaped per libpq's conninfo grammar.
    pub fn build_connection_string(&self) -> String {
        let mut s = String::new();
        push_kv(&mut s, "host", &self.host);
        push_kv(&mut s, "port", &self.port.to_string());
        push_kv(&mut s, "user", &self.user);
        push_kv(&mut s, "dbname", &self.dbname);
        if let Some(pw) = &self.password {
            push_kv(&mut s, "password", pw);
        }
        s
    }
}

fn push_kv(s: &mut String, key: &str, value: &str) {
    if !s.is_empty() {
        s.push(' ');
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    s.push_str(key);
    s.push_str("='");
    s.push_str(&escaped);
    s.push('\'');
}

fn whoami() -> String {
    std::env::var("USER").unwrap_or_else(|_| "postgres".to_string())
}

/// A view's remembered sort column and direction, per spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub order_key: i32,
    pub order_desc: bool,
}

/// Default min-age filter applied to the long-activity view, matching
/// the original source's default threshold.
pub const DEFAULT_MIN_AGE: &str = "00:00:00";

/// Per-console state: which view is showing, how each view is sorted,
/// and the previous tick's table for diffing.
#[derive(Debug, Clone)]
pub struct Console {
    pub id: usize,
    pub conn_used: bool,
    pub conn: ConnParams,
    pub current_view: ViewId,
    sorts: [SortState; MAX_CONSOLES],
    pub min_age: String,
    pub previous_table: Option<ResultTable>,
    pub previous_row_count: usize,
    pub first_iter: bool,
}

impl Console {
    pub fn new(id: usize) -> Self {
        let sorts = ViewId::ALL.map(|view| SortState {
            order_key: view.spec().default_sort_key(),
            order_desc: true,
        });
        Self {
            id,
            conn_used: false,
            conn: ConnParams::default(),
            current_view: ViewId::Databases,
            sorts,
            min_age: DEFAULT_MIN_AGE.to_string(),
            previous_table: None,
            previous_row_count: 0,
            first_iter: true,
        }
    }

    pub fn sort_state(&self, view: ViewId) -> &SortState {
        &self.sorts[view as usize]
    }

    fn sort_state_mut(&mut self, view: ViewId) -> &mut SortState {
        &mut self.sorts[view as usize]
    }

    /// Switches the active view. Does not reset the view's remembered
    /// sort state or the diff baseline — those are keyed per view and
    /// per console respectively, and a fresh query after a view switch
    /// naturally becomes the new first_iter baseline once the Snapshot
    /// Aligner sees it has no matching previous table for this view.
    pub fn set_view(&mut self, view: ViewId) {
        if self.current_view != view {
            self.current_view = view;
            self.previous_table = None;
            self.first_iter = true;
        }
    }

    /// Moves the sort column right (`increment = true`) or left within
    /// the active view's sort range, wrapping around at the ends
    /// (spec.md §8 S1: sort wraparound).
    pub fn advance_sort(&mut self, increment: bool) {
        let spec = self.current_view.spec();
        if !spec.is_sortable() {
            return;
        }
        let state = self.sort_state_mut(self.current_view);
        let span = spec.sort_max - spec.sort_min + 1;
        let offset = state.order_key - spec.sort_min;
        let next_offset = if increment {
            (offset + 1).rem_euclid(span)
        } else {
            (offset - 1).rem_euclid(span)
        };
        state.order_key = spec.sort_min + next_offset;
    }

    /// Reverses the active view's sort direction.
    pub fn toggle_sort_direction(&mut self) {
        let view = self.current_view;
        self.sort_state_mut(view).order_desc = !self.sort_state_mut(view).order_desc;
    }

    /// Validates and sets the long-activity min-age filter. Accepts
    /// `H:M:S` (any digit width, hour ≤ 23, minute/second ≤ 59), with
    /// an optional fractional suffix on the seconds field. An empty
    /// value leaves the current filter untouched and is not an error.
    pub fn set_min_age(&mut self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Ok(());
        }
        if !is_valid_min_age(value) {
            return Err(format!("invalid age filter: {value}"));
        }
        self.min_age = value.to_string();
        Ok(())
    }

    /// Records a fresh tick's table as the diff baseline and clears the
    /// first_iter flag, to be called by the Refresh Engine after a
    /// successful tick.
    pub fn commit_tick(&mut self, table: ResultTable) {
        self.previous_row_count = table.n_rows();
        self.previous_table = Some(table);
        self.first_iter = false;
    }
}

/// Mirrors `sscanf(min_age, "%u:%u:%u", &hour, &min, &sec)` followed by
/// `hour > 23 || min > 59 || sec > 59`: digit fields aren't fixed-width,
/// and a trailing non-digit suffix on the last field (e.g. `.99`) is
/// simply left unconsumed rather than rejected.
fn is_valid_min_age(value: &str) -> bool {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 {
        return false;
    }

    let is_digits = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    if !is_digits(parts[0]) || !is_digits(parts[1]) {
        return false;
    }
    let Some(sec_digits) = seconds_prefix(parts[2]) else {
        return false;
    };

    let hour: u32 = match parts[0].parse() {
        Ok(h) => h,
        Err(_) => return false,
    };
    let min: u32 = match parts[1].parse() {
        Ok(m) => m,
        Err(_) => return false,
    };
    let sec: u32 = match sec_digits.parse() {
        Ok(s) => s,
        Err(_) => return false,
    };

    hour <= 23 && min <= 59 && sec <= 59
}

/// Returns the leading digit run of a seconds field, accepting it only
/// when the remainder is empty or a `.digits` fractional suffix.
fn seconds_prefix(field: &str) -> Option<&str> {
    let digit_len = field.chars().take_while(|c| c.is_ascii_digit()).count();
    if digit_len == 0 {
        return None;
    }
    let (digits, rest) = field.split_at(digit_len);
    let rest_ok = rest.is_empty()
        || (rest.len() > 1 && rest.starts_with('.') && rest[1..].chars().all(|c| c.is_ascii_digit()));
    rest_ok.then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_console_defaults_to_databases_view_with_sort_min() {
        let c = Console::new(0);
        assert_eq!(c.current_view, ViewId::Databases);
        assert_eq!(c.sort_state(ViewId::Databases).order_key, 2);
        assert!(c.first_iter);
    }

    #[test]
    fn advance_sort_wraps_around_at_range_ends() {
        let mut c = Console::new(0);
        c.set_view(ViewId::Databases); // sort_min=2, sort_max=6
        for _ in 0..4 {
            c.advance_sort(true);
        }
        assert_eq!(c.sort_state(ViewId::Databases).order_key, 6);
        c.advance_sort(true);
        assert_eq!(c.sort_state(ViewId::Databases).order_key, 2);
    }

    #[test]
    fn advance_sort_backward_wraps_too() {
        let mut c = Console::new(0);
        c.set_view(ViewId::Databases);
        c.advance_sort(false);
        assert_eq!(c.sort_state(ViewId::Databases).order_key, 6);
    }

    #[test]
    fn advance_sort_is_noop_for_unsortable_view() {
        let mut c = Console::new(0);
        c.set_view(ViewId::LongActivity);
        c.advance_sort(true);
        assert_eq!(c.sort_state(ViewId::LongActivity).order_key, -1);
    }

    #[test]
    fn sort_state_is_remembered_per_view_across_switches() {
        let mut c = Console::new(0);
        c.set_view(ViewId::Databases);
        c.advance_sort(true);
        c.advance_sort(true);
        let databases_key = c.sort_state(ViewId::Databases).order_key;

        c.set_view(ViewId::UserTables);
        assert_eq!(
            c.sort_state(ViewId::UserTables).order_key,
            ViewId::UserTables.spec().sort_min
        );

        c.set_view(ViewId::Databases);
        assert_eq!(c.sort_state(ViewId::Databases).order_key, databases_key);
    }

    #[test]
    fn set_view_resets_diff_baseline() {
        let mut c = Console::new(0);
        c.commit_tick(ResultTable::new(vec!["a".into()], vec![vec!["1".into()]]));
        assert!(!c.first_iter);
        c.set_view(ViewId::UserTables);
        assert!(c.first_iter);
        assert!(c.previous_table.is_none());
    }

    #[test]
    fn set_view_to_same_view_keeps_baseline() {
        let mut c = Console::new(0);
        c.commit_tick(ResultTable::new(vec!["a".into()], vec![vec!["1".into()]]));
        c.set_view(ViewId::Databases);
        assert!(!c.first_iter);
        assert!(c.previous_table.is_some());
    }

    #[test]
    fn set_min_age_accepts_well_formed_duration() {
        let mut c = Console::new(0);
        assert!(c.set_min_age("00:05:30").is_ok());
        assert_eq!(c.min_age, "00:05:30");
    }

    #[test]
    fn set_min_age_accepts_boundary_and_fractional_values() {
        let mut c = Console::new(0);
        assert!(c.set_min_age("00:00:00").is_ok());
        assert!(c.set_min_age("23:59:59").is_ok());
        assert!(c.set_min_age("01:02:03.99").is_ok());
        assert_eq!(c.min_age, "01:02:03.99");
    }

    #[test]
    fn set_min_age_rejects_malformed_input() {
        let mut c = Console::new(0);
        let before = c.min_age.clone();
        assert!(c.set_min_age("5 minutes").is_err());
        assert!(c.set_min_age("00:60:00").is_err());
        assert!(c.set_min_age("24:00:00").is_err());
        assert!(c.set_min_age("abc").is_err());
        assert_eq!(c.min_age, before);
    }

    #[test]
    fn set_min_age_empty_value_keeps_old_value_without_error() {
        let mut c = Console::new(0);
        c.set_min_age("00:05:30").unwrap();
        assert!(c.set_min_age("").is_ok());
        assert_eq!(c.min_age, "00:05:30");
    }

    #[test]
    fn connection_string_quotes_and_escapes_values() {
        let conn = ConnParams {
            host: "db.internal".to_string(),
            port: 5433,
            user: "o'brien".to_string(),
            dbname: "app".to_string(),
            password: Some("a\\b".to_string()),
        };
        let s = conn.build_connection_string();
        assert!(s.contains("host='db.internal'"));
        assert!(s.contains("port='5433'"));
        assert!(s.contains("user='o\\'brien'"));
        assert!(s.contains("password='a\\\\b'"));
    }

    #[test]
    fn connection_string_omits_password_when_absent() {
        let conn = ConnParams::default();
        assert!(!conn.build_connection_string().contains("password"));
    }
}
