//! Refresh Engine (C7): the per-tick pipeline that turns one console's
//! query result into a table ready to render.
//!
//! UI-agnostic: the `pgconsole` binary's main loop calls [`tick`] once
//! per iteration on which no keystroke was pending, then renders
//! whatever [`TickOutcome`] it gets back.

use crate::aligner::{self, Alignment};
use crate::collector::StatClient;
use crate::console::Console;
use crate::error::DbError;
use crate::query::build_query;
use crate::table::ResultTable;
use crate::view::ViewId;

/// What a tick produced, and whether the caller should shorten its next
/// sleep (spec.md §4.7: a "skip" path retries at ~10ms instead of ~1s).
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub table: ResultTable,
    pub skip: bool,
}

/// Runs one Refresh Engine tick against `console`, using `client` as its
/// server connection. Mutates `console`'s baseline/`first_iter` state.
///
/// Ordering matches spec.md §5: the caller is expected to have already
/// sampled the host for this tick before calling (the Engine itself only
/// owns the server side: query → align → diff → sort).
pub fn tick(console: &mut Console, client: &mut dyn StatClient) -> Result<TickOutcome, DbError> {
    let view = console.current_view;
    let spec = view.spec();
    let sql = build_query(console);

    let current = client.query_table(&sql, spec.column_names)?;

    let alignment = aligner::align(console.first_iter, console.previous_row_count, &current);

    let outcome = match alignment {
        Alignment::FirstIteration | Alignment::Rebase => {
            console.commit_tick(current.clone());
            TickOutcome {
                table: current,
                skip: true,
            }
        }
        Alignment::Diff => {
            let previous = console
                .previous_table
                .as_ref()
                .expect("Alignment::Diff implies a previous table exists");
            let mut diffed = current.diff(previous, spec);
            let sort = console.sort_state(view);
            diffed.sort_in_place(sort.order_key, sort.order_desc);
            console.commit_tick(current);
            TickOutcome {
                table: diffed,
                skip: false,
            }
        }
    };

    Ok(outcome)
}

/// Header activity counts summarised from the long-activity view's
/// `state` column, per spec.md §6 ("activity counts" in the header).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub total: usize,
    pub idle: usize,
    pub idle_in_transaction: usize,
    pub active: usize,
    pub waiting: usize,
    pub other: usize,
}

/// Summarises a long-activity [`ResultTable`]'s `state` column (index 3
/// per the catalog's column layout) into [`ActivityCounts`].
pub fn summarize_activity(table: &ResultTable) -> ActivityCounts {
    let mut counts = ActivityCounts::default();
    let state_idx = ViewId::LongActivity
        .spec()
        .column_names
        .iter()
        .position(|c| *c == "state")
        .unwrap_or(3);

    for row in &table.cells {
        counts.total += 1;
        match row.get(state_idx).map(String::as_str) {
            Some("idle") => counts.idle += 1,
            Some("idle in transaction") => counts.idle_in_transaction += 1,
            Some("active") => counts.active += 1,
            Some(s) if s.contains("wait") => counts.waiting += 1,
            _ => counts.other += 1,
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewId;

    struct StubClient {
        responses: Vec<ResultTable>,
    }

    impl StatClient for StubClient {
        fn query_table(&mut self, _sql: &str, _cols: &[&str]) -> Result<ResultTable, DbError> {
            Ok(self.responses.remove(0))
        }
    }

    fn databases_table(rows: &[[&str; 7]]) -> ResultTable {
        ResultTable::new(
            ViewId::Databases
                .spec()
                .column_names
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn first_tick_is_a_skip_with_no_diff() {
        let mut console = Console::new(0);
        let mut client = StubClient {
            responses: vec![databases_table(&[["1", "postgres", "a", "10", "20", "30", "40"]])],
        };
        let outcome = tick(&mut console, &mut client).unwrap();
        assert!(outcome.skip);
        assert!(!console.first_iter);
    }

    #[test]
    fn second_tick_with_same_row_count_diffs_and_sorts() {
        let mut console = Console::new(0);
        let mut client = StubClient {
            responses: vec![
                databases_table(&[
                    ["1", "a", "0", "0", "10", "0", "0"],
                    ["2", "b", "0", "0", "5", "0", "0"],
                ]),
                databases_table(&[
                    ["1", "a", "0", "0", "15", "0", "0"],
                    ["2", "b", "0", "0", "25", "0", "0"],
                ]),
            ],
        };
        tick(&mut console, &mut client).unwrap();
        let outcome = tick(&mut console, &mut client).unwrap();
        assert!(!outcome.skip);
        // default sort column for databases is index 2 ("commits/s"), desc
        assert_eq!(outcome.table.cells[0][0], "2"); // delta 20 > delta 5
        assert_eq!(outcome.table.cells[1][0], "1");
    }

    #[test]
    fn row_growth_triggers_rebase_skip() {
        let mut console = Console::new(0);
        let mut client = StubClient {
            responses: vec![
                databases_table(&[["1", "a", "0", "0", "0", "0", "0"]]),
                databases_table(&[
                    ["1", "a", "0", "0", "0", "0", "0"],
                    ["2", "b", "0", "0", "0", "0", "0"],
                ]),
            ],
        };
        tick(&mut console, &mut client).unwrap();
        let outcome = tick(&mut console, &mut client).unwrap();
        assert!(outcome.skip);
        assert_eq!(console.previous_row_count, 2);
    }

    #[test]
    fn summarize_activity_buckets_known_states() {
        let table = ResultTable::new(
            ViewId::LongActivity
                .spec()
                .column_names
                .iter()
                .map(|s| s.to_string())
                .collect(),
            vec![
                vec!["1".into(), "u".into(), "d".into(), "idle".into(), "0".into(), "".into(), "".into()],
                vec!["2".into(), "u".into(), "d".into(), "active".into(), "0".into(), "".into(), "".into()],
                vec!["3".into(), "u".into(), "d".into(), "idle in transaction".into(), "0".into(), "".into(), "".into()],
                vec!["4".into(), "u".into(), "d".into(), "active".into(), "0".into(), "lock".into(), "".into()],
            ],
        );
        let counts = summarize_activity(&table);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.idle, 1);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.idle_in_transaction, 1);
    }
}
