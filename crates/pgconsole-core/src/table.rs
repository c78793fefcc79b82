//! Result Table (C3): an in-memory rectangular table of text cells.

use crate::view::ViewSpec;

/// A materialised query result: column names plus rows of text cells.
///
/// Invariants (spec.md §3): every row has exactly `column_names.len()`
/// cells; cells inside a view's diff range parse as signed 64-bit
/// integers (parse failure is tolerated at diff time, never here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub column_names: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(column_names: Vec<String>, cells: Vec<Vec<String>>) -> Self {
        debug_assert!(cells.iter().all(|row| row.len() == column_names.len()));
        Self {
            column_names,
            cells,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.cells.len()
    }

    pub fn n_cols(&self) -> usize {
        self.column_names.len()
    }

    /// Computes the first difference between `prev` and `self` (the
    /// current table) over `view`'s diff range. Tables must have
    /// identical shape — callers (the Snapshot Aligner) guarantee this
    /// before calling. Columns outside the diff range are copied from
    /// `self` verbatim; a cell that fails to parse as i64 contributes 0
    /// rather than aborting the whole row (spec.md §4.3, §7).
    pub fn diff(&self, prev: &ResultTable, view: &ViewSpec) -> ResultTable {
        if !view.has_diff_range() {
            return self.clone();
        }

        let cells = self
            .cells
            .iter()
            .zip(prev.cells.iter())
            .map(|(curr_row, prev_row)| {
                curr_row
                    .iter()
                    .enumerate()
                    .map(|(j, curr_cell)| {
                        let idx = j as i32;
                        if idx >= view.diff_min && idx <= view.diff_max {
                            let curr_v = parse_i64_or_zero(curr_cell);
                            let prev_v = parse_i64_or_zero(&prev_row[j]);
                            (curr_v - prev_v).to_string()
                        } else {
                            curr_cell.clone()
                        }
                    })
                    .collect()
            })
            .collect();

        ResultTable::new(self.column_names.clone(), cells)
    }

    /// Sorts rows in place by `order_key`, descending when `desc`. A
    /// negative `order_key` (unsortable view) is a no-op. Comparison is
    /// numeric (signed 64-bit parse of the cell); ties keep their
    /// original relative order via a stable sort, so non-numeric columns
    /// travel with their row atomically.
    pub fn sort_in_place(&mut self, order_key: i32, desc: bool) {
        if order_key < 0 {
            return;
        }
        let idx = order_key as usize;
        if idx >= self.n_cols() {
            return;
        }

        self.cells.sort_by(|a, b| {
            let av = parse_i64_or_zero(&a[idx]);
            let bv = parse_i64_or_zero(&b[idx]);
            if desc { bv.cmp(&av) } else { av.cmp(&bv) }
        });
    }

    /// For each column, the max of header length and max cell length,
    /// plus two characters of padding.
    pub fn column_widths(&self) -> Vec<usize> {
        (0..self.n_cols())
            .map(|j| {
                let header_len = self.column_names[j].len();
                let max_cell = self
                    .cells
                    .iter()
                    .map(|row| row[j].len())
                    .max()
                    .unwrap_or(0);
                header_len.max(max_cell) + 2
            })
            .collect()
    }
}

fn parse_i64_or_zero(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewId;

    fn table(rows: &[[&str; 3]]) -> ResultTable {
        ResultTable::new(
            vec!["id".into(), "name".into(), "count".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn diff_subtracts_only_within_range() {
        let prev = table(&[["1", "a", "10"], ["2", "b", "20"]]);
        let curr = table(&[["1", "a", "15"], ["2", "b", "25"]]);
        let spec = crate::view::ViewSpec {
            id: ViewId::Databases,
            query_template: "",
            column_names: &["id", "name", "count"],
            sort_min: 2,
            sort_max: 2,
            diff_min: 2,
            diff_max: 2,
            server_side_sort: false,
        };
        let d = curr.diff(&prev, &spec);
        assert_eq!(d.cells[0], vec!["1", "a", "5"]);
        assert_eq!(d.cells[1], vec!["2", "b", "5"]);
    }

    #[test]
    fn diff_with_empty_range_equals_current() {
        let prev = table(&[["1", "a", "10"]]);
        let curr = table(&[["1", "a", "15"]]);
        let spec = crate::view::ViewSpec {
            id: ViewId::LongActivity,
            query_template: "",
            column_names: &["id", "name", "count"],
            sort_min: -1,
            sort_max: -1,
            diff_min: 1,
            diff_max: 0,
            server_side_sort: false,
        };
        assert_eq!(curr.diff(&prev, &spec), curr);
    }

    #[test]
    fn diff_parse_failure_yields_zero_not_abort() {
        let prev = table(&[["1", "a", "oops"]]);
        let curr = table(&[["1", "a", "15"]]);
        let spec = crate::view::ViewSpec {
            id: ViewId::Databases,
            query_template: "",
            column_names: &["id", "name", "count"],
            sort_min: 2,
            sort_max: 2,
            diff_min: 2,
            diff_max: 2,
            server_side_sort: false,
        };
        let d = curr.diff(&prev, &spec);
        assert_eq!(d.cells[0][2], "15");
    }

    #[test]
    fn sort_descending_puts_larger_values_first() {
        let mut t = table(&[["1", "a", "5"], ["2", "b", "20"], ["3", "c", "10"]]);
        t.sort_in_place(2, true);
        let counts: Vec<&str> = t.cells.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(counts, vec!["20", "10", "5"]);
    }

    #[test]
    fn sort_ascending_puts_smaller_values_first() {
        let mut t = table(&[["1", "a", "5"], ["2", "b", "20"], ["3", "c", "10"]]);
        t.sort_in_place(2, false);
        let counts: Vec<&str> = t.cells.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(counts, vec!["5", "10", "20"]);
    }

    #[test]
    fn sort_is_noop_when_order_key_negative() {
        let mut t = table(&[["1", "a", "5"], ["2", "b", "20"]]);
        let before = t.clone();
        t.sort_in_place(-1, true);
        assert_eq!(t, before);
    }

    #[test]
    fn sort_moves_whole_rows_atomically() {
        let mut t = table(&[["1", "zz", "1"], ["2", "aa", "2"]]);
        t.sort_in_place(2, true);
        assert_eq!(t.cells[0], vec!["2", "aa", "2"]);
        assert_eq!(t.cells[1], vec!["1", "zz", "1"]);
    }

    #[test]
    fn column_widths_account_for_header_and_cells_plus_padding() {
        let t = table(&[["1", "averylongname", "5"]]);
        let widths = t.column_widths();
        assert_eq!(widths[1], "averylongname".len() + 2);
        assert_eq!(widths[0], "id".len().max(1) + 2);
    }
}
