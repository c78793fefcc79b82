//! Snapshot Aligner (C4): decides how a console's new table relates to
//! its previous one before a diff can be taken.
//!
//! Matches the source's behavior exactly, including its asymmetry: a
//! rebase happens when the row count *grows* (new rows have no prior
//! counterpart to diff against), but not when it *shrinks* (a row
//! vanishing — e.g. a table dropped, a backend disconnecting — leaves
//! the remaining rows diffed against their real previous values; the
//! decision to not special-case shrink was deliberate, kept for source
//! fidelity rather than "fixed").

use crate::table::ResultTable;

/// What the engine should do with `current` before computing a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// No previous table exists yet; `current` becomes the baseline and
    /// no diff is shown this tick.
    FirstIteration,
    /// Row count grew since the previous tick; `current` becomes the new
    /// baseline and no diff is shown this tick (old rows can't be lined
    /// up against the new, larger set without an identity key per row).
    Rebase,
    /// Row count is unchanged or shrank; diff `current` against
    /// `previous` directly.
    Diff,
}

/// Decides the alignment for a console's tick, given whether this is its
/// first query (`first_iter`) and the previous/current row counts.
pub fn align(first_iter: bool, previous_row_count: usize, current: &ResultTable) -> Alignment {
    if first_iter {
        return Alignment::FirstIteration;
    }
    if current.n_rows() > previous_row_count {
        return Alignment::Rebase;
    }
    Alignment::Diff
}
