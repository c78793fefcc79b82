//! The View Catalog (C1): a read-only registry of the eight statistics
//! views, their query templates, and the column ranges eligible for
//! client-side sorting and rate-of-change display.

/// One named presentation of server statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Databases,
    Replication,
    UserTables,
    UserIndexes,
    StatioUserTables,
    TableSizes,
    LongActivity,
    UserFunctions,
}

impl ViewId {
    pub const ALL: [ViewId; 8] = [
        ViewId::Databases,
        ViewId::Replication,
        ViewId::UserTables,
        ViewId::UserIndexes,
        ViewId::StatioUserTables,
        ViewId::TableSizes,
        ViewId::LongActivity,
        ViewId::UserFunctions,
    ];

    /// Human-readable label used on status-line "Show ..." messages.
    pub fn label(self) -> &'static str {
        match self {
            ViewId::Databases => "pg_stat_database",
            ViewId::Replication => "pg_stat_replication",
            ViewId::UserTables => "pg_stat_user_tables",
            ViewId::UserIndexes => "pg_stat_user_indexes",
            ViewId::StatioUserTables => "pg_statio_user_tables",
            ViewId::TableSizes => "table sizes",
            ViewId::LongActivity => "pg_stat_activity",
            ViewId::UserFunctions => "pg_stat_user_functions",
        }
    }

    pub fn spec(self) -> &'static ViewSpec {
        &CATALOG[self as usize]
    }
}

/// Static per-view configuration. `sort_min == sort_max == -1` marks an
/// unsortable view (client-side); `diff_min > diff_max` marks an empty
/// diff range (cells always pass through verbatim).
#[derive(Debug, Clone, Copy)]
pub struct ViewSpec {
    pub id: ViewId,
    pub query_template: &'static str,
    pub column_names: &'static [&'static str],
    pub sort_min: i32,
    pub sort_max: i32,
    pub diff_min: i32,
    pub diff_max: i32,
    pub server_side_sort: bool,
}

impl ViewSpec {
    /// Default sort column: `sort_min` per spec.md §3 (SortState invariant).
    pub fn default_sort_key(&self) -> i32 {
        self.sort_min
    }

    pub fn is_sortable(&self) -> bool {
        self.sort_min >= 0 && self.sort_max >= self.sort_min
    }

    pub fn has_diff_range(&self) -> bool {
        self.diff_min >= 0 && self.diff_max >= self.diff_min
    }
}

const DATABASES_QUERY: &str = r#"
    SELECT
        datid::bigint,
        datname,
        xact_commit,
        xact_rollback,
        blks_read,
        blks_hit,
        tup_returned
    FROM pg_stat_database
    WHERE datname IS NOT NULL
"#;

const REPLICATION_QUERY: &str = r#"
    SELECT
        pid::bigint,
        usename,
        COALESCE(application_name, ''),
        COALESCE(client_addr::text, ''),
        state,
        sent_lsn::text,
        write_lsn::text,
        flush_lsn::text,
        replay_lsn::text,
        COALESCE(pg_wal_lsn_diff(sent_lsn, replay_lsn), 0)
    FROM pg_stat_replication
"#;

const USER_TABLES_QUERY: &str = r#"
    SELECT
        relid::bigint,
        schemaname,
        relname,
        seq_scan,
        idx_scan,
        n_tup_ins,
        n_tup_upd,
        n_tup_del,
        n_live_tup,
        n_dead_tup
    FROM pg_stat_user_tables
"#;

const USER_INDEXES_QUERY: &str = r#"
    SELECT
        indexrelid::bigint,
        schemaname,
        relname,
        indexrelname,
        idx_scan,
        idx_tup_read,
        idx_tup_fetch
    FROM pg_stat_user_indexes
"#;

const STATIO_USER_TABLES_QUERY: &str = r#"
    SELECT
        relid::bigint,
        schemaname,
        relname,
        heap_blks_read,
        heap_blks_hit,
        idx_blks_read,
        idx_blks_hit
    FROM pg_statio_user_tables
"#;

const TABLE_SIZES_QUERY: &str = r#"
    SELECT
        c.oid::bigint,
        n.nspname,
        c.relname,
        pg_relation_size(c.oid),
        pg_total_relation_size(c.oid)
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE c.relkind IN ('r', 'm')
      AND n.nspname NOT IN ('pg_catalog', 'information_schema')
"#;

/// Carries two `{0}` placeholders: one for the `WHERE` clause, one for
/// display in the header. Both are substituted with `min_age` (C2).
const LONG_ACTIVITY_QUERY: &str = r#"
    SELECT
        pid::bigint,
        usename,
        datname,
        COALESCE(state, ''),
        EXTRACT(EPOCH FROM (now() - xact_start))::bigint,
        COALESCE(wait_event, ''),
        COALESCE(query, '')
    FROM pg_stat_activity
    WHERE state != 'idle'
      AND (now() - xact_start) > '{0}'::interval
      AND (now() - query_start) > '{0}'::interval
"#;

/// Carries one `{0}` placeholder for the 1-based `ORDER BY` column (C2).
const USER_FUNCTIONS_QUERY: &str = r#"
    SELECT
        funcid::bigint,
        schemaname,
        funcname,
        calls,
        calls,
        total_time,
        self_time
    FROM pg_stat_user_functions
    ORDER BY {0}
"#;

pub static CATALOG: [ViewSpec; 8] = [
    ViewSpec {
        id: ViewId::Databases,
        query_template: DATABASES_QUERY,
        column_names: &[
            "datid", "datname", "commits/s", "rollbacks/s", "reads/s", "hits/s", "returned/s",
        ],
        sort_min: 2,
        sort_max: 6,
        diff_min: 2,
        diff_max: 6,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::Replication,
        query_template: REPLICATION_QUERY,
        column_names: &[
            "pid",
            "usename",
            "application_name",
            "client_addr",
            "state",
            "sent_lsn",
            "write_lsn",
            "flush_lsn",
            "replay_lsn",
            "lag_bytes",
        ],
        sort_min: 9,
        sort_max: 9,
        diff_min: 1,
        diff_max: 0,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::UserTables,
        query_template: USER_TABLES_QUERY,
        column_names: &[
            "relid",
            "schema",
            "table",
            "seq_scan/s",
            "idx_scan/s",
            "ins/s",
            "upd/s",
            "del/s",
            "live_tup",
            "dead_tup",
        ],
        sort_min: 3,
        sort_max: 9,
        diff_min: 3,
        diff_max: 9,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::UserIndexes,
        query_template: USER_INDEXES_QUERY,
        column_names: &[
            "indexrelid",
            "schema",
            "table",
            "index",
            "idx_scan/s",
            "tup_read/s",
            "tup_fetch/s",
        ],
        sort_min: 4,
        sort_max: 6,
        diff_min: 4,
        diff_max: 6,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::StatioUserTables,
        query_template: STATIO_USER_TABLES_QUERY,
        column_names: &[
            "relid",
            "schema",
            "table",
            "heap_read/s",
            "heap_hit/s",
            "idx_read/s",
            "idx_hit/s",
        ],
        sort_min: 3,
        sort_max: 6,
        diff_min: 3,
        diff_max: 6,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::TableSizes,
        query_template: TABLE_SIZES_QUERY,
        column_names: &["relid", "schema", "table", "size", "total_size"],
        sort_min: 3,
        sort_max: 4,
        diff_min: 1,
        diff_max: 0,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::LongActivity,
        query_template: LONG_ACTIVITY_QUERY,
        column_names: &[
            "pid", "usename", "datname", "state", "age/s", "wait_event", "query",
        ],
        sort_min: -1,
        sort_max: -1,
        diff_min: 1,
        diff_max: 0,
        server_side_sort: false,
    },
    ViewSpec {
        id: ViewId::UserFunctions,
        query_template: USER_FUNCTIONS_QUERY,
        column_names: &[
            "funcid",
            "schema",
            "funcname",
            "calls",
            "calls/s",
            "total_time_ms",
            "self_time_ms",
        ],
        sort_min: 3,
        sort_max: 6,
        diff_min: 4,
        diff_max: 4,
        server_side_sort: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_activity_is_unsortable_client_side() {
        let spec = ViewId::LongActivity.spec();
        assert!(!spec.is_sortable());
        assert_eq!(spec.sort_min, -1);
        assert_eq!(spec.sort_max, -1);
    }

    #[test]
    fn long_activity_has_no_diff_range() {
        assert!(!ViewId::LongActivity.spec().has_diff_range());
    }

    #[test]
    fn user_functions_is_server_side_sorted_with_single_diff_column() {
        let spec = ViewId::UserFunctions.spec();
        assert!(spec.server_side_sort);
        assert_eq!(spec.diff_min, spec.diff_max);
    }

    #[test]
    fn databases_sort_range_spans_five_columns_per_s6() {
        let spec = ViewId::Databases.spec();
        assert_eq!(spec.sort_max - spec.sort_min, 4);
    }

    #[test]
    fn default_sort_key_is_sort_min() {
        for id in ViewId::ALL {
            assert_eq!(id.spec().default_sort_key(), id.spec().sort_min);
        }
    }

    #[test]
    fn column_names_len_matches_query_shape_expectations() {
        for id in ViewId::ALL {
            let spec = id.spec();
            assert!(!spec.column_names.is_empty());
            if spec.is_sortable() {
                assert!(spec.sort_max < spec.column_names.len() as i32);
            }
        }
    }
}
