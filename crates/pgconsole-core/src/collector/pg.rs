//! PostgreSQL server interface: a thin synchronous client over the
//! `postgres` crate, matching the Refresh Engine's one-connection-per-console
//! model (spec.md §5: queries are synchronous w.r.t. the main loop).

use postgres::{Client, NoTls};

use crate::console::ConnParams;
use crate::error::DbError;
use crate::table::ResultTable;

/// Minimal surface the Refresh Engine needs from a server connection —
/// lets tests substitute a fake without spinning up real Postgres.
pub trait StatClient {
    fn query_table(&mut self, sql: &str, column_names: &[&str]) -> Result<ResultTable, DbError>;
}

/// A `postgres::Client` wrapped to return [`ResultTable`]s directly.
pub struct PgClient {
    client: Client,
}

impl PgClient {
    /// Connects using `conn`'s parameters over a plain TCP connection
    /// (the teacher does not wire TLS either; see DESIGN.md).
    pub fn connect(conn: &ConnParams) -> Result<Self, DbError> {
        let conninfo = conn.build_connection_string();
        let client =
            Client::connect(&conninfo, NoTls).map_err(|e| DbError::Connect(format_postgres_error(&e)))?;
        Ok(Self { client })
    }
}

impl StatClient for PgClient {
    fn query_table(&mut self, sql: &str, column_names: &[&str]) -> Result<ResultTable, DbError> {
        let rows = self
            .client
            .query(sql, &[])
            .map_err(|e| DbError::Query(format_postgres_error(&e)))?;

        let cells = rows
            .iter()
            .map(|row| {
                (0..column_names.len())
                    .map(|i| stringify_column(row, i))
                    .collect()
            })
            .collect();

        Ok(ResultTable::new(
            column_names.iter().map(|s| s.to_string()).collect(),
            cells,
        ))
    }
}

/// Renders one column of a `postgres::Row` as text, trying progressively
/// looser types until one matches the column's actual Postgres type.
/// `pg_stat_*` views mix bigint, text, double precision, and interval
/// columns, and the driver requires the Rust type to match exactly.
fn stringify_column(row: &postgres::Row, idx: usize) -> String {
    if let Ok(v) = row.try_get::<_, i64>(idx) {
        return v.to_string();
    }
    if let Ok(v) = row.try_get::<_, i32>(idx) {
        return v.to_string();
    }
    if let Ok(v) = row.try_get::<_, f64>(idx) {
        return v.to_string();
    }
    if let Ok(v) = row.try_get::<_, String>(idx) {
        return v;
    }
    if let Ok(Some(v)) = row.try_get::<_, Option<String>>(idx) {
        return v;
    }
    String::new()
}

/// Formats a `postgres::Error` for display, matching the teacher's
/// classification of common connection failures.
pub(crate) fn format_postgres_error(e: &postgres::Error) -> String {
    if let Some(db_error) = e.as_db_error() {
        format!("{}: {}", db_error.severity(), db_error.message())
    } else {
        let msg = e.to_string();
        if msg.contains("Connection refused") {
            "connection refused".to_string()
        } else if msg.contains("password authentication failed") {
            "password authentication failed".to_string()
        } else {
            msg
        }
    }
}
