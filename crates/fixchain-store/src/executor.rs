//! Query executor
//!
//! Synchronous statement execution and row retrieval on one connection.
//! Statements run strictly in call order; a call returns only after the
//! engine has stepped every statement to completion.

use crate::errors::{execution_error, Result};
use fixchain_core::errors::{ExError, ExErrorKind};
use fixchain_core::projection;
use fixchain_core::row::Row;
use fixchain_core::value::SqlValue;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::str::Utf8Error;

const LOGGED_SQL_CHARS: usize = 160;

/// Run statement text with no result payload
///
/// The text may hold several `;`-separated statements (DDL, DML, pragmas);
/// they are applied in order and the first failure stops the batch.
pub fn execute(conn: &Connection, sql: &str) -> Result<()> {
    tracing::debug!(sql = %abbreviate(sql), "execute");
    conn.execute_batch(sql)
        .map_err(|e| execution_error("execute", sql, e))
}

/// Run a query and collect every row in engine order
pub fn query_rows(conn: &Connection, sql: &str) -> Result<Vec<Row>> {
    tracing::debug!(sql = %abbreviate(sql), "query");
    let err = |e| execution_error("query", sql, e);

    let mut stmt = conn.prepare(sql).map_err(err)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt.query([]).map_err(err)?;
    let mut out = Vec::new();
    while let Some(r) = rows.next().map_err(err)? {
        let mut row = Row::new();
        for (idx, name) in columns.iter().enumerate() {
            let value = r.get_ref(idx).map_err(err)?;
            let value = to_sql_value(value).map_err(|e| {
                ExError::new(ExErrorKind::ExecutionError)
                    .with_op("query")
                    .with_sql(sql)
                    .with_message(format!("column '{}' holds TEXT that is not valid UTF-8: {}", name, e))
            })?;
            row.push(name.as_str(), value);
        }
        out.push(row);
    }

    tracing::debug!(row_count = out.len(), "query complete");
    Ok(out)
}

/// Query that must yield exactly one row
pub fn select_single_row(conn: &Connection, sql: &str) -> Result<Row> {
    let rows = query_rows(conn, sql)?;
    projection::single_row(rows, sql).map_err(ExError::from)
}

/// Query yielding zero or more rows
pub fn select_multiple_rows(conn: &Connection, sql: &str) -> Result<Vec<Row>> {
    query_rows(conn, sql).map(projection::multiple_rows)
}

/// Convert an engine value without coercion
///
/// # Errors
///
/// TEXT that is not valid UTF-8 has no `SqlValue` form and is rejected
/// rather than repaired.
pub fn to_sql_value(value: ValueRef<'_>) -> std::result::Result<SqlValue, Utf8Error> {
    Ok(match value {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(bytes) => SqlValue::Text(std::str::from_utf8(bytes)?.to_string()),
        ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
    })
}

fn abbreviate(sql: &str) -> String {
    let trimmed = sql.trim();
    if trimmed.chars().count() <= LOGGED_SQL_CHARS {
        return trimmed.to_string();
    }
    let mut s: String = trimmed.chars().take(LOGGED_SQL_CHARS).collect();
    s.push('…');
    s
}
