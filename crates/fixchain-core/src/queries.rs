//! Statement builders
//!
//! Compose statement text from dynamic values. Values go through
//! [`escape`](crate::escape::escape_value) and names through
//! [`quote_identifier`](crate::escape::quote_identifier); the resulting text
//! is passed to `execute`/`select_*` like any other statement.

use crate::errors::{FixchainError, Result};
use crate::escape::{escape_value, quote_identifier};
use crate::value::SqlValue;

/// `SELECT * FROM <table> WHERE id = <id>`
pub fn select_by_id(table: &str, id: impl Into<SqlValue>) -> Result<String> {
    Ok(format!(
        "SELECT * FROM {} WHERE id = {}",
        quote_identifier(table)?,
        escape_value(&id.into())
    ))
}

/// `INSERT INTO <table> (<columns>) VALUES (<values>)`
pub fn insert_row(table: &str, columns: &[(&str, SqlValue)]) -> Result<String> {
    if columns.is_empty() {
        return Err(FixchainError::EmptyColumnList {
            table: table.to_string(),
        });
    }

    let names = columns
        .iter()
        .map(|(name, _)| quote_identifier(name))
        .collect::<Result<Vec<_>>>()?;
    let values = columns
        .iter()
        .map(|(_, value)| escape_value(value))
        .collect::<Vec<_>>();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table)?,
        names.join(", "),
        values.join(", ")
    ))
}

/// `UPDATE <table> SET <assignments> WHERE id = <id>`
pub fn update_by_id(
    table: &str,
    assignments: &[(&str, SqlValue)],
    id: impl Into<SqlValue>,
) -> Result<String> {
    if assignments.is_empty() {
        return Err(FixchainError::EmptyColumnList {
            table: table.to_string(),
        });
    }

    let sets = assignments
        .iter()
        .map(|(name, value)| Ok(format!("{} = {}", quote_identifier(name)?, escape_value(value))))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "UPDATE {} SET {} WHERE id = {}",
        quote_identifier(table)?,
        sets.join(", "),
        escape_value(&id.into())
    ))
}
