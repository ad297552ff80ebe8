//! Result projection
//!
//! Enforces the row-count contracts on a fully materialized row set:
//! single-row reads fail on anything other than exactly one row, multi-row
//! reads accept any count (including zero) and never reorder.

use crate::errors::{FixchainError, Result};
use crate::row::Row;

/// Return the only row of `rows`
///
/// # Errors
///
/// - `NoRowsFound` if `rows` is empty
/// - `MultipleRowsFound` (with the observed count) if there is more than one
pub fn single_row(rows: Vec<Row>, sql: &str) -> Result<Row> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (Some(row), 1) => Ok(row),
        (None, _) => Err(FixchainError::NoRowsFound {
            sql: sql.to_string(),
        }),
        (Some(_), _) => Err(FixchainError::MultipleRowsFound {
            sql: sql.to_string(),
            count,
        }),
    }
}

/// Return every row in engine order
pub fn multiple_rows(rows: Vec<Row>) -> Vec<Row> {
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    fn row(n: i64) -> Row {
        Row::from_pairs([("n", SqlValue::Integer(n))])
    }

    #[test]
    fn test_single_row_returns_the_row_verbatim() {
        let r = single_row(vec![row(7)], "SELECT 7 AS n").unwrap();
        assert_eq!(r, row(7));
    }

    #[test]
    fn test_single_row_on_empty_is_no_rows_found() {
        let err = single_row(vec![], "SELECT n FROM t WHERE 0").unwrap_err();
        assert_eq!(
            err,
            FixchainError::NoRowsFound {
                sql: "SELECT n FROM t WHERE 0".to_string()
            }
        );
    }

    #[test]
    fn test_single_row_on_duplicates_reports_count() {
        let err = single_row(vec![row(1), row(2), row(3)], "SELECT n FROM t").unwrap_err();
        assert!(matches!(err, FixchainError::MultipleRowsFound { count: 3, .. }));
    }

    #[test]
    fn test_multiple_rows_keeps_order_and_allows_empty() {
        assert!(multiple_rows(vec![]).is_empty());
        assert_eq!(multiple_rows(vec![row(3), row(1)]), vec![row(3), row(1)]);
    }
}
