//! SQL literal escaping
//!
//! Renders a scalar into SQLite literal text for callers that compose
//! statement text themselves. `execute`/`select_*` never escape anything on
//! their own.

use crate::errors::{FixchainError, Result};
use crate::value::SqlValue;

/// Render a value as SQLite literal text
///
/// - text: single-quoted, embedded `'` doubled. NUL characters cannot appear
///   inside a literal, so they are spliced in with `char(0)`
/// - null: `NULL`
/// - integer: decimal digits
/// - real: 17 significant digits in exponent form, so it reads back as the
///   same REAL. Magnitudes outside `1e-290..=1e300` render as an exact
///   product of two such literals. Infinities use SQLite's overflowing
///   `9e999`; NaN has no SQLite representation and renders as `NULL`
/// - blob: `X'<hex>'`
///
/// ```
/// use fixchain_core::escape::escape;
///
/// assert_eq!(escape("Pirates of the Caribbean: At World's End"),
///            "'Pirates of the Caribbean: At World''s End'");
/// assert_eq!(escape(None::<&str>), "NULL");
/// assert_eq!(escape(34), "34");
/// ```
pub fn escape(value: impl Into<SqlValue>) -> String {
    escape_value(&value.into())
}

/// Same as [`escape`], borrowing the value
pub fn escape_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Integer(v) => v.to_string(),
        SqlValue::Real(v) => escape_real(*v),
        SqlValue::Text(v) => escape_text(v),
        SqlValue::Blob(v) => format!("X'{}'", hex::encode_upper(v)),
    }
}

const RESCALE_EXP: i32 = 600;

// Magnitudes SQLite's parser reads back exactly from 17 significant digits.
// Below the minimum the digit-string exponent passes 307 and SQLite scales
// in two rounded steps.
const EXACT_PARSE_MIN: f64 = 1e-290;
const EXACT_PARSE_MAX: f64 = 1e300;

fn escape_real(v: f64) -> String {
    if v.is_nan() {
        "NULL".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "9e999" } else { "-9e999" }.to_string()
    } else if v == 0.0 || (EXACT_PARSE_MIN..=EXACT_PARSE_MAX).contains(&v.abs()) {
        real_literal(v)
    } else {
        // scaling by a power of two is exact, so is the product SQLite computes
        let exp = if v.abs() < EXACT_PARSE_MIN { RESCALE_EXP } else { -RESCALE_EXP };
        let scale = 2f64.powi(exp);
        format!(
            "({} * {})",
            real_literal(v * scale),
            real_literal(2f64.powi(-exp))
        )
    }
}

// 17 significant digits identify every double; the exponent keeps it REAL
fn real_literal(v: f64) -> String {
    format!("{:.16e}", v)
}

fn escape_text(v: &str) -> String {
    if !v.contains('\0') {
        return quote_text(v);
    }
    v.split('\0')
        .map(quote_text)
        .collect::<Vec<_>>()
        .join(" || char(0) || ")
}

fn quote_text(v: &str) -> String {
    format!("'{}'", v.replace('\'', "''"))
}

/// Quote a table or column name with double quotes
///
/// # Errors
///
/// `InvalidIdentifier` for an empty name or one containing NUL.
pub fn quote_identifier(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(FixchainError::InvalidIdentifier {
            identifier: name.to_string(),
            reason: "identifier cannot be empty".to_string(),
        });
    }
    if name.contains('\0') {
        return Err(FixchainError::InvalidIdentifier {
            identifier: name.replace('\0', "\\0"),
            reason: "identifier cannot contain NUL".to_string(),
        });
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(escape("The Warrior's Way"), "'The Warrior''s Way'");
        assert_eq!(escape("''"), "''''''");
        assert_eq!(escape(""), "''");
    }

    #[test]
    fn test_null_and_numbers() {
        assert_eq!(escape(SqlValue::Null), "NULL");
        assert_eq!(escape(-17i64), "-17");
        assert_eq!(escape(425000000.0), "4.2500000000000000e8");
        assert_eq!(escape(0.1), "1.0000000000000001e-1");
        assert_eq!(escape(-2.5), "-2.5000000000000000e0");
    }

    #[test]
    fn test_extreme_reals_render_as_exact_products() {
        let tiny = escape(f64::MIN_POSITIVE / 8.0);
        assert!(tiny.starts_with('(') && tiny.contains(" * "), "{}", tiny);
        let huge = escape(f64::MAX);
        assert!(huge.starts_with('(') && huge.contains(" * "), "{}", huge);
    }

    #[test]
    fn test_non_finite_reals() {
        assert_eq!(escape(f64::INFINITY), "9e999");
        assert_eq!(escape(f64::NEG_INFINITY), "-9e999");
        assert_eq!(escape(f64::NAN), "NULL");
    }

    #[test]
    fn test_blob_is_hex_literal() {
        assert_eq!(escape(vec![0x00u8, 0xab]), "X'00AB'");
    }

    #[test]
    fn test_nul_is_spliced() {
        assert_eq!(escape("a\0b"), "'a' || char(0) || 'b'");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("movies").unwrap(), "\"movies\"");
        assert_eq!(quote_identifier("we\"ird").unwrap(), "\"we\"\"ird\"");
        assert!(quote_identifier("").is_err());
    }

    proptest! {
        #[test]
        fn prop_text_literal_is_balanced(s in "[^\\x00]*") {
            let lit = escape(s.as_str());
            prop_assert!(lit.starts_with('\'') && lit.ends_with('\''));
            let inner = &lit[1..lit.len() - 1];
            // every quote inside the literal comes in a pair
            prop_assert_eq!(inner.replace("''", "").find('\''), None);
            prop_assert_eq!(inner.replace("''", "'"), s);
        }

        #[test]
        fn prop_finite_reals_never_look_like_integers(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let lit = escape(v);
            prop_assert!(lit.contains('e'), "{}", lit);
            if let Ok(parsed) = lit.parse::<f64>() {
                prop_assert_eq!(parsed, v);
            } else {
                let (a, b) = lit
                    .trim_matches(|c| c == '(' || c == ')')
                    .split_once(" * ")
                    .unwrap();
                prop_assert_eq!(a.parse::<f64>().unwrap() * b.parse::<f64>().unwrap(), v);
            }
        }
    }
}
