//! Operation boundary macros
//!
//! A snapshot or chain operation logs one `start` event and then exactly one
//! of `end` or `end_error`. All three carry `component` (the calling module)
//! and `op`; any extra `key = value` fields are passed through to `tracing`.

#[doc(hidden)]
#[macro_export]
macro_rules! __fixchain_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::$event
            $(, $($field)*)?
        )
    };
}

/// Log that a snapshot operation began
///
/// ```
/// # use fixchain_core::log_op_start;
/// log_op_start!("fork_snapshot", label = "06", parent_label = "05");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__fixchain_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log that a snapshot operation finished, with its wall time
///
/// ```
/// # use fixchain_core::log_op_end;
/// log_op_end!("fork_snapshot", duration_ms = 3, label = "06");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__fixchain_op_event!(
            info,
            $op,
            EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log that a snapshot operation failed
///
/// The error may be an [`ExError`](crate::errors::ExError) or anything that
/// converts into one. Its kind, code and message become `err_*` fields, and
/// the label it names (if any) becomes `err_label`.
///
/// ```
/// # use fixchain_core::{log_op_error, errors::FixchainError};
/// let err = FixchainError::NoRowsFound { sql: "SELECT full_name FROM actors WHERE id = '0'".into() };
/// log_op_error!("select_single_row", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__fixchain_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
            err_label = ex_err.label()
            $(, $($field)*)?
        )
    }};
}
