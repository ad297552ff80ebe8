#![allow(clippy::unwrap_used, clippy::expect_used)]

use fixchain_core::errors::{ExError, ExErrorKind, FixchainError};
use fixchain_core::logging_facility::test_capture::init_test_capture;
use fixchain_core::{log_op_end, log_op_error, log_op_start};
use fixchain_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro_with_label() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, label = "06");

    let start_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1);
    assert_eq!(start_events[0].label.as_deref(), Some("06"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(
        end_events[0].fields.get("duration_ms"),
        Some(&"42".to_string())
    );
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = FixchainError::MultipleRowsFound {
        sql: "SELECT 1 UNION ALL SELECT 2".to_string(),
        count: 2,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let fields = &error_events[0].fields;
    assert_eq!(
        fields.get("err_code"),
        Some(&"ERR_MULTIPLE_ROWS_FOUND".to_string())
    );
    assert_eq!(fields.get("err_kind"), Some(&"MultipleRowsFound".to_string()));
    assert_eq!(error_events[0].level, tracing::Level::ERROR);
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::CopyFailed).with_message("permission denied");
    log_op_error!(op_name, err, duration_ms = 1, label = "08");

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let events = capture.events_for_op(op_name);
    assert_eq!(events[0].label.as_deref(), Some("08"));
    assert_eq!(
        events[0].fields.get("err_message"),
        Some(&"permission denied".to_string())
    );
}

#[test]
fn test_log_op_start_passes_extra_fields_through() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_5";

    log_op_start!(op_name, label = "06", parent_label = "05", step_count = 3u64);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].label.as_deref(), Some("06"));
    assert_eq!(events[0].fields.get("parent_label"), Some(&"05".to_string()));
    assert_eq!(events[0].fields.get("step_count"), Some(&"3".to_string()));
    assert!(events[0].component.is_some());
}

#[test]
fn test_log_op_error_records_label_carried_by_error() {
    let capture = init_test_capture();
    let labelled_op = "test_log_op_error_unique_6";
    let bare_op = "test_log_op_error_unique_7";

    let err = ExError::new(ExErrorKind::OpenFailed).with_label("07");
    log_op_error!(labelled_op, err, duration_ms = 2);
    let err = ExError::new(ExErrorKind::OpenFailed);
    log_op_error!(bare_op, err, duration_ms = 2);

    let events = capture.events_for_op(labelled_op);
    assert_eq!(events[0].fields.get("err_label"), Some(&"07".to_string()));
    let events = capture.events_for_op(bare_op);
    assert_eq!(events[0].fields.get("err_label"), None);
}
