use fixchain_core::errors::{ExError, ExErrorKind, FixchainError};

#[test]
fn test_no_rows_found_maps_to_own_kind() {
    let err = FixchainError::NoRowsFound {
        sql: "SELECT full_name FROM actors WHERE id = '0'".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NoRowsFound);
    assert_eq!(ex_err.code(), "ERR_NO_ROWS_FOUND");
    assert_eq!(ex_err.row_count(), Some(0));
    assert_eq!(
        ex_err.sql(),
        Some("SELECT full_name FROM actors WHERE id = '0'")
    );
}

#[test]
fn test_multiple_rows_distinct_from_no_rows() {
    let err = FixchainError::MultipleRowsFound {
        sql: "SELECT * FROM genres".to_string(),
        count: 20,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MultipleRowsFound);
    assert_ne!(ex_err.kind(), ExErrorKind::NoRowsFound);
    assert_eq!(ex_err.row_count(), Some(20));
    assert!(ex_err.to_string().contains("(rows: 20)"));
}

#[test]
fn test_invalid_label_is_invalid_input() {
    let err = FixchainError::InvalidLabel {
        label: "../etc".to_string(),
        reason: "character '/' is not allowed".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(ex_err.label(), Some("../etc"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::SnapshotNotFound, "ERR_SNAPSHOT_NOT_FOUND"),
        (ExErrorKind::CopyFailed, "ERR_COPY_FAILED"),
        (ExErrorKind::OpenFailed, "ERR_OPEN_FAILED"),
        (ExErrorKind::SnapshotInUse, "ERR_SNAPSHOT_IN_USE"),
        (ExErrorKind::ExecutionError, "ERR_EXECUTION"),
        (ExErrorKind::NoRowsFound, "ERR_NO_ROWS_FOUND"),
        (ExErrorKind::MultipleRowsFound, "ERR_MULTIPLE_ROWS_FOUND"),
        (ExErrorKind::InvalidPlan, "ERR_INVALID_PLAN"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_plan_and_config_errors_convert() {
    let plan: ExError = FixchainError::InvalidPlan {
        reason: "duplicate label 03".to_string(),
    }
    .into();
    assert_eq!(plan.kind(), ExErrorKind::InvalidPlan);
    assert_eq!(plan.message(), "duplicate label 03");

    let config: ExError = FixchainError::Config {
        message: "bad toml".to_string(),
    }
    .into();
    assert_eq!(config.kind(), ExErrorKind::Config);
}

#[test]
fn test_builder_context_round_trips() {
    let err = ExError::new(ExErrorKind::CopyFailed)
        .with_op("fork_snapshot")
        .with_label("07")
        .with_path("/tmp/snapshots/07.db")
        .with_message("No space left on device");

    assert_eq!(err.op(), Some("fork_snapshot"));
    assert_eq!(err.label(), Some("07"));
    assert_eq!(
        err.path().map(|p| p.to_string_lossy().into_owned()),
        Some("/tmp/snapshots/07.db".to_string())
    );
    assert_eq!(err.message(), "No space left on device");
}
