use fixchain_core::errors::{ExError, ExErrorKind};
use fixchain_store::Result;

/// Run a synchronous engine call on the blocking pool and wait for it
pub(crate) async fn run_blocking<T, F>(op: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op(op)
            .with_message(format!("engine task did not complete: {}", e))
    })?
}
