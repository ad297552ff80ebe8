use super::plan::{ChainPlan, PlanStep};
use crate::manager::SnapshotManager;
use chrono::{DateTime, Utc};
use fixchain_core::errors::ExError;
use fixchain_core::SnapshotLabel;
use fixchain_core::{log_op_end, log_op_error, log_op_start};
use fixchain_core_types::RunId;
use fixchain_store::errors::io_error;
use fixchain_store::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Outcome of one materialized step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub label: SnapshotLabel,
    pub parent: Option<SnapshotLabel>,
    pub path: PathBuf,
    /// Scripts plus inline statements applied
    pub statement_count: usize,
    pub digest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub run_id: RunId,
    pub built_at: DateTime<Utc>,
    pub steps: Vec<StepReport>,
}

impl ChainReport {
    pub fn step(&self, label: &str) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.label.as_str() == label)
    }
}

/// Materialize every step of a plan, in order
///
/// Each step forks from its parent (or the seed), applies its scripts then
/// its statements, and is closed before the next step forks from it.
/// Existing snapshot files are overwritten.
///
/// # Errors
///
/// The first failing step aborts the build. Earlier snapshots stay on disk.
pub async fn build_chain(manager: &SnapshotManager, plan: &ChainPlan) -> Result<ChainReport> {
    plan.validate()?;

    let run_id = RunId::new();
    log_op_start!(
        "build_chain",
        run_id = run_id.as_str(),
        step_count = plan.steps.len()
    );
    let start = Instant::now();

    let mut steps = Vec::with_capacity(plan.steps.len());
    for (index, step) in plan.steps.iter().enumerate() {
        let parent = plan.parent_of(index);
        match build_step(manager, plan, step, parent, &run_id).await {
            Ok(report) => steps.push(report),
            Err(e) => {
                log_op_error!(
                    "build_chain",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = run_id.as_str(),
                    label = step.label.as_str()
                );
                return Err(e);
            }
        }
    }

    log_op_end!(
        "build_chain",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = run_id.as_str()
    );

    Ok(ChainReport {
        run_id,
        built_at: Utc::now(),
        steps,
    })
}

async fn build_step(
    manager: &SnapshotManager,
    plan: &ChainPlan,
    step: &PlanStep,
    parent: Option<&SnapshotLabel>,
    run_id: &RunId,
) -> Result<StepReport> {
    let start = Instant::now();
    let db = manager.open_from_existing(parent, &step.label).await?;

    let mut statement_count = 0;
    let applied = async {
        for script in &step.scripts {
            let path = plan.script_path(script);
            let sql = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| io_error("read_script", e).with_path(&path))?;
            db.execute(sql).await?;
            statement_count += 1;
        }
        for sql in &step.statements {
            db.execute(sql.as_str()).await?;
            statement_count += 1;
        }
        Ok::<(), ExError>(())
    }
    .await;

    // close even when a statement failed, so the lease is released
    let closed = db.close().await;
    applied?;
    closed?;

    let digest = manager.digest(&step.label).await?;
    tracing::info!(
        run_id = run_id.as_str(),
        label = step.label.as_str(),
        parent_label = parent.map(|p| p.as_str()),
        statement_count,
        duration_ms = start.elapsed().as_millis() as u64,
        "chain step built"
    );

    Ok(StepReport {
        label: step.label.clone(),
        parent: parent.cloned(),
        path: db.path().to_path_buf(),
        statement_count,
        digest,
    })
}
