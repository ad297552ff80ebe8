use super::CommandResult;
use clap::Args;
use fixchain_engine::{build_chain, ChainPlan, SnapshotManager};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Chain plan (TOML)
    #[arg(long)]
    pub plan: PathBuf,
}

pub async fn execute(manager: &SnapshotManager, args: BuildArgs) -> CommandResult {
    let plan = ChainPlan::load(&args.plan)?;
    let report = build_chain(manager, &plan).await?;

    println!("Run {}", report.run_id);
    for step in &report.steps {
        let parent = step
            .parent
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "seed".to_string());
        println!(
            "  {} <- {}  {} statement(s)  {}",
            step.label, parent, step.statement_count, step.digest
        );
    }
    Ok(())
}
