use super::{parse_label, CommandResult};
use clap::Args;
use fixchain_engine::SnapshotManager;

#[derive(Debug, Args)]
pub struct DigestArgs {
    #[arg(long)]
    pub snapshot: String,
}

pub async fn execute(manager: &SnapshotManager, args: DigestArgs) -> CommandResult {
    let label = parse_label(&args.snapshot)?;
    println!("{}", manager.digest(&label).await?);
    Ok(())
}
