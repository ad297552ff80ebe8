use super::{parse_label, CommandResult};
use clap::Args;
use fixchain_engine::SnapshotManager;

#[derive(Debug, Args)]
pub struct ForkArgs {
    /// Label of the new snapshot
    #[arg(long)]
    pub to: String,

    /// Parent label; omitted means provision from the seed
    #[arg(long)]
    pub from: Option<String>,
}

pub async fn execute(manager: &SnapshotManager, args: ForkArgs) -> CommandResult {
    let label = parse_label(&args.to)?;
    let parent = args.from.as_deref().map(parse_label).transpose()?;

    let db = manager.open_from_existing(parent.as_ref(), &label).await?;
    db.close().await?;

    match &parent {
        Some(p) => println!("Forked {} -> {} ({})", p, label, db.path().display()),
        None => println!("Seeded {} ({})", label, db.path().display()),
    }
    Ok(())
}
