use super::{parse_label, CommandResult};
use clap::Args;
use fixchain_engine::SnapshotManager;

#[derive(Debug, Args)]
pub struct ExecArgs {
    #[arg(long)]
    pub snapshot: String,

    /// Statement text; several `;`-separated statements are allowed
    pub sql: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long)]
    pub snapshot: String,

    /// Require exactly one row and print it as an object
    #[arg(long)]
    pub single: bool,

    pub sql: String,
}

pub async fn execute_exec(manager: &SnapshotManager, args: ExecArgs) -> CommandResult {
    let label = parse_label(&args.snapshot)?;
    let db = manager.open_existing(&label).await?;

    let result = db.execute(args.sql).await;
    db.close().await?;
    result?;

    println!("OK");
    Ok(())
}

pub async fn execute_query(manager: &SnapshotManager, args: QueryArgs) -> CommandResult {
    let label = parse_label(&args.snapshot)?;
    let db = manager.open_existing(&label).await?;

    let json = if args.single {
        db.select_single_row(args.sql).await.map(|row| row.to_json())
    } else {
        db.select_multiple_rows(args.sql)
            .await
            .map(|rows| serde_json::Value::Array(rows.iter().map(|r| r.to_json()).collect()))
    };
    db.close().await?;

    println!("{}", serde_json::to_string_pretty(&json?)?);
    Ok(())
}
