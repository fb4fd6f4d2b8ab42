use clap::Args;
use megano_app::domain::orders::models::OrderUuid;

#[derive(Debug, Args)]
pub(crate) struct ArchiveOrderArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    order_uuid: OrderUuid,
}

pub(crate) async fn run(args: ArchiveOrderArgs) -> Result<(), String> {
    let app = super::super::connect(&args.database_url).await?;

    let order = app
        .orders
        .archive_order(args.order_uuid)
        .await
        .map_err(|error| format!("failed to archive order: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("status: {}", order.status);

    Ok(())
}
