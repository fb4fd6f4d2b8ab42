use clap::Args;
use jiff::civil::Date;
use megano_app::domain::{
    items::models::ItemUuid,
    sales::models::{NewSale, SaleUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateSaleArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    name: String,

    /// Sale discount percentage
    #[arg(long)]
    discount: u8,

    /// First day of the sale, e.g. 2026-11-01
    #[arg(long)]
    date_from: Date,

    /// Last day of the sale, inclusive
    #[arg(long)]
    date_to: Date,

    /// Item on sale; repeat for several items
    #[arg(long = "item-uuid", required = true)]
    items: Vec<ItemUuid>,
}

pub(crate) async fn run(args: CreateSaleArgs) -> Result<(), String> {
    let app = super::super::connect(&args.database_url).await?;

    let sale = app
        .sales
        .create_sale(NewSale {
            uuid: SaleUuid::new(),
            name: args.name,
            discount: args.discount,
            date_from: args.date_from,
            date_to: args.date_to,
            items: args.items,
        })
        .await
        .map_err(|error| format!("failed to create sale: {error}"))?;

    println!("sale_uuid: {}", sale.uuid);

    Ok(())
}
