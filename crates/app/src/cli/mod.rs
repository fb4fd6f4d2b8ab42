use clap::{Parser, Subcommand};
use megano_app::{context::AppContext, database};

mod catalog;
mod db;
mod delivery;
mod order;

#[derive(Debug, Parser)]
#[command(name = "megano-app", about = "Megano storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Delivery(delivery::DeliveryCommand),
    Order(order::OrderCommand),
    Category(catalog::CategoryCommand),
    Item(catalog::ItemCommand),
    Sale(catalog::SaleCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Delivery(command) => delivery::run(command).await,
            Commands::Order(command) => order::run(command).await,
            Commands::Category(command) => catalog::run_category(command).await,
            Commands::Item(command) => catalog::run_item(command).await,
            Commands::Sale(command) => catalog::run_sale(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

pub(crate) async fn connect_pool(database_url: &str) -> Result<sqlx::PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
