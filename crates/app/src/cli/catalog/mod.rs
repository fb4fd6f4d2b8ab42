//! Catalog seeding commands.

use clap::{Args, Subcommand};

mod category;
mod item;
mod sale;

#[derive(Debug, Args)]
pub(crate) struct CategoryCommand {
    #[command(subcommand)]
    command: CategorySubcommand,
}

#[derive(Debug, Subcommand)]
enum CategorySubcommand {
    /// Create a catalog category
    Create(category::CreateCategoryArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ItemCommand {
    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Debug, Subcommand)]
enum ItemSubcommand {
    /// Create a catalog item
    Create(item::CreateItemArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SaleCommand {
    #[command(subcommand)]
    command: SaleSubcommand,
}

#[derive(Debug, Subcommand)]
enum SaleSubcommand {
    /// Create a sale covering one or more items
    Create(sale::CreateSaleArgs),
}

pub(crate) async fn run_category(command: CategoryCommand) -> Result<(), String> {
    match command.command {
        CategorySubcommand::Create(args) => category::run(args).await,
    }
}

pub(crate) async fn run_item(command: ItemCommand) -> Result<(), String> {
    match command.command {
        ItemSubcommand::Create(args) => item::run(args).await,
    }
}

pub(crate) async fn run_sale(command: SaleCommand) -> Result<(), String> {
    match command.command {
        SaleSubcommand::Create(args) => sale::run(args).await,
    }
}
