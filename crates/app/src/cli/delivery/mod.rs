use clap::{Args, Subcommand};

mod set;

#[derive(Debug, Args)]
pub(crate) struct DeliveryCommand {
    #[command(subcommand)]
    command: DeliverySubcommand,
}

#[derive(Debug, Subcommand)]
enum DeliverySubcommand {
    /// Set the fee and free delivery threshold of a delivery type
    Set(set::SetDeliveryArgs),
}

pub(crate) async fn run(command: DeliveryCommand) -> Result<(), String> {
    match command.command {
        DeliverySubcommand::Set(args) => set::run(args).await,
    }
}
