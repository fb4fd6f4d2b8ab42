use clap::Args;
use megano_app::domain::delivery::models::{DeliverySettingsUpdate, DeliveryType};

#[derive(Debug, Args)]
pub(crate) struct SetDeliveryArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// `ordinary` (alias `standard`) or `express`
    #[arg(long)]
    delivery_type: DeliveryType,

    /// Fee in minor units
    #[arg(long)]
    fee: u64,

    /// Subtotal at which ordinary delivery becomes free; omit to always charge
    #[arg(long)]
    free_threshold: Option<u64>,
}

pub(crate) async fn run(args: SetDeliveryArgs) -> Result<(), String> {
    let app = super::super::connect(&args.database_url).await?;

    let settings = app
        .delivery
        .upsert_settings(DeliverySettingsUpdate {
            delivery_type: args.delivery_type,
            fee: args.fee,
            free_threshold: args.free_threshold,
        })
        .await
        .map_err(|error| format!("failed to update delivery settings: {error}"))?;

    println!("delivery_type: {}", settings.delivery_type);
    println!("fee: {}", settings.fee);
    println!(
        "free_threshold: {}",
        settings
            .free_threshold
            .map_or_else(|| "none".to_string(), |value| value.to_string())
    );

    Ok(())
}
