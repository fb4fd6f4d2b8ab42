use clap::Args;
use megano_app::domain::{
    categories::models::CategoryUuid,
    items::models::{ItemImage, ItemUuid, NewItem, Specification},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateItemArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Price in minor units
    #[arg(long)]
    price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    count: u32,

    /// Item discount percentage
    #[arg(long, default_value_t = 0)]
    discount: u8,

    #[arg(long)]
    category_uuid: Option<Uuid>,

    #[arg(long)]
    free_delivery: bool,

    /// Hide the item from purchase
    #[arg(long)]
    unavailable: bool,

    /// Tag name; repeat for several tags
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Image path; repeat for several images, in display order
    #[arg(long = "image")]
    images: Vec<String>,

    /// Specification as `NAME=VALUE`; repeat for several rows
    #[arg(long = "spec", value_parser = parse_specification)]
    specifications: Vec<Specification>,
}

fn parse_specification(raw: &str) -> Result<Specification, String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() && !value.trim().is_empty() => Ok(Specification {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        }),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

pub(crate) async fn run(args: CreateItemArgs) -> Result<(), String> {
    let app = super::super::connect(&args.database_url).await?;

    let item = app
        .items
        .create_item(NewItem {
            uuid: ItemUuid::new(),
            category_uuid: args.category_uuid.map(CategoryUuid::from_uuid),
            name: args.name,
            description: args.description,
            price: args.price,
            count: args.count,
            discount: args.discount,
            available: !args.unavailable,
            free_delivery: args.free_delivery,
            tags: args.tags,
            images: args
                .images
                .into_iter()
                .map(|src| ItemImage {
                    src,
                    description: String::new(),
                })
                .collect(),
            specifications: args.specifications,
        })
        .await
        .map_err(|error| format!("failed to create item: {error}"))?;

    println!("item_uuid: {}", item.uuid);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specification_splits_on_first_equals() {
        assert_eq!(
            parse_specification(" Ratio = 16:9=wide "),
            Ok(Specification {
                name: "Ratio".to_string(),
                value: "16:9=wide".to_string(),
            })
        );
    }

    #[test]
    fn specification_without_value_is_rejected() {
        assert!(parse_specification("Colour").is_err());
        assert!(parse_specification("Colour=").is_err());
    }
}
