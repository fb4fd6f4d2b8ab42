use clap::Args;
use megano_app::domain::categories::models::{CategoryUuid, NewCategory};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateCategoryArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    title: String,

    /// Parent category; omit for a root category
    #[arg(long)]
    parent_uuid: Option<Uuid>,

    #[arg(long)]
    image_src: Option<String>,
}

pub(crate) async fn run(args: CreateCategoryArgs) -> Result<(), String> {
    let app = super::super::connect(&args.database_url).await?;

    let category = app
        .categories
        .create_category(NewCategory {
            uuid: CategoryUuid::new(),
            parent_uuid: args.parent_uuid.map(CategoryUuid::from_uuid),
            title: args.title,
            image_src: args.image_src,
        })
        .await
        .map_err(|error| format!("failed to create category: {error}"))?;

    println!("category_uuid: {}", category.uuid);

    Ok(())
}
