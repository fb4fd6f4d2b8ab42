//! Items service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        categories::{PgCategoriesRepository, descendants},
        items::{
            PgItemsRepository,
            errors::ItemsServiceError,
            models::{Item, ItemDetail, ItemUuid, MAX_RATE, NewItem, NewReview, Review},
            query::CatalogQuery,
        },
        pricing::MAX_PERCENT,
        sales::models::sale_date,
        tags::PgTagsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgItemsService {
    db: Db,
    repository: PgItemsRepository,
    categories: PgCategoriesRepository,
    tags: PgTagsRepository,
}

impl PgItemsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgItemsRepository::new(),
            categories: PgCategoriesRepository::new(),
            tags: PgTagsRepository::new(),
        }
    }

    /// Fills in the tags and images of each item.
    async fn attach_tags(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &mut [Item],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<ItemUuid> = items.iter().map(|item| item.uuid).collect();
        let mut names = self.tags.list_tag_names_for(tx, &uuids).await?;
        let images = self.repository.list_images(tx, &uuids).await?;

        for item in items.iter_mut() {
            if let Some(tags) = names.remove(&item.uuid) {
                item.tags = tags.into_vec();
            }
        }

        for (owner, image) in images {
            if let Some(item) = items.iter_mut().find(|item| item.uuid == owner) {
                item.images.push(image);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ItemsService for PgItemsService {
    #[tracing::instrument(
        name = "items.service.list_catalog",
        skip(self, query),
        fields(
            sort = ?query.sort,
            direction = ?query.direction,
            category_count = tracing::field::Empty,
            item_count = tracing::field::Empty
        ),
        err
    )]
    async fn list_catalog(
        &self,
        query: CatalogQuery,
        point_in_time: Timestamp,
    ) -> Result<Vec<Item>, ItemsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let scope = match query.category {
            Some(root) => {
                let links = self.categories.list_category_links(&mut tx).await?;
                let scope = descendants(root, links);

                tracing::Span::current().record("category_count", scope.len());

                Some(scope)
            }
            None => None,
        };

        let mut items = self
            .repository
            .list_catalog(&mut tx, &query, scope.as_deref(), sale_date(point_in_time))
            .await?;

        self.attach_tags(&mut tx, &mut items).await?;

        tx.commit().await?;

        tracing::Span::current().record("item_count", items.len());

        Ok(items)
    }

    async fn get_item(
        &self,
        item: ItemUuid,
        point_in_time: Timestamp,
    ) -> Result<ItemDetail, ItemsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let found = self
            .repository
            .get_item(&mut tx, item, sale_date(point_in_time))
            .await?;

        let mut items = [found];

        self.attach_tags(&mut tx, &mut items).await?;

        let specifications = self.repository.list_specifications(&mut tx, item).await?;
        let reviews = self.repository.list_reviews(&mut tx, item).await?;

        tx.commit().await?;

        let [item] = items;

        Ok(ItemDetail {
            item,
            specifications,
            reviews,
        })
    }

    async fn popular_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut items = self
            .repository
            .popular_items(&mut tx, sale_date(point_in_time))
            .await?;

        self.attach_tags(&mut tx, &mut items).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn limited_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut items = self
            .repository
            .limited_items(&mut tx, sale_date(point_in_time))
            .await?;

        self.attach_tags(&mut tx, &mut items).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn banner_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut items = self
            .repository
            .banner_items(&mut tx, sale_date(point_in_time))
            .await?;

        self.attach_tags(&mut tx, &mut items).await?;

        tx.commit().await?;

        Ok(items)
    }

    #[tracing::instrument(
        name = "items.service.create_item",
        skip(self, item),
        fields(
            item_uuid = %item.uuid,
            tag_count = item.tags.len(),
            image_count = item.images.len(),
            specification_count = item.specifications.len()
        ),
        err
    )]
    async fn create_item(&self, item: NewItem) -> Result<Item, ItemsServiceError> {
        if item.discount > MAX_PERCENT || !item.has_valid_attachments() {
            return Err(ItemsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        self.repository.create_item(&mut tx, &item).await?;

        self.tags.replace_tags(&mut tx, item.uuid, &item.tags).await?;

        let created = self
            .repository
            .get_item(&mut tx, item.uuid, sale_date(Timestamp::now()))
            .await?;

        let mut items = [created];

        self.attach_tags(&mut tx, &mut items).await?;

        tx.commit().await?;

        let [created] = items;

        info!(name = %created.name, price = created.price, "created item");

        Ok(created)
    }

    #[tracing::instrument(
        name = "items.service.create_review",
        skip(self, review),
        fields(item_uuid = %review.item_uuid, rate = review.rate),
        err
    )]
    async fn create_review(&self, review: NewReview) -> Result<Review, ItemsServiceError> {
        if review.rate > MAX_RATE {
            return Err(ItemsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_review(&mut tx, &review).await?;

        tx.commit().await?;

        info!(review_uuid = %created.uuid, "created review");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ItemsService: Send + Sync {
    /// Unarchived items matching every filter of `query`, sorted by its key.
    async fn list_catalog(
        &self,
        query: CatalogQuery,
        point_in_time: Timestamp,
    ) -> Result<Vec<Item>, ItemsServiceError>;

    /// Item detail with tags, images, specifications, the running sale discount and reviews.
    async fn get_item(
        &self,
        item: ItemUuid,
        point_in_time: Timestamp,
    ) -> Result<ItemDetail, ItemsServiceError>;

    /// Best rated items above the popularity threshold.
    async fn popular_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError>;

    /// Items that are nearly out of stock.
    async fn limited_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError>;

    /// Unarchived items for the storefront banner, newest first.
    async fn banner_items(&self, point_in_time: Timestamp) -> Result<Vec<Item>, ItemsServiceError>;

    async fn create_item(&self, item: NewItem) -> Result<Item, ItemsServiceError>;

    async fn create_review(&self, review: NewReview) -> Result<Review, ItemsServiceError>;
}
