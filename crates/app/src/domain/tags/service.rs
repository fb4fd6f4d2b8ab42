//! Tags service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::tags::{PgTagsRepository, errors::TagsServiceError, records::Tag},
};

#[derive(Debug, Clone)]
pub struct PgTagsService {
    db: Db,
    repository: PgTagsRepository,
}

impl PgTagsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTagsRepository::new(),
        }
    }
}

#[async_trait]
impl TagsService for PgTagsService {
    async fn list_tags(&self) -> Result<Vec<Tag>, TagsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let tags = self.repository.list_tags(&mut tx).await?;

        tx.commit().await?;

        Ok(tags)
    }
}

#[automock]
#[async_trait]
pub trait TagsService: Send + Sync {
    /// Every tag, ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, TagsServiceError>;
}
