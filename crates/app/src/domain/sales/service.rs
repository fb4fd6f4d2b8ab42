//! Sales service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        pricing::MAX_PERCENT,
        sales::{
            PgSalesRepository,
            errors::SalesServiceError,
            models::{NewSale, Sale, SaleItem},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgSalesService {
    db: Db,
    repository: PgSalesRepository,
}

impl PgSalesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSalesRepository::new(),
        }
    }
}

#[async_trait]
impl SalesService for PgSalesService {
    async fn list_sales(&self, on: Date) -> Result<Vec<SaleItem>, SalesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let items = self.repository.list_running_sale_items(&mut tx, on).await?;

        tx.commit().await?;

        Ok(items)
    }

    #[tracing::instrument(
        name = "sales.service.create_sale",
        skip(self, sale),
        fields(sale_uuid = %sale.uuid, item_count = sale.items.len()),
        err
    )]
    async fn create_sale(&self, sale: NewSale) -> Result<Sale, SalesServiceError> {
        if sale.discount > MAX_PERCENT || sale.date_from > sale.date_to {
            return Err(SalesServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_sale(&mut tx, &sale).await?;

        tx.commit().await?;

        info!(
            discount = created.discount,
            date_from = %created.date_from,
            date_to = %created.date_to,
            "created sale"
        );

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Items of every sale running on `on`.
    async fn list_sales(&self, on: Date) -> Result<Vec<SaleItem>, SalesServiceError>;

    /// Creates a sale and links its items.
    async fn create_sale(&self, sale: NewSale) -> Result<Sale, SalesServiceError>;
}
