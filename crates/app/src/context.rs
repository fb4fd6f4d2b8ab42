//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        baskets::{BasketsService, PgBasketsService},
        categories::{CategoriesService, PgCategoriesService},
        customers::{CustomersService, PgCustomersService},
        delivery::{DeliveryService, PgDeliveryService},
        items::{ItemsService, PgItemsService},
        orders::{OrdersService, PgOrdersService},
        sales::{PgSalesService, SalesService},
        tags::{PgTagsService, TagsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub customers: Arc<dyn CustomersService>,
    pub categories: Arc<dyn CategoriesService>,
    pub tags: Arc<dyn TagsService>,
    pub items: Arc<dyn ItemsService>,
    pub sales: Arc<dyn SalesService>,
    pub delivery: Arc<dyn DeliveryService>,
    pub baskets: Arc<dyn BasketsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    #[must_use]
    pub fn from_db(db: &Db) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            customers: Arc::new(PgCustomersService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            tags: Arc::new(PgTagsService::new(db.clone())),
            items: Arc::new(PgItemsService::new(db.clone())),
            sales: Arc::new(PgSalesService::new(db.clone())),
            delivery: Arc::new(PgDeliveryService::new(db.clone())),
            baskets: Arc::new(PgBasketsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool)))
    }
}
