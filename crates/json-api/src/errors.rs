//! HTTP error translation
//!
//! Every service error passes through [`ApiError`] on its way out of a
//! handler, so status codes are decided in one place.

use salvo::http::StatusError;
use thiserror::Error;
use tracing::error;

use megano_app::{
    auth::AuthServiceError,
    domain::{
        baskets::BasketsServiceError, categories::CategoriesServiceError,
        customers::CustomersServiceError, delivery::DeliveryServiceError,
        items::ItemsServiceError, orders::OrdersServiceError, sales::SalesServiceError,
        tags::TagsServiceError, users::UsersServiceError,
    },
};

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Unauthorized(&'static str),

    /// Logged with its context, rendered as a bare 500.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApiError {
    fn internal<E>(context: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal {
            context,
            source: Box::new(source),
        }
    }
}

pub(crate) fn into_status_error(error: impl Into<ApiError>) -> StatusError {
    match error.into() {
        ApiError::Validation(message) => StatusError::bad_request().brief(message),
        ApiError::NotFound(message) => StatusError::not_found().brief(message),
        ApiError::Conflict(message) => StatusError::conflict().brief(message),
        ApiError::Unauthorized(message) => StatusError::unauthorized().brief(message),
        ApiError::Internal { context, source } => {
            error!("{context}: {source}");

            StatusError::internal_server_error()
        }
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        match error {
            AuthServiceError::NotFound => Self::Unauthorized("Invalid session token"),
            AuthServiceError::InvalidCredentials => {
                Self::Unauthorized("Invalid username or password")
            }
            AuthServiceError::AlreadyExists => Self::Conflict("Username already taken"),
            AuthServiceError::InvalidData => Self::Validation(error.to_string()),
            AuthServiceError::Sql(source) => Self::internal("auth storage failed", source),
            AuthServiceError::Token(source) => Self::internal("session token failed", source),
            AuthServiceError::Password(source) => Self::internal("password hashing failed", source),
        }
    }
}

impl From<UsersServiceError> for ApiError {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::NotFound => Self::NotFound("User not found"),
            UsersServiceError::AlreadyExists => Self::Conflict("Username already taken"),
            UsersServiceError::MissingRequiredData
            | UsersServiceError::InvalidData
            | UsersServiceError::IncorrectPassword => Self::Validation(error.to_string()),
            UsersServiceError::Password(source) => {
                Self::internal("password hashing failed", source)
            }
            UsersServiceError::Sql(source) => Self::internal("user storage failed", source),
        }
    }
}

impl From<CustomersServiceError> for ApiError {
    fn from(error: CustomersServiceError) -> Self {
        match error {
            CustomersServiceError::NotFound | CustomersServiceError::InvalidReference => {
                Self::Unauthorized("Unknown customer")
            }
            CustomersServiceError::InvalidData => Self::Validation(error.to_string()),
            CustomersServiceError::Sql(source) => {
                Self::internal("customer resolution failed", source)
            }
        }
    }
}

impl From<CategoriesServiceError> for ApiError {
    fn from(error: CategoriesServiceError) -> Self {
        match error {
            CategoriesServiceError::NotFound => Self::NotFound("Category not found"),
            CategoriesServiceError::AlreadyExists => Self::Conflict("Category already exists"),
            CategoriesServiceError::InvalidReference
            | CategoriesServiceError::MissingRequiredData
            | CategoriesServiceError::InvalidData => Self::Validation(error.to_string()),
            CategoriesServiceError::Sql(source) => {
                Self::internal("category storage failed", source)
            }
        }
    }
}

impl From<TagsServiceError> for ApiError {
    fn from(error: TagsServiceError) -> Self {
        match error {
            TagsServiceError::Sql(source) => Self::internal("tag storage failed", source),
        }
    }
}

impl From<ItemsServiceError> for ApiError {
    fn from(error: ItemsServiceError) -> Self {
        match error {
            ItemsServiceError::NotFound => Self::NotFound("Item not found"),
            ItemsServiceError::AlreadyExists => Self::Conflict("Item already exists"),
            ItemsServiceError::InvalidReference
            | ItemsServiceError::MissingRequiredData
            | ItemsServiceError::InvalidData => Self::Validation(error.to_string()),
            ItemsServiceError::Sql(source) => Self::internal("item storage failed", source),
        }
    }
}

impl From<SalesServiceError> for ApiError {
    fn from(error: SalesServiceError) -> Self {
        match error {
            SalesServiceError::NotFound => Self::NotFound("Sale not found"),
            SalesServiceError::AlreadyExists => Self::Conflict("Sale already exists"),
            SalesServiceError::InvalidReference
            | SalesServiceError::MissingRequiredData
            | SalesServiceError::InvalidData => Self::Validation(error.to_string()),
            SalesServiceError::Sql(source) => Self::internal("sale storage failed", source),
        }
    }
}

impl From<DeliveryServiceError> for ApiError {
    fn from(error: DeliveryServiceError) -> Self {
        Self::internal("delivery settings failed", error)
    }
}

impl From<BasketsServiceError> for ApiError {
    fn from(error: BasketsServiceError) -> Self {
        match error {
            BasketsServiceError::NotFound => Self::NotFound("Item is not in the basket"),
            BasketsServiceError::ItemNotFound => Self::NotFound("Item not found"),
            BasketsServiceError::ItemUnavailable
            | BasketsServiceError::InvalidReference
            | BasketsServiceError::InvalidData => Self::Validation(error.to_string()),
            BasketsServiceError::Pricing(source) => Self::internal("basket pricing failed", source),
            BasketsServiceError::Sql(source) => Self::internal("basket storage failed", source),
        }
    }
}

impl From<OrdersServiceError> for ApiError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::NotFound => Self::NotFound("Order not found"),
            OrdersServiceError::AlreadyExists => Self::Conflict("Order already exists"),
            OrdersServiceError::InvalidTransition(_)
            | OrdersServiceError::EmptyOrder
            | OrdersServiceError::InvalidReference
            | OrdersServiceError::MissingRequiredData
            | OrdersServiceError::InvalidData
            | OrdersServiceError::DeliveryDetails(_)
            | OrdersServiceError::Payment(_) => Self::Validation(error.to_string()),
            OrdersServiceError::Pricing(source) => Self::internal("order pricing failed", source),
            OrdersServiceError::Sql(source) => Self::internal("order storage failed", source),
        }
    }
}
