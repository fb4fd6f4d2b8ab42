//! Tags service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagsServiceError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
