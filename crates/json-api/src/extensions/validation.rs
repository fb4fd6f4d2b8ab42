//! Request body validation.

use salvo::{oapi::extract::JsonBody, prelude::StatusError};
use validator::Validate;

use crate::errors::{ApiError, into_status_error};

pub(crate) trait ValidatedJsonExt<T> {
    /// Unwrap the body, rejecting it with field messages when
    /// [`Validate::validate`] fails.
    fn into_validated(self) -> Result<T, StatusError>;
}

impl<T> ValidatedJsonExt<T> for JsonBody<T>
where
    T: Validate,
{
    fn into_validated(self) -> Result<T, StatusError> {
        let body = self.into_inner();

        body.validate()
            .map_err(|errors| into_status_error(ApiError::Validation(errors.to_string())))?;

        Ok(body)
    }
}
