//! Sign In Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::handlers::SessionResponse, errors::into_status_error, extensions::*, state::State,
};

/// Sign In Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct SignInRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Sign In Handler
#[endpoint(
    tags("auth"),
    summary = "Sign In",
    responses(
        (status_code = StatusCode::OK, description = "Signed in"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid username or password"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignInRequest>,
    depot: &mut Depot,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_validated()?;

    let session = state
        .app
        .auth
        .login(&request.username, &request.password)
        .await
        .map_err(into_status_error)?;

    Ok(Json(session.into()))
}
