//! Update Avatar Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{errors::into_status_error, extensions::*, profile::ProfileResponse, state::State};

/// Avatar Request. A missing `src` clears the avatar.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct AvatarRequest {
    #[validate(url)]
    pub src: Option<String>,
}

/// Update Avatar Handler
#[endpoint(
    tags("profile"),
    summary = "Update Avatar",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    json: JsonBody<AvatarRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_validated()?;

    let profile = state
        .app
        .users
        .update_avatar(user, request.src)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}
