//! Get Profile Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{errors::into_status_error, extensions::*, profile::ProfileResponse, state::State};

/// Get Profile Handler
#[endpoint(
    tags("profile"),
    summary = "Get Profile",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let profile = state
        .app
        .users
        .get_profile(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}
