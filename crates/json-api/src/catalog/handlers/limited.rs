//! Limited Items Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    catalog::{ItemResponse, item_responses},
    errors::into_status_error,
    extensions::*,
    state::State,
};

/// Limited Items Handler
///
/// Items that are nearly sold out.
#[endpoint(tags("catalog"), summary = "List Limited Items")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let items = state
        .app
        .items
        .limited_items(point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(item_responses(items)?))
}
