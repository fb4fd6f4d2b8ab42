//! Tag Listing Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::tags::records::Tag;

use crate::{errors::into_status_error, extensions::*, state::State};

/// Tag Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.uuid.into(),
            name: tag.name,
        }
    }
}

/// Tag Listing Handler
#[endpoint(tags("tags"), summary = "List Tags")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<TagResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tags = state
        .app
        .tags
        .list_tags()
        .await
        .map_err(into_status_error)?;

    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::tags::{MockTagsService, records::TagUuid};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    #[tokio::test]
    async fn test_tags_are_listed() -> TestResult {
        let mut tags = MockTagsService::new();

        tags.expect_list_tags().once().return_once(|| {
            Ok(vec![
                Tag {
                    uuid: TagUuid::new(),
                    name: "audio".to_string(),
                },
                Tag {
                    uuid: TagUuid::new(),
                    name: "gaming".to_string(),
                },
            ])
        });

        let mut res = TestClient::get("http://example.com/tags")
            .send(&public_service(
                Mocks {
                    tags,
                    ..Mocks::default()
                },
                Router::with_path("tags").get(handler),
            ))
            .await;

        let body: Vec<TagResponse> = res.take_json().await?;

        let names: Vec<&str> = body.iter().map(|tag| tag.name.as_str()).collect();

        assert_eq!(names, ["audio", "gaming"]);

        Ok(())
    }
}
