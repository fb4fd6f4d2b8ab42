//! Category Tree Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use megano_app::domain::categories::models::CategoryNode;

use crate::{errors::into_status_error, extensions::*, state::State};

/// Category Image
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryImage {
    pub src: String,
    pub alt: String,
}

/// Category Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub id: Uuid,
    pub title: String,
    pub image: Option<CategoryImage>,
    pub subcategories: Vec<CategoryResponse>,
}

impl From<CategoryNode> for CategoryResponse {
    fn from(node: CategoryNode) -> Self {
        let category = node.category;

        Self {
            id: category.uuid.into(),
            image: category.image_src.map(|src| CategoryImage {
                src,
                alt: category.title.clone(),
            }),
            title: category.title,
            subcategories: node.subcategories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Category Tree Handler
///
/// Returns root categories with their subcategories nested.
#[endpoint(tags("categories"), summary = "List Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CategoryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tree = state
        .app
        .categories
        .list_tree()
        .await
        .map_err(into_status_error)?;

    Ok(Json(tree.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use megano_app::domain::categories::{
        MockCategoriesService,
        models::{Category, CategoryUuid},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, public_service};

    use super::*;

    fn category(title: &str, parent: Option<CategoryUuid>) -> Category {
        Category {
            uuid: CategoryUuid::new(),
            parent_uuid: parent,
            title: title.to_string(),
            image_src: Some(format!("/media/{title}.png")),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn test_tree_is_nested() -> TestResult {
        let root = category("electronics", None);
        let child = category("audio", Some(root.uuid));

        let tree = vec![CategoryNode {
            category: root,
            subcategories: vec![CategoryNode {
                category: child,
                subcategories: Vec::new(),
            }],
        }];

        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_tree()
            .once()
            .return_once(move || Ok(tree));

        let mut res = TestClient::get("http://example.com/categories")
            .send(&public_service(
                Mocks {
                    categories,
                    ..Mocks::default()
                },
                Router::with_path("categories").get(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<CategoryResponse> = res.take_json().await?;

        let root = body.first().ok_or("missing root")?;

        assert_eq!(root.title, "electronics");
        assert_eq!(
            root.subcategories.first().map(|child| child.title.as_str()),
            Some("audio")
        );
        assert_eq!(
            root.image.as_ref().map(|image| image.alt.as_str()),
            Some("electronics")
        );

        Ok(())
    }
}
