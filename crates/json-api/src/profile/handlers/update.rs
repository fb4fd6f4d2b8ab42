//! Update Profile Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use megano_app::domain::users::models::ProfileUpdate;

use crate::{errors::into_status_error, extensions::*, profile::ProfileResponse, state::State};

/// Update Profile Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileRequest {
    /// Split into first and last name on the first whitespace run
    #[validate(length(min = 1, max = 300))]
    pub full_name: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
        }
    }
}

/// Update Profile Handler
#[endpoint(
    tags("profile"),
    summary = "Update Profile",
    security(("bearer_auth" = [])),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProfileRequest>,
    depot: &mut Depot,
) -> Result<Json<ProfileResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let update = json.into_validated()?;

    let profile = state
        .app
        .users
        .update_profile(user, update.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::users::MockUsersService;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        profile::handlers::tests::make_user,
        test_helpers::{Mocks, customer_service},
    };

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        customer_service(
            Mocks {
                users,
                ..Mocks::default()
            },
            Router::with_path("profile").post(handler),
        )
    }

    #[tokio::test]
    async fn test_update_forwards_fields() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_update_profile()
            .once()
            .withf(|_, update| {
                update.full_name == "Grace Brewster Hopper"
                    && update.phone.as_deref() == Some("+15550100")
            })
            .return_once(|_, _| {
                let mut user = make_user();
                user.first_name = "Grace".to_string();
                user.last_name = "Brewster Hopper".to_string();
                Ok(user)
            });

        let mut res = TestClient::post("http://example.com/profile")
            .json(&json!({
                "fullName": "Grace Brewster Hopper",
                "email": "grace@example.com",
                "phone": "+15550100",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProfileResponse = res.take_json().await?;

        assert_eq!(body.full_name, "Grace Brewster Hopper");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_email_returns_400() {
        let mut users = MockUsersService::new();

        users.expect_update_profile().never();

        let res = TestClient::post("http://example.com/profile")
            .json(&json!({ "fullName": "Grace", "email": "grace" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
