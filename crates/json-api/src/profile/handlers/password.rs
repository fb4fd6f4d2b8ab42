//! Change Password Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use megano_app::domain::users::models::PasswordChange;

use crate::{errors::into_status_error, extensions::*, state::State};

/// Change Password Request
#[derive(Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Change Password Handler
///
/// Existing sessions stay valid.
#[endpoint(
    tags("profile"),
    summary = "Change Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password changed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Current password is wrong"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ChangePasswordRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let request = json.into_validated()?;

    state
        .app
        .users
        .change_password(
            user,
            PasswordChange {
                current_password: request.current_password,
                new_password: request.new_password,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use megano_app::domain::users::{MockUsersService, UsersServiceError};
    use salvo::test::TestClient;
    use serde_json::json;

    use crate::test_helpers::{Mocks, customer_service};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        customer_service(
            Mocks {
                users,
                ..Mocks::default()
            },
            Router::with_path("profile/password").post(handler),
        )
    }

    #[tokio::test]
    async fn test_change_returns_204() {
        let mut users = MockUsersService::new();

        users
            .expect_change_password()
            .once()
            .withf(|_, change| {
                change.current_password == "old-password" && change.new_password == "new-password"
            })
            .return_once(|_, _| Ok(()));

        let res = TestClient::post("http://example.com/profile/password")
            .json(&json!({ "currentPassword": "old-password", "newPassword": "new-password" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_wrong_current_password_returns_400() {
        let mut users = MockUsersService::new();

        users
            .expect_change_password()
            .once()
            .return_once(|_, _| Err(UsersServiceError::IncorrectPassword));

        let res = TestClient::post("http://example.com/profile/password")
            .json(&json!({ "currentPassword": "guess", "newPassword": "new-password" }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
