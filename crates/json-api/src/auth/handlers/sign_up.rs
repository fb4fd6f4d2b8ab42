//! Sign Up Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use megano_app::auth::models::Registration;

use crate::{
    auth::handlers::SessionResponse,
    errors::into_status_error,
    extensions::*,
    observability::{StorefrontEvent, record_event},
    state::State,
};

/// Sign Up Request
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub(crate) struct SignUpRequest {
    /// Display name, stored as the first name
    #[validate(length(min = 1, max = 150))]
    pub name: String,

    #[validate(length(min = 3, max = 150))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl From<SignUpRequest> for Registration {
    fn from(request: SignUpRequest) -> Self {
        Registration {
            username: request.username,
            password: request.password,
            first_name: request.name,
        }
    }
}

/// Sign Up Handler
///
/// Creates an account and signs it in.
#[endpoint(
    tags("auth"),
    summary = "Sign Up",
    responses(
        (status_code = StatusCode::CREATED, description = "Account created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Username already taken"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SignUpRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_validated()?;

    let session = state
        .app
        .auth
        .register(request.into())
        .await
        .map_err(into_status_error)?;

    record_event(StorefrontEvent::UserRegistered);

    res.status_code(StatusCode::CREATED);

    Ok(Json(session.into()))
}

#[cfg(test)]
mod tests {
    use megano_app::auth::{AuthServiceError, MockAuthService};
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        auth::handlers::tests::make_session,
        test_helpers::{Mocks, TEST_USER_UUID, public_service},
    };

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        public_service(
            Mocks {
                auth,
                ..Mocks::default()
            },
            Router::with_path("sign-up").post(handler),
        )
    }

    #[tokio::test]
    async fn test_sign_up_returns_201_with_token() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|registration| {
                registration.username == "ada"
                    && registration.first_name == "Ada"
                    && registration.password == "analytical-engine"
            })
            .return_once(|_| Ok(make_session("mg_v1_token")));

        let mut res = TestClient::post("http://example.com/sign-up")
            .json(&json!({
                "name": "Ada",
                "username": "ada",
                "password": "analytical-engine",
            }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: SessionResponse = res.take_json().await?;

        assert_eq!(body.token, "mg_v1_token");
        assert_eq!(body.user_id, TEST_USER_UUID.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_short_password_returns_400() {
        let mut auth = MockAuthService::new();

        auth.expect_register().never();

        let res = TestClient::post("http://example.com/sign-up")
            .json(&json!({ "name": "Ada", "username": "ada", "password": "short" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_taken_username_returns_409() {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/sign-up")
            .json(&json!({
                "name": "Ada",
                "username": "ada",
                "password": "analytical-engine",
            }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
