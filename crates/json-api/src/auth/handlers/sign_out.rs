//! Sign Out Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    auth::middleware::extract_bearer_token, errors::into_status_error, extensions::*,
    state::State,
};

/// Sign Out Handler
///
/// Revokes the session behind the bearer token.
#[endpoint(
    tags("auth"),
    summary = "Sign Out",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Signed out"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let token = extract_bearer_token(req)
        .ok_or_else(|| StatusError::unauthorized().brief("Missing bearer token"))?;

    state
        .app
        .auth
        .logout(token)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use megano_app::auth::MockAuthService;
    use salvo::{http::header::AUTHORIZATION, test::TestClient};

    use crate::test_helpers::{Mocks, customer_service};

    use super::*;

    #[tokio::test]
    async fn test_sign_out_revokes_presented_token() {
        let mut auth = MockAuthService::new();

        auth.expect_logout()
            .once()
            .withf(|token| token == "mg_v1_token")
            .return_once(|_| Ok(()));

        let res = TestClient::post("http://example.com/sign-out")
            .add_header(AUTHORIZATION, "Bearer mg_v1_token", true)
            .send(&customer_service(
                Mocks {
                    auth,
                    ..Mocks::default()
                },
                Router::with_path("sign-out").post(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));
    }
}
