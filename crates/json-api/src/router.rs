//! App Router

use salvo::Router;

use crate::{
    auth, basket, catalog, categories, customers, orders, payment, products, profile, sales, tags,
};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(catalog_router())
        .push(
            Router::with_path("basket")
                .hoop(customers::middleware::handler)
                .get(basket::handlers::get::handler)
                .post(basket::handlers::add::handler)
                .delete(basket::handlers::remove::handler),
        )
        .push(Router::with_path("sign-up").post(auth::handlers::sign_up::handler))
        .push(Router::with_path("sign-in").post(auth::handlers::sign_in::handler))
        .push(user_router())
}

fn catalog_router() -> Router {
    Router::new()
        .push(Router::with_path("categories").get(categories::handlers::index::handler))
        .push(Router::with_path("tags").get(tags::handlers::index::handler))
        .push(Router::with_path("banners").get(catalog::handlers::banners::handler))
        .push(
            Router::with_path("catalog")
                .get(catalog::handlers::index::handler)
                .push(Router::with_path("popular").get(catalog::handlers::popular::handler))
                .push(Router::with_path("limited").get(catalog::handlers::limited::handler)),
        )
        .push(
            Router::with_path("products/{item}")
                .get(products::handlers::get::handler)
                .push(Router::with_path("reviews").post(products::handlers::reviews::handler)),
        )
        .push(Router::with_path("sales").get(sales::handlers::index::handler))
}

/// Routes that need a signed-in user. Order routes also resolve the
/// user's customer.
fn user_router() -> Router {
    Router::new()
        .hoop(auth::middleware::require_user)
        .push(Router::with_path("sign-out").post(auth::handlers::sign_out::handler))
        .push(
            Router::with_path("profile")
                .get(profile::handlers::get::handler)
                .post(profile::handlers::update::handler)
                .push(Router::with_path("password").post(profile::handlers::password::handler))
                .push(Router::with_path("avatar").post(profile::handlers::avatar::handler)),
        )
        .push(
            Router::new()
                .hoop(customers::middleware::handler)
                .push(
                    Router::with_path("orders")
                        .get(orders::handlers::index::handler)
                        .post(orders::handlers::checkout::handler)
                        .push(
                            Router::with_path("{order}")
                                .get(orders::handlers::get::handler)
                                .post(orders::handlers::confirm::handler),
                        ),
                )
                .push(Router::with_path("payment/{order}").post(payment::handlers::pay::handler)),
        )
}

#[cfg(test)]
mod tests {
    use megano_app::domain::{items::MockItemsService, tags::MockTagsService};
    use salvo::{affix_state::inject, prelude::*, test::TestClient};

    use crate::test_helpers::{Mocks, state};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        Service::new(Router::new().hoop(inject(state(mocks))).push(app_router()))
    }

    #[tokio::test]
    async fn test_public_routes_allow_guests() {
        let mut tags = MockTagsService::new();

        tags.expect_list_tags().once().return_once(|| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/tags")
            .send(&make_service(Mocks {
                tags,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_banners_are_public() {
        let mut items = MockItemsService::new();

        items.expect_banner_items().once().return_once(|_| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/banners")
            .send(&make_service(Mocks {
                items,
                ..Mocks::default()
            }))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_user_routes_reject_guests() {
        for (method, path) in [
            ("GET", "/orders"),
            ("POST", "/orders"),
            ("GET", "/profile"),
            ("POST", "/sign-out"),
        ] {
            let url = format!("http://example.com{path}");

            let request = if method == "GET" {
                TestClient::get(url)
            } else {
                TestClient::post(url)
            };

            let res = request.send(&make_service(Mocks::default())).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} {path} should require a user"
            );
        }
    }
}
