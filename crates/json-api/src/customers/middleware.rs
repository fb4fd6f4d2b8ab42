//! Customer resolution hoop.
//!
//! Runs after the auth hoop. A signed-in user shops as themselves; anyone
//! else is a guest keyed by the `x-guest-key` header, or by remote IP when
//! the client sends none. The two sources never share a key.

use std::{net::IpAddr, sync::Arc};

use salvo::prelude::*;

use megano_app::domain::customers::models::{CustomerIdentity, GuestKey};

use crate::{errors::into_status_error, extensions::*, state::State};

pub(crate) const GUEST_KEY_HEADER: &str = "x-guest-key";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let identity = match identify(req, depot) {
        Ok(identity) => identity,
        Err(status) => {
            res.render(status);

            return;
        }
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);

            return;
        }
    };

    let customer = match state.app.customers.resolve_customer(identity).await {
        Ok(customer) => customer,
        Err(error) => {
            res.render(into_status_error(error));

            return;
        }
    };

    depot.insert_customer_uuid(customer);

    ctrl.call_next(req, depot, res).await;
}

fn identify(req: &Request, depot: &Depot) -> Result<CustomerIdentity, StatusError> {
    if let Some(user) = depot.user_uuid() {
        return Ok(CustomerIdentity::User(user));
    }

    let key = match req.header::<String>(GUEST_KEY_HEADER) {
        Some(token) => GuestKey::from_token(&token).or_400("invalid guest key")?,
        None => remote_ip(req)
            .map(GuestKey::from_remote_ip)
            .ok_or_else(|| StatusError::bad_request().brief("Could not identify the customer"))?,
    };

    Ok(CustomerIdentity::Guest(key))
}

fn remote_ip(req: &Request) -> Option<IpAddr> {
    let addr = req.remote_addr();

    addr.as_ipv4()
        .map(|v4| IpAddr::V4(*v4.ip()))
        .or_else(|| addr.as_ipv6().map(|v6| IpAddr::V6(*v6.ip())))
}

#[cfg(test)]
mod tests {
    use megano_app::domain::{
        customers::{CustomersServiceError, MockCustomersService, models::CustomerUuid},
        users::models::UserUuid,
    };
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::{Mocks, state};

    use super::*;

    #[salvo::handler]
    async fn echo_customer(depot: &mut Depot, res: &mut Response) {
        match depot.customer_uuid_or_500() {
            Ok(customer) => res.render(customer.to_string()),
            Err(status) => res.render(status),
        }
    }

    #[salvo::handler]
    async fn sign_in_as_nil(depot: &mut Depot) {
        depot.insert_user_uuid(UserUuid::from_uuid(Uuid::nil()));
    }

    fn make_service(customers: MockCustomersService, signed_in: bool) -> Service {
        let mut router = Router::new().hoop(inject(state(Mocks {
            customers,
            ..Mocks::default()
        })));

        if signed_in {
            router = router.hoop(sign_in_as_nil);
        }

        Service::new(router.hoop(handler).push(Router::new().get(echo_customer)))
    }

    #[tokio::test]
    async fn test_signed_in_user_resolves_as_user() -> TestResult {
        let customer = CustomerUuid::from_uuid(Uuid::now_v7());

        let mut customers = MockCustomersService::new();

        customers
            .expect_resolve_customer()
            .once()
            .withf(|identity| {
                *identity == CustomerIdentity::User(UserUuid::from_uuid(Uuid::nil()))
            })
            .return_once(move |_| Ok(customer));

        let mut res = TestClient::get("http://example.com")
            .add_header(GUEST_KEY_HEADER, "ignored-when-signed-in", true)
            .send(&make_service(customers, true))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, customer.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_guest_key_header_resolves_as_guest() -> TestResult {
        let customer = CustomerUuid::from_uuid(Uuid::now_v7());

        let mut customers = MockCustomersService::new();

        customers
            .expect_resolve_customer()
            .once()
            .withf(|identity| {
                matches!(identity, CustomerIdentity::Guest(key) if key.as_str() == "token:guest-42")
            })
            .return_once(move |_| Ok(customer));

        let mut res = TestClient::get("http://example.com")
            .add_header(GUEST_KEY_HEADER, "  guest-42 ", true)
            .send(&make_service(customers, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, customer.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_address_shaped_guest_key_stays_a_token() {
        let customer = CustomerUuid::from_uuid(Uuid::now_v7());

        let mut customers = MockCustomersService::new();

        customers
            .expect_resolve_customer()
            .once()
            .withf(|identity| {
                matches!(
                    identity,
                    CustomerIdentity::Guest(key) if key.as_str() == "token:addr:203.0.113.7"
                )
            })
            .return_once(move |_| Ok(customer));

        let res = TestClient::get("http://example.com")
            .add_header(GUEST_KEY_HEADER, "addr:203.0.113.7", true)
            .send(&make_service(customers, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_blank_guest_key_returns_400() {
        let mut customers = MockCustomersService::new();

        customers.expect_resolve_customer().never();

        let res = TestClient::get("http://example.com")
            .add_header(GUEST_KEY_HEADER, "   ", true)
            .send(&make_service(customers, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_rejected_identity_returns_400() {
        let mut customers = MockCustomersService::new();

        customers
            .expect_resolve_customer()
            .once()
            .return_once(|_| Err(CustomersServiceError::InvalidData));

        let res = TestClient::get("http://example.com")
            .add_header(GUEST_KEY_HEADER, "guest-42", true)
            .send(&make_service(customers, false))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
