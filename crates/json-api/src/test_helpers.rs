//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use megano_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        baskets::MockBasketsService,
        categories::MockCategoriesService,
        customers::{MockCustomersService, models::CustomerUuid},
        delivery::{MockDeliveryService, models::DeliveryType},
        items::{
            MockItemsService,
            models::{Item, ItemUuid},
        },
        orders::{
            MockOrdersService, OrderStatus,
            models::{Order, OrderLine, OrderUuid},
        },
        sales::MockSalesService,
        tags::MockTagsService,
        users::{MockUsersService, models::UserUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CUSTOMER_UUID: CustomerUuid = CustomerUuid::from_uuid(Uuid::max());

/// One mock per service. Mocks without expectations panic when called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: MockAuthService,
    pub(crate) users: MockUsersService,
    pub(crate) customers: MockCustomersService,
    pub(crate) categories: MockCategoriesService,
    pub(crate) tags: MockTagsService,
    pub(crate) items: MockItemsService,
    pub(crate) sales: MockSalesService,
    pub(crate) delivery: MockDeliveryService,
    pub(crate) baskets: MockBasketsService,
    pub(crate) orders: MockOrdersService,
}

pub(crate) fn state(mocks: Mocks) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(mocks.auth),
        users: Arc::new(mocks.users),
        customers: Arc::new(mocks.customers),
        categories: Arc::new(mocks.categories),
        tags: Arc::new(mocks.tags),
        items: Arc::new(mocks.items),
        sales: Arc::new(mocks.sales),
        delivery: Arc::new(mocks.delivery),
        baskets: Arc::new(mocks.baskets),
        orders: Arc::new(mocks.orders),
    })
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    depot.insert_customer_uuid(TEST_CUSTOMER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Route without identity, as anonymous catalog browsing sees it.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state(mocks))).push(route))
}

/// Route with [`TEST_USER_UUID`] signed in as [`TEST_CUSTOMER_UUID`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state(mocks)))
            .hoop(inject_customer)
            .push(route),
    )
}

pub(crate) fn make_item(uuid: ItemUuid, price: u64) -> Item {
    Item {
        uuid,
        category_uuid: None,
        name: "Speaker".to_string(),
        description: "Portable speaker with a long lasting battery".to_string(),
        price,
        count: 10,
        discount: 0,
        available: true,
        free_delivery: false,
        archived: false,
        rating_sum: 9,
        feedback_count: 2,
        sale_discount: None,
        tags: vec!["audio".to_string()],
        images: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_line(order: OrderUuid, item: ItemUuid, sale_price: u64, quantity: u32) -> OrderLine {
    OrderLine {
        order_uuid: order,
        item_uuid: item,
        name: "Speaker".to_string(),
        price: sale_price,
        discount: 0,
        sale_discount: None,
        quantity,
        sale_price,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> Order {
    let line = make_line(uuid, ItemUuid::from_uuid(Uuid::now_v7()), 900, 2);

    Order {
        uuid,
        customer_uuid: TEST_CUSTOMER_UUID,
        status,
        delivery_type: DeliveryType::Ordinary,
        payment_type: "online".to_string(),
        full_name: Some("Ada Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        phone: Some("+441234567890".to_string()),
        city: Some("London".to_string()),
        address: Some("12 St James's Square".to_string()),
        subtotal: 1800,
        delivery_fee: 200,
        total_amount: 2000,
        lines: vec![line],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
