use chrono::NaiveDate;

use studio_orders::domain::customer::Customer;
use studio_orders::domain::loyalty::{LoyaltySettings, PointEvent};
use studio_orders::domain::order::{OrderPriority, OrderStatus};
use studio_orders::domain::product::Product;
use studio_orders::forms::customers::RegisterCustomerForm;
use studio_orders::forms::loyalty::{AdjustPointsForm, ManualEventKind};
use studio_orders::forms::orders::{AddOrderForm, OrderItemForm};
use studio_orders::forms::products::AddProductForm;
use studio_orders::repository::DieselRepository;
use studio_orders::services::customers::ReferrerLookup;
use studio_orders::services::orders::OrdersQuery;
use studio_orders::services::{ServiceError, customers, loyalty, orders, products};

mod common;

fn order_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

fn register(
    repo: &DieselRepository,
    first_name: &str,
    last_name: &str,
    phone: &str,
    referred_by: Option<i32>,
) -> Customer {
    let form = RegisterCustomerForm {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone: phone.to_string(),
        birth_date: None,
        note: None,
        referred_by,
    };
    customers::register_customer(repo, form, &LoyaltySettings::default())
        .expect("registration should succeed")
        .customer
}

fn catalog_product(repo: &DieselRepository, size: &str, price: i64) -> Product {
    let form = AddProductForm {
        size: size.to_string(),
        kind: Some("canvas".to_string()),
        color: None,
        price,
        default_discount: 0,
        description: None,
    };
    products::register_product(repo, form).expect("product registration should succeed")
}

fn order_form(customer_id: i32, product_id: i32, quantity: i32) -> AddOrderForm {
    AddOrderForm {
        customer_id,
        order_date: order_date(),
        delivery_days: 7,
        priority: OrderPriority::Normal,
        description: None,
        discount: 0,
        payment: 0,
        items: vec![OrderItemForm {
            product_id,
            quantity,
        }],
    }
}

#[test]
fn order_flow_settles_points_through_the_services() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let settings = LoyaltySettings::default();

    let sara = register(&repo, "Sara", "Ahmadi", "09121111111", None);

    let referrer = customers::resolve_referrer(&repo, ReferrerLookup::Phone(" 09121111111 ".into()))
        .expect("referrer lookup should succeed");
    assert_eq!(referrer.id, sara.id);

    let maryam = register(&repo, "Maryam", "Karimi", "09122222222", Some(referrer.id));

    let product = catalog_product(&repo, "30x40", 40_000);

    let form = AddOrderForm {
        description: Some("Wedding album".to_string()),
        discount: 5_000,
        payment: 20_000,
        ..order_form(maryam.id, product.id, 2)
    };
    let outcome = orders::create_order(&repo, form, &settings).expect("order should be created");
    assert_eq!(outcome.order.subtotal, 80_000);
    assert_eq!(outcome.order.total, 75_000);
    assert_eq!(outcome.order.balance, 55_000);
    assert!(outcome.settlement.is_none());

    let completed =
        orders::change_order_status(&repo, outcome.order.id, OrderStatus::Completed, &settings)
            .expect("status change should succeed");
    let settlement = completed.settlement.expect("completion settles points");
    assert_eq!(settlement.customer_id, maryam.id);
    assert_eq!(settlement.delta, 75);

    let profile =
        customers::load_customer_profile(&repo, maryam.id).expect("profile should load");
    assert_eq!(profile.customer.points, 75);
    assert_eq!(profile.orders.len(), 1);
    assert_eq!(profile.point_history.len(), 1);
    assert_eq!(profile.point_history[0].event, PointEvent::Order);
    assert_eq!(profile.point_history[0].related_id, Some(outcome.order.id));
    let referred_via = profile.referred_via.expect("referral link should exist");
    assert_eq!(referred_via.referrer_id, sara.id);

    let referrer_profile =
        customers::load_customer_profile(&repo, sara.id).expect("profile should load");
    assert_eq!(referrer_profile.customer.points, 100);
    assert_eq!(referrer_profile.referrals.len(), 1);
    assert_eq!(referrer_profile.point_history.len(), 1);
    assert_eq!(referrer_profile.point_history[0].event, PointEvent::Referral);
}

#[test]
fn order_listing_filters_match_the_stored_orders() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let settings = LoyaltySettings::default();

    let customer = register(&repo, "Sara", "Ahmadi", "09121111111", None);
    let product = catalog_product(&repo, "30x40", 40_000);

    let wedding = orders::create_order(
        &repo,
        AddOrderForm {
            description: Some("Wedding album shoot".to_string()),
            ..order_form(customer.id, product.id, 1)
        },
        &settings,
    )
    .expect("order should be created");

    let urgent = orders::create_order(
        &repo,
        AddOrderForm {
            priority: OrderPriority::High,
            ..order_form(customer.id, product.id, 1)
        },
        &settings,
    )
    .expect("order should be created");

    let delivered = orders::create_order(
        &repo,
        order_form(customer.id, product.id, 2),
        &settings,
    )
    .expect("order should be created");
    orders::change_order_status(&repo, delivered.order.id, OrderStatus::Completed, &settings)
        .expect("status change should succeed");

    let page = orders::load_orders(&repo, OrdersQuery::default()).expect("list should load");
    assert_eq!(page.orders.items.len(), 3);
    assert_eq!(page.orders.total_pages(), 1);

    let page = orders::load_orders(
        &repo,
        OrdersQuery {
            status: Some(OrderStatus::Completed),
            ..OrdersQuery::default()
        },
    )
    .expect("list should load");
    assert_eq!(page.orders.items.len(), 1);
    assert_eq!(page.orders.items[0].id, delivered.order.id);

    let page = orders::load_orders(
        &repo,
        OrdersQuery {
            priority: Some(OrderPriority::High),
            ..OrdersQuery::default()
        },
    )
    .expect("list should load");
    assert_eq!(page.orders.items.len(), 1);
    assert_eq!(page.orders.items[0].id, urgent.order.id);

    let page = orders::load_orders(
        &repo,
        OrdersQuery {
            search: Some("wedding".to_string()),
            ..OrdersQuery::default()
        },
    )
    .expect("list should load");
    assert_eq!(page.orders.items.len(), 1);
    assert_eq!(page.orders.items[0].id, wedding.order.id);
}

#[test]
fn manual_events_reach_the_audit_trail() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let settings = LoyaltySettings::default();

    let customer = register(&repo, "Sara", "Ahmadi", "09121111111", None);

    let settlement = loyalty::adjust_points(
        &repo,
        AdjustPointsForm {
            customer_id: customer.id,
            points: 250,
            kind: ManualEventKind::Bonus,
        },
        &settings,
    )
    .expect("bonus should settle");
    assert_eq!(settlement.points, 250);

    let settlement = loyalty::adjust_points(
        &repo,
        AdjustPointsForm {
            customer_id: customer.id,
            points: -50,
            kind: ManualEventKind::Adjustment,
        },
        &settings,
    )
    .expect("adjustment should settle");
    assert_eq!(settlement.points, 200);

    let history =
        loyalty::load_point_history(&repo, customer.id).expect("history should load");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].points, -50);
    assert_eq!(history[0].event, PointEvent::Adjustment);
    assert_eq!(history[1].points, 250);
    assert_eq!(history[1].event, PointEvent::Bonus);

    let err = loyalty::adjust_points(
        &repo,
        AdjustPointsForm {
            customer_id: 999,
            points: 10,
            kind: ManualEventKind::Bonus,
        },
        &settings,
    )
    .expect_err("unknown customer should fail");
    assert!(matches!(err, ServiceError::NotFound));
}

#[test]
fn customer_removal_respects_linked_orders() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let settings = LoyaltySettings::default();

    let customer = register(&repo, "Sara", "Ahmadi", "09121111111", None);
    let product = catalog_product(&repo, "30x40", 40_000);
    let outcome = orders::create_order(
        &repo,
        order_form(customer.id, product.id, 1),
        &settings,
    )
    .expect("order should be created");

    let err = customers::remove_customer(&repo, customer.id)
        .expect_err("linked customer should not be deletable");
    assert!(matches!(err, ServiceError::Conflict(_)));

    orders::remove_order(&repo, outcome.order.id).expect("order removal should succeed");
    customers::remove_customer(&repo, customer.id).expect("customer removal should succeed");

    let err = customers::load_customer_profile(&repo, customer.id)
        .expect_err("profile of a deleted customer");
    assert!(matches!(err, ServiceError::NotFound));
}
