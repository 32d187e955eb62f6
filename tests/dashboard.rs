use chrono::{Duration, NaiveDate, Utc};

use studio_orders::domain::customer::{Customer, NewCustomer};
use studio_orders::domain::loyalty::LoyaltySettings;
use studio_orders::domain::order::{NewOrder, NewOrderItem, OrderStatus};
use studio_orders::domain::product::{NewProduct, Product};
use studio_orders::domain::report::{ReportPeriod, ReportRange};
use studio_orders::repository::{
    CustomerWriter, DashboardReader, DieselRepository, OrderWriter, ProductWriter,
};
use studio_orders::services::dashboard::{self, DashboardQuery};

mod common;

struct Seeded {
    first: Customer,
    second: Customer,
    frame: Product,
    print: Product,
}

/// Seeds two customers, two products and five orders around `today`:
/// two completed, one delayed pending, one in-progress due tomorrow
/// and one canceled.
fn seed(repo: &DieselRepository, today: NaiveDate) -> Seeded {
    let settings = LoyaltySettings::default();

    let (first, _) = repo
        .create_customer(&NewCustomer::new("Sara", "Ahmadi", "09121111111"), &settings)
        .unwrap();
    let (second, _) = repo
        .create_customer(&NewCustomer::new("Maryam", "Karimi", "09122222222"), &settings)
        .unwrap();

    let frame = repo.create_product(&NewProduct::new("30x40", 40_000)).unwrap();
    let print = repo.create_product(&NewProduct::new("20x30", 30_000)).unwrap();

    repo.create_order(
        &NewOrder::new(
            first.id,
            today,
            vec![NewOrderItem::new(frame.id, 2, frame.price)],
            0,
            80_000,
        )
        .with_status(OrderStatus::Completed),
        &settings,
    )
    .unwrap();

    repo.create_order(
        &NewOrder::new(
            second.id,
            today,
            vec![NewOrderItem::new(print.id, 1, print.price)],
            0,
            30_000,
        )
        .with_status(OrderStatus::Completed),
        &settings,
    )
    .unwrap();

    // Pending, due seven days ago, 30_000 still owed.
    repo.create_order(
        &NewOrder::new(
            first.id,
            today - Duration::days(10),
            vec![NewOrderItem::new(frame.id, 1, frame.price)],
            0,
            10_000,
        )
        .with_delivery_days(3),
        &settings,
    )
    .unwrap();

    // In progress, due tomorrow, 30_000 still owed.
    repo.create_order(
        &NewOrder::new(
            second.id,
            today,
            vec![NewOrderItem::new(print.id, 1, print.price)],
            0,
            0,
        )
        .with_delivery_days(1)
        .with_status(OrderStatus::InProgress),
        &settings,
    )
    .unwrap();

    repo.create_order(
        &NewOrder::new(
            first.id,
            today,
            vec![NewOrderItem::new(print.id, 1, print.price)],
            0,
            0,
        )
        .with_status(OrderStatus::Canceled),
        &settings,
    )
    .unwrap();

    Seeded {
        first,
        second,
        frame,
        print,
    }
}

#[test]
fn overview_aggregates_the_seeded_orders() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let today = Utc::now().date_naive();
    seed(&repo, today);

    let range = ReportRange {
        start: today - Duration::days(30),
        end: today,
    };

    let overview = repo.overview(range, today).unwrap();
    assert_eq!(overview.pending_orders, 1);
    assert_eq!(overview.in_progress_orders, 1);
    assert_eq!(overview.completed_orders, 2);
    assert_eq!(overview.canceled_orders, 1);
    assert_eq!(overview.revenue, 110_000);
    assert_eq!(overview.average_order_value, 55_000);
    assert_eq!(overview.new_customers, 2);
    assert_eq!(overview.outstanding_balance, 60_000);
    assert_eq!(overview.delayed_orders, 1);
    assert_eq!(overview.due_soon_orders, 1);
}

#[test]
fn overview_ignores_orders_outside_the_window() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let today = Utc::now().date_naive();
    seed(&repo, today);

    // A window that predates every seeded order.
    let range = ReportRange {
        start: today - Duration::days(90),
        end: today - Duration::days(60),
    };

    let overview = repo.overview(range, today).unwrap();
    assert_eq!(overview.completed_orders, 0);
    assert_eq!(overview.revenue, 0);
    assert_eq!(overview.average_order_value, 0);
    assert_eq!(overview.new_customers, 0);

    // Open work is reported as it stands, whatever the window.
    assert_eq!(overview.outstanding_balance, 60_000);
    assert_eq!(overview.delayed_orders, 1);
    assert_eq!(overview.due_soon_orders, 1);

    assert!(repo.top_customers(range, 5).unwrap().is_empty());
    assert!(repo.top_products(range, 5).unwrap().is_empty());
}

#[test]
fn rankings_order_by_completed_spend() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let today = Utc::now().date_naive();
    let seeded = seed(&repo, today);

    let range = ReportRange {
        start: today - Duration::days(30),
        end: today,
    };

    let top_customers = repo.top_customers(range, 5).unwrap();
    assert_eq!(top_customers.len(), 2);
    assert_eq!(top_customers[0].customer_id, seeded.first.id);
    assert_eq!(top_customers[0].name, "Sara Ahmadi");
    assert_eq!(top_customers[0].orders, 1);
    assert_eq!(top_customers[0].total_spent, 80_000);
    assert_eq!(top_customers[1].customer_id, seeded.second.id);
    assert_eq!(top_customers[1].total_spent, 30_000);

    let top_products = repo.top_products(range, 5).unwrap();
    assert_eq!(top_products.len(), 2);
    assert_eq!(top_products[0].product_id, seeded.frame.id);
    assert_eq!(top_products[0].size, "30x40");
    assert_eq!(top_products[0].units_sold, 2);
    assert_eq!(top_products[0].revenue, 80_000);
    assert_eq!(top_products[1].product_id, seeded.print.id);
    assert_eq!(top_products[1].units_sold, 1);
    assert_eq!(top_products[1].revenue, 30_000);
}

#[test]
fn dashboard_service_applies_period_and_limit() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let today = Utc::now().date_naive();
    let seeded = seed(&repo, today);

    let data = dashboard::load_dashboard(
        &repo,
        DashboardQuery {
            period: ReportPeriod::Custom {
                start: today - Duration::days(30),
                end: today,
            },
            limit: Some(1),
        },
    )
    .expect("dashboard should load");

    assert_eq!(data.overview.revenue, 110_000);
    assert_eq!(data.top_customers.len(), 1);
    assert_eq!(data.top_customers[0].customer_id, seeded.first.id);
    assert_eq!(data.top_products.len(), 1);
    assert_eq!(data.top_products[0].product_id, seeded.frame.id);
}
