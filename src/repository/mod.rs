use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::customer::{Customer, CustomerLinks, CustomerListQuery, NewCustomer, UpdateCustomer};
use crate::domain::loyalty::{
    LevelHistoryEntry, LoyaltySettings, PointEvent, PointHistoryEntry, Settlement,
};
use crate::domain::order::{
    NewOrder, Order, OrderListQuery, OrderStatus, OrderStatusEntry, UpdateOrder,
};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::referral::{Referral, ReferralChange};
use crate::domain::report::{DashboardOverview, ReportRange, TopCustomer, TopProduct};
use crate::repository::errors::RepositoryResult;

pub mod customer;
pub mod dashboard;
pub mod errors;
pub mod order;
pub mod product;
pub mod settlement;

#[cfg(test)]
pub mod mock;

/// Diesel-backed repository implementation that wraps an r2d2 pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over customer records.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>>;
    /// Exact match on the stored name parts; may return several customers.
    fn find_customers_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Vec<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    /// Counts of dependent records consulted by delete guards.
    fn customer_links(&self, customer_id: i32) -> RepositoryResult<CustomerLinks>;
}

/// Write operations over customer records.
///
/// Referral bookkeeping and the settlements it triggers run inside the
/// same transaction as the customer row change.
pub trait CustomerWriter {
    fn create_customer(
        &self,
        new_customer: &NewCustomer,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(Customer, Option<Settlement>)>;
    fn update_customer(
        &self,
        customer_id: i32,
        updates: &UpdateCustomer,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(Customer, ReferralChange)>;
    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over referral links.
pub trait ReferralReader {
    /// The active referral pointing at the given customer, if any.
    fn get_referral_for(&self, referred_id: i32) -> RepositoryResult<Option<Referral>>;
    /// Referrals made by the given customer.
    fn list_referrals_by(&self, referrer_id: i32) -> RepositoryResult<Vec<Referral>>;
}

/// Read-only operations over order records.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
    fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<OrderStatusEntry>>;
}

/// Write operations over order records.
///
/// Each method is one transaction; a transition into the completed
/// status settles loyalty points within it.
pub trait OrderWriter {
    fn create_order(
        &self,
        new_order: &NewOrder,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(Order, Option<Settlement>)>;
    fn update_order(
        &self,
        order_id: i32,
        updates: &UpdateOrder,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(Order, Option<Settlement>)>;
    fn set_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(Order, Option<Settlement>)>;
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the product catalog.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Number of order lines referencing the product.
    fn product_usage(&self, product_id: i32) -> RepositoryResult<i64>;
}

/// Write operations over the product catalog.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over the loyalty audit trails.
pub trait LoyaltyReader {
    fn list_point_history(&self, customer_id: i32) -> RepositoryResult<Vec<PointHistoryEntry>>;
    fn list_level_history(&self, customer_id: i32) -> RepositoryResult<Vec<LevelHistoryEntry>>;
}

/// Write access to the settlement pipeline for standalone point events.
pub trait LoyaltyWriter {
    /// Apply a manual point event atomically: balance change, history
    /// row and level recomputation.
    fn apply_point_event(
        &self,
        customer_id: i32,
        delta: i32,
        event: PointEvent,
        related_id: Option<i32>,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<Settlement>;
}

/// Read-only reporting aggregates.
pub trait DashboardReader {
    fn overview(&self, range: ReportRange, today: NaiveDate) -> RepositoryResult<DashboardOverview>;
    fn top_customers(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopCustomer>>;
    fn top_products(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopProduct>>;
}
