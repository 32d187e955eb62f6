use chrono::NaiveDate;
use mockall::mock;

use super::{
    CustomerReader, CustomerWriter, DashboardReader, LoyaltyReader, LoyaltyWriter, OrderReader,
    OrderWriter, ProductReader, ProductWriter, ReferralReader,
};
use crate::domain::{
    customer::{Customer, CustomerLinks, CustomerListQuery, NewCustomer, UpdateCustomer},
    loyalty::{LevelHistoryEntry, LoyaltySettings, PointEvent, PointHistoryEntry, Settlement},
    order::{NewOrder, Order, OrderListQuery, OrderStatus, OrderStatusEntry, UpdateOrder},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    referral::{Referral, ReferralChange},
    report::{DashboardOverview, ReportRange, TopCustomer, TopProduct},
};
use crate::repository::errors::RepositoryResult;

mock! {
    pub CustomerReader {}

    impl CustomerReader for CustomerReader {
        fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_phone(&self, phone: &str) -> RepositoryResult<Option<Customer>>;
        fn find_customers_by_name(&self, first_name: &str, last_name: &str) -> RepositoryResult<Vec<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
        fn customer_links(&self, customer_id: i32) -> RepositoryResult<CustomerLinks>;
    }
}

mock! {
    pub CustomerWriter {}

    impl CustomerWriter for CustomerWriter {
        fn create_customer(&self, new_customer: &NewCustomer, settings: &LoyaltySettings) -> RepositoryResult<(Customer, Option<Settlement>)>;
        fn update_customer(&self, customer_id: i32, updates: &UpdateCustomer, settings: &LoyaltySettings) -> RepositoryResult<(Customer, ReferralChange)>;
        fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ReferralReader {}

    impl ReferralReader for ReferralReader {
        fn get_referral_for(&self, referred_id: i32) -> RepositoryResult<Option<Referral>>;
        fn list_referrals_by(&self, referrer_id: i32) -> RepositoryResult<Vec<Referral>>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<OrderStatusEntry>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn create_order(&self, new_order: &NewOrder, settings: &LoyaltySettings) -> RepositoryResult<(Order, Option<Settlement>)>;
        fn update_order(&self, order_id: i32, updates: &UpdateOrder, settings: &LoyaltySettings) -> RepositoryResult<(Order, Option<Settlement>)>;
        fn set_order_status(&self, order_id: i32, status: OrderStatus, settings: &LoyaltySettings) -> RepositoryResult<(Order, Option<Settlement>)>;
        fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn product_usage(&self, product_id: i32) -> RepositoryResult<i64>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub LoyaltyReader {}

    impl LoyaltyReader for LoyaltyReader {
        fn list_point_history(&self, customer_id: i32) -> RepositoryResult<Vec<PointHistoryEntry>>;
        fn list_level_history(&self, customer_id: i32) -> RepositoryResult<Vec<LevelHistoryEntry>>;
    }
}

mock! {
    pub LoyaltyWriter {}

    impl LoyaltyWriter for LoyaltyWriter {
        fn apply_point_event(&self, customer_id: i32, delta: i32, event: PointEvent, related_id: Option<i32>, settings: &LoyaltySettings) -> RepositoryResult<Settlement>;
    }
}

mock! {
    pub DashboardReader {}

    impl DashboardReader for DashboardReader {
        fn overview(&self, range: ReportRange, today: NaiveDate) -> RepositoryResult<DashboardOverview>;
        fn top_customers(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopCustomer>>;
        fn top_products(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopProduct>>;
    }
}
