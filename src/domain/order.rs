use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Lifecycle states for a studio order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been taken but work has not started.
    Pending,
    /// Order is currently being produced.
    InProgress,
    /// Order has been delivered; completing it settles loyalty points once.
    Completed,
    /// Order was called off and should not be processed further.
    Canceled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl OrderStatus {
    /// Whether the order still counts as open work.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        match value {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "canceled" => Self::Canceled,
            _ => Self::Pending,
        }
    }
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }
}

/// Production priority assigned to an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Normal,
    High,
    Urgent,
}

impl Default for OrderPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl From<&str> for OrderPriority {
    fn from(value: &str) -> Self {
        match value {
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Normal,
        }
    }
}

impl From<OrderPriority> for &'static str {
    fn from(value: OrderPriority) -> Self {
        match value {
            OrderPriority::Normal => "normal",
            OrderPriority::High => "high",
            OrderPriority::Urgent => "urgent",
        }
    }
}

/// Monetary summary of an order in smallest currency units.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line item subtotals.
    pub subtotal: i64,
    /// Subtotal minus discount, clamped at zero.
    pub total: i64,
    /// Total minus payments; negative means overpayment.
    pub balance: i64,
}

impl OrderTotals {
    /// Derive the total and balance from a subtotal, discount and payment.
    pub fn compute(subtotal: i64, discount: i64, payment: i64) -> Self {
        let total = (subtotal - discount).max(0);
        Self {
            subtotal,
            total,
            balance: total - payment,
        }
    }
}

/// One line of an order, owned by it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OrderItem {
    /// Catalog product this line refers to.
    pub product_id: i32,
    pub quantity: i32,
    /// Price per unit snapshotted when the line was written.
    pub unit_price: i64,
    /// Stored `quantity * unit_price`.
    pub subtotal: i64,
}

/// Line item payload used on order create and edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    /// Price per unit snapshotted from the catalog by the caller.
    pub unit_price: i64,
}

impl NewOrderItem {
    pub fn new(product_id: i32, quantity: i32, unit_price: i64) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn subtotal(&self) -> i64 {
        i64::from(self.quantity) * self.unit_price
    }
}

/// Sum of line subtotals for a submitted item set.
pub fn items_subtotal(items: &[NewOrderItem]) -> i64 {
    items.iter().map(NewOrderItem::subtotal).sum()
}

/// Domain representation of an order with its owned line items.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Customer the order belongs to.
    pub customer_id: i32,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub description: Option<String>,
    /// Date the order was taken.
    pub order_date: NaiveDate,
    /// Delivery deadline as a day offset from `order_date`.
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    /// Cumulative amount the customer has paid.
    pub payment: i64,
    pub balance: i64,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Order {
    /// Date the order is due for delivery.
    pub fn due_date(&self) -> NaiveDate {
        self.order_date + Duration::days(i64::from(self.delivery_days))
    }

    /// Whether the order is open and past its due date.
    pub fn is_delayed(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date() < today
    }

    /// Whether the order is open and due within the next `days` days.
    pub fn is_due_within(&self, today: NaiveDate, days: i64) -> bool {
        if !self.status.is_open() {
            return false;
        }
        let remaining = (self.due_date() - today).num_days();
        (0..=days).contains(&remaining)
    }
}

/// Payload required to insert a new order with its items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i32,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub description: Option<String>,
    pub order_date: NaiveDate,
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment: i64,
    pub balance: i64,
    pub items: Vec<NewOrderItem>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewOrder {
    /// Build an order payload, deriving the monetary summary from the items.
    #[must_use]
    pub fn new(
        customer_id: i32,
        order_date: NaiveDate,
        items: Vec<NewOrderItem>,
        discount: i64,
        payment: i64,
    ) -> Self {
        let totals = OrderTotals::compute(items_subtotal(&items), discount, payment);
        Self {
            customer_id,
            status: OrderStatus::default(),
            priority: OrderPriority::default(),
            description: None,
            order_date,
            delivery_days: 0,
            subtotal: totals.subtotal,
            discount,
            total: totals.total,
            payment,
            balance: totals.balance,
            items,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Override the default status for the new order.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Override the default priority for the new order.
    #[must_use]
    pub fn with_priority(mut self, priority: OrderPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a description to the order payload.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the delivery deadline as a day offset from the order date.
    #[must_use]
    pub fn with_delivery_days(mut self, days: i32) -> Self {
        self.delivery_days = days;
        self
    }
}

/// Full field set applied when editing an order.
///
/// Edits rewrite the order row and replace the whole item set; the
/// monetary summary is derived from the submitted items.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    pub customer_id: i32,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub description: Option<String>,
    pub order_date: NaiveDate,
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment: i64,
    pub balance: i64,
    pub items: Vec<NewOrderItem>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl UpdateOrder {
    /// Build an edit payload, deriving the monetary summary from the items.
    #[must_use]
    pub fn new(
        customer_id: i32,
        order_date: NaiveDate,
        items: Vec<NewOrderItem>,
        discount: i64,
        payment: i64,
    ) -> Self {
        let totals = OrderTotals::compute(items_subtotal(&items), discount, payment);
        Self {
            customer_id,
            status: OrderStatus::default(),
            priority: OrderPriority::default(),
            description: None,
            order_date,
            delivery_days: 0,
            subtotal: totals.subtotal,
            discount,
            total: totals.total,
            payment,
            balance: totals.balance,
            items,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Set the status the edit should leave the order in.
    #[must_use]
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the priority the edit should leave the order in.
    #[must_use]
    pub fn with_priority(mut self, priority: OrderPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Attach a description to the edit payload.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the delivery deadline as a day offset from the order date.
    #[must_use]
    pub fn with_delivery_days(mut self, days: i32) -> Self {
        self.delivery_days = days;
        self
    }
}

/// One entry of an order's status trail.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderStatusEntry {
    pub id: i32,
    pub order_id: i32,
    pub status: OrderStatus,
    pub changed_at: NaiveDateTime,
}

/// Query definition used to list orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Optional status filter.
    pub status: Option<OrderStatus>,
    /// Optional priority filter.
    pub priority: Option<OrderPriority>,
    /// Optional customer identifier filter.
    pub customer_id: Option<i32>,
    /// Optional search term matched against the description.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    /// Construct a query that targets all orders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter the results by the provided priority.
    pub fn priority(mut self, priority: OrderPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Filter the results by customer identifier.
    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Filter the results by a search term applied to the description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
