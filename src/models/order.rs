use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem, Order as DomainOrder,
    OrderItem as DomainOrderItem, OrderStatusEntry as DomainOrderStatusEntry,
    UpdateOrder as DomainUpdateOrder,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub customer_id: i32,
    pub status: String,
    pub priority: String,
    pub description: Option<String>,
    pub order_date: NaiveDate,
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment: i64,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub customer_id: i32,
    pub status: &'a str,
    pub priority: &'a str,
    pub description: Option<&'a str>,
    pub order_date: NaiveDate,
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment: i64,
    pub balance: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateOrder<'a> {
    pub customer_id: i32,
    pub status: &'a str,
    pub priority: &'a str,
    pub description: Option<&'a str>,
    pub order_date: NaiveDate,
    pub delivery_days: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
    pub payment: i64,
    pub balance: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::order_status_history)]
pub struct OrderStatusEntry {
    pub id: i32,
    pub order_id: i32,
    pub status: String,
    pub changed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_status_history)]
pub struct NewOrderStatusEntry<'a> {
    pub order_id: i32,
    pub status: &'a str,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> DomainOrder {
        DomainOrder {
            id: self.id,
            customer_id: self.customer_id,
            status: self.status.as_str().into(),
            priority: self.priority.as_str().into(),
            description: self.description,
            order_date: self.order_date,
            delivery_days: self.delivery_days,
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            payment: self.payment,
            balance: self.balance,
            items: items.into_iter().map(DomainOrderItem::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<OrderItem> for DomainOrderItem {
    fn from(value: OrderItem) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal,
        }
    }
}

impl From<(Order, Vec<OrderItem>)> for DomainOrder {
    fn from(value: (Order, Vec<OrderItem>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl From<OrderStatusEntry> for DomainOrderStatusEntry {
    fn from(value: OrderStatusEntry) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            status: value.status.as_str().into(),
            changed_at: value.changed_at,
        }
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            status: value.status.into(),
            priority: value.priority.into(),
            description: value.description.as_deref(),
            order_date: value.order_date,
            delivery_days: value.delivery_days,
            subtotal: value.subtotal,
            discount: value.discount,
            total: value.total,
            payment: value.payment,
            balance: value.balance,
            updated_at: value.updated_at,
        }
    }
}

impl NewOrderItem {
    pub fn from_domain(order_id: i32, value: &DomainNewOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            subtotal: value.subtotal(),
        }
    }
}

impl<'a> From<&'a DomainUpdateOrder> for UpdateOrder<'a> {
    fn from(value: &'a DomainUpdateOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            status: value.status.into(),
            priority: value.priority.into(),
            description: value.description.as_deref(),
            order_date: value.order_date,
            delivery_days: value.delivery_days,
            subtotal: value.subtotal,
            discount: value.discount,
            total: value.total,
            payment: value.payment,
            balance: value.balance,
            updated_at: value.updated_at,
        }
    }
}
