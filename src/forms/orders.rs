use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{NewOrder, NewOrderItem, OrderPriority, OrderStatus, UpdateOrder};
use crate::domain::product::Product;
use crate::forms::sanitize_multiline_text;

/// Maximum allowed length for an order description.
const DESCRIPTION_MAX_LEN: usize = 1024;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Longest accepted delivery window in days.
const DELIVERY_DAYS_MAX: i32 = 365;

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing order forms.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The submitted item set is empty.
    #[error("order must contain at least one item")]
    NoItems,
    /// An item refers to a product that is not in the catalog.
    #[error("unknown product {product_id}")]
    UnknownProduct { product_id: i32 },
}

/// One line of the order form.
#[derive(Debug, Deserialize, Validate)]
pub struct OrderItemForm {
    /// Catalog product picked by the user.
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Ordered quantity, at least one.
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Form payload emitted when taking a new order.
#[derive(Debug, Deserialize, Validate)]
pub struct AddOrderForm {
    /// Customer the order is taken for.
    #[validate(range(min = 1))]
    pub customer_id: i32,
    /// Date the order was taken.
    pub order_date: NaiveDate,
    /// Delivery deadline as a day offset from the order date.
    #[validate(range(min = 0, max = DELIVERY_DAYS_MAX))]
    pub delivery_days: i32,
    /// Production priority; defaults to normal.
    #[serde(default)]
    pub priority: OrderPriority,
    /// Optional free-text description.
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
    /// Discount in smallest currency units.
    #[validate(range(min = 0))]
    pub discount: i64,
    /// Amount already paid in smallest currency units.
    #[validate(range(min = 0))]
    pub payment: i64,
    /// Submitted line items.
    #[validate(nested)]
    pub items: Vec<OrderItemForm>,
}

impl AddOrderForm {
    /// Validates the payload and snapshots catalog prices into a domain
    /// `NewOrder`.
    pub fn into_new_order(self, products: &[Product]) -> OrderFormResult<NewOrder> {
        self.validate()?;

        if self.items.is_empty() {
            return Err(OrderFormError::NoItems);
        }

        let items = resolve_items(&self.items, products)?;

        let mut new_order = NewOrder::new(
            self.customer_id,
            self.order_date,
            items,
            self.discount,
            self.payment,
        )
        .with_priority(self.priority)
        .with_delivery_days(self.delivery_days);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_order = new_order.with_description(description);
        }

        Ok(new_order)
    }
}

/// Form payload emitted when editing an existing order.
///
/// Edits resubmit the full order; prices are snapshotted again from the
/// current catalog.
#[derive(Debug, Deserialize, Validate)]
pub struct EditOrderForm {
    /// Identifier of the order to update.
    #[validate(range(min = 1))]
    pub id: i32,
    /// Customer the order belongs to after the edit.
    #[validate(range(min = 1))]
    pub customer_id: i32,
    /// Date the order was taken.
    pub order_date: NaiveDate,
    /// Delivery deadline as a day offset from the order date.
    #[validate(range(min = 0, max = DELIVERY_DAYS_MAX))]
    pub delivery_days: i32,
    /// Status the edit should leave the order in.
    pub status: OrderStatus,
    /// Production priority after the edit.
    #[serde(default)]
    pub priority: OrderPriority,
    /// Optional free-text description; empty or missing clears it.
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
    /// Discount in smallest currency units.
    #[validate(range(min = 0))]
    pub discount: i64,
    /// Amount already paid in smallest currency units.
    #[validate(range(min = 0))]
    pub payment: i64,
    /// Replacement line items.
    #[validate(nested)]
    pub items: Vec<OrderItemForm>,
}

impl EditOrderForm {
    /// Validates the payload and snapshots catalog prices into a domain
    /// `UpdateOrder`.
    pub fn into_update_order(self, products: &[Product]) -> OrderFormResult<UpdateOrder> {
        self.validate()?;

        if self.items.is_empty() {
            return Err(OrderFormError::NoItems);
        }

        let items = resolve_items(&self.items, products)?;

        let mut updates = UpdateOrder::new(
            self.customer_id,
            self.order_date,
            items,
            self.discount,
            self.payment,
        )
        .with_status(self.status)
        .with_priority(self.priority)
        .with_delivery_days(self.delivery_days);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            updates = updates.with_description(description);
        }

        Ok(updates)
    }
}

fn resolve_items(
    items: &[OrderItemForm],
    products: &[Product],
) -> OrderFormResult<Vec<NewOrderItem>> {
    let price_lookup: HashMap<i32, i64> = products
        .iter()
        .map(|product| (product.id, product.price))
        .collect();

    items
        .iter()
        .map(|item| {
            let unit_price =
                price_lookup
                    .get(&item.product_id)
                    .copied()
                    .ok_or(OrderFormError::UnknownProduct {
                        product_id: item.product_id,
                    })?;
            Ok(NewOrderItem::new(item.product_id, item.quantity, unit_price))
        })
        .collect()
}
