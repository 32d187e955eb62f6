use serde::Deserialize;

use crate::domain::loyalty::{LoyaltySettings, Settlement};
use crate::domain::order::{Order, OrderListQuery, OrderPriority, OrderStatus, OrderStatusEntry};
use crate::forms::orders::{AddOrderForm, EditOrderForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CustomerReader, OrderReader, OrderWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<OrderStatus>,
    pub priority: Option<OrderPriority>,
    pub customer_id: Option<i32>,
    /// Search term matched against the order description.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data needed to render the order list.
pub struct OrdersPageData {
    pub orders: Paginated<Order>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

/// Outcome of an order write.
pub struct OrderOutcome {
    pub order: Order,
    /// Settlement applied when the write moved the order to completed.
    pub settlement: Option<Settlement>,
}

/// One order together with its status trail.
pub struct OrderDetails {
    pub order: Order,
    pub status_history: Vec<OrderStatusEntry>,
}

fn log_settlement(order_id: i32, settlement: &Settlement) {
    log::info!(
        "Order {order_id} completed: {} points settled for customer {}",
        settlement.delta,
        settlement.customer_id
    );
    if settlement.level_changed() {
        let level: &str = settlement.new_level.into();
        log::info!(
            "Customer {} reached the {level} level",
            settlement.customer_id
        );
    }
}

/// Creates an order, snapshotting unit prices from the product registry.
pub fn create_order<R>(
    repo: &R,
    form: AddOrderForm,
    settings: &LoyaltySettings,
) -> ServiceResult<OrderOutcome>
where
    R: CustomerReader + ProductReader + OrderWriter + ?Sized,
{
    repo.get_customer_by_id(form.customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let product_ids: Vec<i32> = form.items.iter().map(|item| item.product_id).collect();
    let products = repo
        .get_products_by_ids(&product_ids)
        .map_err(ServiceError::from)?;

    let new_order = form
        .into_new_order(&products)
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    let (order, settlement) = match repo.create_order(&new_order, settings) {
        Ok(result) => result,
        Err(err) => {
            log::error!(
                "Failed to create order for customer {}: {err}",
                new_order.customer_id
            );
            return Err(ServiceError::from(err));
        }
    };

    if let Some(settlement) = &settlement {
        log_settlement(order.id, settlement);
    }

    Ok(OrderOutcome { order, settlement })
}

/// Rewrites an order and its items, re-snapshotting unit prices.
pub fn modify_order<R>(
    repo: &R,
    form: EditOrderForm,
    settings: &LoyaltySettings,
) -> ServiceResult<OrderOutcome>
where
    R: CustomerReader + ProductReader + OrderWriter + ?Sized,
{
    let order_id = form.id;

    repo.get_customer_by_id(form.customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let product_ids: Vec<i32> = form.items.iter().map(|item| item.product_id).collect();
    let products = repo
        .get_products_by_ids(&product_ids)
        .map_err(ServiceError::from)?;

    let updates = form
        .into_update_order(&products)
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    let (order, settlement) = match repo.update_order(order_id, &updates, settings) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to update order {order_id}: {err}");
            return Err(ServiceError::from(err));
        }
    };

    if let Some(settlement) = &settlement {
        log_settlement(order_id, settlement);
    }

    Ok(OrderOutcome { order, settlement })
}

/// Moves an order to a new status.
///
/// Completion settles loyalty points exactly once; re-completing an
/// already completed order is a no-op for points.
pub fn change_order_status<R>(
    repo: &R,
    order_id: i32,
    status: OrderStatus,
    settings: &LoyaltySettings,
) -> ServiceResult<OrderOutcome>
where
    R: OrderWriter + ?Sized,
{
    let (order, settlement) = match repo.set_order_status(order_id, status, settings) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to change status of order {order_id}: {err}");
            return Err(ServiceError::from(err));
        }
    };

    if let Some(settlement) = &settlement {
        log_settlement(order_id, settlement);
    }

    Ok(OrderOutcome { order, settlement })
}

/// Deletes an order and its items.
///
/// Points settled for a completed order stay with the customer; the
/// audit trail keeps referring to the deleted order id.
pub fn remove_order<R>(repo: &R, order_id: i32) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    repo.delete_order(order_id).map_err(ServiceError::from)?;
    log::info!("Order {order_id} deleted");
    Ok(())
}

/// Loads one order with its status trail.
pub fn load_order<R>(repo: &R, order_id: i32) -> ServiceResult<OrderDetails>
where
    R: OrderReader + ?Sized,
{
    let order = repo
        .get_order_by_id(order_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let status_history = repo
        .list_status_history(order_id)
        .map_err(ServiceError::from)?;

    Ok(OrderDetails {
        order,
        status_history,
    })
}

/// Returns one page of orders matching the query.
pub fn load_orders<R>(repo: &R, query: OrdersQuery) -> ServiceResult<OrdersPageData>
where
    R: OrderReader + ?Sized,
{
    let page = query.page.unwrap_or(1);
    let mut list_query = OrderListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(priority) = query.priority {
        list_query = list_query.priority(priority);
    }
    if let Some(customer_id) = query.customer_id {
        list_query = list_query.customer_id(customer_id);
    }
    if let Some(term) = &query.search {
        list_query = list_query.search(term.as_str());
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;

    Ok(OrdersPageData {
        orders: Paginated::new(orders, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search: query.search,
        status: query.status,
    })
}
