use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::loyalty::{LoyaltySettings, PointEvent, Settlement};
use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, OrderListQuery, OrderStatus,
    OrderStatusEntry as DomainOrderStatusEntry, UpdateOrder as DomainUpdateOrder,
};
use crate::models::order::{
    NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem,
    NewOrderStatusEntry as DbNewOrderStatusEntry, Order as DbOrder, OrderItem as DbOrderItem,
    OrderStatusEntry as DbOrderStatusEntry, UpdateOrder as DbUpdateOrder,
};
use crate::repository::customer::ensure_customer_exists;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::settlement::settle;
use crate::repository::{DieselRepository, OrderReader, OrderWriter};

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<DomainOrder>> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;
        let order = orders::table
            .filter(orders::id.eq(id))
            .first::<DbOrder>(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = order_items::table
            .filter(order_items::order_id.eq(order.id))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        Ok(Some(DomainOrder::from((order, items))))
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<DomainOrder>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        let OrderListQuery {
            status,
            priority,
            customer_id,
            search,
            pagination,
        } = query;

        let status_filter = status.map(<&str>::from);
        let priority_filter = priority.map(<&str>::from);
        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            count_query = count_query.filter(orders::status.eq(status_value));
        }

        if let Some(priority_value) = priority_filter {
            count_query = count_query.filter(orders::priority.eq(priority_value));
        }

        if let Some(customer) = customer_id {
            count_query = count_query.filter(orders::customer_id.eq(customer));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(orders::description.like(pattern.clone()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = orders::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status_value) = status_filter {
            items_query = items_query.filter(orders::status.eq(status_value));
        }

        if let Some(priority_value) = priority_filter {
            items_query = items_query.filter(orders::priority.eq(priority_value));
        }

        if let Some(customer) = customer_id {
            items_query = items_query.filter(orders::customer_id.eq(customer));
        }

        if let Some(ref pattern) = search_pattern {
            items_query = items_query.filter(orders::description.like(pattern.clone()));
        }

        items_query = items_query.order(orders::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items_query = items_query.offset(offset).limit(limit);
        }

        let db_orders = items_query.load::<DbOrder>(&mut conn)?;
        if db_orders.is_empty() {
            return Ok((total, Vec::new()));
        }

        let order_ids: Vec<i32> = db_orders.iter().map(|order| order.id).collect();

        let mut items_by_order: HashMap<i32, Vec<DbOrderItem>> = HashMap::new();

        let rows = order_items::table
            .filter(order_items::order_id.eq_any(&order_ids))
            .order(order_items::id.asc())
            .load::<DbOrderItem>(&mut conn)?;

        for item in rows {
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        let orders = db_orders
            .into_iter()
            .map(|order| {
                let items = items_by_order.remove(&order.id).unwrap_or_default();
                DomainOrder::from((order, items))
            })
            .collect();

        Ok((total, orders))
    }

    fn list_status_history(&self, order_id: i32) -> RepositoryResult<Vec<DomainOrderStatusEntry>> {
        use crate::schema::order_status_history;

        let mut conn = self.conn()?;
        let rows = order_status_history::table
            .filter(order_status_history::order_id.eq(order_id))
            .order((
                order_status_history::changed_at.asc(),
                order_status_history::id.asc(),
            ))
            .load::<DbOrderStatusEntry>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(
        &self,
        new_order: &DomainNewOrder,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(DomainOrder, Option<Settlement>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(DomainOrder, Option<Settlement>), RepositoryError, _>(|conn| {
            ensure_customer_exists(conn, new_order.customer_id)?;

            let db_new = DbNewOrder::from(new_order);

            let created = diesel::insert_into(orders::table)
                .values(&db_new)
                .get_result::<DbOrder>(conn)?;

            if !new_order.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = new_order
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(created.id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            // An order taken directly in the completed status settles
            // points right away.
            let settlement = if OrderStatus::from(created.status.as_str())
                == OrderStatus::Completed
            {
                Some(settle(
                    conn,
                    created.customer_id,
                    settings.points_for_order(created.total),
                    PointEvent::Order,
                    Some(created.id),
                    settings,
                )?)
            } else {
                None
            };

            let items = order_items::table
                .filter(order_items::order_id.eq(created.id))
                .order(order_items::id.asc())
                .load::<DbOrderItem>(conn)?;

            Ok((DomainOrder::from((created, items)), settlement))
        })
    }

    fn update_order(
        &self,
        order_id: i32,
        updates: &DomainUpdateOrder,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(DomainOrder, Option<Settlement>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(DomainOrder, Option<Settlement>), RepositoryError, _>(|conn| {
            let before = orders::table
                .filter(orders::id.eq(order_id))
                .first::<DbOrder>(conn)?;

            ensure_customer_exists(conn, updates.customer_id)?;

            let db_updates = DbUpdateOrder::from(updates);

            let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                .set(&db_updates)
                .get_result::<DbOrder>(conn)?;

            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;

            if !updates.items.is_empty() {
                let payload: Vec<DbNewOrderItem> = updates
                    .items
                    .iter()
                    .map(|item| DbNewOrderItem::from_domain(order_id, item))
                    .collect();

                diesel::insert_into(order_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            let was_completed =
                OrderStatus::from(before.status.as_str()) == OrderStatus::Completed;
            let now_completed =
                OrderStatus::from(updated.status.as_str()) == OrderStatus::Completed;

            // Points settle only when the edit moves the order into the
            // completed status; a re-saved completed order never re-awards.
            let settlement = if now_completed && !was_completed {
                Some(settle(
                    conn,
                    updated.customer_id,
                    settings.points_for_order(updated.total),
                    PointEvent::Order,
                    Some(order_id),
                    settings,
                )?)
            } else {
                None
            };

            let items = order_items::table
                .filter(order_items::order_id.eq(order_id))
                .order(order_items::id.asc())
                .load::<DbOrderItem>(conn)?;

            Ok((DomainOrder::from((updated, items)), settlement))
        })
    }

    fn set_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(DomainOrder, Option<Settlement>)> {
        use crate::schema::{order_items, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(DomainOrder, Option<Settlement>), RepositoryError, _>(|conn| {
            let status_value: &str = status.into();

            let settlement = if status == OrderStatus::Completed {
                // Guarded write: only a row that was not already completed
                // is marked, so a racing duplicate request settles nothing.
                let marked = diesel::update(
                    orders::table
                        .filter(orders::id.eq(order_id))
                        .filter(orders::status.ne(status_value)),
                )
                .set((
                    orders::status.eq(status_value),
                    orders::updated_at.eq(diesel::dsl::now),
                ))
                .execute(conn)?;

                if marked == 1 {
                    let order = orders::table
                        .filter(orders::id.eq(order_id))
                        .first::<DbOrder>(conn)?;

                    log_status(conn, order_id, status_value)?;

                    Some(settle(
                        conn,
                        order.customer_id,
                        settings.points_for_order(order.total),
                        PointEvent::Order,
                        Some(order_id),
                        settings,
                    )?)
                } else {
                    // Raises NotFound when the order is missing; otherwise
                    // it was already completed and the call is a no-op.
                    orders::table
                        .filter(orders::id.eq(order_id))
                        .first::<DbOrder>(conn)?;

                    None
                }
            } else {
                let changed = diesel::update(orders::table.filter(orders::id.eq(order_id)))
                    .set((
                        orders::status.eq(status_value),
                        orders::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)?;

                if changed == 0 {
                    return Err(RepositoryError::NotFound);
                }

                log_status(conn, order_id, status_value)?;

                None
            };

            let order = orders::table
                .filter(orders::id.eq(order_id))
                .first::<DbOrder>(conn)?;

            let items = order_items::table
                .filter(order_items::order_id.eq(order_id))
                .order(order_items::id.asc())
                .load::<DbOrderItem>(conn)?;

            Ok((DomainOrder::from((order, items)), settlement))
        })
    }

    fn delete_order(&self, order_id: i32) -> RepositoryResult<()> {
        use crate::schema::{order_items, order_status_history, orders};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
                .execute(conn)?;

            diesel::delete(
                order_status_history::table.filter(order_status_history::order_id.eq(order_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(orders::table.filter(orders::id.eq(order_id)))
                .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn log_status(
    conn: &mut SqliteConnection,
    order_id: i32,
    status: &str,
) -> RepositoryResult<()> {
    use crate::schema::order_status_history;

    diesel::insert_into(order_status_history::table)
        .values(&DbNewOrderStatusEntry { order_id, status })
        .execute(conn)?;

    Ok(())
}
