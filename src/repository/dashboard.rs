use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;

use crate::domain::order::OrderStatus;
use crate::domain::report::{DashboardOverview, ReportRange, TopCustomer, TopProduct};
use crate::models::customer::Customer as DbCustomer;
use crate::models::order::Order as DbOrder;
use crate::models::product::Product as DbProduct;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DashboardReader, DieselRepository};

/// Window used by the "due soon" dashboard figure.
const DUE_SOON_DAYS: i64 = 2;

diesel::define_sql_function! {
    /// `SUM` over a `BigInt` column, typed to stay `BigInt`. Diesel's
    /// stock `sum` folds `BigInt` to `Numeric`, which SQLite can only
    /// deserialize as `BigDecimal`; the money totals here are plain
    /// `i64` cents, so keep the integer type.
    #[aggregate]
    #[sql_name = "SUM"]
    fn sum_i64(expr: diesel::sql_types::BigInt) -> diesel::sql_types::Nullable<diesel::sql_types::BigInt>;
}

impl DashboardReader for DieselRepository {
    fn overview(
        &self,
        range: ReportRange,
        today: NaiveDate,
    ) -> RepositoryResult<DashboardOverview> {
        use crate::schema::{customers, orders};

        let mut conn = self.conn()?;
        let completed: &str = OrderStatus::Completed.into();

        let mut overview = DashboardOverview::default();

        let status_counts: Vec<(String, i64)> = orders::table
            .filter(orders::order_date.between(range.start, range.end))
            .group_by(orders::status)
            .select((orders::status, count_star()))
            .load(&mut conn)?;

        for (status, count) in status_counts {
            match OrderStatus::from(status.as_str()) {
                OrderStatus::Pending => overview.pending_orders = count,
                OrderStatus::InProgress => overview.in_progress_orders = count,
                OrderStatus::Completed => overview.completed_orders = count,
                OrderStatus::Canceled => overview.canceled_orders = count,
            }
        }

        overview.revenue = orders::table
            .filter(orders::order_date.between(range.start, range.end))
            .filter(orders::status.eq(completed))
            .select(sum_i64(orders::total))
            .get_result::<Option<i64>>(&mut conn)?
            .unwrap_or(0);

        if overview.completed_orders > 0 {
            overview.average_order_value = overview.revenue / overview.completed_orders;
        }

        let window_start = range.start.and_time(NaiveTime::MIN);
        let window_end = (range.end + Duration::days(1)).and_time(NaiveTime::MIN);

        overview.new_customers = customers::table
            .filter(customers::created_at.ge(window_start))
            .filter(customers::created_at.lt(window_end))
            .count()
            .get_result::<i64>(&mut conn)?;

        // Balance and delay figures describe open work as it stands
        // today, independent of the reporting window.
        let open_statuses: [&str; 2] = [
            OrderStatus::Pending.into(),
            OrderStatus::InProgress.into(),
        ];

        let open_orders = orders::table
            .filter(orders::status.eq_any(open_statuses))
            .load::<DbOrder>(&mut conn)?;

        for db_order in open_orders {
            let order = db_order.into_domain(Vec::new());
            overview.outstanding_balance += order.balance;
            if order.is_delayed(today) {
                overview.delayed_orders += 1;
            }
            if order.is_due_within(today, DUE_SOON_DAYS) {
                overview.due_soon_orders += 1;
            }
        }

        Ok(overview)
    }

    fn top_customers(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopCustomer>> {
        use crate::schema::{customers, orders};

        let mut conn = self.conn()?;
        let completed: &str = OrderStatus::Completed.into();

        let rows: Vec<(i32, i64, Option<i64>)> = orders::table
            .filter(orders::order_date.between(range.start, range.end))
            .filter(orders::status.eq(completed))
            .group_by(orders::customer_id)
            .select((orders::customer_id, count_star(), sum_i64(orders::total)))
            .order(sum_i64(orders::total).desc())
            .limit(limit)
            .load(&mut conn)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|(customer_id, _, _)| *customer_id).collect();

        let customer_lookup: HashMap<i32, DbCustomer> = customers::table
            .filter(customers::id.eq_any(&ids))
            .load::<DbCustomer>(&mut conn)?
            .into_iter()
            .map(|customer| (customer.id, customer))
            .collect();

        let top = rows
            .into_iter()
            .filter_map(|(customer_id, orders, total_spent)| {
                let customer = customer_lookup.get(&customer_id)?;
                Some(TopCustomer {
                    customer_id,
                    name: format!("{} {}", customer.first_name, customer.last_name),
                    phone: customer.phone.clone(),
                    orders,
                    total_spent: total_spent.unwrap_or(0),
                })
            })
            .collect();

        Ok(top)
    }

    fn top_products(&self, range: ReportRange, limit: i64) -> RepositoryResult<Vec<TopProduct>> {
        use crate::schema::{order_items, orders, products};

        let mut conn = self.conn()?;
        let completed: &str = OrderStatus::Completed.into();

        let rows: Vec<(i32, Option<i64>, Option<i64>)> = order_items::table
            .inner_join(orders::table)
            .filter(orders::order_date.between(range.start, range.end))
            .filter(orders::status.eq(completed))
            .group_by(order_items::product_id)
            .select((
                order_items::product_id,
                sum(order_items::quantity),
                sum_i64(order_items::subtotal),
            ))
            .order(sum_i64(order_items::subtotal).desc())
            .limit(limit)
            .load(&mut conn)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|(product_id, _, _)| *product_id).collect();

        let product_lookup: HashMap<i32, DbProduct> = products::table
            .filter(products::id.eq_any(&ids))
            .load::<DbProduct>(&mut conn)?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let top = rows
            .into_iter()
            .filter_map(|(product_id, units_sold, revenue)| {
                let product = product_lookup.get(&product_id)?;
                Some(TopProduct {
                    product_id,
                    code: product.code.clone(),
                    size: product.size.clone(),
                    units_sold: units_sold.unwrap_or(0),
                    revenue: revenue.unwrap_or(0),
                })
            })
            .collect();

        Ok(top)
    }
}
