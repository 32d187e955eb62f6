use chrono::Utc;
use serde::Deserialize;

use crate::domain::report::{DashboardOverview, ReportPeriod, TopCustomer, TopProduct};
use crate::repository::DashboardReader;
use crate::services::{ServiceError, ServiceResult};

/// Ranking length used when the caller does not ask for one.
const DEFAULT_TOP_LIMIT: i64 = 5;

/// Query parameters accepted by the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub period: ReportPeriod,
    /// Length of the top-customer and top-product rankings.
    pub limit: Option<i64>,
}

/// Everything the dashboard view shows for one reporting window.
pub struct DashboardData {
    pub overview: DashboardOverview,
    pub top_customers: Vec<TopCustomer>,
    pub top_products: Vec<TopProduct>,
}

fn effective_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(limit) if limit > 0 => limit,
        _ => DEFAULT_TOP_LIMIT,
    }
}

/// Computes the aggregate figures for the given reporting period.
pub fn load_overview<R>(repo: &R, period: ReportPeriod) -> ServiceResult<DashboardOverview>
where
    R: DashboardReader + ?Sized,
{
    let today = Utc::now().date_naive();
    let range = period.resolve(today);
    repo.overview(range, today).map_err(ServiceError::from)
}

/// Ranks customers by completed order spend within the period.
pub fn load_top_customers<R>(
    repo: &R,
    period: ReportPeriod,
    limit: Option<i64>,
) -> ServiceResult<Vec<TopCustomer>>
where
    R: DashboardReader + ?Sized,
{
    let today = Utc::now().date_naive();
    let range = period.resolve(today);
    repo.top_customers(range, effective_limit(limit))
        .map_err(ServiceError::from)
}

/// Ranks products by completed order revenue within the period.
pub fn load_top_products<R>(
    repo: &R,
    period: ReportPeriod,
    limit: Option<i64>,
) -> ServiceResult<Vec<TopProduct>>
where
    R: DashboardReader + ?Sized,
{
    let today = Utc::now().date_naive();
    let range = period.resolve(today);
    repo.top_products(range, effective_limit(limit))
        .map_err(ServiceError::from)
}

/// Loads the overview and both rankings in one call.
pub fn load_dashboard<R>(repo: &R, query: DashboardQuery) -> ServiceResult<DashboardData>
where
    R: DashboardReader + ?Sized,
{
    Ok(DashboardData {
        overview: load_overview(repo, query.period)?,
        top_customers: load_top_customers(repo, query.period, query.limit)?,
        top_products: load_top_products(repo, query.period, query.limit)?,
    })
}
