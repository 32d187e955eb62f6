use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Reporting window selected by the dashboard caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    /// Explicit bounds; inverted bounds are swapped and the end is
    /// clamped to today on resolution.
    Custom { start: NaiveDate, end: NaiveDate },
}

/// Resolved inclusive date range.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl ReportPeriod {
    /// Resolve the period against the given current date.
    ///
    /// Weeks start on Monday. Running periods (this week/month/year) end
    /// today; closed periods cover their full span.
    pub fn resolve(&self, today: NaiveDate) -> ReportRange {
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let first_of_month = today.with_day(1).unwrap_or(today);
        let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);

        match *self {
            Self::Today => ReportRange {
                start: today,
                end: today,
            },
            Self::Yesterday => {
                let yesterday = today - Duration::days(1);
                ReportRange {
                    start: yesterday,
                    end: yesterday,
                }
            }
            Self::ThisWeek => ReportRange {
                start: monday,
                end: today,
            },
            Self::LastWeek => ReportRange {
                start: monday - Duration::days(7),
                end: monday - Duration::days(1),
            },
            Self::ThisMonth => ReportRange {
                start: first_of_month,
                end: today,
            },
            Self::LastMonth => {
                let end = first_of_month - Duration::days(1);
                ReportRange {
                    start: end.with_day(1).unwrap_or(end),
                    end,
                }
            }
            Self::ThisYear => ReportRange {
                start: jan_first,
                end: today,
            },
            Self::LastYear => ReportRange {
                start: NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).unwrap_or(today),
                end: NaiveDate::from_ymd_opt(today.year() - 1, 12, 31).unwrap_or(today),
            },
            Self::Custom { start, end } => {
                let (start, end) = if start <= end { (start, end) } else { (end, start) };
                ReportRange {
                    start,
                    end: end.min(today),
                }
            }
        }
    }
}

/// Aggregated order and customer figures for one reporting window.
///
/// Status counts, revenue, average order value and new-customer counts
/// are scoped to the window by order date; outstanding balance and the
/// delay figures describe the present state of open orders.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct DashboardOverview {
    pub pending_orders: i64,
    pub in_progress_orders: i64,
    pub completed_orders: i64,
    pub canceled_orders: i64,
    /// Sum of completed order totals within the window.
    pub revenue: i64,
    /// Sum of balances still owed on open orders.
    pub outstanding_balance: i64,
    pub new_customers: i64,
    /// Revenue divided by completed orders, zero when none completed.
    pub average_order_value: i64,
    /// Open orders past their due date.
    pub delayed_orders: i64,
    /// Open orders due within the next two days.
    pub due_soon_orders: i64,
}

/// One row of the top-customers ranking.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopCustomer {
    pub customer_id: i32,
    pub name: String,
    pub phone: String,
    pub orders: i64,
    pub total_spent: i64,
}

/// One row of the top-products ranking.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopProduct {
    pub product_id: i32,
    pub code: String,
    pub size: String,
    pub units_sold: i64,
    pub revenue: i64,
}
