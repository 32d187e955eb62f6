use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::loyalty::CustomerLevel;
use crate::pagination::Pagination;

/// Domain representation of a registered customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Unique identifier of the customer.
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Mobile phone number, unique across the registry.
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    /// Free-text note kept by the studio staff.
    pub note: Option<String>,
    /// Accumulated loyalty points, never negative.
    pub points: i32,
    /// Loyalty level derived from `points`.
    pub level: CustomerLevel,
    /// Customer who referred this one, if any. A lookup reference only.
    pub referred_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Display name built from the stored name parts.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload required to register a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<String>,
    /// Referrer chosen at registration time, already resolved to an id.
    pub referred_by: Option<i32>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCustomer {
    /// Build a registration payload with the current timestamp.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            birth_date: None,
            note: None,
            referred_by: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Attach a birth date to the payload.
    #[must_use]
    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Attach a staff note to the payload.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Attach a resolved referrer id to the payload.
    #[must_use]
    pub fn with_referrer(mut self, referrer_id: i32) -> Self {
        self.referred_by = Some(referrer_id);
        self
    }
}

/// Full field set applied when editing a customer.
///
/// Edits rewrite the whole record; points and level are never set
/// through this struct, they change only via settlements.
#[derive(Debug, Clone)]
pub struct UpdateCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<String>,
    /// Referrer after the edit; `None` clears an existing link.
    pub referred_by: Option<i32>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

/// Counts of records that reference a customer, used by delete guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerLinks {
    /// Orders placed by the customer.
    pub orders: i64,
    /// Referral rows where the customer is the referrer.
    pub outgoing_referrals: i64,
    /// Referral rows where the customer is the referred party.
    pub incoming_referrals: i64,
}

impl CustomerLinks {
    /// Whether any dependent record blocks deletion.
    pub fn blocks_delete(&self) -> bool {
        self.orders > 0 || self.outgoing_referrals > 0
    }
}

/// Query definition used to list customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    /// Optional search term matched against names and phone.
    pub search: Option<String>,
    /// Optional level filter.
    pub level: Option<CustomerLevel>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    /// Construct a query that targets all customers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to names or phone.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by loyalty level.
    pub fn level(mut self, level: CustomerLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
