use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Priced catalog entry offered by the studio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Generated unique code, e.g. `PRD-20240501-1234`.
    pub code: String,
    /// Size or dimensions of the product.
    pub size: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    /// Price per unit in smallest currency units.
    pub price: i64,
    /// Default discount percentage suggested for this product.
    pub default_discount: i32,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new catalog entry.
///
/// The unique code is generated at insert time, not supplied here.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub size: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub price: i64,
    pub default_discount: i32,
    pub description: Option<String>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a catalog payload with the current timestamp.
    #[must_use]
    pub fn new(size: impl Into<String>, price: i64) -> Self {
        Self {
            size: size.into(),
            kind: None,
            color: None,
            price,
            default_discount: 0,
            description: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Attach a product kind to the payload.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Attach a color to the payload.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the default discount percentage.
    #[must_use]
    pub fn with_default_discount(mut self, percent: i32) -> Self {
        self.default_discount = percent;
        self
    }

    /// Attach a description to the payload.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full field set applied when editing a catalog entry.
///
/// The generated code never changes after creation.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub size: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub price: i64,
    pub default_discount: i32,
    pub description: Option<String>,
    /// Timestamp captured when the payload was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list catalog entries.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Optional search term matched against size, kind, color and code.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets the whole catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term.
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
