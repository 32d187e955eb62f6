use serde::Serialize;

/// Page size used by list services when the caller does not override it.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// Offset/limit pair applied by repository list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// One page of results together with the page-link numbers.
///
/// `pages` always ends with the total page count; an empty result set
/// serializes with an empty `pages` array.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: Vec<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize) -> Self {
        Self {
            items,
            page,
            pages: (1..=total_pages).collect(),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.pages.last().copied().unwrap_or(0)
    }
}
