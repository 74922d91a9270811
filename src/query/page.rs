//! Pagination of a derived view

use serde::{Deserialize, Serialize};

/// A 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: usize,
    /// Items per page; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl PageRequest {
    /// Request a page with the default size
    #[must_use]
    pub const fn new(page: usize) -> Self {
        Self {
            page,
            page_size: None,
        }
    }

    /// Set the page size
    #[must_use]
    pub const fn with_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in view order
    pub items: Vec<T>,
    /// Page number, starting at 1
    pub page: usize,
    /// Items per page after clamping
    pub page_size: usize,
    /// Items in the whole view
    pub total_items: usize,
    /// Pages in the whole view
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut one page out of an ordered sequence
    ///
    /// Page 0 is treated as page 1. Pages past the end are empty but keep
    /// the totals.
    pub fn slice(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size);

        let start = (page - 1).saturating_mul(page_size);
        let items = items.into_iter().skip(start).take(page_size).collect();

        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Whether another page follows this one
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Transform the items, keeping the page numbers
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
