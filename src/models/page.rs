//! Paginated result container.

use serde::{Deserialize, Serialize};

/// One page of a paginated result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// Records on this page
    pub items: Vec<T>,

    /// Total records across all pages (after filtering)
    pub total: usize,

    /// 1-based page number
    pub page: usize,

    /// `ceil(total / page_size)`
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Build a page as a contiguous slice of the full filtered set.
    pub fn slice(all: &[T], page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = all.len();
        let total_pages = total.div_ceil(page_size);
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        Self {
            items: all[start..end].to_vec(),
            total,
            page,
            total_pages,
        }
    }
}

impl<T> Page<T> {
    /// An empty result set at the requested page.
    pub fn empty(page: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: page.max(1),
            total_pages: 0,
        }
    }
}
