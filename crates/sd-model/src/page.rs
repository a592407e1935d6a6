//! Paginated listings.

use serde::{Deserialize, Serialize};

/// Default page size used by the listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Total number of records across all pages.
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of pages needed for `total` records at `page_size`.
    #[must_use]
    pub fn page_count(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(page_size))
    }
}

/// Page selector, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Page number, starting at 1.
    pub page: u32,
    /// Records per page.
    pub page_size: u32,
}

impl PageQuery {
    /// Creates a page selector, clamping both values to at least 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub(crate) fn to_pairs(self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}
