//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_PAGE_SIZE: u64 = 20;
/// Maximum page size.
const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request, clamping out-of-range values.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Number of items to skip. Saturates instead of overflowing.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Maximum number of items on the page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Slice an already filtered and sorted sequence into this page.
    ///
    /// Pages past the end yield an empty vector.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// Always `true`; failures are reported as errors instead.
    pub success: bool,
    /// The items on this page.
    pub items: Vec<T>,
    /// Number of items matching the filters, before pagination.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of pages (0 when nothing matched).
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            success: true,
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }

    /// Create an empty response.
    pub fn empty(page_request: &PageRequest) -> Self {
        Self::new(Vec::new(), page_request.page, page_request.page_size, 0)
    }

    /// Whether there is a page after this one.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(0, 1000);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 0).page_size, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 5).offset(), 0);
        assert_eq!(PageRequest::new(3, 5).offset(), 10);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let page = PageRequest::new(u64::MAX, 50);
        assert_eq!(page.offset(), u64::MAX);
        let items: Vec<u32> = (0..10).collect();
        assert!(page.slice(items).is_empty());
    }

    #[test]
    fn test_slice_past_end_is_empty() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(PageRequest::new(2, 5).slice(items.clone()), vec![5, 6, 7, 8, 9]);
        assert!(PageRequest::new(3, 5).slice(items).is_empty());
    }

    #[test]
    fn test_total_pages() {
        let response = PageResponse::new(vec![1, 2, 3, 4, 5], 1, 5, 10);
        assert_eq!(response.total_pages, 2);
        assert!(response.has_next());
        let empty: PageResponse<u32> = PageResponse::empty(&PageRequest::default());
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let response = PageResponse::new(vec!["a"], 1, 5, 1);
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["pageSize"], 5);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["success"], true);
    }
}
