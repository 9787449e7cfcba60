//! Offset pagination helpers shared by post and activity log listings.

use scriven_api_types::Pagination;
use serde::Serialize;

pub const DEFAULT_POSTS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_ACTIVITY_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalized page coordinates: `page >= 1`, `1 <= limit <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: u32) -> Self {
        let page = page.unwrap_or(1).max(1) as u64;
        let limit = limit
            .unwrap_or(i64::from(default_limit))
            .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(u64::from(self.limit))
    }

    pub fn describe(&self, total_count: u64) -> Pagination {
        let limit = u64::from(self.limit);
        let total_pages = total_count.div_ceil(limit);
        Pagination {
            current_page: self.page,
            total_pages,
            total_count,
            limit,
            has_next: self.page < total_pages,
            has_prev: self.page > 1,
        }
    }
}

/// Offset-addressed page result.
#[derive(Debug, Clone, Serialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            pagination: request.describe(total_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let request = PageRequest::new(None, None, DEFAULT_POSTS_PAGE_SIZE);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 10);
        assert_eq!(request.offset(), 0);

        let logs = PageRequest::new(None, None, DEFAULT_ACTIVITY_PAGE_SIZE);
        assert_eq!(logs.limit(), 20);
    }

    #[test]
    fn page_is_floored_and_limit_clamped() {
        let request = PageRequest::new(Some(-4), Some(0), DEFAULT_POSTS_PAGE_SIZE);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 1);

        let request = PageRequest::new(Some(3), Some(1_000), DEFAULT_POSTS_PAGE_SIZE);
        assert_eq!(request.limit(), MAX_PAGE_SIZE);
        assert_eq!(request.offset(), 200);
    }

    #[test]
    fn metadata_reports_neighbours() {
        let request = PageRequest::new(Some(2), Some(10), DEFAULT_POSTS_PAGE_SIZE);
        let meta = request.describe(25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_count, 25);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let last = PageRequest::new(Some(3), Some(10), DEFAULT_POSTS_PAGE_SIZE).describe(25);
        assert!(!last.has_next);
    }

    #[test]
    fn page_beyond_end_keeps_accurate_totals() {
        let meta = PageRequest::new(Some(9), Some(10), DEFAULT_POSTS_PAGE_SIZE).describe(12);
        assert_eq!(meta.current_page, 9);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(meta.total_count, 12);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let meta = PageRequest::new(None, None, DEFAULT_ACTIVITY_PAGE_SIZE).describe(0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn huge_pages_do_not_overflow_offset() {
        let request = PageRequest::new(Some(i64::MAX), Some(100), DEFAULT_POSTS_PAGE_SIZE);
        assert_eq!(request.offset(), u64::MAX);
    }
}
