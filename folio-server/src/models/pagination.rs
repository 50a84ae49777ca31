//! Pagination types

use serde::Serialize;

use super::{ValidationError, ValidationErrors};

/// Maximum items per page
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: i64,
    /// Items per page (1..=100)
    pub page_size: i64,
}

impl Pagination {
    /// Create pagination, rejecting out-of-range values.
    ///
    /// Both violations are reported when both parameters are wrong.
    pub fn new(page: i64, page_size: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if page < 1 {
            errors.push(ValidationError::OutOfRange {
                field: "page",
                min: 1,
                max: None,
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            errors.push(ValidationError::OutOfRange {
                field: "page_size",
                min: 1,
                max: Some(MAX_PAGE_SIZE),
            });
        }
        errors.into_result(Self { page, page_size })
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the unpaginated total
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Items per page
    pub page_size: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Pagination) -> Self {
        Self {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        }
    }

    /// Convert each item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let p = Pagination::new(1, 10).unwrap();
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(2, 10).unwrap();
        assert_eq!(p.offset(), 10);

        let p = Pagination::new(3, 25).unwrap();
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn defaults() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
    }

    #[test]
    fn rejects_page_zero() {
        let err = Pagination::new(0, 10).unwrap_err();
        assert_eq!(err.fields(), vec!["page"]);
    }

    #[test]
    fn rejects_page_size_bounds() {
        assert!(Pagination::new(1, 0).is_err());
        assert!(Pagination::new(1, 101).is_err());
        assert!(Pagination::new(1, 1).is_ok());
        assert!(Pagination::new(1, 100).is_ok());
    }

    #[test]
    fn reports_both_violations() {
        let err = Pagination::new(-1, 500).unwrap_err();
        assert_eq!(err.fields(), vec!["page", "page_size"]);
    }

    #[test]
    fn huge_page_saturates() {
        let p = Pagination::new(i64::MAX, 100).unwrap();
        assert_eq!(p.offset(), i64::MAX);
    }
}
