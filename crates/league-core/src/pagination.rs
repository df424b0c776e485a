//! Page request and page types
//!
//! Pages are zero-indexed; sort parameters use the `property[,asc|desc]` form.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 2000;
/// Highest page number whose end offset still fits in an `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE - 1;

/// Sort direction
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A single `ORDER BY` entry expressed in API property names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse a `sort` parameter value such as `name,desc` or `id`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(',').map(str::trim);
        let property = parts.next().filter(|p| !p.is_empty())?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        Some(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// Requested window into a result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (0-indexed)
    pub page: i64,
    /// Items per page
    pub size: i64,
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: vec![],
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: page.clamp(0, MAX_PAGE),
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: vec![],
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Calculate the SQL offset
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// Calculate the SQL limit
    pub fn limit(&self) -> i64 {
        self.size
    }
}

/// One page of results plus the total number of matches
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: i64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            page: request.page,
            size: request.size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1).saturating_mul(self.size) < self.total_elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.offset(), 30);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_page_request_clamps() {
        let request = PageRequest::new(-1, 0);
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 1);
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let request = PageRequest::new(922_337_203_685_477_580, 20);
        assert_eq!(request.page, MAX_PAGE);
        assert!(request.offset() > 0);

        let request = PageRequest::new(i64::MAX, MAX_PAGE_SIZE);
        assert!(request.offset() > 0);
        assert!(!Page::new(Vec::<i64>::new(), 3, &request).has_next());

        let direct = PageRequest {
            page: i64::MAX,
            size: MAX_PAGE_SIZE,
            sort: vec![],
        };
        assert_eq!(direct.offset(), i64::MAX);
        assert!(!Page::new(Vec::<i64>::new(), 3, &direct).has_next());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("name,desc"), Some(SortOrder::desc("name")));
        assert_eq!(SortOrder::parse("id"), Some(SortOrder::asc("id")));
        assert_eq!(SortOrder::parse("height,ASC"), Some(SortOrder::asc("height")));
        assert_eq!(SortOrder::parse(""), None);
    }

    #[test]
    fn test_page_navigation() {
        let page = Page::new(vec![1, 2, 3, 4, 5], 12, &PageRequest::new(1, 5));
        assert!(page.has_next());

        let last = Page::new(vec![11, 12], 12, &PageRequest::new(2, 5));
        assert!(!last.has_next());
    }
}
