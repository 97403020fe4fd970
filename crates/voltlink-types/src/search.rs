//! Pagination parameters and the paginated result envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller-supplied pagination window.
///
/// Never clamped or rewritten by the core: an out-of-range but structurally
/// valid offset flows through unchanged and simply yields an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// First index to include, zero-based.
    pub offset: i64,
    /// Maximum items to return. `Some(0)` is a valid "count only" request.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(offset: i64, limit: Option<i64>) -> Self {
        Self { offset, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }
}

/// Optional `last_updated` window for listing operations.
///
/// Either bound may be absent for open-ended filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_to: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    pub fn new(date_from: Option<DateTime<Utc>>, date_to: Option<DateTime<Utc>>) -> Self {
        Self { date_from, date_to }
    }
}

/// One page of a resource listing, echoing the window it answered.
///
/// Invariants: `offset >= 0`, and `items.len() <= limit` when a limit was
/// requested. Item order is server-determined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_to: Option<DateTime<Utc>>,
}

impl<T> SearchResult<T> {
    /// A page answering the given window, with no date filter echoed.
    pub fn page(items: Vec<T>, pagination: Pagination, total: Option<i64>) -> Self {
        Self {
            items,
            offset: pagination.offset,
            limit: pagination.limit,
            total,
            date_from: None,
            date_to: None,
        }
    }

    /// Echoes the date filter the listing was answering.
    pub fn with_filter(mut self, filter: DateRangeFilter) -> Self {
        self.date_from = filter.date_from;
        self.date_to = filter.date_to;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_echoes_window() {
        let result = SearchResult::page(vec!["a", "b"], Pagination::new(10, Some(2)), Some(40));
        assert_eq!(result.offset, 10);
        assert_eq!(result.limit, Some(2));
        assert_eq!(result.total, Some(40));
        assert_eq!(result.items.len(), 2);
    }

    #[test]
    fn optional_fields_absent_on_wire() {
        let result: SearchResult<i32> = SearchResult::page(vec![], Pagination::default(), None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["offset"], 0);
        assert!(json.get("limit").is_none());
        assert!(json.get("total").is_none());
        assert!(json.get("date_from").is_none());
    }
}
