//! # List Queries
//!
//! The filter accepted by every list operation.
//!
//! ```text
//! query object ──► from_query ──► ListFilter { page?, limit? }
//!   { page: "2", limit: 10, sort: "name" }     { page: 2, limit: 10 }
//!                                   │
//!                                   ▼
//!                  repository: LIMIT limit_or(default) OFFSET offset()
//! ```
//!
//! Only `page` and `limit` are read; every other key is ignored. Absent
//! keys stay absent so the store can apply its own defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ValidationErrors};
use crate::validation::ValidationResult;

/// Upper bound on a page, whatever the caller asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not send `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Paging filter for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListFilter {
    pub fn new(page: u32, limit: u32) -> Self {
        ListFilter {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Extracts `page` and `limit` from an arbitrary query object.
    ///
    /// Numeric strings are accepted (`"2"`). A present key that is not a
    /// positive integer is an error on that key; `null` counts as absent.
    /// Anything that is not an object yields an empty filter.
    pub fn from_query(query: &Value) -> ValidationResult<ListFilter> {
        let Value::Object(object) = query else {
            return Ok(ListFilter::default());
        };

        let mut errors = ValidationErrors::new();
        let mut read = |key: &str| match object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match positive_integer(value) {
                Some(n) => Some(n),
                None => {
                    errors.push(ValidationError::InvalidType {
                        field: key.to_string(),
                        expected: "a positive integer".to_string(),
                    });
                    None
                }
            },
        };

        let filter = ListFilter {
            page: read("page"),
            limit: read("limit"),
        };
        errors.into_result(filter)
    }

    /// 1-based page, defaulting to the first.
    pub fn page_or_first(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    /// Page size, falling back to `default` and capped at [`MAX_PAGE_SIZE`].
    pub fn limit_or(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip for the requested page.
    pub fn offset(&self, default_limit: u32) -> u64 {
        u64::from(self.page_or_first() - 1) * u64::from(self.limit_or(default_limit))
    }
}

fn positive_integer(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(n).ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_gives_empty_filter() {
        let filter = ListFilter::from_query(&json!({})).unwrap();
        assert_eq!(filter, ListFilter::default());
        assert_eq!(serde_json::to_value(filter).unwrap(), json!({}));
    }

    #[test]
    fn test_only_page_and_limit_survive() {
        let filter = ListFilter::from_query(&json!({ "page": 2, "limit": 10, "foo": "x" })).unwrap();
        assert_eq!(serde_json::to_value(filter).unwrap(), json!({ "page": 2, "limit": 10 }));
    }

    #[test]
    fn test_partial_and_string_values() {
        let filter = ListFilter::from_query(&json!({ "limit": "5", "page": null })).unwrap();
        assert_eq!(filter.page, None);
        assert_eq!(filter.limit, Some(5));
        assert_eq!(serde_json::to_value(filter).unwrap(), json!({ "limit": 5 }));
    }

    #[test]
    fn test_invalid_values_name_their_key() {
        let errors = ListFilter::from_query(&json!({ "page": 0, "limit": "ten" })).unwrap_err();
        assert_eq!(errors.fields(), vec!["page", "limit"]);
    }

    #[test]
    fn test_offsets_and_defaults() {
        let filter = ListFilter::default();
        assert_eq!(filter.limit_or(DEFAULT_PAGE_SIZE), 20);
        assert_eq!(filter.offset(DEFAULT_PAGE_SIZE), 0);

        let filter = ListFilter::new(3, 500);
        assert_eq!(filter.limit_or(DEFAULT_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(filter.offset(DEFAULT_PAGE_SIZE), 200);
    }

    #[test]
    fn test_non_object_query() {
        assert_eq!(ListFilter::from_query(&json!("page=2")).unwrap(), ListFilter::default());
    }
}
