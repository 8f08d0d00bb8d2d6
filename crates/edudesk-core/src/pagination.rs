//! Pagination for list endpoints.
//!
//! Lists accept either offset-based (`limit` + `offset`) or page-based
//! (`limit` + `page`) parameters. When `page` is present it wins over
//! `offset`. `limit` is clamped to `[1, 100]` and defaults to 20.
//!
//! Responses carry a [`PaginationMeta`]:
//!
//! ```json
//! { "data": [...], "meta": { "total": 57, "limit": 20, "page": 2, "has_more": true } }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of matching items
    pub total: i64,
    /// Limit that was applied
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether more items exist past this page
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        let page = params.page();
        Self {
            total,
            limit,
            offset: if page.is_some() { None } else { Some(offset) },
            page,
            has_more: offset + limit < total,
        }
    }
}

#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Items to skip (ignored when `page` is set)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// 1-indexed page number
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), DEFAULT_LIMIT);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-4), None, None).limit(), 1);
        assert_eq!(params(Some(500), None, None).limit(), MAX_LIMIT);
        assert_eq!(params(Some(35), None, None).limit(), 35);
    }

    #[test]
    fn test_negative_offset_is_zero() {
        assert_eq!(params(None, Some(-10), None).offset(), 0);
    }

    #[test]
    fn test_page_overrides_offset() {
        let p = params(Some(10), Some(999), Some(3));
        assert_eq!(p.offset(), 20);
        assert_eq!(p.page(), Some(3));
        assert_eq!(params(Some(10), None, Some(0)).offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let p = params(Some(10), None, Some(2));
        let meta = PaginationMeta::new(25, &p);
        assert!(meta.has_more);
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.offset, None);

        let last = PaginationMeta::new(25, &params(Some(10), None, Some(3)));
        assert!(!last.has_more);
    }

    #[test]
    fn test_meta_offset_mode() {
        let meta = PaginationMeta::new(5, &params(Some(10), Some(0), None));
        assert_eq!(meta.offset, Some(0));
        assert!(!meta.has_more);
    }
}
