//! Row-scoped data access.
//!
//! Every function here takes `&mut TenantSession`, so a caller cannot reach
//! tenant data without having bound a tenant first. Each query also carries
//! its tenant predicate in the SQL itself; the row-security policies from
//! migrations are a second, independent net underneath.

pub mod candidates;
pub mod companies;
pub mod constraints;
pub mod form_keys;
pub mod hr_users;
pub mod jobs;
pub mod links;
pub mod matches;

use serde::Deserialize;

use crate::errors::AppError;

pub const MAX_PAGE_LIMIT: i64 = 200;

/// Pagination window for list endpoints. Deserialized straight from query
/// params; [`Page::normalize`] rejects negatives and caps the window before
/// any query runs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Page {
    pub fn normalize(self) -> Result<Self, AppError> {
        if self.skip < 0 {
            return Err(AppError::Validation("skip must not be negative".into()));
        }
        if self.limit < 0 {
            return Err(AppError::Validation("limit must not be negative".into()));
        }
        Ok(Self {
            skip: self.skip,
            limit: self.limit.min(MAX_PAGE_LIMIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        let page = Page::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_negative_skip_rejected() {
        let page = Page { skip: -1, limit: 10 };
        assert!(matches!(page.normalize(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_limit_rejected() {
        let page = Page { skip: 0, limit: -5 };
        assert!(matches!(page.normalize(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_oversized_limit_capped() {
        let page = Page {
            skip: 0,
            limit: 10_000,
        };
        assert_eq!(page.normalize().unwrap().limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_zero_limit_allowed() {
        let page = Page { skip: 3, limit: 0 };
        let page = page.normalize().unwrap();
        assert_eq!(page.limit, 0);
        assert_eq!(page.skip, 3);
    }

    #[test]
    fn test_deserializes_from_query_shape() {
        let page: Page = serde_json::from_str(r#"{"skip": 20, "limit": 10}"#).unwrap();
        assert_eq!(page.skip, 20);
        assert_eq!(page.limit, 10);

        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 50);
    }
}
