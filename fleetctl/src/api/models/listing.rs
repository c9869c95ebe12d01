//! Query parameters shared by the list pages.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 500;

/// `message` and `error` carry the outcome of the redirect that led here.
#[derive(Debug, Default, Deserialize)]
pub struct ListPageQuery {
    pub message: Option<String>,
    pub error: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListPageQuery {
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn flash(&self) -> Flash {
        Flash {
            message: self.message.clone().filter(|m| !m.is_empty()),
            error: self.error.clone().filter(|e| !e.is_empty()),
        }
    }
}

/// One-shot banner shown at the top of a list page
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Flash {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let query = ListPageQuery {
            limit: Some(10_000),
            skip: Some(-3),
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_LIMIT);
        assert_eq!(query.skip(), 0);
        assert_eq!(ListPageQuery::default().limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_empty_flash_values_are_dropped() {
        let query = ListPageQuery {
            message: Some(String::new()),
            error: Some("Group not found".to_string()),
            ..Default::default()
        };
        let flash = query.flash();
        assert!(flash.message.is_none());
        assert_eq!(flash.error.as_deref(), Some("Group not found"));
    }
}
