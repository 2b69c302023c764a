//! News model
//!
//! [`News`] is the stored record, optionally carrying the category and author
//! rows that were eager-loaded with it. [`NewsItem`] is the aggregate handed
//! to callers once tags have been resolved.

use chrono::{DateTime, Utc};

use super::{Author, Category, Tag};

/// A news item as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct News {
    /// Unique identifier, 0 before insert
    pub id: i64,
    pub title: String,
    /// Short lead shown in lists
    pub foreword: String,
    /// Full body; absent for link-only items
    pub content: Option<String>,
    pub published_at: DateTime<Utc>,
    pub status_id: i32,
    pub category_id: i64,
    pub author_id: i64,
    /// Referenced tags, in editor order
    pub tag_ids: Vec<i64>,
    /// Set only when the category relation was loaded
    pub category: Option<Category>,
    /// Set only when the author relation was loaded
    pub author: Option<Author>,
}

/// News with its tags attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub news: News,
    /// Resolved tags in `news.tag_ids` order, dangling ids omitted
    pub tags: Vec<Tag>,
}

impl NewsItem {
    /// Wrap a record whose tags have not been resolved.
    pub fn untagged(news: News) -> Self {
        Self {
            news,
            tags: Vec::new(),
        }
    }
}
