//! Admin wire types
//!
//! What `/v1/vt` accepts and returns. Every type here is converted to or
//! from a store model by a plain function; no type crosses layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::query::{Pager, QuerySpec, SortRequest};
use crate::db::search;
use crate::models::{self, Status};

/// Status as shown to editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub id: i32,
    pub alias: &'static str,
    pub title: &'static str,
}

impl StatusView {
    fn of(status_id: i32) -> Option<Self> {
        Status::from_id(status_id).map(|s| Self {
            id: s.id(),
            alias: s.alias(),
            title: s.title(),
        })
    }
}

/// Paging and ordering for list calls.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOps {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort_column: Option<String>,
    #[serde(default)]
    pub sort_desc: bool,
}

impl ViewOps {
    pub fn spec<F>(self, filter: F, default_page_size: u32) -> QuerySpec<F> {
        let sort = self
            .sort_column
            .filter(|c| !c.is_empty())
            .map(|column| SortRequest {
                column,
                desc: self.sort_desc,
            });
        QuerySpec {
            sort,
            ..QuerySpec::new(
                filter,
                Pager::from_request(self.page, self.page_size, default_page_size),
            )
        }
    }
}

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub order_number: Option<i32>,
    pub alias: String,
    pub status_id: i32,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::Category> for Category {
    fn from(c: models::Category) -> Self {
        Self {
            status: StatusView::of(c.status_id),
            id: c.id,
            title: c.title,
            order_number: c.order_number,
            alias: c.alias,
            status_id: c.status_id,
        }
    }
}

impl From<Category> for models::Category {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            title: c.title,
            order_number: c.order_number,
            alias: c.alias,
            status_id: c.status_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategorySearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub order_number: Option<i32>,
    pub alias: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl From<CategorySearch> for search::CategorySearch {
    fn from(s: CategorySearch) -> Self {
        Self {
            id: s.id,
            title: s.title,
            order_number: s.order_number,
            alias: None,
            alias_like: s.alias,
            status_id: s.status_id,
            ids: s.ids,
            not_id: s.not_id,
        }
    }
}

// ============================================================================
// Tag
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    pub status_id: i32,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::Tag> for Tag {
    fn from(t: models::Tag) -> Self {
        Self {
            status: StatusView::of(t.status_id),
            id: t.id,
            title: t.title,
            status_id: t.status_id,
        }
    }
}

impl From<Tag> for models::Tag {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            title: t.title,
            status_id: t.status_id,
        }
    }
}

/// Tag as embedded in news lists.
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::Tag> for TagSummary {
    fn from(t: models::Tag) -> Self {
        Self {
            status: StatusView::of(t.status_id),
            id: t.id,
            title: t.title,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagSearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl From<TagSearch> for search::TagSearch {
    fn from(s: TagSearch) -> Self {
        Self {
            id: s.id,
            title: s.title,
            status_id: s.status_id,
            ids: s.ids,
            not_id: s.not_id,
        }
    }
}

// ============================================================================
// Author
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status_id: i32,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::Author> for Author {
    fn from(a: models::Author) -> Self {
        Self {
            status: StatusView::of(a.status_id),
            id: a.id,
            name: a.name,
            email: a.email,
            status_id: a.status_id,
        }
    }
}

impl From<Author> for models::Author {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            status_id: a.status_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorSearch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl From<AuthorSearch> for search::AuthorSearch {
    fn from(s: AuthorSearch) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            status_id: s.status_id,
            ids: s.ids,
            not_id: s.not_id,
        }
    }
}

// ============================================================================
// News
// ============================================================================

/// Full news. `publishedAt` is the one field a client cannot omit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub foreword: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
    #[serde(default)]
    pub author_id: i64,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub status_id: i32,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_deserializing)]
    pub tags: Vec<TagSummary>,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::NewsItem> for News {
    fn from(item: models::NewsItem) -> Self {
        let n = item.news;
        Self {
            status: StatusView::of(n.status_id),
            id: n.id,
            title: n.title,
            category_id: n.category_id,
            foreword: n.foreword,
            content: n.content,
            tag_ids: n.tag_ids,
            author_id: n.author_id,
            published_at: n.published_at,
            status_id: n.status_id,
            category: n.category.map(Category::from),
            author: n.author.map(Author::from),
            tags: item.tags.into_iter().map(TagSummary::from).collect(),
        }
    }
}

impl From<News> for models::News {
    fn from(n: News) -> Self {
        Self {
            id: n.id,
            title: n.title,
            foreword: n.foreword,
            content: n.content,
            published_at: n.published_at,
            status_id: n.status_id,
            category_id: n.category_id,
            author_id: n.author_id,
            tag_ids: n.tag_ids,
            category: None,
            author: None,
        }
    }
}

/// News in admin lists: no foreword or body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub id: i64,
    pub title: String,
    pub category_id: i64,
    pub tag_ids: Vec<i64>,
    pub author_id: i64,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<TagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusView>,
}

impl From<models::NewsItem> for NewsSummary {
    fn from(item: models::NewsItem) -> Self {
        let n = item.news;
        Self {
            status: StatusView::of(n.status_id),
            id: n.id,
            title: n.title,
            category_id: n.category_id,
            tag_ids: n.tag_ids,
            author_id: n.author_id,
            published_at: n.published_at,
            tags: item.tags.into_iter().map(TagSummary::from).collect(),
            category: n.category.map(Category::from),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsSearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub foreword: Option<String>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl From<NewsSearch> for search::NewsSearch {
    fn from(s: NewsSearch) -> Self {
        Self {
            id: s.id,
            title: s.title,
            foreword: s.foreword,
            category_id: s.category_id,
            author_id: s.author_id,
            tag_id: s.tag_id,
            published_at: s.published_at,
            status_id: s.status_id,
            ids: s.ids,
            not_id: s.not_id,
        }
    }
}
