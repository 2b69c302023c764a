//! Public portal wire types
//!
//! The portal speaks its own vocabulary (`newsId`, `categoryId`, ...) and
//! never exposes status codes.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::models;
use crate::services::NewsFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    pub title: String,
    pub order_number: Option<i32>,
    pub alias: String,
}

impl From<models::Category> for Category {
    fn from(c: models::Category) -> Self {
        Self {
            category_id: c.id,
            title: c.title,
            order_number: c.order_number,
            alias: c.alias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_id: i64,
    pub title: String,
}

impl From<models::Tag> for Tag {
    fn from(t: models::Tag) -> Self {
        Self {
            tag_id: t.id,
            title: t.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub author_id: i64,
    pub name: String,
    pub email: String,
}

impl From<models::Author> for Author {
    fn from(a: models::Author) -> Self {
        Self {
            author_id: a.id,
            name: a.name,
            email: a.email,
        }
    }
}

/// News as listed on the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
    pub news_id: i64,
    pub title: String,
    pub category: Option<Category>,
    pub foreword: String,
    pub tags: Vec<Tag>,
    /// RFC 3339, second precision
    pub published_at: String,
}

impl From<models::NewsItem> for NewsSummary {
    fn from(item: models::NewsItem) -> Self {
        let n = item.news;
        Self {
            news_id: n.id,
            title: n.title,
            category: n.category.map(Category::from),
            foreword: n.foreword,
            tags: item.tags.into_iter().map(Tag::from).collect(),
            published_at: n.published_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// A single news page: the summary plus body and author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    #[serde(flatten)]
    pub summary: NewsSummary,
    pub content: Option<String>,
    pub author: Option<Author>,
}

impl From<models::NewsItem> for News {
    fn from(mut item: models::NewsItem) -> Self {
        let content = item.news.content.take();
        let author = item.news.author.take().map(Author::from);
        Self {
            summary: NewsSummary::from(item),
            content,
            author,
        }
    }
}

/// Params of `newsWithFilters` and `newsCountWithFilters`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsFilterParams {
    pub category_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl NewsFilterParams {
    pub fn filter(&self) -> NewsFilter {
        NewsFilter {
            category_id: self.category_id,
            tag_id: self.tag_id,
        }
    }
}
