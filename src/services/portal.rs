//! Public read-only news portal
//!
//! Everything the portal shows comes from here. Lists carry the category and
//! tags of each news; a single news also carries its author and content.

use std::sync::Arc;

use super::error::ServiceResult;
use super::relations::TagResolver;
use crate::db::query::{Pager, QuerySpec, Relations};
use crate::db::repositories::{CategoryRepository, NewsRepository, TagRepository};
use crate::db::search::{CategorySearch, NewsSearch, TagSearch};
use crate::models::{Category, NewsItem, Tag};

/// Portal news list filter. Absent values do not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewsFilter {
    pub category_id: Option<i64>,
    pub tag_id: Option<i64>,
}

impl NewsFilter {
    fn search(&self) -> NewsSearch {
        NewsSearch {
            category_id: self.category_id,
            tag_id: self.tag_id,
            ..Default::default()
        }
    }
}

pub struct PortalService {
    news: Arc<dyn NewsRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    resolver: TagResolver,
    page_size: u32,
}

impl PortalService {
    /// `page_size` applies when a request names no positive page size.
    pub fn new(
        news: Arc<dyn NewsRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        page_size: u32,
    ) -> Self {
        let resolver = TagResolver::new(tags.clone());
        Self {
            news,
            categories,
            tags,
            resolver,
            page_size,
        }
    }

    /// A single news with category, author and tags, or `None` when absent.
    pub async fn news_by_id(&self, id: i64) -> ServiceResult<Option<NewsItem>> {
        match self.news.get_by_id(id, &Relations::full_news()).await? {
            Some(news) => Ok(Some(self.resolver.attach_one(news).await?)),
            None => Ok(None),
        }
    }

    /// Newest first. Non-positive or absent page values fall back to page 1
    /// and the configured page size.
    pub async fn news(
        &self,
        filter: NewsFilter,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Vec<NewsItem>> {
        let spec = QuerySpec {
            relations: Relations::default_news(),
            ..QuerySpec::new(
                filter.search(),
                Pager::from_request(page, page_size, self.page_size),
            )
        };
        let news = self.news.list(&spec).await?;
        Ok(self.resolver.attach(news).await?)
    }

    pub async fn news_count(&self, filter: NewsFilter) -> ServiceResult<i64> {
        Ok(self.news.count(&filter.search()).await?)
    }

    /// All categories in display order.
    pub async fn categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self
            .categories
            .list(&QuerySpec::unpaged(CategorySearch::default()))
            .await?)
    }

    /// All tags by title.
    pub async fn tags(&self) -> ServiceResult<Vec<Tag>> {
        Ok(self.tags.list(&QuerySpec::unpaged(TagSearch::default())).await?)
    }
}
