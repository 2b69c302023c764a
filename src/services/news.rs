//! News service
//!
//! News references a category, an author and a list of tags. None of these
//! references is enforced by the store, so every write checks them here:
//! the category and the author must exist, and every listed tag id must
//! resolve to a stored tag.

use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use super::relations::TagResolver;
use crate::db::query::{QuerySpec, Relations};
use crate::db::repositories::{AuthorRepository, CategoryRepository, NewsRepository, TagRepository};
use crate::db::search::NewsSearch;
use crate::models::{News, NewsItem};
use crate::validation::{FieldError, FieldErrorKind, Validator};

/// News service
pub struct NewsService {
    news: Arc<dyn NewsRepository>,
    categories: Arc<dyn CategoryRepository>,
    authors: Arc<dyn AuthorRepository>,
    tags: Arc<dyn TagRepository>,
    resolver: TagResolver,
}

impl NewsService {
    pub fn new(
        news: Arc<dyn NewsRepository>,
        categories: Arc<dyn CategoryRepository>,
        authors: Arc<dyn AuthorRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        let resolver = TagResolver::new(tags.clone());
        Self {
            news,
            categories,
            authors,
            tags,
            resolver,
        }
    }

    pub async fn count(&self, search: &NewsSearch) -> ServiceResult<i64> {
        Ok(self.news.count(search).await?)
    }

    /// One page of news with relations from `spec` and tags resolved in one batch.
    pub async fn get(&self, spec: &QuerySpec<NewsSearch>) -> ServiceResult<Vec<NewsItem>> {
        let news = self.news.list(spec).await?;
        Ok(self.resolver.attach(news).await?)
    }

    /// Full news: category, author and tags.
    pub async fn get_by_id(&self, id: i64) -> ServiceResult<NewsItem> {
        let news = self
            .news
            .get_by_id(id, &Relations::full_news())
            .await?
            .ok_or(ServiceError::NotFound)?;
        Ok(self.resolver.attach_one(news).await?)
    }

    /// Validate and insert, then return the stored news in full form.
    pub async fn add(&self, news: News) -> ServiceResult<NewsItem> {
        let news = News { id: 0, ..news };
        self.is_valid(&news).await.into_result()?;

        let created = self.news.add(&news).await?;
        tracing::info!(
            "News created: {} (category {}, {} tags)",
            created.id,
            created.category_id,
            created.tag_ids.len()
        );
        self.get_by_id(created.id).await
    }

    pub async fn update(&self, news: News) -> ServiceResult<bool> {
        self.exists(news.id).await?;
        self.is_valid(&news).await.into_result()?;

        let updated = self.news.update(&news).await?;
        tracing::debug!("News {} updated: {}", news.id, updated);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        self.exists(id).await?;
        let deleted = self.news.delete(id).await?;
        tracing::info!("News deleted: {}", id);
        Ok(deleted)
    }

    pub async fn validate(&self, news: &News) -> ServiceResult<Vec<FieldError>> {
        if news.id != 0 {
            self.exists(news.id).await?;
        }
        Ok(self.is_valid(news).await.into_fields()?)
    }

    async fn exists(&self, id: i64) -> ServiceResult<()> {
        match self.news.get_by_id(id, &Relations::none()).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound),
        }
    }

    async fn is_valid(&self, news: &News) -> Validator {
        let mut v = Validator::for_entity(news);

        if news.category_id != 0 {
            match self.categories.get_by_id(news.category_id).await {
                Ok(Some(_)) => {}
                Ok(None) => v.append("categoryId", FieldErrorKind::Incorrect),
                Err(e) => v.set_internal_error(e),
            }
        }

        if !news.tag_ids.is_empty() {
            match self.tags.by_ids(&news.tag_ids).await {
                Ok(found) if found.len() == news.tag_ids.len() => {}
                Ok(_) => v.append("tagIds", FieldErrorKind::Incorrect),
                Err(e) => v.set_internal_error(e),
            }
        }

        if news.author_id != 0 {
            match self.authors.get_by_id(news.author_id).await {
                Ok(Some(_)) => {}
                Ok(None) => v.append("authorId", FieldErrorKind::Incorrect),
                Err(e) => v.set_internal_error(e),
            }
        }

        v
    }
}
