//! Category service
//!
//! CRUD over categories with alias uniqueness: an alias may be reused only
//! by the record that already owns it.

use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use crate::db::query::QuerySpec;
use crate::db::repositories::CategoryRepository;
use crate::db::search::CategorySearch;
use crate::models::Category;
use crate::validation::{FieldError, FieldErrorKind, Validator};

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn count(&self, search: &CategorySearch) -> ServiceResult<i64> {
        Ok(self.repo.count(search).await?)
    }

    pub async fn get(&self, spec: &QuerySpec<CategorySearch>) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.list(spec).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Category> {
        self.repo.get_by_id(id).await?.ok_or(ServiceError::NotFound)
    }

    /// Validate and insert. Any client-supplied id is ignored.
    pub async fn add(&self, category: Category) -> ServiceResult<Category> {
        let category = Category { id: 0, ..category };
        self.is_valid(&category).await.into_result()?;

        let created = self.repo.add(&category).await?;
        tracing::info!("Category created: {} ({})", created.alias, created.id);
        Ok(created)
    }

    pub async fn update(&self, category: Category) -> ServiceResult<bool> {
        self.get_by_id(category.id).await?;
        self.is_valid(&category).await.into_result()?;

        let updated = self.repo.update(&category).await?;
        tracing::debug!("Category {} updated: {}", category.id, updated);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        self.get_by_id(id).await?;
        let deleted = self.repo.delete(id).await?;
        tracing::info!("Category deleted: {}", id);
        Ok(deleted)
    }

    /// Field errors without writing anything.
    pub async fn validate(&self, category: &Category) -> ServiceResult<Vec<FieldError>> {
        if category.id != 0 {
            self.get_by_id(category.id).await?;
        }
        Ok(self.is_valid(category).await.into_fields()?)
    }

    async fn is_valid(&self, category: &Category) -> Validator {
        let mut v = Validator::for_entity(category);

        if !v.has_field_error("alias") {
            let exclude = (category.id != 0).then_some(category.id);
            match self.repo.one_by_alias(&category.alias, exclude).await {
                Ok(Some(_)) => v.append("alias", FieldErrorKind::Unique),
                Ok(None) => {}
                Err(e) => v.set_internal_error(e),
            }
        }

        v
    }
}
