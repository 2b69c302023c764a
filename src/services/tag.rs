//! Tag service

use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use crate::db::query::QuerySpec;
use crate::db::repositories::TagRepository;
use crate::db::search::TagSearch;
use crate::models::Tag;
use crate::validation::{FieldError, Validator};

/// Tag service
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

impl TagService {
    /// Create a new tag service
    pub fn new(repo: Arc<dyn TagRepository>) -> Self {
        Self { repo }
    }

    pub async fn count(&self, search: &TagSearch) -> ServiceResult<i64> {
        Ok(self.repo.count(search).await?)
    }

    pub async fn get(&self, spec: &QuerySpec<TagSearch>) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list(spec).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Tag> {
        self.repo.get_by_id(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn add(&self, tag: Tag) -> ServiceResult<Tag> {
        let tag = Tag { id: 0, ..tag };
        Validator::for_entity(&tag).into_result()?;

        let created = self.repo.add(&tag).await?;
        tracing::info!("Tag created: {} ({})", created.title, created.id);
        Ok(created)
    }

    pub async fn update(&self, tag: Tag) -> ServiceResult<bool> {
        self.get_by_id(tag.id).await?;
        Validator::for_entity(&tag).into_result()?;
        Ok(self.repo.update(&tag).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        self.get_by_id(id).await?;
        let deleted = self.repo.delete(id).await?;
        tracing::info!("Tag deleted: {}", id);
        Ok(deleted)
    }

    pub async fn validate(&self, tag: &Tag) -> ServiceResult<Vec<FieldError>> {
        if tag.id != 0 {
            self.get_by_id(tag.id).await?;
        }
        Ok(Validator::for_entity(tag).into_fields()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxTagRepository;
    use crate::db::{create_test_pool, schema};
    use crate::validation::FieldErrorKind;

    async fn setup_service() -> TagService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::ensure_schema(&pool)
            .await
            .expect("Failed to create schema");
        TagService::new(SqlxTagRepository::boxed(pool))
    }

    fn tag(title: &str) -> Tag {
        Tag {
            id: 0,
            title: title.into(),
            status_id: 1,
        }
    }

    #[tokio::test]
    async fn test_add_update_delete() {
        let service = setup_service().await;
        let created = service.add(tag("Economy")).await.unwrap();

        let disabled = Tag {
            status_id: 2,
            ..created.clone()
        };
        assert!(service.update(disabled.clone()).await.unwrap());
        assert_eq!(service.get_by_id(created.id).await.unwrap(), disabled);

        assert!(service.delete(created.id).await.unwrap());
        assert!(matches!(service.delete(created.id).await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_title_too_long() {
        let service = setup_service().await;
        match service.add(tag(&"t".repeat(129))).await {
            Err(ServiceError::Validation(fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "title");
                assert_eq!(fields[0].error, FieldErrorKind::Max);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_unknown_id_is_not_found() {
        let service = setup_service().await;
        let ghost = Tag {
            id: 5,
            ..tag("Ghost")
        };
        assert!(matches!(service.validate(&ghost).await, Err(ServiceError::NotFound)));
        assert!(service.validate(&tag("Fresh")).await.unwrap().is_empty());
    }
}
