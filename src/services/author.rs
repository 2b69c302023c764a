//! Author service

use std::sync::Arc;

use super::error::{ServiceError, ServiceResult};
use crate::db::query::QuerySpec;
use crate::db::repositories::AuthorRepository;
use crate::db::search::AuthorSearch;
use crate::models::Author;
use crate::validation::{FieldError, Validator};

/// Author service
pub struct AuthorService {
    repo: Arc<dyn AuthorRepository>,
}

impl AuthorService {
    pub fn new(repo: Arc<dyn AuthorRepository>) -> Self {
        Self { repo }
    }

    pub async fn count(&self, search: &AuthorSearch) -> ServiceResult<i64> {
        Ok(self.repo.count(search).await?)
    }

    pub async fn get(&self, spec: &QuerySpec<AuthorSearch>) -> ServiceResult<Vec<Author>> {
        Ok(self.repo.list(spec).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Author> {
        self.repo.get_by_id(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn add(&self, author: Author) -> ServiceResult<Author> {
        let author = Author { id: 0, ..author };
        Validator::for_entity(&author).into_result()?;

        let created = self.repo.add(&author).await?;
        tracing::info!("Author created: {}", created.id);
        Ok(created)
    }

    pub async fn update(&self, author: Author) -> ServiceResult<bool> {
        self.get_by_id(author.id).await?;
        Validator::for_entity(&author).into_result()?;
        Ok(self.repo.update(&author).await?)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<bool> {
        self.get_by_id(id).await?;
        let deleted = self.repo.delete(id).await?;
        tracing::info!("Author deleted: {}", id);
        Ok(deleted)
    }

    pub async fn validate(&self, author: &Author) -> ServiceResult<Vec<FieldError>> {
        if author.id != 0 {
            self.get_by_id(author.id).await?;
        }
        Ok(Validator::for_entity(author).into_fields()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxAuthorRepository;
    use crate::db::{create_test_pool, schema};
    use crate::validation::FieldErrorKind;

    async fn setup_service() -> AuthorService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::ensure_schema(&pool)
            .await
            .expect("Failed to create schema");
        AuthorService::new(SqlxAuthorRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_add_rejects_bad_email() {
        let service = setup_service().await;
        let result = service
            .add(Author {
                id: 0,
                name: "Ann".into(),
                email: "ann.example.com".into(),
                status_id: 1,
            })
            .await;
        match result {
            Err(ServiceError::Validation(fields)) => {
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[0].error, FieldErrorKind::Format);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let service = setup_service().await;
        let created = service
            .add(Author {
                id: 0,
                name: "Ann".into(),
                email: "ann@example.com".into(),
                status_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(service.get_by_id(created.id).await.unwrap(), created);
        assert!(matches!(
            service.update(Author { id: 99, ..created }).await,
            Err(ServiceError::NotFound)
        ));
    }
}
