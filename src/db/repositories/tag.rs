//! Tag repository
//!
//! Besides plain CRUD this is the bulk loader used to attach tags to news
//! lists and to check news tag references: see [`TagRepository::by_ids`].

use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::executor::{self, RowMapper};
use crate::db::query::{
    compile_count, compile_delete, compile_insert, compile_select, compile_update, fold_case,
    Pager, QuerySpec, Relations, SqlValue,
};
use crate::db::search::{TagSearch, TAG_TABLE};
use crate::db::DynDatabasePool;
use crate::models::Tag;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Count tags matching the search
    async fn count(&self, search: &TagSearch) -> Result<i64>;

    /// List tags for a query spec
    async fn list(&self, spec: &QuerySpec<TagSearch>) -> Result<Vec<Tag>>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Every tag whose id is in `ids`, in one round trip and without a page
    /// limit. Unknown ids are simply absent from the result.
    async fn by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>>;

    /// Insert a tag and return it with its assigned id
    async fn add(&self, tag: &Tag) -> Result<Tag>;

    /// Replace every writable field. Returns false when no row has this id.
    async fn update(&self, tag: &Tag) -> Result<bool>;

    /// Delete a tag. Returns false when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based tag repository implementation
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

const TAG_MAPPER: RowMapper<Tag> = RowMapper {
    sqlite: row_to_tag_sqlite,
    mysql: row_to_tag_mysql,
};

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn count(&self, search: &TagSearch) -> Result<i64> {
        let query = compile_count(&TAG_TABLE, search, self.pool.driver());
        executor::fetch_count(&self.pool, &query).await
    }

    async fn list(&self, spec: &QuerySpec<TagSearch>) -> Result<Vec<Tag>> {
        let query = compile_select(&TAG_TABLE, spec, self.pool.driver());
        executor::fetch_all(&self.pool, &query, &spec.relations, &TAG_MAPPER).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let search = TagSearch {
            id: Some(id),
            ..Default::default()
        };
        let found = self.list(&QuerySpec::new(search, Pager::new(1, 1))).await?;
        Ok(found.into_iter().next())
    }

    async fn by_ids(&self, ids: &[i64]) -> Result<Vec<Tag>> {
        // An empty IN list would match everything
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let search = TagSearch {
            ids: ids.to_vec(),
            ..Default::default()
        };
        self.list(&QuerySpec::unpaged(search)).await
    }

    async fn add(&self, tag: &Tag) -> Result<Tag> {
        let query = compile_insert(&TAG_TABLE, tag_values(tag));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(Tag {
            id: outcome.last_insert_id,
            ..tag.clone()
        })
    }

    async fn update(&self, tag: &Tag) -> Result<bool> {
        let query = compile_update(&TAG_TABLE, tag.id, tag_values(tag));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let outcome = executor::execute(&self.pool, &compile_delete(&TAG_TABLE, id)).await?;
        Ok(outcome.rows_affected > 0)
    }
}

fn tag_values(tag: &Tag) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("title", tag.title.as_str().into()),
        ("title_search", fold_case(&tag.title).into()),
        ("status_id", tag.status_id.into()),
    ]
}

fn row_to_tag_sqlite(row: &sqlx::sqlite::SqliteRow, _: &Relations) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        status_id: row.try_get("status_id")?,
    })
}

fn row_to_tag_mysql(row: &sqlx::mysql::MySqlRow, _: &Relations) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        status_id: row.try_get("status_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, schema};

    async fn setup_test_repo() -> SqlxTagRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::ensure_schema(&pool)
            .await
            .expect("Failed to create schema");
        SqlxTagRepository::new(pool)
    }

    fn tag(title: &str) -> Tag {
        Tag {
            id: 0,
            title: title.to_string(),
            status_id: 1,
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let repo = setup_test_repo().await;

        let created = repo.add(&tag("Economy")).await.unwrap();
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(created.clone()));

        let renamed = Tag {
            title: "Finance".into(),
            ..created.clone()
        };
        assert!(repo.update(&renamed).await.unwrap());
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), Some(renamed));

        assert!(repo.delete(created.id).await.unwrap());
        assert_eq!(repo.get_by_id(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_by_ids_skips_unknown_ids() {
        let repo = setup_test_repo().await;
        let a = repo.add(&tag("Alpha")).await.unwrap();
        let b = repo.add(&tag("Beta")).await.unwrap();
        repo.add(&tag("Gamma")).await.unwrap();

        let found = repo.by_ids(&[b.id, 9_999, a.id]).await.unwrap();
        let mut ids: Vec<i64> = found.iter().map(|t| t.id).collect();
        ids.sort();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_by_ids_empty_input_returns_nothing() {
        let repo = setup_test_repo().await;
        repo.add(&tag("Alpha")).await.unwrap();
        assert!(repo.by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_order_is_by_title() {
        let repo = setup_test_repo().await;
        for title in ["gamma", "Alpha", "beta"] {
            repo.add(&tag(title)).await.unwrap();
        }
        let titles: Vec<String> = repo
            .list(&QuerySpec::unpaged(TagSearch::default()))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        // byte order, uppercase first
        assert_eq!(titles, vec!["Alpha", "beta", "gamma"]);
        assert_eq!(repo.count(&TagSearch::default()).await.unwrap(), 3);
    }
}
