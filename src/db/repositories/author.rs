//! Author repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::executor::{self, RowMapper};
use crate::db::query::{
    compile_count, compile_delete, compile_insert, compile_select, compile_update, fold_case,
    Pager, QuerySpec, Relations, SqlValue,
};
use crate::db::search::{AuthorSearch, AUTHOR_TABLE};
use crate::db::DynDatabasePool;
use crate::models::Author;

/// Author repository trait
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn count(&self, search: &AuthorSearch) -> Result<i64>;

    async fn list(&self, spec: &QuerySpec<AuthorSearch>) -> Result<Vec<Author>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Author>>;

    async fn add(&self, author: &Author) -> Result<Author>;

    /// Returns false when no row has this id
    async fn update(&self, author: &Author) -> Result<bool>;

    /// Returns false when no row has this id
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based author repository implementation
pub struct SqlxAuthorRepository {
    pool: DynDatabasePool,
}

impl SqlxAuthorRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn AuthorRepository> {
        Arc::new(Self::new(pool))
    }
}

const AUTHOR_MAPPER: RowMapper<Author> = RowMapper {
    sqlite: row_to_author_sqlite,
    mysql: row_to_author_mysql,
};

#[async_trait]
impl AuthorRepository for SqlxAuthorRepository {
    async fn count(&self, search: &AuthorSearch) -> Result<i64> {
        let query = compile_count(&AUTHOR_TABLE, search, self.pool.driver());
        executor::fetch_count(&self.pool, &query).await
    }

    async fn list(&self, spec: &QuerySpec<AuthorSearch>) -> Result<Vec<Author>> {
        let query = compile_select(&AUTHOR_TABLE, spec, self.pool.driver());
        executor::fetch_all(&self.pool, &query, &spec.relations, &AUTHOR_MAPPER).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Author>> {
        let search = AuthorSearch {
            id: Some(id),
            ..Default::default()
        };
        let found = self.list(&QuerySpec::new(search, Pager::new(1, 1))).await?;
        Ok(found.into_iter().next())
    }

    async fn add(&self, author: &Author) -> Result<Author> {
        let query = compile_insert(&AUTHOR_TABLE, author_values(author));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(Author {
            id: outcome.last_insert_id,
            ..author.clone()
        })
    }

    async fn update(&self, author: &Author) -> Result<bool> {
        let query = compile_update(&AUTHOR_TABLE, author.id, author_values(author));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let outcome = executor::execute(&self.pool, &compile_delete(&AUTHOR_TABLE, id)).await?;
        Ok(outcome.rows_affected > 0)
    }
}

fn author_values(author: &Author) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("name", author.name.as_str().into()),
        ("name_search", fold_case(&author.name).into()),
        ("email", author.email.as_str().into()),
        ("email_search", fold_case(&author.email).into()),
        ("status_id", author.status_id.into()),
    ]
}

fn row_to_author_sqlite(row: &sqlx::sqlite::SqliteRow, _: &Relations) -> Result<Author> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status_id: row.try_get("status_id")?,
    })
}

fn row_to_author_mysql(row: &sqlx::mysql::MySqlRow, _: &Relations) -> Result<Author> {
    Ok(Author {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status_id: row.try_get("status_id")?,
    })
}
