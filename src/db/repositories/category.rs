//! Category repository
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::executor::{self, RowMapper};
use crate::db::query::{
    compile_count, compile_delete, compile_insert, compile_select, compile_update, fold_case,
    Pager, QuerySpec, Relations, SqlValue,
};
use crate::db::search::{CategorySearch, CATEGORY_TABLE};
use crate::db::DynDatabasePool;
use crate::models::Category;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Count categories matching the search
    async fn count(&self, search: &CategorySearch) -> Result<i64>;

    /// List categories for a query spec
    async fn list(&self, spec: &QuerySpec<CategorySearch>) -> Result<Vec<Category>>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Category with exactly this alias, ignoring `exclude_id`
    async fn one_by_alias(&self, alias: &str, exclude_id: Option<i64>) -> Result<Option<Category>>;

    /// Insert a category and return it with its assigned id
    async fn add(&self, category: &Category) -> Result<Category>;

    /// Replace every writable field. Returns false when no row has this id.
    async fn update(&self, category: &Category) -> Result<bool>;

    /// Delete a category. Returns false when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

const CATEGORY_MAPPER: RowMapper<Category> = RowMapper {
    sqlite: row_to_category_sqlite,
    mysql: row_to_category_mysql,
};

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn count(&self, search: &CategorySearch) -> Result<i64> {
        let query = compile_count(&CATEGORY_TABLE, search, self.pool.driver());
        executor::fetch_count(&self.pool, &query).await
    }

    async fn list(&self, spec: &QuerySpec<CategorySearch>) -> Result<Vec<Category>> {
        let query = compile_select(&CATEGORY_TABLE, spec, self.pool.driver());
        executor::fetch_all(&self.pool, &query, &spec.relations, &CATEGORY_MAPPER).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let search = CategorySearch {
            id: Some(id),
            ..Default::default()
        };
        let found = self.list(&QuerySpec::new(search, Pager::new(1, 1))).await?;
        Ok(found.into_iter().next())
    }

    async fn one_by_alias(&self, alias: &str, exclude_id: Option<i64>) -> Result<Option<Category>> {
        let search = CategorySearch {
            alias: Some(alias.to_string()),
            not_id: exclude_id,
            ..Default::default()
        };
        let found = self.list(&QuerySpec::new(search, Pager::new(1, 1))).await?;
        Ok(found.into_iter().next())
    }

    async fn add(&self, category: &Category) -> Result<Category> {
        let query = compile_insert(&CATEGORY_TABLE, category_values(category));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(Category {
            id: outcome.last_insert_id,
            ..category.clone()
        })
    }

    async fn update(&self, category: &Category) -> Result<bool> {
        let query = compile_update(&CATEGORY_TABLE, category.id, category_values(category));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let outcome = executor::execute(&self.pool, &compile_delete(&CATEGORY_TABLE, id)).await?;
        Ok(outcome.rows_affected > 0)
    }
}

fn category_values(category: &Category) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("title", category.title.as_str().into()),
        ("title_search", fold_case(&category.title).into()),
        ("order_number", category.order_number.into()),
        ("alias", category.alias.as_str().into()),
        ("status_id", category.status_id.into()),
    ]
}

// ============================================================================
// Row mapping
// ============================================================================

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow, _: &Relations) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        order_number: row.try_get("order_number")?,
        alias: row.try_get("alias")?,
        status_id: row.try_get("status_id")?,
    })
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow, _: &Relations) -> Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        order_number: row.try_get("order_number")?,
        alias: row.try_get("alias")?,
        status_id: row.try_get("status_id")?,
    })
}
