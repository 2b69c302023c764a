//! Runs [`CompiledQuery`] values against the active pool.
//!
//! The driver split lives here and in the per-entity row mappers; everything
//! else is driver-agnostic.

use anyhow::{Context, Result};
use sqlx::{
    mysql::{MySql, MySqlArguments, MySqlRow},
    query::Query,
    sqlite::{Sqlite, SqliteArguments, SqliteRow},
    Row,
};

use super::pool::{mysql_pool, sqlite_pool, DynDatabasePool};
use super::query::{CompiledQuery, Relations, SqlValue};
use crate::config::DatabaseDriver;

/// Row decoders for one entity, one per driver.
pub struct RowMapper<T> {
    pub sqlite: fn(&SqliteRow, &Relations) -> Result<T>,
    pub mysql: fn(&MySqlRow, &Relations) -> Result<T>,
}

/// Result of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Fetch and decode every row.
pub async fn fetch_all<T: Send>(
    pool: &DynDatabasePool,
    query: &CompiledQuery,
    relations: &Relations,
    mapper: &RowMapper<T>,
) -> Result<Vec<T>> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let rows = bind_sqlite(sqlx::query(&query.sql), &query.args)
                .fetch_all(sqlite_pool(pool)?)
                .await
                .with_context(|| format!("Failed to run query: {}", query.sql))?;
            rows.iter().map(|row| (mapper.sqlite)(row, relations)).collect()
        }
        DatabaseDriver::Mysql => {
            let rows = bind_mysql(sqlx::query(&query.sql), &query.args)
                .fetch_all(mysql_pool(pool)?)
                .await
                .with_context(|| format!("Failed to run query: {}", query.sql))?;
            rows.iter().map(|row| (mapper.mysql)(row, relations)).collect()
        }
    }
}

/// Run a `COUNT(*) AS count` query.
pub async fn fetch_count(pool: &DynDatabasePool, query: &CompiledQuery) -> Result<i64> {
    let count = match pool.driver() {
        DatabaseDriver::Sqlite => bind_sqlite(sqlx::query(&query.sql), &query.args)
            .fetch_one(sqlite_pool(pool)?)
            .await
            .with_context(|| format!("Failed to run count: {}", query.sql))?
            .try_get::<i64, _>("count")?,
        DatabaseDriver::Mysql => bind_mysql(sqlx::query(&query.sql), &query.args)
            .fetch_one(mysql_pool(pool)?)
            .await
            .with_context(|| format!("Failed to run count: {}", query.sql))?
            .try_get::<i64, _>("count")?,
    };
    Ok(count)
}

/// Run an INSERT, UPDATE or DELETE.
pub async fn execute(pool: &DynDatabasePool, query: &CompiledQuery) -> Result<WriteOutcome> {
    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let result = bind_sqlite(sqlx::query(&query.sql), &query.args)
                .execute(sqlite_pool(pool)?)
                .await
                .with_context(|| format!("Failed to execute: {}", query.sql))?;
            Ok(WriteOutcome {
                rows_affected: result.rows_affected(),
                last_insert_id: result.last_insert_rowid(),
            })
        }
        DatabaseDriver::Mysql => {
            let result = bind_mysql(sqlx::query(&query.sql), &query.args)
                .execute(mysql_pool(pool)?)
                .await
                .with_context(|| format!("Failed to execute: {}", query.sql))?;
            Ok(WriteOutcome {
                rows_affected: result.rows_affected(),
                last_insert_id: i64::try_from(result.last_insert_id())
                    .context("Insert id out of range")?,
            })
        }
    }
}

fn bind_sqlite<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::NullableInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::NullableText(v) => query.bind(v.as_deref()),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

fn bind_mysql<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    args: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for arg in args {
        query = match arg {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::NullableInt(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::NullableText(v) => query.bind(v.as_deref()),
            SqlValue::Timestamp(v) => query.bind(*v),
        };
    }
    query
}

/// Decode the JSON id list stored in a text column.
pub fn decode_id_list(raw: &str) -> Result<Vec<i64>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).with_context(|| format!("Malformed id list: {}", raw))
}

/// Encode an id list for a text column.
pub fn encode_id_list(ids: &[i64]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::create_test_pool;
    use crate::db::query::{compile_count, compile_delete, compile_insert, compile_select, QuerySpec};
    use crate::db::schema::ensure_schema;
    use crate::db::search::{TagSearch, TAG_TABLE};

    fn title_mapper() -> RowMapper<String> {
        RowMapper {
            sqlite: |row, _| Ok(row.try_get::<String, _>("title")?),
            mysql: |row, _| Ok(row.try_get::<String, _>("title")?),
        }
    }

    #[tokio::test]
    async fn test_insert_fetch_count_delete() {
        let pool = create_test_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let insert = compile_insert(&TAG_TABLE, vec![("title", "rust".into()), ("status_id", 1.into())]);
        let outcome = execute(&pool, &insert).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);
        assert!(outcome.last_insert_id > 0);

        let spec = QuerySpec::unpaged(TagSearch {
            title: Some("RUS".into()),
            ..Default::default()
        });
        let query = compile_select(&TAG_TABLE, &spec, pool.driver());
        let titles = fetch_all(&pool, &query, &spec.relations, &title_mapper()).await.unwrap();
        assert_eq!(titles, vec!["rust".to_string()]);

        let count = compile_count(&TAG_TABLE, &TagSearch::default(), pool.driver());
        assert_eq!(fetch_count(&pool, &count).await.unwrap(), 1);

        let delete = compile_delete(&TAG_TABLE, outcome.last_insert_id);
        assert_eq!(execute(&pool, &delete).await.unwrap().rows_affected, 1);
        assert_eq!(fetch_count(&pool, &count).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_an_error() {
        let pool = create_test_pool().await.unwrap();
        // no schema: the table does not exist
        let count = compile_count(&TAG_TABLE, &TagSearch::default(), pool.driver());
        assert!(fetch_count(&pool, &count).await.is_err());
    }

    #[test]
    fn test_id_list_codec() {
        assert_eq!(decode_id_list("[3,1,2]").unwrap(), vec![3, 1, 2]);
        assert_eq!(decode_id_list("").unwrap(), Vec::<i64>::new());
        assert!(decode_id_list("{").is_err());
        assert_eq!(encode_id_list(&[5, 6]), "[5,6]");
        assert_eq!(encode_id_list(&[]), "[]");
    }
}
