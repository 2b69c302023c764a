//! Database layer
//!
//! Supports SQLite (default) and MySQL behind the [`DatabasePool`] trait.
//!
//! # Usage
//!
//! ```ignore
//! use newsportal::config::DatabaseConfig;
//! use newsportal::db::{create_pool, schema};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! schema::ensure_schema(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod executor;
pub mod pool;
pub mod query;
pub mod repositories;
pub mod schema;
pub mod search;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
