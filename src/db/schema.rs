//! Store bootstrap
//!
//! Creates the four portal tables when they are missing. Every statement is
//! idempotent, so this runs on each startup. There is no version table:
//! schema evolution is handled outside the service.
//!
//! Searchable text is stored twice: as written and case-folded in a
//! `*_search` column that text filters match against.

use anyhow::{Context, Result};

use super::pool::DynDatabasePool;
use crate::config::DatabaseDriver;

const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_search TEXT NOT NULL,
    order_number INTEGER,
    alias TEXT NOT NULL,
    status_id INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_categories_alias ON categories(alias);

CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_search TEXT NOT NULL,
    status_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    name_search TEXT NOT NULL,
    email TEXT NOT NULL,
    email_search TEXT NOT NULL,
    status_id INTEGER NOT NULL
);

-- category_id, author_id and tag_ids are checked on write, not by constraints
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    title_search TEXT NOT NULL,
    foreword TEXT NOT NULL,
    foreword_search TEXT NOT NULL,
    content TEXT,
    published_at TEXT NOT NULL,
    status_id INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    author_id INTEGER NOT NULL,
    tag_ids TEXT NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS idx_news_category ON news(category_id);
CREATE INDEX IF NOT EXISTS idx_news_published ON news(published_at);
"#;

const MYSQL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id BIGINT PRIMARY KEY AUTO_INCREMENT,
    title VARCHAR(255) NOT NULL,
    title_search TEXT NOT NULL,
    order_number INT NULL,
    alias VARCHAR(255) NOT NULL,
    status_id INT NOT NULL,
    INDEX idx_categories_alias (alias)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;

CREATE TABLE IF NOT EXISTS tags (
    id BIGINT PRIMARY KEY AUTO_INCREMENT,
    title VARCHAR(128) NOT NULL,
    title_search TEXT NOT NULL,
    status_id INT NOT NULL
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;

CREATE TABLE IF NOT EXISTS authors (
    id BIGINT PRIMARY KEY AUTO_INCREMENT,
    name VARCHAR(128) NOT NULL,
    name_search TEXT NOT NULL,
    email VARCHAR(255) NOT NULL,
    email_search TEXT NOT NULL,
    status_id INT NOT NULL
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;

-- category_id, author_id and tag_ids are checked on write, not by constraints
CREATE TABLE IF NOT EXISTS news (
    id BIGINT PRIMARY KEY AUTO_INCREMENT,
    title VARCHAR(255) NOT NULL,
    title_search TEXT NOT NULL,
    foreword VARCHAR(1024) NOT NULL,
    foreword_search TEXT NOT NULL,
    content LONGTEXT NULL,
    published_at DATETIME(6) NOT NULL,
    status_id INT NOT NULL,
    category_id BIGINT NOT NULL,
    author_id BIGINT NOT NULL,
    tag_ids TEXT NOT NULL,
    INDEX idx_news_category (category_id),
    INDEX idx_news_published (published_at)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;
"#;

/// Create any missing tables. Returns the number of statements executed.
pub async fn ensure_schema(pool: &DynDatabasePool) -> Result<usize> {
    let script = match pool.driver() {
        DatabaseDriver::Sqlite => SQLITE_SCHEMA,
        DatabaseDriver::Mysql => MYSQL_SCHEMA,
    };

    let statements = split_statements(script);
    for statement in &statements {
        pool.execute(statement)
            .await
            .with_context(|| format!("Failed to bootstrap schema: {}", first_line(statement)))?;
    }

    tracing::info!(
        "Schema ready ({} statements, driver {:?})",
        statements.len(),
        pool.driver()
    );
    Ok(statements.len())
}

/// Split a script on `;`, dropping blank and comment-only fragments.
fn split_statements(script: &str) -> Vec<&str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|fragment| {
            fragment
                .lines()
                .any(|line| !line.trim().is_empty() && !line.trim().starts_with("--"))
        })
        .collect()
}

fn first_line(statement: &str) -> &str {
    statement
        .lines()
        .find(|line| !line.trim().starts_with("--"))
        .unwrap_or(statement)
}
