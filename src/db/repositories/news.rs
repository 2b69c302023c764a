//! News repository
//!
//! News rows carry their tag references inline as a JSON id list, written in
//! the same statement as the rest of the row. Category and author can be
//! eager-loaded through [`Relations`]; tags are resolved separately in one
//! batch by `services::relations`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

use crate::db::executor::{self, decode_id_list, encode_id_list, RowMapper};
use crate::db::query::{
    compile_count, compile_delete, compile_insert, compile_select, compile_update, fold_case,
    Pager, QuerySpec, Relation, Relations, SqlValue,
};
use crate::db::search::{NewsSearch, NEWS_TABLE};
use crate::db::DynDatabasePool;
use crate::models::{Author, Category, News};

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Count news matching the search
    async fn count(&self, search: &NewsSearch) -> Result<i64>;

    /// List news for a query spec, eager-loading the requested relations
    async fn list(&self, spec: &QuerySpec<NewsSearch>) -> Result<Vec<News>>;

    /// Get news by ID with the requested relations
    async fn get_by_id(&self, id: i64, relations: &Relations) -> Result<Option<News>>;

    /// Insert news and return it with its assigned id
    async fn add(&self, news: &News) -> Result<News>;

    /// Replace every writable field. Returns false when no row has this id.
    async fn update(&self, news: &News) -> Result<bool>;

    /// Delete news. Returns false when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based news repository implementation
pub struct SqlxNewsRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsRepository {
    /// Create a new SQLx news repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

const NEWS_MAPPER: RowMapper<News> = RowMapper {
    sqlite: row_to_news_sqlite,
    mysql: row_to_news_mysql,
};

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn count(&self, search: &NewsSearch) -> Result<i64> {
        let query = compile_count(&NEWS_TABLE, search, self.pool.driver());
        executor::fetch_count(&self.pool, &query).await
    }

    async fn list(&self, spec: &QuerySpec<NewsSearch>) -> Result<Vec<News>> {
        let query = compile_select(&NEWS_TABLE, spec, self.pool.driver());
        executor::fetch_all(&self.pool, &query, &spec.relations, &NEWS_MAPPER).await
    }

    async fn get_by_id(&self, id: i64, relations: &Relations) -> Result<Option<News>> {
        let search = NewsSearch {
            id: Some(id),
            ..Default::default()
        };
        let spec = QuerySpec {
            relations: relations.clone(),
            ..QuerySpec::new(search, Pager::new(1, 1))
        };
        let found = self.list(&spec).await?;
        Ok(found.into_iter().next())
    }

    async fn add(&self, news: &News) -> Result<News> {
        let query = compile_insert(&NEWS_TABLE, news_values(news));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(News {
            id: outcome.last_insert_id,
            ..news.clone()
        })
    }

    async fn update(&self, news: &News) -> Result<bool> {
        let query = compile_update(&NEWS_TABLE, news.id, news_values(news));
        let outcome = executor::execute(&self.pool, &query).await?;
        Ok(outcome.rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let outcome = executor::execute(&self.pool, &compile_delete(&NEWS_TABLE, id)).await?;
        Ok(outcome.rows_affected > 0)
    }
}

fn news_values(news: &News) -> Vec<(&'static str, SqlValue)> {
    vec![
        ("title", news.title.as_str().into()),
        ("title_search", fold_case(&news.title).into()),
        ("foreword", news.foreword.as_str().into()),
        ("foreword_search", fold_case(&news.foreword).into()),
        ("content", news.content.clone().into()),
        ("published_at", news.published_at.into()),
        ("status_id", news.status_id.into()),
        ("category_id", news.category_id.into()),
        ("author_id", news.author_id.into()),
        ("tag_ids", encode_id_list(&news.tag_ids).into()),
    ]
}

// ============================================================================
// SQLite row mapping
// ============================================================================

fn row_to_news_sqlite(row: &sqlx::sqlite::SqliteRow, relations: &Relations) -> Result<News> {
    let tag_ids: String = row.try_get("tag_ids")?;

    let category = if relations.contains(Relation::Category) {
        let id: Option<i64> = row.try_get("category__id")?;
        id.map(|id| -> Result<Category> {
            Ok(Category {
                id,
                title: row.try_get("category__title")?,
                order_number: row.try_get("category__order_number")?,
                alias: row.try_get("category__alias")?,
                status_id: row.try_get("category__status_id")?,
            })
        })
        .transpose()?
    } else {
        None
    };

    let author = if relations.contains(Relation::Author) {
        let id: Option<i64> = row.try_get("author__id")?;
        id.map(|id| -> Result<Author> {
            Ok(Author {
                id,
                name: row.try_get("author__name")?,
                email: row.try_get("author__email")?,
                status_id: row.try_get("author__status_id")?,
            })
        })
        .transpose()?
    } else {
        None
    };

    Ok(News {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        foreword: row.try_get("foreword")?,
        content: row.try_get("content")?,
        published_at: row.try_get("published_at")?,
        status_id: row.try_get("status_id")?,
        category_id: row.try_get("category_id")?,
        author_id: row.try_get("author_id")?,
        tag_ids: decode_id_list(&tag_ids)?,
        category,
        author,
    })
}

// ============================================================================
// MySQL row mapping
// ============================================================================

fn row_to_news_mysql(row: &sqlx::mysql::MySqlRow, relations: &Relations) -> Result<News> {
    let tag_ids: String = row.try_get("tag_ids")?;

    let category = if relations.contains(Relation::Category) {
        let id: Option<i64> = row.try_get("category__id")?;
        id.map(|id| -> Result<Category> {
            Ok(Category {
                id,
                title: row.try_get("category__title")?,
                order_number: row.try_get("category__order_number")?,
                alias: row.try_get("category__alias")?,
                status_id: row.try_get("category__status_id")?,
            })
        })
        .transpose()?
    } else {
        None
    };

    let author = if relations.contains(Relation::Author) {
        let id: Option<i64> = row.try_get("author__id")?;
        id.map(|id| -> Result<Author> {
            Ok(Author {
                id,
                name: row.try_get("author__name")?,
                email: row.try_get("author__email")?,
                status_id: row.try_get("author__status_id")?,
            })
        })
        .transpose()?
    } else {
        None
    };

    Ok(News {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        foreword: row.try_get("foreword")?,
        content: row.try_get("content")?,
        published_at: row.try_get("published_at")?,
        status_id: row.try_get("status_id")?,
        category_id: row.try_get("category_id")?,
        author_id: row.try_get("author_id")?,
        tag_ids: decode_id_list(&tag_ids)?,
        category,
        author,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        AuthorRepository, CategoryRepository, SqlxAuthorRepository, SqlxCategoryRepository,
    };
    use crate::db::{create_test_pool, schema};
    use chrono::{TimeZone, Utc};

    struct Fixture {
        repo: SqlxNewsRepository,
        category: Category,
        author: Author,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        schema::ensure_schema(&pool)
            .await
            .expect("Failed to create schema");

        let category = SqlxCategoryRepository::new(pool.clone())
            .add(&Category {
                id: 0,
                title: "World".into(),
                order_number: None,
                alias: "world".into(),
                status_id: 1,
            })
            .await
            .unwrap();
        let author = SqlxAuthorRepository::new(pool.clone())
            .add(&Author {
                id: 0,
                name: "Ann Lee".into(),
                email: "ann@example.com".into(),
                status_id: 1,
            })
            .await
            .unwrap();

        Fixture {
            repo: SqlxNewsRepository::new(pool),
            category,
            author,
        }
    }

    fn news(f: &Fixture, title: &str, day: u32, tag_ids: Vec<i64>) -> News {
        News {
            id: 0,
            title: title.to_string(),
            foreword: format!("{} foreword", title),
            content: Some("body".into()),
            published_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            status_id: 1,
            category_id: f.category.id,
            author_id: f.author.id,
            tag_ids,
            category: None,
            author: None,
        }
    }

    #[tokio::test]
    async fn test_add_then_get_round_trip() {
        let f = setup().await;
        let input = news(&f, "Launch", 1, vec![3, 1, 2]);

        let created = f.repo.add(&input).await.unwrap();
        let fetched = f
            .repo
            .get_by_id(created.id, &Relations::none())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched, News { id: created.id, ..input });
        assert_eq!(fetched.tag_ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_relations_are_eager_loaded_on_request() {
        let f = setup().await;
        let created = f.repo.add(&news(&f, "Launch", 1, vec![])).await.unwrap();

        let bare = f.repo.get_by_id(created.id, &Relations::none()).await.unwrap().unwrap();
        assert!(bare.category.is_none());
        assert!(bare.author.is_none());

        let full = f
            .repo
            .get_by_id(created.id, &Relations::full_news())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(full.category, Some(f.category.clone()));
        assert_eq!(full.author, Some(f.author.clone()));
    }

    #[tokio::test]
    async fn test_dangling_category_loads_as_none() {
        let f = setup().await;
        let orphan = News {
            category_id: 777,
            ..news(&f, "Orphan", 1, vec![])
        };
        let created = f.repo.add(&orphan).await.unwrap();

        let loaded = f
            .repo
            .get_by_id(created.id, &Relations::only(Relation::Category))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.category_id, 777);
        assert!(loaded.category.is_none());
    }

    #[tokio::test]
    async fn test_default_order_newest_first() {
        let f = setup().await;
        for (title, day) in [("old", 1), ("new", 20), ("mid", 10)] {
            f.repo.add(&news(&f, title, day, vec![])).await.unwrap();
        }

        let titles: Vec<String> = f
            .repo
            .list(&QuerySpec::unpaged(NewsSearch::default()))
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_tag_containment_and_category_filter() {
        let f = setup().await;
        f.repo.add(&news(&f, "a", 1, vec![1, 2])).await.unwrap();
        f.repo.add(&news(&f, "b", 2, vec![2, 3])).await.unwrap();
        f.repo.add(&news(&f, "c", 3, vec![])).await.unwrap();

        let with_tag_2 = NewsSearch {
            tag_id: Some(2),
            ..Default::default()
        };
        assert_eq!(f.repo.count(&with_tag_2).await.unwrap(), 2);

        let with_tag_1 = NewsSearch {
            tag_id: Some(1),
            category_id: Some(f.category.id),
            ..Default::default()
        };
        let found = f.repo.list(&QuerySpec::unpaged(with_tag_1)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "a");

        let other_category = NewsSearch {
            category_id: Some(f.category.id + 1),
            ..Default::default()
        };
        assert_eq!(f.repo.count(&other_category).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_clears_optional_content() {
        let f = setup().await;
        let created = f.repo.add(&news(&f, "Launch", 1, vec![1])).await.unwrap();

        let edited = News {
            content: None,
            tag_ids: vec![4, 5],
            ..created.clone()
        };
        assert!(f.repo.update(&edited).await.unwrap());

        let fetched = f.repo.get_by_id(created.id, &Relations::none()).await.unwrap().unwrap();
        assert_eq!(fetched.content, None);
        assert_eq!(fetched.tag_ids, vec![4, 5]);

        assert!(f.repo.delete(created.id).await.unwrap());
        assert!(!f.repo.update(&edited).await.unwrap());
    }
}
