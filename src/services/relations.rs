//! Batch tag resolution for news lists
//!
//! Tags are referenced by id from each news row. Loading them per item would
//! cost one round trip per news; instead the union of all referenced ids is
//! fetched once and joined in memory.

use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::db::repositories::TagRepository;
use crate::models::{News, NewsItem, Tag};

/// Attaches tags to news with a single bulk fetch.
#[derive(Clone)]
pub struct TagResolver {
    tags: Arc<dyn TagRepository>,
}

impl TagResolver {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    /// Resolve tags for every item, preserving item order and each item's
    /// tag order. Ids with no stored tag are dropped. When the bulk fetch
    /// fails nothing is returned.
    pub async fn attach(&self, news: Vec<News>) -> Result<Vec<NewsItem>> {
        let ids = unique_tag_ids(&news);
        if ids.is_empty() {
            return Ok(news.into_iter().map(NewsItem::untagged).collect());
        }

        let tags = self
            .tags
            .by_ids(&ids)
            .await
            .with_context(|| format!("Failed to load {} tag(s) for news", ids.len()))?;
        tracing::debug!("Resolved {} of {} tag ids", tags.len(), ids.len());

        Ok(join_tags(news, tags))
    }

    /// Single-item form of [`TagResolver::attach`].
    pub async fn attach_one(&self, news: News) -> Result<NewsItem> {
        let mut items = self.attach(vec![news]).await?;
        items
            .pop()
            .context("Tag resolution returned no item")
    }
}

/// Deduplicated union of referenced tag ids, in first-seen order.
pub fn unique_tag_ids(news: &[News]) -> Vec<i64> {
    let mut seen = HashSet::new();
    news.iter()
        .flat_map(|n| n.tag_ids.iter().copied())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Join fetched tags onto news by id.
pub fn join_tags(news: Vec<News>, tags: Vec<Tag>) -> Vec<NewsItem> {
    let by_id: HashMap<i64, Tag> = tags.into_iter().map(|t| (t.id, t)).collect();

    news.into_iter()
        .map(|n| {
            let tags = n
                .tag_ids
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect();
            NewsItem { news: n, tags }
        })
        .collect()
}
