//! Tag model

/// A tag as stored. News reference tags by id through `News::tag_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub title: String,
    pub status_id: i32,
}
