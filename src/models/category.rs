//! Category model

/// A news category as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier, 0 before insert
    pub id: i64,
    pub title: String,
    /// Position in menus; unordered when absent
    pub order_number: Option<i32>,
    /// URL slug, unique across categories
    pub alias: String,
    pub status_id: i32,
}
