//! Database repositories
//!
//! One repository per entity. Each compiles its reads and writes through
//! [`crate::db::query`] and runs them with [`crate::db::executor`].

pub mod author;
pub mod category;
pub mod news;
pub mod tag;

pub use author::{AuthorRepository, SqlxAuthorRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use tag::{SqlxTagRepository, TagRepository};
