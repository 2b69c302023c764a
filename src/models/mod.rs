//! Data models
//!
//! Store records for the four portal entities plus the tagged news aggregate.
//! Wire representations live in [`crate::api::types`] and
//! [`crate::api::portal`]; conversions between the layers are plain functions.

mod author;
mod category;
mod news;
mod status;
mod tag;

pub use author::Author;
pub use category::Category;
pub use news::{News, NewsItem};
pub use status::Status;
pub use tag::Tag;
