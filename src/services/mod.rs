//! Services layer - Business logic
//!
//! One service per entity plus the read-only portal. Services own
//! validation, existence checks and tag resolution; repositories only
//! read and write rows.

pub mod author;
pub mod category;
pub mod error;
pub mod news;
pub mod portal;
pub mod relations;
pub mod tag;

pub use author::AuthorService;
pub use category::CategoryService;
pub use error::{ServiceError, ServiceResult};
pub use news::NewsService;
pub use portal::{NewsFilter, PortalService};
pub use relations::TagResolver;
pub use tag::TagService;
