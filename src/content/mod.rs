//! Catalog content: named feeds and the manager that serves them

mod feed;
mod manager;

pub use feed::{Feed, Order, Recipe};
pub use manager::{fallback_content, ContentManager, FeedOrigin, LoadedFeed};
