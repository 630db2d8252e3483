pub mod error;
pub mod model;
pub mod store;

pub use error::NewsStoreError;
pub use model::{Article, Category};
pub use store::ArticleStore;

use serde::Serialize;

/// Response for GET /api/news and GET /api/search
#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub total_articles: usize,
}
