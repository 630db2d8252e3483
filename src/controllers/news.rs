use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::news::{ArticleStore, ArticlesResponse, Category};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub struct NewsController {
    store: Arc<ArticleStore>,
}

impl NewsController {
    pub fn new(store: Arc<ArticleStore>) -> Self {
        Self { store }
    }

    /// GET /api/news - Current articles, optionally filtered by category
    pub async fn list_news(
        State(controller): State<Arc<NewsController>>,
        Query(query): Query<NewsQuery>,
    ) -> AppResult<Json<ArticlesResponse>> {
        let category = match query.category.as_deref() {
            Some(raw) => Some(
                raw.parse::<Category>()
                    .map_err(AppError::BadRequest)?,
            ),
            None => None,
        };

        let articles = controller.store.list(category).await?;
        Ok(Json(ArticlesResponse {
            success: true,
            total_articles: articles.len(),
            articles: articles.as_ref().clone(),
        }))
    }

    /// GET /api/search - Substring search over the current listing
    pub async fn search(
        State(controller): State<Arc<NewsController>>,
        Query(query): Query<SearchQuery>,
    ) -> AppResult<Json<ArticlesResponse>> {
        let q = query.q.unwrap_or_default();
        if q.trim().is_empty() {
            return Err(AppError::BadRequest(
                "search query cannot be empty".to_string(),
            ));
        }

        let articles = controller.store.search(q.trim()).await?;
        Ok(Json(ArticlesResponse {
            success: true,
            total_articles: articles.len(),
            articles,
        }))
    }
}
