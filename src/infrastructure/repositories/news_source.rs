use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::news::{Article, Category};

const USER_AGENT: &str = "NewsBreeze/1.0 (News Aggregator)";

/// Gateway for the external news upstream. Aggregation, feed parsing and
/// retention all live on the other side of this trait.
#[async_trait]
pub trait NewsSourceClient: Send + Sync {
    /// Fetch the current articles, optionally restricted to a category.
    async fn fetch_articles(&self, category: Option<Category>) -> Result<Vec<Article>, String>;
}

/// Article shape served by the news upstream. Most fields are optional
/// there; normalization happens on our side.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpstreamArticle {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub author: Option<String>,
    #[serde(alias = "link")]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub category: Option<String>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub source_display: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    articles: Vec<UpstreamArticle>,
}

/// HTTP implementation of the news gateway against a JSON upstream.
pub struct HttpNewsSource {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpNewsSource {
    pub fn new(base_url: String, request_timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url,
            http_client,
        }
    }

    fn normalize(raw: UpstreamArticle) -> Article {
        // Upstreams that omit ids still need a stable one so dedup keys
        // survive refreshes; derive it from the article URL.
        let id = raw
            .id
            .unwrap_or_else(|| Uuid::new_v5(&Uuid::NAMESPACE_URL, raw.url.as_bytes()).to_string());

        let category = raw
            .category
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(Category::General);

        Article {
            id,
            title: raw.title,
            description: raw.description,
            author: raw.author.unwrap_or_else(|| raw.source_display.clone()),
            url: raw.url,
            image_url: raw.image_url,
            published_at: raw.published_at.unwrap_or_else(Utc::now),
            category,
            source: raw.source,
            source_display: raw.source_display,
        }
    }
}

#[async_trait]
impl NewsSourceClient for HttpNewsSource {
    async fn fetch_articles(&self, category: Option<Category>) -> Result<Vec<Article>, String> {
        let url = format!("{}/articles", self.base_url.trim_end_matches('/'));
        let mut request = self.http_client.get(&url);
        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("news upstream request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "news upstream returned status {}",
                response.status()
            ));
        }

        let body: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| format!("news upstream returned invalid JSON: {e}"))?;

        let mut articles: Vec<Article> =
            body.articles.into_iter().map(Self::normalize).collect();
        // Newest first, matching what the clients render.
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        tracing::info!(
            url = %url,
            article_count = articles.len(),
            "Fetched articles from news upstream"
        );
        Ok(articles)
    }
}
