use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use super::error::NewsStoreError;
use super::model::{Article, Category};
use crate::infrastructure::repositories::NewsSourceClient;

/// Articles stay addressable for audio generation well after the listing
/// that surfaced them has been refreshed.
const INDEX_TTL: Duration = Duration::from_secs(6 * 60 * 60);
const INDEX_CAPACITY: u64 = 2048;
const LISTING_CAPACITY: u64 = 16;

/// Lookup facade over the external news upstream.
///
/// Listings are cached per category for the configured refresh interval;
/// concurrent cache misses for the same category coalesce into a single
/// upstream fetch. Every listed article is also indexed by id so
/// `get_article` stays a side-effect-free lookup.
pub struct ArticleStore {
    source: Arc<dyn NewsSourceClient>,
    listings: Cache<String, Arc<Vec<Article>>>,
    by_id: Cache<String, Article>,
}

impl ArticleStore {
    pub fn new(source: Arc<dyn NewsSourceClient>, refresh_interval: Duration) -> Self {
        let listings = Cache::builder()
            .max_capacity(LISTING_CAPACITY)
            .time_to_live(refresh_interval)
            .build();
        let by_id = Cache::builder()
            .max_capacity(INDEX_CAPACITY)
            .time_to_live(INDEX_TTL)
            .build();

        Self {
            source,
            listings,
            by_id,
        }
    }

    /// Current listing for a category, or across all categories.
    pub async fn list(&self, category: Option<Category>) -> Result<Arc<Vec<Article>>, NewsStoreError> {
        let key = category.map(|c| c.to_string()).unwrap_or_else(|| "all".to_string());

        let source = self.source.clone();
        let by_id = self.by_id.clone();
        self.listings
            .try_get_with(key.clone(), async move {
                tracing::info!(listing = %key, "Fetching fresh news from upstream");
                let articles = source
                    .fetch_articles(category)
                    .await
                    .map_err(NewsStoreError::Dependency)?;

                for article in &articles {
                    by_id.insert(article.id.clone(), article.clone()).await;
                }

                tracing::info!(
                    listing = %key,
                    article_count = articles.len(),
                    "News listing cached"
                );
                Ok(Arc::new(articles))
            })
            .await
            .map_err(|e: Arc<NewsStoreError>| NewsStoreError::Dependency(e.to_string()))
    }

    /// Case-insensitive substring search over title and description.
    /// Relevance ranking is the client's problem, not ours.
    pub async fn search(&self, query: &str) -> Result<Vec<Article>, NewsStoreError> {
        let needle = query.to_lowercase();
        let articles = self.list(None).await?;
        Ok(articles
            .iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle)
                    || a.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    /// Side-effect-free lookup by article id. Fails with `NotFound` for
    /// ids that were never listed or have expired out of the index.
    pub async fn get_article(&self, id: &str) -> Result<Article, NewsStoreError> {
        self.by_id
            .get(id)
            .await
            .ok_or_else(|| NewsStoreError::NotFound(format!("article '{id}' is not available")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl NewsSourceClient for StubSource {
        async fn fetch_articles(&self, category: Option<Category>) -> Result<Vec<Article>, String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let all = vec![
                article("a1", "Markets rally on rate cut", Category::Business),
                article("a2", "New chip breaks speed record", Category::Technology),
                article("a3", "Storm clears after long week", Category::General),
            ];
            Ok(match category {
                Some(c) => all.into_iter().filter(|a| a.category == c).collect(),
                None => all,
            })
        }
    }

    fn article(id: &str, title: &str, category: Category) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title}, in detail."),
            author: "Newsroom".to_string(),
            url: format!("https://news.example/{id}"),
            image_url: String::new(),
            published_at: Utc::now(),
            category,
            source: "example".to_string(),
            source_display: "Example News".to_string(),
        }
    }

    fn store() -> (ArticleStore, Arc<StubSource>) {
        let source = Arc::new(StubSource {
            fetches: AtomicUsize::new(0),
        });
        (
            ArticleStore::new(source.clone(), Duration::from_secs(60)),
            source,
        )
    }

    #[tokio::test]
    async fn test_listing_is_cached_between_calls() {
        let (store, source) = store();
        let first = store.list(None).await.unwrap();
        let second = store.list(None).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_category_listing_filters_upstream() {
        let (store, _) = store();
        let tech = store.list(Some(Category::Technology)).await.unwrap();
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].id, "a2");
    }

    #[tokio::test]
    async fn test_get_article_after_listing() {
        let (store, _) = store();
        store.list(None).await.unwrap();
        let found = store.get_article("a2").await.unwrap();
        assert_eq!(found.title, "New chip breaks speed record");
    }

    #[tokio::test]
    async fn test_get_article_unknown_id_is_not_found() {
        let (store, _) = store();
        store.list(None).await.unwrap();
        let err = store.get_article("nope").await.unwrap_err();
        assert!(matches!(err, NewsStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_matches_title_and_description() {
        let (store, _) = store();
        let hits = store.search("CHIP").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a2");

        let hits = store.search("in detail").await.unwrap();
        assert_eq!(hits.len(), 3);
    }
}
