//! Read-through loading of feeds, search results and details
//!
//! Every feed goes memory → fresh disk snapshot → network → stale snapshot →
//! fallback content. A refresh starts at the network step. Search results and details are kept in memory only.

use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::feed::Feed;
use crate::cache::{DiskCache, TtlCache};
use crate::tmdb::{ContentDetails, ContentItem, MediaType, TmdbClient, TmdbError};

/// Where a loaded feed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    Memory,
    /// Fresh on-disk snapshot
    Disk,
    Network,
    /// Expired snapshot used because TMDb could not be reached
    Stale,
    /// Placeholder content, never cached
    Fallback,
}

impl FeedOrigin {
    /// Whether the entries are real catalog data that is up to date
    pub fn is_live(&self) -> bool {
        matches!(self, FeedOrigin::Memory | FeedOrigin::Disk | FeedOrigin::Network)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFeed {
    pub feed: Feed,
    pub items: Vec<ContentItem>,
    pub origin: FeedOrigin,
}

/// Single placeholder entry shown when a feed cannot be loaded at all
pub fn fallback_content() -> Vec<ContentItem> {
    vec![ContentItem {
        id: 1,
        title: "Sample Title".to_string(),
        media_type: MediaType::Movie,
        year: Some(2023),
        vote_average: 8.5,
        description: "Placeholder shown while the catalog is unavailable.".to_string(),
        image: None,
        backdrop: None,
        genres: vec!["Action".to_string()],
        duration: crate::tmdb::DEFAULT_MOVIE_DURATION.to_string(),
        popularity: 0.0,
    }]
}

fn search_key(query: &str) -> String {
    format!("search_{}", query.to_lowercase())
}

fn details_key(id: u64, media_type: MediaType) -> String {
    format!("details_{}_{}", media_type.as_str(), id)
}

/// Serves catalog content through the caches
pub struct ContentManager {
    client: TmdbClient,
    feeds: TtlCache<Vec<ContentItem>>,
    searches: TtlCache<Vec<ContentItem>>,
    details: TtlCache<ContentDetails>,
    disk: Option<DiskCache>,
    disk_ttl: chrono::Duration,
}

impl ContentManager {
    /// Creates a manager; `disk` is optional and `disk_ttl` sets snapshot freshness
    pub fn new(
        client: TmdbClient,
        memory_ttl: Duration,
        disk: Option<DiskCache>,
        disk_ttl: Duration,
    ) -> Self {
        Self {
            client,
            feeds: TtlCache::new(memory_ttl),
            searches: TtlCache::new(memory_ttl),
            details: TtlCache::new(memory_ttl),
            disk,
            disk_ttl: chrono::Duration::from_std(disk_ttl)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
        }
    }

    pub fn client(&self) -> &TmdbClient {
        &self.client
    }

    /// Loads one feed, degrading to stale or placeholder content on failure
    pub async fn load_feed(&self, feed: Feed) -> LoadedFeed {
        self.load(feed, false).await
    }

    /// Loads one feed from TMDb, skipping the memory cache and fresh snapshots
    ///
    /// Snapshots and fallback content are still used when the request fails.
    pub async fn refresh_feed(&self, feed: Feed) -> LoadedFeed {
        self.load(feed, true).await
    }

    async fn load(&self, feed: Feed, force: bool) -> LoadedFeed {
        let key = feed.cache_key();

        if !force {
            if let Some(items) = self.feeds.get(key) {
                debug!(key, "feed served from memory");
                return LoadedFeed {
                    feed,
                    items,
                    origin: FeedOrigin::Memory,
                };
            }
        }

        let snapshot = self
            .disk
            .as_ref()
            .and_then(|disk| disk.read::<Vec<ContentItem>>(key));

        if let Some(cached) = snapshot.as_ref().filter(|_| !force) {
            if !cached.is_expired {
                debug!(key, cached_at = %cached.cached_at, "feed served from disk");
                self.feeds.insert(key, cached.data.clone());
                return LoadedFeed {
                    feed,
                    items: cached.data.clone(),
                    origin: FeedOrigin::Disk,
                };
            }
        }

        match self.fetch_feed(feed).await {
            Ok(items) => {
                info!(key, count = items.len(), "feed loaded");
                self.feeds.insert(key, items.clone());
                if let Some(disk) = &self.disk {
                    if let Err(e) = disk.write(key, &items, self.disk_ttl) {
                        warn!(key, error = %e, "failed to write feed snapshot");
                    }
                }
                LoadedFeed {
                    feed,
                    items,
                    origin: FeedOrigin::Network,
                }
            }
            Err(e) => {
                warn!(key, error = %e, "failed to load feed");
                match snapshot {
                    Some(cached) => LoadedFeed {
                        feed,
                        origin: if cached.is_expired {
                            FeedOrigin::Stale
                        } else {
                            FeedOrigin::Disk
                        },
                        items: cached.data,
                    },
                    None => LoadedFeed {
                        feed,
                        items: fallback_content(),
                        origin: FeedOrigin::Fallback,
                    },
                }
            }
        }
    }

    async fn fetch_feed(&self, feed: Feed) -> Result<Vec<ContentItem>, TmdbError> {
        let recipe = feed.recipe();
        let pages = try_join_all(
            recipe
                .sources
                .iter()
                .map(|(listing, _)| self.client.listing(listing)),
        )
        .await?;

        Ok(recipe.combine(pages))
    }

    /// Searches movies and series
    ///
    /// A blank query or a failed request yields an empty list.
    pub async fn search_content(&self, query: &str) -> Vec<ContentItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let key = search_key(query);
        if let Some(results) = self.searches.get(&key) {
            return results;
        }

        match self.client.search_multi(query, 1).await {
            Ok(results) => {
                debug!(query, count = results.len(), "search completed");
                let purged = self.searches.purge_expired();
                if purged > 0 {
                    debug!(purged, "expired searches dropped");
                }
                self.searches.insert(key, results.clone());
                results
            }
            Err(e) => {
                warn!(query, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    /// Full details for a title, cached in memory
    pub async fn content_details(
        &self,
        id: u64,
        media_type: MediaType,
    ) -> Result<ContentDetails, TmdbError> {
        let key = details_key(id, media_type);
        if let Some(details) = self.details.get(&key) {
            return Ok(details);
        }

        let details = self.client.details(id, media_type).await?;
        self.details.insert(key, details.clone());
        Ok(details)
    }

    /// Drops every in-memory entry; disk snapshots are kept
    pub fn clear(&self) {
        self.feeds.clear();
        self.searches.clear();
        self.details.clear();
        info!("content caches cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, TmdbConfig};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TmdbClient {
        TmdbClient::new(&TmdbConfig {
            base_url: server.uri(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            language: "en-US".to_string(),
            credentials: Credentials {
                api_key: Some("key".to_string()),
                bearer_token: None,
            },
        })
    }

    fn manager(server: &MockServer, disk: Option<DiskCache>) -> ContentManager {
        ContentManager::new(
            client(server),
            Duration::from_secs(600),
            disk,
            Duration::from_secs(3600),
        )
    }

    fn movies_page(count: u64) -> serde_json::Value {
        let results: Vec<_> = (1..=count)
            .map(|id| json!({"id": id, "title": format!("Movie {}", id)}))
            .collect();
        json!({ "results": results })
    }

    #[tokio::test]
    async fn test_load_feed_hits_network_once_then_memory() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movies_page(25)))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server, None);

        let first = manager.load_feed(Feed::PopularMovies).await;
        assert_eq!(first.origin, FeedOrigin::Network);
        assert_eq!(first.items.len(), 20);

        let second = manager.load_feed(Feed::PopularMovies).await;
        assert_eq!(second.origin, FeedOrigin::Memory);
        assert_eq!(second.items, first.items);
    }

    #[tokio::test]
    async fn test_load_feed_falls_back_when_api_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let manager = manager(&server, None);
        let loaded = manager.load_feed(Feed::HorrorMovies).await;

        assert_eq!(loaded.origin, FeedOrigin::Fallback);
        assert_eq!(loaded.items, fallback_content());

        // Fallback is not cached, so the next call tries the network again
        let again = manager.load_feed(Feed::HorrorMovies).await;
        assert_eq!(again.origin, FeedOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_one_failing_source_fails_the_blend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/top_rated"))
            .respond_with(ResponseTemplate::new(200).set_body_json(movies_page(20)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/top_rated"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let manager = manager(&server, None);
        let loaded = manager.load_feed(Feed::TopRated).await;

        assert_eq!(loaded.origin, FeedOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_fresh_snapshot_is_used_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let disk = DiskCache::with_dir(dir.path().to_path_buf());
        let items = fallback_content();
        disk.write(Feed::UpcomingMovies.cache_key(), &items, chrono::Duration::hours(1))
            .unwrap();

        let manager = manager(&server, Some(disk));
        let loaded = manager.load_feed(Feed::UpcomingMovies).await;

        assert_eq!(loaded.origin, FeedOrigin::Disk);
        assert_eq!(loaded.items, items);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_used_when_api_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let disk = DiskCache::with_dir(dir.path().to_path_buf());
        let mut items = fallback_content();
        items[0].title = "Old but real".to_string();
        disk.write(Feed::NewTvShows.cache_key(), &items, chrono::Duration::seconds(-1))
            .unwrap();

        let manager = manager(&server, Some(disk));
        let loaded = manager.load_feed(Feed::NewTvShows).await;

        assert_eq!(loaded.origin, FeedOrigin::Stale);
        assert_eq!(loaded.items[0].title, "Old but real");
        assert!(!loaded.origin.is_live());
    }

    #[tokio::test]
    async fn test_network_result_is_written_to_disk() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/airing_today"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 5, "name": "Tonight"}]
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let disk = DiskCache::with_dir(dir.path().to_path_buf());
        let manager = manager(&server, Some(disk.clone()));

        manager.load_feed(Feed::NewTvShows).await;

        let cached = disk
            .read::<Vec<ContentItem>>(Feed::NewTvShows.cache_key())
            .unwrap();
        assert!(!cached.is_expired);
        assert_eq!(cached.data[0].title, "Tonight");
    }

    #[tokio::test]
    async fn test_search_is_cached_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 603, "title": "The Matrix", "media_type": "movie"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = manager(&server, None);

        assert_eq!(manager.search_content("Matrix").await.len(), 1);
        assert_eq!(manager.search_content("matrix").await.len(), 1);
        assert!(manager.search_content("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_errors_yield_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("query", "dune"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let manager = manager(&server, None);
        assert!(manager.search_content("dune").await.is_empty());
    }

    #[tokio::test]
    async fn test_details_errors_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let manager = manager(&server, None);
        assert!(manager.content_details(42, MediaType::Movie).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "name": "Show"}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let manager = manager(&server, None);
        manager.load_feed(Feed::PopularTv).await;
        manager.clear();
        let reloaded = manager.load_feed(Feed::PopularTv).await;

        assert_eq!(reloaded.origin, FeedOrigin::Network);
    }

    #[tokio::test]
    async fn test_refresh_skips_fresh_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "name": "Show"}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let disk = DiskCache::with_dir(dir.path().to_path_buf());
        let manager = manager(&server, Some(disk));

        let first = manager.load_feed(Feed::PopularTv).await;
        assert_eq!(first.origin, FeedOrigin::Network);

        manager.clear();
        let refreshed = manager.refresh_feed(Feed::PopularTv).await;
        assert_eq!(refreshed.origin, FeedOrigin::Network);

        // Plain loads still go through the caches
        let cached = manager.load_feed(Feed::PopularTv).await;
        assert_eq!(cached.origin, FeedOrigin::Memory);
    }

    #[tokio::test]
    async fn test_refresh_keeps_snapshot_when_api_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let disk = DiskCache::with_dir(dir.path().to_path_buf());
        let mut items = fallback_content();
        items[0].title = "Saved earlier".to_string();
        disk.write(Feed::ComedyTv.cache_key(), &items, chrono::Duration::hours(1))
            .unwrap();
        disk.write(Feed::DramaTv.cache_key(), &items, chrono::Duration::seconds(-1))
            .unwrap();

        let manager = manager(&server, Some(disk));

        let fresh = manager.refresh_feed(Feed::ComedyTv).await;
        assert_eq!(fresh.origin, FeedOrigin::Disk);
        assert_eq!(fresh.items[0].title, "Saved earlier");

        let stale = manager.refresh_feed(Feed::DramaTv).await;
        assert_eq!(stale.origin, FeedOrigin::Stale);

        let missing = manager.refresh_feed(Feed::HorrorMovies).await;
        assert_eq!(missing.origin, FeedOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_search_drops_expired_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 603, "title": "The Matrix", "media_type": "movie"}]
            })))
            .mount(&server)
            .await;

        let manager = ContentManager::new(
            client(&server),
            Duration::from_millis(300),
            None,
            Duration::from_secs(3600),
        );

        manager.search_content("matrix").await;
        manager.search_content("dune").await;
        assert_eq!(manager.searches.len(), 2);

        tokio::time::sleep(Duration::from_millis(400)).await;
        manager.search_content("arcane").await;
        assert_eq!(manager.searches.len(), 1);
    }

    #[test]
    fn test_cache_key_formats() {
        assert_eq!(search_key("The Matrix"), "search_the matrix");
        assert_eq!(details_key(603, MediaType::Movie), "details_movie_603");
        assert_eq!(details_key(1399, MediaType::Tv), "details_tv_1399");
    }
}
