//! Background content loading
//!
//! The UI never awaits the network. It sends `LoadRequest`s to a loader task
//! and picks up `LoadMessage`s with `try_recv` on every frame. Each feed and
//! each request runs in its own task so results arrive as soon as they are
//! ready.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::content::{ContentManager, Feed, LoadedFeed};
use crate::tmdb::{ContentDetails, ContentItem, MediaType};

/// Capacity of the message channel back to the UI
const MESSAGE_BUFFER: usize = 64;

/// Work requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    /// Load feeds through the caches
    Feeds(Vec<Feed>),
    /// Drop the in-memory caches, then fetch feeds from TMDb
    Refresh(Vec<Feed>),
    /// Load details for the title featured in the hero banner
    Hero(ContentItem),
    Search(String),
    Details { id: u64, media_type: MediaType },
}

/// Results sent back to the UI
#[derive(Debug, Clone)]
pub enum LoadMessage {
    FeedLoaded(LoadedFeed),
    HeroLoaded(Result<Box<ContentDetails>, String>),
    SearchCompleted {
        query: String,
        results: Result<Vec<ContentItem>, String>,
    },
    DetailsLoaded {
        id: u64,
        media_type: MediaType,
        result: Result<Box<ContentDetails>, String>,
    },
}

/// Handle to the loader task
pub struct LoaderHandle {
    requests: mpsc::UnboundedSender<LoadRequest>,
    receiver: mpsc::Receiver<LoadMessage>,
}

impl LoaderHandle {
    /// Spawns the loader task on the current tokio runtime
    pub fn spawn(manager: Arc<ContentManager>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<LoadRequest>();
        let (msg_tx, msg_rx) = mpsc::channel(MESSAGE_BUFFER);

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                debug!(?request, "load request");
                dispatch(&manager, &msg_tx, request);
            }
            debug!("loader stopped");
        });

        Self {
            requests: request_tx,
            receiver: msg_rx,
        }
    }

    /// Queues a request; returns `false` when the loader has stopped
    pub fn request(&self, request: LoadRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    /// Returns the next pending message without blocking
    pub fn try_recv(&mut self) -> Option<LoadMessage> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next message
    pub async fn recv(&mut self) -> Option<LoadMessage> {
        self.receiver.recv().await
    }
}

fn dispatch(manager: &Arc<ContentManager>, tx: &mpsc::Sender<LoadMessage>, request: LoadRequest) {
    match request {
        LoadRequest::Feeds(feeds) => spawn_feeds(manager, tx, feeds, false),
        LoadRequest::Refresh(feeds) => {
            manager.clear();
            spawn_feeds(manager, tx, feeds, true);
        }
        LoadRequest::Hero(item) => {
            let manager = Arc::clone(manager);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = manager
                    .content_details(item.id, item.media_type)
                    .await
                    .map(Box::new)
                    .map_err(|e| e.to_string());
                send(&tx, LoadMessage::HeroLoaded(result)).await;
            });
        }
        LoadRequest::Search(query) => {
            let manager = Arc::clone(manager);
            let tx = tx.clone();
            tokio::spawn(async move {
                let task_query = query.clone();
                let results = tokio::spawn(async move { manager.search_content(&task_query).await })
                    .await
                    .map_err(|e| e.to_string());
                send(&tx, LoadMessage::SearchCompleted { query, results }).await;
            });
        }
        LoadRequest::Details { id, media_type } => {
            let manager = Arc::clone(manager);
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = manager
                    .content_details(id, media_type)
                    .await
                    .map(Box::new)
                    .map_err(|e| e.to_string());
                send(
                    &tx,
                    LoadMessage::DetailsLoaded {
                        id,
                        media_type,
                        result,
                    },
                )
                .await;
            });
        }
    }
}

fn spawn_feeds(
    manager: &Arc<ContentManager>,
    tx: &mpsc::Sender<LoadMessage>,
    feeds: Vec<Feed>,
    refresh: bool,
) {
    for feed in feeds {
        let manager = Arc::clone(manager);
        let tx = tx.clone();
        tokio::spawn(async move {
            let loaded = if refresh {
                manager.refresh_feed(feed).await
            } else {
                manager.load_feed(feed).await
            };
            send(&tx, LoadMessage::FeedLoaded(loaded)).await;
        });
    }
}

async fn send(tx: &mpsc::Sender<LoadMessage>, message: LoadMessage) {
    if tx.send(message).await.is_err() {
        warn!("UI dropped the loader channel");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, TmdbConfig};
    use crate::content::FeedOrigin;
    use crate::tmdb::TmdbClient;
    use serde_json::json;
    use std::collections::HashSet;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn loader(server: &MockServer) -> LoaderHandle {
        let client = TmdbClient::new(&TmdbConfig {
            base_url: server.uri(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            language: "en-US".to_string(),
            credentials: Credentials {
                api_key: Some("key".to_string()),
                bearer_token: None,
            },
        });
        let manager = ContentManager::new(
            client,
            Duration::from_secs(600),
            None,
            Duration::from_secs(3600),
        );
        LoaderHandle::spawn(Arc::new(manager))
    }

    async fn next(handle: &mut LoaderHandle) -> LoadMessage {
        tokio::time::timeout(Duration::from_secs(5), handle.recv())
            .await
            .expect("loader timed out")
            .expect("loader channel closed")
    }

    #[tokio::test]
    async fn test_each_feed_is_answered() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "title": "A", "name": "A"}]
            })))
            .mount(&server)
            .await;

        let mut handle = loader(&server).await;
        assert!(handle.request(LoadRequest::Feeds(vec![
            Feed::PopularMovies,
            Feed::PopularTv,
        ])));

        let mut feeds = HashSet::new();
        for _ in 0..2 {
            match next(&mut handle).await {
                LoadMessage::FeedLoaded(loaded) => {
                    assert_eq!(loaded.origin, FeedOrigin::Network);
                    feeds.insert(loaded.feed);
                }
                other => panic!("Unexpected message {:?}", other),
            }
        }
        assert!(feeds.contains(&Feed::PopularMovies));
        assert!(feeds.contains(&Feed::PopularTv));
    }

    #[tokio::test]
    async fn test_search_reports_query_and_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 603, "title": "The Matrix", "media_type": "movie"}]
            })))
            .mount(&server)
            .await;

        let mut handle = loader(&server).await;
        handle.request(LoadRequest::Search("matrix".to_string()));

        match next(&mut handle).await {
            LoadMessage::SearchCompleted { query, results } => {
                assert_eq!(query, "matrix");
                assert_eq!(results.unwrap().len(), 1);
            }
            other => panic!("Unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_details_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut handle = loader(&server).await;
        handle.request(LoadRequest::Details {
            id: 7,
            media_type: MediaType::Tv,
        });

        match next(&mut handle).await {
            LoadMessage::DetailsLoaded {
                id,
                media_type,
                result,
            } => {
                assert_eq!(id, 7);
                assert_eq!(media_type, MediaType::Tv);
                assert!(result.is_err());
            }
            other => panic!("Unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_refetches_feeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/upcoming"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"id": 1, "title": "Soon"}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let mut handle = loader(&server).await;
        for request in [
            LoadRequest::Feeds(vec![Feed::UpcomingMovies]),
            LoadRequest::Refresh(vec![Feed::UpcomingMovies]),
        ] {
            handle.request(request);
            match next(&mut handle).await {
                LoadMessage::FeedLoaded(loaded) => {
                    assert_eq!(loaded.origin, FeedOrigin::Network);
                }
                other => panic!("Unexpected message {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_try_recv_is_empty_without_requests() {
        let server = MockServer::start().await;
        let mut handle = loader(&server).await;
        assert!(handle.try_recv().is_none());
    }
}
