//! TMDb REST API client
//!
//! Builds authenticated requests against the TMDb v3 API and normalizes the
//! responses into `ContentItem` / `ContentDetails` records.

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::format::{
    format_movie, format_movie_details, format_search_result, format_tv, format_tv_details,
};
use super::genre::NETFLIX_COMPANY;
use super::raw::{Credits, PagedResponse, RawMedia, RawMovieDetails, RawTvDetails, Videos};
use super::{ContentDetails, ContentItem, ImageKind, ImageSize, MediaType, TimeWindow};
use crate::config::{Credentials, TmdbConfig};

/// Errors that can occur when talking to TMDb
#[derive(Debug, Error)]
pub enum TmdbError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// TMDb answered with a non-success status
    #[error("TMDb API error: {status} - {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Filters for the `/discover/{movie,tv}` endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub genre: Option<u32>,
    pub company: Option<u32>,
    pub sort_by: &'static str,
    pub min_vote_count: Option<u32>,
    /// Earliest release (movies) or first air date (series), `YYYY-MM-DD`
    pub released_after: Option<&'static str>,
}

impl DiscoverQuery {
    /// Most popular titles first, no filter
    pub fn popular() -> Self {
        Self {
            genre: None,
            company: None,
            sort_by: "popularity.desc",
            min_vote_count: None,
            released_after: None,
        }
    }

    pub fn genre(mut self, genre: u32) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn company(mut self, company: u32) -> Self {
        self.company = Some(company);
        self
    }

    pub fn sort_by(mut self, sort_by: &'static str) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn min_vote_count(mut self, count: u32) -> Self {
        self.min_vote_count = Some(count);
        self
    }

    pub fn released_after(mut self, date: &'static str) -> Self {
        self.released_after = Some(date);
        self
    }

    fn params(&self, media_type: MediaType) -> Vec<(&'static str, String)> {
        let mut params = vec![("sort_by", self.sort_by.to_string())];
        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(company) = self.company {
            params.push(("with_companies", company.to_string()));
        }
        if let Some(count) = self.min_vote_count {
            params.push(("vote_count.gte", count.to_string()));
        }
        if let Some(date) = self.released_after {
            let key = match media_type {
                MediaType::Movie => "primary_release_date.gte",
                MediaType::Tv => "first_air_date.gte",
            };
            params.push((key, date.to_string()));
        }
        params.push(("page", "1".to_string()));
        params
    }
}

/// A TMDb endpoint that returns a page of movies or series
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Trending(MediaType, TimeWindow),
    Popular(MediaType),
    TopRated(MediaType),
    NowPlaying,
    Upcoming,
    OnTheAir,
    AiringToday,
    Discover(MediaType, DiscoverQuery),
}

impl Listing {
    /// Kind of titles the endpoint returns
    pub fn media_type(&self) -> MediaType {
        match self {
            Listing::Trending(media_type, _)
            | Listing::Popular(media_type)
            | Listing::TopRated(media_type)
            | Listing::Discover(media_type, _) => *media_type,
            Listing::NowPlaying | Listing::Upcoming => MediaType::Movie,
            Listing::OnTheAir | Listing::AiringToday => MediaType::Tv,
        }
    }

    pub fn endpoint(&self) -> String {
        match self {
            Listing::Trending(media_type, window) => {
                format!("/trending/{}/{}", media_type.as_str(), window.as_str())
            }
            Listing::Popular(media_type) => format!("/{}/popular", media_type.as_str()),
            Listing::TopRated(media_type) => format!("/{}/top_rated", media_type.as_str()),
            Listing::NowPlaying => "/movie/now_playing".to_string(),
            Listing::Upcoming => "/movie/upcoming".to_string(),
            Listing::OnTheAir => "/tv/on_the_air".to_string(),
            Listing::AiringToday => "/tv/airing_today".to_string(),
            Listing::Discover(media_type, _) => format!("/discover/{}", media_type.as_str()),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Listing::Popular(_) | Listing::TopRated(_) | Listing::Upcoming | Listing::AiringToday => {
                vec![("page", "1".to_string())]
            }
            Listing::Discover(media_type, query) => query.params(*media_type),
            Listing::Trending(..) | Listing::NowPlaying | Listing::OnTheAir => Vec::new(),
        }
    }
}

/// Client for the TMDb v3 API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    language: String,
    credentials: Credentials,
}

impl TmdbClient {
    /// Creates a client from the TMDb section of the configuration
    pub fn new(config: &TmdbConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
            credentials: config.credentials.clone(),
        }
    }

    /// Performs an authenticated GET and parses the JSON body
    ///
    /// Adds the `language` parameter and the v3 `api_key` when configured;
    /// a v4 token is sent as a bearer header.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let mut query: Vec<(&str, String)> = vec![("language", self.language.clone())];
        if let Some(api_key) = &self.credentials.api_key {
            query.push(("api_key", api_key.clone()));
        }
        query.extend(params.iter().cloned());

        debug!(endpoint, "TMDb request");

        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(&query);
        if let Some(token) = &self.credentials.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Full URL of an image, or `None` when the path is missing
    pub fn image_url(&self, path: Option<&str>, kind: ImageKind, size: ImageSize) -> Option<String> {
        super::format::image_url(&self.image_base_url, path, kind, size)
    }

    /// Fetches one page of a listing and normalizes it
    pub async fn listing(&self, listing: &Listing) -> Result<Vec<ContentItem>, TmdbError> {
        let page: PagedResponse = self
            .get_json(&listing.endpoint(), &listing.params())
            .await?;

        let format: fn(&RawMedia, &str) -> ContentItem = match listing.media_type() {
            MediaType::Movie => format_movie,
            MediaType::Tv => format_tv,
        };

        Ok(page
            .results
            .iter()
            .map(|raw| format(raw, &self.image_base_url))
            .collect())
    }

    pub async fn trending_movies(&self, window: TimeWindow) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::Trending(MediaType::Movie, window)).await
    }

    pub async fn trending_tv(&self, window: TimeWindow) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::Trending(MediaType::Tv, window)).await
    }

    pub async fn popular_movies(&self) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::Popular(MediaType::Movie)).await
    }

    pub async fn popular_tv(&self) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::Popular(MediaType::Tv)).await
    }

    pub async fn top_rated_movies(&self) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::TopRated(MediaType::Movie)).await
    }

    pub async fn top_rated_tv(&self) -> Result<Vec<ContentItem>, TmdbError> {
        self.listing(&Listing::TopRated(MediaType::Tv)).await
    }

    /// Movies produced by Netflix, most popular first
    pub async fn netflix_originals(&self) -> Result<Vec<ContentItem>, TmdbError> {
        let query = DiscoverQuery::popular().company(NETFLIX_COMPANY);
        self.listing(&Listing::Discover(MediaType::Movie, query)).await
    }

    /// Searches movies and series; people are dropped
    ///
    /// A blank query returns an empty list without calling the API.
    pub async fn search_multi(&self, query: &str, page: u32) -> Result<Vec<ContentItem>, TmdbError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: PagedResponse = self
            .get_json(
                "/search/multi",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        Ok(response
            .results
            .iter()
            .filter_map(|raw| format_search_result(raw, &self.image_base_url))
            .collect())
    }

    /// Fetches a movie with its credits and videos in parallel
    pub async fn movie_details(&self, id: u64) -> Result<ContentDetails, TmdbError> {
        let base = format!("/movie/{}", id);
        let credits_endpoint = format!("{}/credits", base);
        let videos_endpoint = format!("{}/videos", base);

        let (movie, credits, videos) = futures::try_join!(
            self.get_json::<RawMovieDetails>(&base, &[]),
            self.get_json::<Credits>(&credits_endpoint, &[]),
            self.get_json::<Videos>(&videos_endpoint, &[]),
        )?;

        Ok(format_movie_details(&movie, &credits, &videos, &self.image_base_url))
    }

    /// Fetches a series with its credits and videos in parallel
    pub async fn tv_details(&self, id: u64) -> Result<ContentDetails, TmdbError> {
        let base = format!("/tv/{}", id);
        let credits_endpoint = format!("{}/credits", base);
        let videos_endpoint = format!("{}/videos", base);

        let (tv, credits, videos) = futures::try_join!(
            self.get_json::<RawTvDetails>(&base, &[]),
            self.get_json::<Credits>(&credits_endpoint, &[]),
            self.get_json::<Videos>(&videos_endpoint, &[]),
        )?;

        Ok(format_tv_details(&tv, &credits, &videos, &self.image_base_url))
    }

    /// Fetches details for either kind of title
    pub async fn details(&self, id: u64, media_type: MediaType) -> Result<ContentDetails, TmdbError> {
        match media_type {
            MediaType::Movie => self.movie_details(id).await,
            MediaType::Tv => self.tv_details(id).await,
        }
    }
}
