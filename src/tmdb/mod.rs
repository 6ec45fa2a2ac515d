//! The Movie Database (TMDb) integration
//!
//! This module contains the API client, the raw response shapes and the
//! normalized content records the rest of the application works with.

pub mod client;
pub mod format;
pub mod genre;
mod raw;

pub use client::{DiscoverQuery, Listing, TmdbClient, TmdbError};

use serde::{Deserialize, Serialize};

/// Placeholder runtime shown for movies until their details are loaded
pub const DEFAULT_MOVIE_DURATION: &str = "120 min";

/// Kind of title in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by the TMDb API
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "Series",
        }
    }

    /// Parses the `media_type` field of multi-search results
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

/// Window for the trending endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Image family, each with its own size ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Original,
}

impl ImageKind {
    /// TMDb size segment for this kind of image
    pub fn size_segment(&self, size: ImageSize) -> &'static str {
        match (self, size) {
            (ImageKind::Poster, ImageSize::Small) => "w185",
            (ImageKind::Poster, ImageSize::Medium) => "w342",
            (ImageKind::Poster, ImageSize::Large) => "w500",
            (ImageKind::Backdrop, ImageSize::Small) => "w300",
            (ImageKind::Backdrop, ImageSize::Medium) => "w780",
            (ImageKind::Backdrop, ImageSize::Large) => "w1280",
            (_, ImageSize::Original) => "original",
        }
    }
}

/// A movie or series normalized into one uniform record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// TMDb id, unique per media type
    pub id: u64,
    pub title: String,
    pub media_type: MediaType,
    /// Release year (movies) or first air year (series)
    pub year: Option<i32>,
    /// Average vote on a 0-10 scale, 0 when nobody voted
    pub vote_average: f64,
    pub description: String,
    /// Poster URL
    pub image: Option<String>,
    /// Backdrop URL
    pub backdrop: Option<String>,
    pub genres: Vec<String>,
    /// Runtime for movies, season count for series
    pub duration: String,
    pub popularity: f64,
}

impl ContentItem {
    /// Rating formatted as `7.8/10`, or `N/A` when there are no votes
    pub fn rating_label(&self) -> String {
        if self.vote_average > 0.0 {
            format!("{:.1}/10", self.vote_average)
        } else {
            "N/A".to_string()
        }
    }

    pub fn year_label(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn genre_label(&self) -> String {
        if self.genres.is_empty() {
            "Not specified".to_string()
        } else {
            self.genres.join(", ")
        }
    }

    /// Whether this record refers to the given title
    pub fn is(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }
}

/// Full details for a single title, shown in the details modal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDetails {
    /// Base record, with `duration` and `genres` taken from the details payload
    pub item: ContentItem,
    pub director: String,
    pub creators: Vec<String>,
    /// First five billed cast members
    pub cast: Vec<String>,
    pub release_date: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub status: Option<String>,
    pub networks: Option<String>,
    pub homepage: Option<String>,
    pub adult: bool,
    /// YouTube key of the first trailer
    pub trailer_key: Option<String>,
}

impl ContentDetails {
    /// Age classification shown next to the title
    pub fn classification(&self) -> &'static str {
        if self.adult {
            "18+"
        } else {
            "13+"
        }
    }

    /// Watch URL for the trailer, if one was found
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key
            .as_ref()
            .map(|key| format!("https://www.youtube.com/watch?v={}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(vote_average: f64) -> ContentItem {
        ContentItem {
            id: 1,
            title: "Arrival".to_string(),
            media_type: MediaType::Movie,
            year: None,
            vote_average,
            description: String::new(),
            image: None,
            backdrop: None,
            genres: vec![],
            duration: DEFAULT_MOVIE_DURATION.to_string(),
            popularity: 0.0,
        }
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(item(7.56).rating_label(), "7.6/10");
        assert_eq!(item(0.0).rating_label(), "N/A");
    }

    #[test]
    fn test_year_and_genre_labels_fall_back() {
        let item = item(5.0);
        assert_eq!(item.year_label(), "N/A");
        assert_eq!(item.genre_label(), "Not specified");
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        let json = serde_json::to_string(&MediaType::Tv).unwrap();
        assert_eq!(json, "\"tv\"");
        assert_eq!(MediaType::from_api("person"), None);
    }

    #[test]
    fn test_image_size_segments() {
        assert_eq!(ImageKind::Poster.size_segment(ImageSize::Medium), "w342");
        assert_eq!(ImageKind::Backdrop.size_segment(ImageSize::Large), "w1280");
        assert_eq!(ImageKind::Backdrop.size_segment(ImageSize::Original), "original");
    }
}
