//! Raw TMDb response shapes
//!
//! Every field TMDb may omit or send as `null` is optional or defaulted.

use serde::Deserialize;

/// Paged list response (`results` is the only field we read)
#[derive(Debug, Deserialize)]
pub(crate) struct PagedResponse {
    #[serde(default)]
    pub results: Vec<RawMedia>,
}

/// A movie or series entry from a list or search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawMedia {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    pub popularity: Option<f64>,
    pub number_of_seasons: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedEntry {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMovieDetails {
    #[serde(flatten)]
    pub media: RawMedia,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<NamedEntry>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTvDetails {
    #[serde(flatten)]
    pub media: RawMedia,
    #[serde(default)]
    pub genres: Vec<NamedEntry>,
    #[serde(default)]
    pub created_by: Vec<NamedEntry>,
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    pub last_air_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub networks: Vec<NamedEntry>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CrewMember {
    pub name: String,
    pub job: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Credits {
    #[serde(default)]
    pub cast: Vec<NamedEntry>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}
