//! Normalization of raw TMDb payloads into `ContentItem` and `ContentDetails`

use super::genre::genre_names;
use super::raw::{Credits, NamedEntry, RawMedia, RawMovieDetails, RawTvDetails, Videos};
use super::{
    ContentDetails, ContentItem, ImageKind, ImageSize, MediaType, DEFAULT_MOVIE_DURATION,
};

const NO_DESCRIPTION: &str = "No description available.";
const UNKNOWN_RUNTIME: &str = "Unknown runtime";
const UNKNOWN_DIRECTOR: &str = "Unknown director";
const UNKNOWN_CREATOR: &str = "Unknown creator";

/// Number of cast members kept in details
const CAST_LIMIT: usize = 5;

/// Builds a full image URL, or `None` when TMDb has no image
pub fn image_url(
    image_base_url: &str,
    path: Option<&str>,
    kind: ImageKind,
    size: ImageSize,
) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        image_base_url.trim_end_matches('/'),
        kind.size_segment(size),
        path
    ))
}

/// Extracts the year from a `YYYY-MM-DD` date
fn parse_year(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse().ok()
}

fn season_label(seasons: u32) -> String {
    if seasons > 1 {
        format!("{} seasons", seasons)
    } else {
        format!("{} season", seasons)
    }
}

fn join_names(entries: &[NamedEntry]) -> Vec<String> {
    entries.iter().map(|entry| entry.name.clone()).collect()
}

fn base_item(raw: &RawMedia, image_base_url: &str, media_type: MediaType) -> ContentItem {
    let (title, date) = match media_type {
        MediaType::Movie => (raw.title.as_ref().or(raw.name.as_ref()), &raw.release_date),
        MediaType::Tv => (raw.name.as_ref().or(raw.title.as_ref()), &raw.first_air_date),
    };

    let duration = match media_type {
        MediaType::Movie => DEFAULT_MOVIE_DURATION.to_string(),
        MediaType::Tv => season_label(raw.number_of_seasons.unwrap_or(1).max(1)),
    };

    ContentItem {
        id: raw.id,
        title: title.cloned().unwrap_or_default(),
        media_type,
        year: parse_year(date.as_deref()),
        vote_average: raw.vote_average.unwrap_or(0.0),
        description: raw
            .overview
            .clone()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        image: image_url(
            image_base_url,
            raw.poster_path.as_deref(),
            ImageKind::Poster,
            ImageSize::Medium,
        ),
        backdrop: image_url(
            image_base_url,
            raw.backdrop_path.as_deref(),
            ImageKind::Backdrop,
            ImageSize::Large,
        ),
        genres: genre_names(&raw.genre_ids),
        duration,
        popularity: raw.popularity.unwrap_or(0.0),
    }
}

pub(crate) fn format_movie(raw: &RawMedia, image_base_url: &str) -> ContentItem {
    base_item(raw, image_base_url, MediaType::Movie)
}

pub(crate) fn format_tv(raw: &RawMedia, image_base_url: &str) -> ContentItem {
    base_item(raw, image_base_url, MediaType::Tv)
}

/// Formats a multi-search entry; people and unknown types yield `None`
pub(crate) fn format_search_result(raw: &RawMedia, image_base_url: &str) -> Option<ContentItem> {
    let media_type = MediaType::from_api(raw.media_type.as_deref()?)?;
    Some(base_item(raw, image_base_url, media_type))
}

fn first_trailer(videos: &Videos) -> Option<String> {
    videos
        .results
        .iter()
        .find(|video| video.kind == "Trailer" && video.site == "YouTube")
        .map(|video| video.key.clone())
}

fn top_cast(credits: &Credits) -> Vec<String> {
    credits
        .cast
        .iter()
        .take(CAST_LIMIT)
        .map(|member| member.name.clone())
        .collect()
}

pub(crate) fn format_movie_details(
    movie: &RawMovieDetails,
    credits: &Credits,
    videos: &Videos,
    image_base_url: &str,
) -> ContentDetails {
    let mut item = format_movie(&movie.media, image_base_url);
    item.duration = movie
        .runtime
        .filter(|runtime| *runtime > 0)
        .map(|runtime| format!("{} min", runtime))
        .unwrap_or_else(|| UNKNOWN_RUNTIME.to_string());
    item.genres = join_names(&movie.genres);

    let director = credits
        .crew
        .iter()
        .find(|member| member.job.as_deref() == Some("Director"))
        .map(|member| member.name.clone())
        .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());

    ContentDetails {
        item,
        creators: vec![director.clone()],
        director,
        cast: top_cast(credits),
        release_date: movie.media.release_date.clone(),
        budget: movie.budget,
        revenue: movie.revenue,
        number_of_seasons: None,
        number_of_episodes: None,
        first_air_date: None,
        last_air_date: None,
        status: None,
        networks: None,
        homepage: movie.homepage.clone().filter(|h| !h.is_empty()),
        adult: movie.adult,
        trailer_key: first_trailer(videos),
    }
}

pub(crate) fn format_tv_details(
    tv: &RawTvDetails,
    credits: &Credits,
    videos: &Videos,
    image_base_url: &str,
) -> ContentDetails {
    let mut item = format_tv(&tv.media, image_base_url);
    item.duration = tv
        .episode_run_time
        .first()
        .map(|minutes| format!("{} min", minutes))
        .unwrap_or_else(|| UNKNOWN_RUNTIME.to_string());
    item.genres = join_names(&tv.genres);

    let mut creators = join_names(&tv.created_by);
    if creators.is_empty() {
        creators.push(UNKNOWN_CREATOR.to_string());
    }
    let networks = join_names(&tv.networks);

    ContentDetails {
        item,
        director: creators[0].clone(),
        creators,
        cast: top_cast(credits),
        release_date: None,
        budget: None,
        revenue: None,
        number_of_seasons: tv.media.number_of_seasons,
        number_of_episodes: tv.number_of_episodes,
        first_air_date: tv.media.first_air_date.clone(),
        last_air_date: tv.last_air_date.clone(),
        status: tv.status.clone(),
        networks: (!networks.is_empty()).then(|| networks.join(", ")),
        homepage: tv.homepage.clone().filter(|h| !h.is_empty()),
        adult: tv.adult,
        trailer_key: first_trailer(videos),
    }
}
