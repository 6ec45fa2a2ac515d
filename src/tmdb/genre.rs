//! TMDb genre identifiers
//!
//! List endpoints only return genre ids. The ids are stable across TMDb, so
//! they are mapped to names locally instead of calling `/genre/*/list`.

pub const ACTION: u32 = 28;
pub const COMEDY: u32 = 35;
pub const DRAMA: u32 = 18;
pub const HORROR: u32 = 27;
pub const ROMANCE: u32 = 10749;
pub const SCIENCE_FICTION: u32 = 878;

/// Production company id for Netflix, used for the "Originals" feeds
pub const NETFLIX_COMPANY: u32 = 213;

static GENRE_NAMES: [(u32, &str); 27] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
    (10759, "Action & Adventure"),
    (10762, "Kids"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
];

/// Returns the display name for a genre id
pub fn genre_name(id: u32) -> Option<&'static str> {
    GENRE_NAMES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Maps genre ids to names; unknown ids are kept as their number
pub fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            genre_name(*id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_genres_resolve() {
        assert_eq!(genre_name(HORROR), Some("Horror"));
        assert_eq!(genre_name(SCIENCE_FICTION), Some("Science Fiction"));
        assert_eq!(genre_name(10765), Some("Sci-Fi & Fantasy"));
    }

    #[test]
    fn test_unknown_genre_keeps_id() {
        assert_eq!(
            genre_names(&[28, 424242]),
            vec!["Action".to_string(), "424242".to_string()]
        );
    }
}
