//! Catalog pages and the feeds shown on each
//!
//! Each page is a fixed stack of carousels, one per feed.

use crate::content::Feed;

/// A browsable catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Series,
    Movies,
    NewAndPopular,
}

impl Page {
    /// Pages in tab order
    pub const ALL: [Page; 4] = [Page::Home, Page::Series, Page::Movies, Page::NewAndPopular];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Series => "Series",
            Page::Movies => "Movies",
            Page::NewAndPopular => "New & Popular",
        }
    }

    /// Feeds shown on the page, top to bottom
    pub fn feeds(&self) -> &'static [Feed] {
        match self {
            Page::Home => &[
                Feed::Trending,
                Feed::NetflixOriginals,
                Feed::TopRated,
                Feed::HorrorMovies,
                Feed::SciFiMovies,
                Feed::RomanceMovies,
            ],
            Page::Series => &[
                Feed::PopularTv,
                Feed::DramaTv,
                Feed::ComedyTv,
                Feed::TopRatedTv,
                Feed::NetflixOriginalTv,
            ],
            Page::Movies => &[
                Feed::PopularMovies,
                Feed::ActionMovies,
                Feed::ComedyMovies,
                Feed::DramaMovies,
                Feed::TopRatedMovies,
                Feed::NetflixOriginalMovies,
            ],
            Page::NewAndPopular => &[
                Feed::NewThisWeek,
                Feed::TrendingToday,
                Feed::UpcomingMovies,
                Feed::NewTvShows,
                Feed::RecentlyAdded,
                Feed::NewNetflixOriginals,
            ],
        }
    }

    fn index(&self) -> usize {
        Page::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    /// Next page in tab order, wrapping around
    pub fn next(&self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    /// Previous page in tab order, wrapping around
    pub fn previous(&self) -> Page {
        let len = Page::ALL.len();
        Page::ALL[(self.index() + len - 1) % len]
    }

    /// Parses a page name, accepting a few aliases
    pub fn from_str(s: &str) -> Option<Page> {
        match s.trim().to_lowercase().as_str() {
            "home" | "dashboard" => Some(Page::Home),
            "series" | "tv" | "shows" => Some(Page::Series),
            "movies" | "films" => Some(Page::Movies),
            "new" | "latest" | "new-popular" => Some(Page::NewAndPopular),
            _ => None,
        }
    }
}
