//! Named catalog feeds
//!
//! A feed is one carousel. Its recipe lists the TMDb listings it draws from,
//! how many entries each contributes, how the blend is ordered and where it
//! is cut off.

use rand::seq::SliceRandom;

use crate::tmdb::genre::{ACTION, COMEDY, DRAMA, HORROR, NETFLIX_COMPANY, ROMANCE, SCIENCE_FICTION};
use crate::tmdb::{ContentItem, DiscoverQuery, Listing, MediaType, TimeWindow};

/// Cut-off for Netflix originals published "recently"
const NEW_ORIGINALS_SINCE: &str = "2024-01-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Trending,
    NetflixOriginals,
    TopRated,
    HorrorMovies,
    SciFiMovies,
    RomanceMovies,
    PopularTv,
    PopularMovies,
    NetflixOriginalMovies,
    NetflixOriginalTv,
    TopRatedMovies,
    TopRatedTv,
    ActionMovies,
    ComedyMovies,
    DramaMovies,
    DramaTv,
    ComedyTv,
    NewThisWeek,
    UpcomingMovies,
    NewTvShows,
    RecentlyAdded,
    TrendingToday,
    NewNetflixOriginals,
}

/// How a blended feed is ordered before truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Keep the API order
    AsFetched,
    Shuffle,
    /// Highest vote average first
    VoteAverage,
    /// Most popular first
    Popularity,
    /// Newest year first, unknown years last
    YearDesc,
}

/// Where a feed's entries come from and how they are combined
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    /// Listings fetched in parallel, each truncated to its count
    pub sources: Vec<(Listing, usize)>,
    pub order: Order,
    /// Maximum number of entries in the feed
    pub limit: usize,
}

impl Recipe {
    fn single(listing: Listing, limit: usize) -> Self {
        Self {
            sources: vec![(listing, limit)],
            order: Order::AsFetched,
            limit,
        }
    }

    fn blend(sources: Vec<(Listing, usize)>, order: Order, limit: usize) -> Self {
        Self {
            sources,
            order,
            limit,
        }
    }

    /// Combines fetched pages (in source order) into the final feed
    pub fn combine(&self, pages: Vec<Vec<ContentItem>>) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = pages
            .into_iter()
            .zip(self.sources.iter())
            .flat_map(|(page, (_, take))| page.into_iter().take(*take))
            .collect();

        match self.order {
            Order::AsFetched => {}
            Order::Shuffle => items.shuffle(&mut rand::thread_rng()),
            Order::VoteAverage => items.sort_by(|a, b| b.vote_average.total_cmp(&a.vote_average)),
            Order::Popularity => items.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
            Order::YearDesc => items.sort_by(|a, b| b.year.cmp(&a.year)),
        }

        items.truncate(self.limit);
        items
    }
}

fn discover_movies(query: DiscoverQuery) -> Listing {
    Listing::Discover(MediaType::Movie, query)
}

fn discover_tv(query: DiscoverQuery) -> Listing {
    Listing::Discover(MediaType::Tv, query)
}

impl Feed {
    pub const ALL: [Feed; 23] = [
        Feed::Trending,
        Feed::NetflixOriginals,
        Feed::TopRated,
        Feed::HorrorMovies,
        Feed::SciFiMovies,
        Feed::RomanceMovies,
        Feed::PopularTv,
        Feed::PopularMovies,
        Feed::NetflixOriginalMovies,
        Feed::NetflixOriginalTv,
        Feed::TopRatedMovies,
        Feed::TopRatedTv,
        Feed::ActionMovies,
        Feed::ComedyMovies,
        Feed::DramaMovies,
        Feed::DramaTv,
        Feed::ComedyTv,
        Feed::NewThisWeek,
        Feed::UpcomingMovies,
        Feed::NewTvShows,
        Feed::RecentlyAdded,
        Feed::TrendingToday,
        Feed::NewNetflixOriginals,
    ];

    /// Key under which the feed is cached in memory and on disk
    pub fn cache_key(&self) -> &'static str {
        match self {
            Feed::Trending => "trending_content",
            Feed::NetflixOriginals => "netflix_originals",
            Feed::TopRated => "top_rated_content",
            Feed::HorrorMovies => "horror_movies",
            Feed::SciFiMovies => "scifi_movies",
            Feed::RomanceMovies => "romance_movies",
            Feed::PopularTv => "popular_tv_shows",
            Feed::PopularMovies => "popular_movies",
            Feed::NetflixOriginalMovies => "netflix_original_movies",
            Feed::NetflixOriginalTv => "netflix_original_tv",
            Feed::TopRatedMovies => "top_rated_movies",
            Feed::TopRatedTv => "top_rated_tv_shows",
            Feed::ActionMovies => "action_movies",
            Feed::ComedyMovies => "comedy_movies",
            Feed::DramaMovies => "drama_movies",
            Feed::DramaTv => "drama_tv_shows",
            Feed::ComedyTv => "comedy_tv_shows",
            Feed::NewThisWeek => "new_this_week",
            Feed::UpcomingMovies => "upcoming_movies",
            Feed::NewTvShows => "new_tv_shows",
            Feed::RecentlyAdded => "recently_added",
            Feed::TrendingToday => "trending_today",
            Feed::NewNetflixOriginals => "new_netflix_originals",
        }
    }

    /// Carousel heading
    pub fn title(&self) -> &'static str {
        match self {
            Feed::Trending => "Trending Now",
            Feed::NetflixOriginals => "Netflix Originals",
            Feed::TopRated => "Top Rated",
            Feed::HorrorMovies => "Horror Movies",
            Feed::SciFiMovies => "Sci-Fi Movies",
            Feed::RomanceMovies => "Romance Movies",
            Feed::PopularTv => "Popular Series",
            Feed::PopularMovies => "Popular Movies",
            Feed::NetflixOriginalMovies => "Netflix Original Movies",
            Feed::NetflixOriginalTv => "Netflix Original Series",
            Feed::TopRatedMovies => "Top Rated Movies",
            Feed::TopRatedTv => "Top Rated Series",
            Feed::ActionMovies => "Action Movies",
            Feed::ComedyMovies => "Comedy Movies",
            Feed::DramaMovies => "Drama Movies",
            Feed::DramaTv => "Drama Series",
            Feed::ComedyTv => "Comedy Series",
            Feed::NewThisWeek => "New This Week",
            Feed::UpcomingMovies => "Coming Soon",
            Feed::NewTvShows => "Airing Today",
            Feed::RecentlyAdded => "Recently Added",
            Feed::TrendingToday => "Trending Today",
            Feed::NewNetflixOriginals => "New Netflix Originals",
        }
    }

    pub fn recipe(&self) -> Recipe {
        use MediaType::{Movie, Tv};

        let genre = |id| DiscoverQuery::popular().genre(id);
        let netflix = || DiscoverQuery::popular().company(NETFLIX_COMPANY);

        match self {
            Feed::Trending | Feed::NewThisWeek => Recipe::blend(
                vec![
                    (Listing::Trending(Movie, TimeWindow::Week), 10),
                    (Listing::Trending(Tv, TimeWindow::Week), 10),
                ],
                Order::Shuffle,
                15,
            ),
            Feed::NetflixOriginals => Recipe::single(discover_movies(netflix()), 15),
            Feed::TopRated => Recipe::blend(
                vec![(Listing::TopRated(Movie), 12), (Listing::TopRated(Tv), 13)],
                Order::VoteAverage,
                25,
            ),
            Feed::HorrorMovies => Recipe::single(discover_movies(genre(HORROR)), 20),
            Feed::SciFiMovies => Recipe::single(discover_movies(genre(SCIENCE_FICTION)), 20),
            Feed::RomanceMovies => Recipe::single(discover_movies(genre(ROMANCE)), 20),
            Feed::PopularTv => Recipe::single(Listing::Popular(Tv), 20),
            Feed::PopularMovies => Recipe::single(Listing::Popular(Movie), 20),
            Feed::NetflixOriginalMovies => Recipe::single(
                discover_movies(netflix().sort_by("release_date.desc")),
                20,
            ),
            Feed::NetflixOriginalTv => Recipe::single(
                discover_tv(netflix().sort_by("first_air_date.desc")),
                20,
            ),
            Feed::TopRatedMovies => Recipe::single(Listing::TopRated(Movie), 20),
            Feed::TopRatedTv => Recipe::single(Listing::TopRated(Tv), 20),
            Feed::ActionMovies => Recipe::single(discover_movies(genre(ACTION)), 20),
            Feed::ComedyMovies => Recipe::single(discover_movies(genre(COMEDY)), 20),
            Feed::DramaMovies => Recipe::single(
                discover_movies(
                    genre(DRAMA)
                        .sort_by("vote_average.desc")
                        .min_vote_count(100),
                ),
                20,
            ),
            Feed::DramaTv => Recipe::single(
                discover_tv(genre(DRAMA).sort_by("vote_average.desc")),
                20,
            ),
            Feed::ComedyTv => Recipe::single(discover_tv(genre(COMEDY)), 20),
            Feed::UpcomingMovies => Recipe::single(Listing::Upcoming, 20),
            Feed::NewTvShows => Recipe::single(Listing::AiringToday, 20),
            Feed::RecentlyAdded => Recipe::blend(
                vec![(Listing::NowPlaying, 10), (Listing::OnTheAir, 10)],
                Order::Shuffle,
                20,
            ),
            Feed::TrendingToday => Recipe::blend(
                vec![
                    (Listing::Trending(Movie, TimeWindow::Day), 12),
                    (Listing::Trending(Tv, TimeWindow::Day), 8),
                ],
                Order::Popularity,
                20,
            ),
            Feed::NewNetflixOriginals => Recipe::blend(
                vec![
                    (
                        discover_movies(
                            netflix()
                                .sort_by("release_date.desc")
                                .released_after(NEW_ORIGINALS_SINCE),
                        ),
                        10,
                    ),
                    (
                        discover_tv(
                            netflix()
                                .sort_by("first_air_date.desc")
                                .released_after(NEW_ORIGINALS_SINCE),
                        ),
                        10,
                    ),
                ],
                Order::YearDesc,
                20,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::DEFAULT_MOVIE_DURATION;
    use std::collections::HashSet;

    fn item(id: u64, vote_average: f64, popularity: f64, year: Option<i32>) -> ContentItem {
        ContentItem {
            id,
            title: format!("Title {}", id),
            media_type: MediaType::Movie,
            year,
            vote_average,
            description: String::new(),
            image: None,
            backdrop: None,
            genres: vec![],
            duration: DEFAULT_MOVIE_DURATION.to_string(),
            popularity,
        }
    }

    fn page(ids: std::ops::Range<u64>) -> Vec<ContentItem> {
        ids.map(|id| item(id, id as f64 / 10.0, id as f64, Some(2000 + id as i32)))
            .collect()
    }

    #[test]
    fn test_cache_keys_are_unique() {
        let keys: HashSet<_> = Feed::ALL.iter().map(|feed| feed.cache_key()).collect();
        assert_eq!(keys.len(), Feed::ALL.len());
    }

    #[test]
    fn test_trending_takes_ten_of_each_and_keeps_fifteen() {
        let recipe = Feed::Trending.recipe();
        let combined = recipe.combine(vec![page(0..20), page(100..120)]);

        assert_eq!(combined.len(), 15);
        let from_movies = combined.iter().filter(|i| i.id < 100).count();
        let from_tv = combined.len() - from_movies;
        assert!(from_movies >= 5 && from_movies <= 10);
        assert!(from_tv >= 5 && from_tv <= 10);
        assert!(combined.iter().all(|i| i.id < 10 || (100..110).contains(&i.id)));
    }

    #[test]
    fn test_top_rated_sorts_by_vote_average() {
        let recipe = Feed::TopRated.recipe();
        let combined = recipe.combine(vec![page(0..20), page(20..40)]);

        assert_eq!(combined.len(), 25);
        assert!(combined
            .windows(2)
            .all(|w| w[0].vote_average >= w[1].vote_average));
        assert_eq!(combined[0].id, 32, "Highest vote among the first 13 series");
    }

    #[test]
    fn test_trending_today_sorts_by_popularity() {
        let combined = Feed::TrendingToday
            .recipe()
            .combine(vec![page(0..20), page(50..70)]);

        assert_eq!(combined.len(), 20);
        assert_eq!(combined[0].id, 57);
        assert!(combined.windows(2).all(|w| w[0].popularity >= w[1].popularity));
    }

    #[test]
    fn test_year_desc_puts_unknown_years_last() {
        let recipe = Recipe::blend(
            vec![(Listing::Upcoming, 3)],
            Order::YearDesc,
            3,
        );
        let combined = recipe.combine(vec![vec![
            item(1, 0.0, 0.0, None),
            item(2, 0.0, 0.0, Some(2024)),
            item(3, 0.0, 0.0, Some(2025)),
        ]]);

        let ids: Vec<u64> = combined.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_single_source_keeps_api_order_and_limit() {
        let combined = Feed::NetflixOriginals.recipe().combine(vec![page(0..20)]);
        let ids: Vec<u64> = combined.iter().map(|i| i.id).collect();
        assert_eq!(ids, (0..15).collect::<Vec<u64>>());
    }

    /// Endpoint, sort order, genre, company and take of one recipe source
    type Source = (&'static str, Option<&'static str>, Option<u32>, Option<u32>, usize);

    fn describe(recipe: &Recipe) -> Vec<(String, Option<&'static str>, Option<u32>, Option<u32>, usize)> {
        recipe
            .sources
            .iter()
            .map(|(listing, take)| match listing {
                Listing::Discover(_, query) => (
                    listing.endpoint(),
                    Some(query.sort_by),
                    query.genre,
                    query.company,
                    *take,
                ),
                _ => (listing.endpoint(), None, None, None, *take),
            })
            .collect()
    }

    #[test]
    fn test_every_feed_recipe() {
        const POP: Option<&str> = Some("popularity.desc");
        const NF: Option<u32> = Some(NETFLIX_COMPANY);

        let expected: Vec<(Feed, &str, Vec<Source>, Order, usize)> = vec![
            (
                Feed::Trending,
                "trending_content",
                vec![
                    ("/trending/movie/week", None, None, None, 10),
                    ("/trending/tv/week", None, None, None, 10),
                ],
                Order::Shuffle,
                15,
            ),
            (
                Feed::NetflixOriginals,
                "netflix_originals",
                vec![("/discover/movie", POP, None, NF, 15)],
                Order::AsFetched,
                15,
            ),
            (
                Feed::TopRated,
                "top_rated_content",
                vec![
                    ("/movie/top_rated", None, None, None, 12),
                    ("/tv/top_rated", None, None, None, 13),
                ],
                Order::VoteAverage,
                25,
            ),
            (
                Feed::HorrorMovies,
                "horror_movies",
                vec![("/discover/movie", POP, Some(27), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::SciFiMovies,
                "scifi_movies",
                vec![("/discover/movie", POP, Some(878), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::RomanceMovies,
                "romance_movies",
                vec![("/discover/movie", POP, Some(10749), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::PopularTv,
                "popular_tv_shows",
                vec![("/tv/popular", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::PopularMovies,
                "popular_movies",
                vec![("/movie/popular", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::NetflixOriginalMovies,
                "netflix_original_movies",
                vec![("/discover/movie", Some("release_date.desc"), None, NF, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::NetflixOriginalTv,
                "netflix_original_tv",
                vec![("/discover/tv", Some("first_air_date.desc"), None, NF, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::TopRatedMovies,
                "top_rated_movies",
                vec![("/movie/top_rated", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::TopRatedTv,
                "top_rated_tv_shows",
                vec![("/tv/top_rated", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::ActionMovies,
                "action_movies",
                vec![("/discover/movie", POP, Some(28), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::ComedyMovies,
                "comedy_movies",
                vec![("/discover/movie", POP, Some(35), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::DramaMovies,
                "drama_movies",
                vec![("/discover/movie", Some("vote_average.desc"), Some(18), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::DramaTv,
                "drama_tv_shows",
                vec![("/discover/tv", Some("vote_average.desc"), Some(18), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::ComedyTv,
                "comedy_tv_shows",
                vec![("/discover/tv", POP, Some(35), None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::NewThisWeek,
                "new_this_week",
                vec![
                    ("/trending/movie/week", None, None, None, 10),
                    ("/trending/tv/week", None, None, None, 10),
                ],
                Order::Shuffle,
                15,
            ),
            (
                Feed::UpcomingMovies,
                "upcoming_movies",
                vec![("/movie/upcoming", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::NewTvShows,
                "new_tv_shows",
                vec![("/tv/airing_today", None, None, None, 20)],
                Order::AsFetched,
                20,
            ),
            (
                Feed::RecentlyAdded,
                "recently_added",
                vec![
                    ("/movie/now_playing", None, None, None, 10),
                    ("/tv/on_the_air", None, None, None, 10),
                ],
                Order::Shuffle,
                20,
            ),
            (
                Feed::TrendingToday,
                "trending_today",
                vec![
                    ("/trending/movie/day", None, None, None, 12),
                    ("/trending/tv/day", None, None, None, 8),
                ],
                Order::Popularity,
                20,
            ),
            (
                Feed::NewNetflixOriginals,
                "new_netflix_originals",
                vec![
                    ("/discover/movie", Some("release_date.desc"), None, NF, 10),
                    ("/discover/tv", Some("first_air_date.desc"), None, NF, 10),
                ],
                Order::YearDesc,
                20,
            ),
        ];

        assert_eq!(expected.len(), Feed::ALL.len());
        for (feed, (expected_feed, key, sources, order, limit)) in
            Feed::ALL.iter().zip(expected)
        {
            assert_eq!(*feed, expected_feed);
            assert_eq!(feed.cache_key(), key, "{:?}", feed);
            let recipe = feed.recipe();
            let sources: Vec<_> = sources
                .into_iter()
                .map(|(endpoint, sort_by, genre, company, take)| {
                    (endpoint.to_string(), sort_by, genre, company, take)
                })
                .collect();
            assert_eq!(describe(&recipe), sources, "{:?}", feed);
            assert_eq!(recipe.order, order, "{:?}", feed);
            assert_eq!(recipe.limit, limit, "{:?}", feed);
        }
    }

    #[test]
    fn test_new_netflix_originals_start_in_2024() {
        for (listing, _) in Feed::NewNetflixOriginals.recipe().sources {
            match listing {
                Listing::Discover(_, query) => {
                    assert_eq!(query.released_after, Some(NEW_ORIGINALS_SINCE));
                    assert_eq!(NEW_ORIGINALS_SINCE, "2024-01-01");
                }
                other => panic!("Unexpected listing {:?}", other),
            }
        }
    }

    #[test]
    fn test_drama_movies_recipe_filters_vote_count() {
        let recipe = Feed::DramaMovies.recipe();
        match &recipe.sources[0].0 {
            Listing::Discover(MediaType::Movie, query) => {
                assert_eq!(query.genre, Some(DRAMA));
                assert_eq!(query.sort_by, "vote_average.desc");
                assert_eq!(query.min_vote_count, Some(100));
            }
            other => panic!("Unexpected listing {:?}", other),
        }
    }
}
