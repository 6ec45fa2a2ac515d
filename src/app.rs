//! Application state management for marquee
//!
//! This module contains the main application state: which page is shown, the
//! carousels loaded so far, the details modal, search and My List. It never
//! touches the network; work for the loader is queued and collected with
//! `take_requests`, and results come back through `apply`.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::{error, warn};

use crate::cli::StartupConfig;
use crate::content::{Feed, FeedOrigin, LoadedFeed};
use crate::loader::{LoadMessage, LoadRequest};
use crate::page::Page;
use crate::search::SearchManager;
use crate::tmdb::{ContentDetails, ContentItem, MediaType};
use crate::watchlist::{AddOutcome, ListEntry, ListFilter, ListSort, MyList};

/// How long a notification stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first page's feeds
    Loading,
    /// Carousels of a catalog page
    Browse(Page),
    /// Saved titles
    MyList,
}

/// One carousel
#[derive(Debug, Clone)]
pub struct Row {
    pub items: Vec<ContentItem>,
    pub origin: FeedOrigin,
    /// Index of the highlighted item
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailsState {
    Loading,
    Ready(Box<ContentDetails>),
    Failed(String),
}

/// The details modal
#[derive(Debug, Clone)]
pub struct DetailsModal {
    /// Record the modal was opened from
    pub item: ContentItem,
    pub state: DetailsState,
}

impl DetailsModal {
    /// Best record available for the title, preferring the full details
    pub fn content(&self) -> &ContentItem {
        match &self.state {
            DetailsState::Ready(details) => &details.item,
            _ => &self.item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: Instant,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Page shown in browse mode, also where My List returns to
    pub current_page: Page,
    /// Loaded carousels keyed by feed
    pub rows: HashMap<Feed, Row>,
    /// Feeds requested but not answered yet
    requested: HashSet<Feed>,
    /// Index of the highlighted carousel on the current page
    pub selected_row: usize,
    /// Details of the featured title on the home page
    pub hero: Option<Box<ContentDetails>>,
    pub details: Option<DetailsModal>,
    pub search: SearchManager,
    /// Whether the search bar has focus
    pub search_open: bool,
    pub my_list: MyList,
    pub list_cursor: usize,
    pub list_filter: ListFilter,
    pub list_sort: ListSort,
    /// Waiting for `y` to confirm removing the highlighted entry
    pub pending_removal: bool,
    pub notification: Option<Notification>,
    /// Timestamp of the last feed received
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    outbox: Vec<LoadRequest>,
}

impl App {
    /// Creates the app and queues the feeds of the start page
    pub fn new(my_list: MyList, startup: StartupConfig) -> Self {
        let mut app = Self {
            state: if startup.start_in_my_list {
                AppState::MyList
            } else {
                AppState::Loading
            },
            current_page: startup.initial_page,
            rows: HashMap::new(),
            requested: HashSet::new(),
            selected_row: 0,
            hero: None,
            details: None,
            search: SearchManager::new(),
            search_open: false,
            my_list,
            list_cursor: 0,
            list_filter: ListFilter::default(),
            list_sort: ListSort::default(),
            pending_removal: false,
            notification: None,
            last_refresh: None,
            show_help: false,
            should_quit: false,
            outbox: Vec::new(),
        };
        app.request_missing_feeds(startup.initial_page);
        app
    }

    /// Drains the requests queued for the loader
    pub fn take_requests(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.outbox)
    }

    fn request_missing_feeds(&mut self, page: Page) {
        let missing: Vec<Feed> = page
            .feeds()
            .iter()
            .copied()
            .filter(|feed| !self.rows.contains_key(feed) && !self.requested.contains(feed))
            .collect();

        if !missing.is_empty() {
            self.requested.extend(missing.iter().copied());
            self.outbox.push(LoadRequest::Feeds(missing));
        }
    }

    fn refresh(&mut self, now: Instant) {
        let feeds = self.current_page.feeds().to_vec();
        self.requested.extend(feeds.iter().copied());
        self.outbox.push(LoadRequest::Refresh(feeds));
        self.notify("Refreshing...", now);
    }

    /// Whether every feed of `page` has arrived
    pub fn page_ready(&self, page: Page) -> bool {
        page.feeds().iter().all(|feed| self.rows.contains_key(feed))
    }

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.notification = Some(Notification {
            message: message.into(),
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    /// Advances timers: expires notifications and fires debounced searches
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now >= n.expires_at)
        {
            self.notification = None;
        }

        if let Some(query) = self.search.poll(now) {
            self.outbox.push(LoadRequest::Search(query));
        }
    }

    /// Applies a result from the loader
    pub fn apply(&mut self, message: LoadMessage, now: Instant) {
        match message {
            LoadMessage::FeedLoaded(loaded) => self.apply_feed(loaded),
            LoadMessage::HeroLoaded(Ok(details)) => self.hero = Some(details),
            LoadMessage::HeroLoaded(Err(e)) => warn!(error = %e, "hero details unavailable"),
            LoadMessage::SearchCompleted { query, results } => {
                self.search.complete(&query, results, now);
            }
            LoadMessage::DetailsLoaded {
                id,
                media_type,
                result,
            } => {
                let Some(modal) = self.details.as_mut() else {
                    return;
                };
                if modal.item.is(id, media_type) && modal.state == DetailsState::Loading {
                    modal.state = match result {
                        Ok(details) => DetailsState::Ready(details),
                        Err(e) => DetailsState::Failed(e),
                    };
                }
            }
        }
    }

    fn apply_feed(&mut self, loaded: LoadedFeed) {
        let LoadedFeed {
            feed,
            items,
            origin,
        } = loaded;
        self.requested.remove(&feed);

        if feed == Feed::Trending && origin != FeedOrigin::Fallback {
            if let Some(first) = items.first() {
                self.outbox.push(LoadRequest::Hero(first.clone()));
            }
        }

        let cursor = self
            .rows
            .get(&feed)
            .map(|row| row.cursor.min(items.len().saturating_sub(1)))
            .unwrap_or(0);
        self.rows.insert(
            feed,
            Row {
                items,
                origin,
                cursor,
            },
        );
        self.last_refresh = Some(Local::now());

        if self.state == AppState::Loading && self.page_ready(self.current_page) {
            self.state = AppState::Browse(self.current_page);
        }
    }

    /// Returns the carousel highlighted on the current page
    pub fn selected_feed(&self) -> Option<Feed> {
        self.current_page.feeds().get(self.selected_row).copied()
    }

    /// Returns the highlighted item of the highlighted carousel
    pub fn selected_item(&self) -> Option<&ContentItem> {
        let feed = self.selected_feed()?;
        let row = self.rows.get(&feed)?;
        row.items.get(row.cursor)
    }

    /// Title featured in the hero banner
    pub fn hero_item(&self) -> Option<&ContentItem> {
        self.hero.as_ref().map(|details| &details.item).or_else(|| {
            self.rows
                .get(&Feed::Trending)
                .and_then(|row| row.items.first())
        })
    }

    /// My List entries as currently filtered and sorted
    pub fn my_list_view(&self) -> Vec<&ListEntry> {
        self.my_list.view(self.list_filter, self.list_sort)
    }

    fn open_details(&mut self, item: ContentItem) {
        self.outbox.push(LoadRequest::Details {
            id: item.id,
            media_type: item.media_type,
        });
        self.details = Some(DetailsModal {
            item,
            state: DetailsState::Loading,
        });
    }

    fn add_to_my_list(&mut self, item: ContentItem, now: Instant) {
        match self.my_list.add(item) {
            Ok(AddOutcome::Added) => self.notify("Added to My List", now),
            Ok(AddOutcome::AlreadyPresent) => self.notify("Already in My List", now),
            Err(e) => {
                error!(error = %e, "failed to save My List");
                self.notify("Could not save My List", now);
            }
        }
    }

    fn remove_from_my_list(&mut self, id: u64, media_type: MediaType, now: Instant) {
        match self.my_list.remove(id, media_type) {
            Ok(true) => self.notify("Removed from My List", now),
            Ok(false) => self.notify("Not in My List", now),
            Err(e) => {
                error!(error = %e, "failed to save My List");
                self.notify("Could not save My List", now);
            }
        }
        let len = self.my_list_view().len();
        self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
    }

    fn switch_page(&mut self, page: Page) {
        self.current_page = page;
        self.selected_row = 0;
        self.state = AppState::Browse(page);
        self.request_missing_feeds(page);
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit (outside of text input)
    /// - `Up`/`Down`: Move between carousels, list entries or search results
    /// - `Left`/`Right`: Move within a carousel
    /// - `Enter`: Open details
    /// - `Tab`/`Shift-Tab`: Next/previous page
    /// - `/`: Search, `m`: My List, `r`: Refresh, `?`: Help
    /// - `a`/`d` (details): Add to / remove from My List
    /// - `f`/`s`/`x` (My List): Filter, sort, remove
    pub fn handle_key(&mut self, key_event: KeyEvent, now: Instant) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.details.is_some() {
            self.handle_details_key(key_event, now);
            return;
        }

        if self.search_open {
            self.handle_search_key(key_event, now);
            return;
        }

        match self.state {
            AppState::Loading => match key_event.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('m') => self.state = AppState::MyList,
                KeyCode::Char('?') => self.show_help = true,
                _ => {}
            },
            AppState::Browse(_) => self.handle_browse_key(key_event, now),
            AppState::MyList => self.handle_my_list_key(key_event, now),
        }
    }

    fn handle_browse_key(&mut self, key_event: KeyEvent, now: Instant) {
        let row_count = self.current_page.feeds().len();

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                if row_count > 0 {
                    self.selected_row = (self.selected_row + row_count - 1) % row_count;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if row_count > 0 {
                    self.selected_row = (self.selected_row + 1) % row_count;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_item(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_item(1),
            KeyCode::Enter => {
                if let Some(item) = self.selected_item().cloned() {
                    self.open_details(item);
                }
            }
            KeyCode::Tab => self.switch_page(self.current_page.next()),
            KeyCode::BackTab => self.switch_page(self.current_page.previous()),
            KeyCode::Char('/') => self.search_open = true,
            KeyCode::Char('m') => {
                self.list_cursor = 0;
                self.pending_removal = false;
                self.state = AppState::MyList;
            }
            KeyCode::Char('r') => self.refresh(now),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    /// Moves the cursor of the highlighted carousel, stopping at both ends
    fn move_item(&mut self, delta: isize) {
        let Some(feed) = self.selected_feed() else {
            return;
        };
        if let Some(row) = self.rows.get_mut(&feed) {
            let last = row.items.len().saturating_sub(1);
            row.cursor = row.cursor.saturating_add_signed(delta).min(last);
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent, now: Instant) {
        match key_event.code {
            KeyCode::Esc => {
                self.search.clear();
                self.search_open = false;
            }
            KeyCode::Enter => {
                if let Some(item) = self.search.chosen_item().cloned() {
                    self.search.clear();
                    self.search_open = false;
                    self.open_details(item);
                } else if let Some(query) = self.search.submit() {
                    self.outbox.push(LoadRequest::Search(query));
                }
            }
            KeyCode::Up => self.search.select_prev(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::Backspace => self.search.backspace(now),
            KeyCode::Char(c) => self.search.push_char(c, now),
            _ => {}
        }
    }

    fn handle_details_key(&mut self, key_event: KeyEvent, now: Instant) {
        let Some(modal) = &self.details else {
            return;
        };
        let item = modal.content().clone();

        match key_event.code {
            KeyCode::Esc => self.details = None,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.add_to_my_list(item, now),
            KeyCode::Char('d') => self.remove_from_my_list(item.id, item.media_type, now),
            _ => {}
        }
    }

    fn handle_my_list_key(&mut self, key_event: KeyEvent, now: Instant) {
        if self.pending_removal {
            self.pending_removal = false;
            if key_event.code == KeyCode::Char('y') {
                let target = self
                    .my_list_view()
                    .get(self.list_cursor)
                    .map(|entry| (entry.item.id, entry.item.media_type));
                if let Some((id, media_type)) = target {
                    self.remove_from_my_list(id, media_type, now);
                }
            }
            return;
        }

        let len = self.my_list_view().len();

        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                self.state = if self.page_ready(self.current_page) {
                    AppState::Browse(self.current_page)
                } else {
                    AppState::Loading
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    self.list_cursor = (self.list_cursor + len - 1) % len;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    self.list_cursor = (self.list_cursor + 1) % len;
                }
            }
            KeyCode::Enter => {
                let item = self
                    .my_list_view()
                    .get(self.list_cursor)
                    .map(|entry| entry.item.clone());
                if let Some(item) = item {
                    self.open_details(item);
                }
            }
            KeyCode::Char('f') => {
                self.list_filter = self.list_filter.next();
                self.list_cursor = 0;
            }
            KeyCode::Char('s') => {
                self.list_sort = self.list_sort.next();
                self.list_cursor = 0;
            }
            KeyCode::Char('x') => {
                if len > 0 {
                    self.pending_removal = true;
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }
}
