//! Debounced incremental search
//!
//! `SearchManager` owns the query text and dropdown state. It never performs
//! I/O itself: `poll` and `submit` hand back the query to run, and the caller
//! reports the outcome through `complete`. Time is passed in so the debounce
//! can be tested without sleeping.

use std::time::{Duration, Instant};

use crate::tmdb::ContentItem;

/// Delay between the last keystroke and the search request
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Queries shorter than this (after trimming) are not searched
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of results shown in the dropdown
pub const MAX_RESULTS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum DropdownState {
    Hidden,
    Loading,
    Results(Vec<ContentItem>),
    /// No title matched the query
    NoResults(String),
    Error,
}

#[derive(Debug)]
pub struct SearchManager {
    query: String,
    dropdown: DropdownState,
    /// When the pending search should fire
    deadline: Option<Instant>,
    /// Query currently being searched
    in_flight: Option<String>,
    /// A search was requested while another was running
    rerun: bool,
    selected: usize,
    /// Query the shown results were found for
    results_query: Option<String>,
    /// The highlight was moved since the last edit
    browsing: bool,
}

impl Default for SearchManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchManager {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            dropdown: DropdownState::Hidden,
            deadline: None,
            in_flight: None,
            rerun: false,
            selected: 0,
            results_query: None,
            browsing: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn dropdown(&self) -> &DropdownState {
        &self.dropdown
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    fn trimmed(&self) -> &str {
        self.query.trim()
    }

    fn is_searchable(&self) -> bool {
        self.trimmed().chars().count() >= MIN_QUERY_CHARS
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.query.push(c);
        self.input_changed(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        self.query.pop();
        self.input_changed(now);
    }

    /// Replaces the whole query text
    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        self.input_changed(now);
    }

    /// Reacts to an edit of the query text
    ///
    /// Cancels any pending search. An empty query hides the dropdown; a
    /// searchable query schedules a search after the debounce delay; a
    /// single character leaves the dropdown untouched.
    pub fn input_changed(&mut self, now: Instant) {
        self.deadline = None;
        self.browsing = false;

        if self.trimmed().is_empty() {
            self.dropdown = DropdownState::Hidden;
            self.selected = 0;
            self.rerun = false;
            return;
        }

        if self.is_searchable() {
            self.deadline = Some(now + SEARCH_DEBOUNCE);
        }
    }

    /// Runs the search right away (Enter)
    ///
    /// Returns the query to search for, or `None` when the query is too
    /// short or a search is already running (it is then re-run afterwards).
    pub fn submit(&mut self) -> Option<String> {
        if !self.is_searchable() {
            return None;
        }
        self.deadline = None;
        self.start()
    }

    /// Fires the pending search once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.start()
            }
            _ => None,
        }
    }

    fn start(&mut self) -> Option<String> {
        if self.in_flight.is_some() {
            self.rerun = true;
            return None;
        }

        let query = self.trimmed().to_string();
        self.in_flight = Some(query.clone());
        self.dropdown = DropdownState::Loading;
        self.selected = 0;
        Some(query)
    }

    /// Records the outcome of the search for `query`
    ///
    /// Outcomes for a query that was cleared in the meantime are ignored. If
    /// another search was requested while this one ran, it is scheduled again.
    pub fn complete(
        &mut self,
        query: &str,
        result: Result<Vec<ContentItem>, String>,
        now: Instant,
    ) {
        if self.in_flight.as_deref() == Some(query) {
            self.in_flight = None;
        }

        if self.trimmed().is_empty() {
            self.rerun = false;
            return;
        }

        if self.trimmed() == query {
            self.selected = 0;
            self.browsing = false;
            self.results_query = None;
            self.dropdown = match result {
                Ok(mut items) if !items.is_empty() => {
                    items.truncate(MAX_RESULTS);
                    self.results_query = Some(query.to_string());
                    DropdownState::Results(items)
                }
                Ok(_) => DropdownState::NoResults(query.to_string()),
                Err(_) => DropdownState::Error,
            };
        }

        if self.rerun {
            self.rerun = false;
            if self.is_searchable() && self.trimmed() != query {
                self.deadline = Some(now);
            }
        }
    }

    pub fn results(&self) -> &[ContentItem] {
        match &self.dropdown {
            DropdownState::Results(items) => items,
            _ => &[],
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let len = self.results().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.browsing = true;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.results().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
            self.browsing = true;
        }
    }

    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.results().get(self.selected)
    }

    /// The result Enter should open
    ///
    /// `None` once the query has been edited away from the one the results
    /// were found for, unless the highlight was moved after that edit.
    pub fn chosen_item(&self) -> Option<&ContentItem> {
        let current = self.results_query.as_deref() == Some(self.trimmed());
        if current || self.browsing {
            self.selected_item()
        } else {
            None
        }
    }

    /// Empties the query and hides the dropdown
    pub fn clear(&mut self) {
        self.query.clear();
        self.dropdown = DropdownState::Hidden;
        self.deadline = None;
        self.rerun = false;
        self.selected = 0;
        self.results_query = None;
        self.browsing = false;
    }
}
