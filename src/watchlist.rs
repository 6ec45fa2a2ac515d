//! My List: titles saved for later
//!
//! The list is stored as JSON and rewritten after every change.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::tmdb::{ContentItem, MediaType};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("Failed to write My List: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize My List: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A saved title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub item: ContentItem,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Movies,
    Series,
}

impl ListFilter {
    pub fn next(&self) -> Self {
        match self {
            ListFilter::All => ListFilter::Movies,
            ListFilter::Movies => ListFilter::Series,
            ListFilter::Series => ListFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListFilter::All => "All",
            ListFilter::Movies => "Movies",
            ListFilter::Series => "Series",
        }
    }

    fn matches(&self, media_type: MediaType) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Movies => media_type == MediaType::Movie,
            ListFilter::Series => media_type == MediaType::Tv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSort {
    /// Order in which titles were added
    #[default]
    Added,
    Title,
    /// Newest first, unknown years last
    Year,
}

impl ListSort {
    pub fn next(&self) -> Self {
        match self {
            ListSort::Added => ListSort::Title,
            ListSort::Title => ListSort::Year,
            ListSort::Year => ListSort::Added,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListSort::Added => "Date added",
            ListSort::Title => "Title",
            ListSort::Year => "Year",
        }
    }
}

/// Saved titles, unique by id and media type
#[derive(Debug, Default)]
pub struct MyList {
    path: Option<PathBuf>,
    entries: Vec<ListEntry>,
}

impl MyList {
    /// Loads the list stored at `path`
    ///
    /// A missing or unreadable file yields an empty list.
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<ListEntry>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "My List is corrupt, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read My List");
                Vec::new()
            }
        };

        info!(count = entries.len(), "My List loaded");
        Self {
            path: Some(path),
            entries,
        }
    }

    /// A list that is never written to disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.entries.iter().any(|e| e.item.is(id, media_type))
    }

    /// Adds a title and saves; on a failed save the title is not kept
    pub fn add(&mut self, item: ContentItem) -> Result<AddOutcome, WatchlistError> {
        if self.contains(item.id, item.media_type) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        let (id, title) = (item.id, item.title.clone());
        self.entries.push(ListEntry {
            item,
            added_at: Utc::now(),
        });
        if let Err(e) = self.save() {
            self.entries.pop();
            return Err(e);
        }
        info!(id, title = %title, "added to My List");
        Ok(AddOutcome::Added)
    }

    /// Removes a title; returns whether it was present
    ///
    /// The list is left unchanged when it cannot be saved.
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> Result<bool, WatchlistError> {
        let previous = self.entries.clone();
        self.entries.retain(|e| !e.item.is(id, media_type));
        if self.entries.len() == previous.len() {
            return Ok(false);
        }

        if let Err(e) = self.save() {
            self.entries = previous;
            return Err(e);
        }
        info!(id, "removed from My List");
        Ok(true)
    }

    /// Entries matching `filter`, ordered by `sort`
    pub fn view(&self, filter: ListFilter, sort: ListSort) -> Vec<&ListEntry> {
        let mut entries: Vec<&ListEntry> = self
            .entries
            .iter()
            .filter(|e| filter.matches(e.item.media_type))
            .collect();

        match sort {
            ListSort::Added => {}
            ListSort::Title => {
                entries.sort_by_key(|e| e.item.title.to_lowercase());
            }
            ListSort::Year => entries.sort_by(|a, b| b.item.year.cmp(&a.item.year)),
        }
        entries
    }

    fn save(&self) -> Result<(), WatchlistError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
