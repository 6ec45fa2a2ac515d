//! Command-line interface parsing for marquee
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --page flag for opening a specific catalog page and --my-list for starting
//! on the watchlist.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::page::Page;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified page name is not recognized
    #[error("Invalid page: '{0}'. Valid pages: home, series, movies, new")]
    InvalidPage(String),
}

/// marquee - browse movies and series from The Movie Database
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Terminal catalog browser for movies and TV series")]
#[command(version)]
pub struct Cli {
    /// TMDb v3 API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// TMDb v4 read access token, sent as a bearer header
    #[arg(long, env = "TMDB_BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    /// Language for titles and overviews
    #[arg(long, env = "TMDB_LANGUAGE", default_value = crate::config::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Page to open on startup
    ///
    /// Examples:
    ///   marquee --page movies    # Open the Movies page
    ///   marquee --page new       # Open New & Popular
    ///
    /// Valid pages: home, series, movies, new
    #[arg(long, value_name = "PAGE")]
    pub page: Option<String>,

    /// Open My List on startup
    #[arg(long)]
    pub my_list: bool,

    /// Do not read or write catalog snapshots on disk
    #[arg(long)]
    pub no_disk_cache: bool,

    /// Directory for My List and the log file
    #[arg(long, env = "MARQUEE_DATA_DIR", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Page shown once the catalog has loaded
    pub initial_page: Page,
    /// Whether to start on My List instead
    pub start_in_my_list: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_page: Page::Home,
            start_in_my_list: false,
        }
    }
}

/// Parses a page string argument into a Page.
///
/// # Returns
/// * `Ok(Page)` if the string matches a page or one of its aliases
/// * `Err(CliError::InvalidPage)` otherwise
pub fn parse_page_arg(s: &str) -> Result<Page, CliError> {
    Page::from_str(s).ok_or_else(|| CliError::InvalidPage(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_page = match &cli.page {
            Some(page) => parse_page_arg(page)?,
            None => Page::Home,
        };

        Ok(StartupConfig {
            initial_page,
            start_in_my_list: cli.my_list,
        })
    }
}
