//! Runtime configuration
//!
//! Built from the parsed command line (which already folds in environment
//! variables and `.env`) plus the platform directories for cache and data.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use thiserror::Error;

use crate::cache::DEFAULT_TTL;
use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// How long on-disk snapshots count as fresh
pub const DEFAULT_DISK_TTL: Duration = Duration::from_secs(60 * 60);

const MY_LIST_FILE: &str = "my_list.json";
const LOG_FILE: &str = "marquee.log";

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No TMDb credentials: pass --api-key or --bearer-token, or set TMDB_API_KEY / TMDB_BEARER_TOKEN")]
    MissingCredentials,
}

/// TMDb credentials; at least one of the two must be present
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// v3 API key, sent as the `api_key` query parameter
    pub api_key: Option<String>,
    /// v4 read access token, sent as `Authorization: Bearer`
    pub bearer_token: Option<String>,
}

impl Credentials {
    /// Builds credentials, ignoring blank values
    pub fn new(api_key: Option<String>, bearer_token: Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let credentials = Self {
            api_key: non_blank(api_key),
            bearer_token: non_blank(bearer_token),
        };

        if credentials.api_key.is_none() && credentials.bearer_token.is_none() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("bearer_token", &redact(&self.bearer_token))
            .finish()
    }
}

/// Connection settings for the TMDb API
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub credentials: Credentials,
}

impl TmdbConfig {
    /// Settings for the public TMDb API with the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            credentials,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    /// Lifetime of in-memory cache entries
    pub memory_ttl: Duration,
    /// Lifetime of on-disk snapshots before they count as stale
    pub disk_ttl: Duration,
    /// Snapshot directory, `None` disables snapshots
    pub cache_dir: Option<PathBuf>,
    /// Directory for My List and the log file
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Builds the configuration from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let credentials = Credentials::new(cli.api_key.clone(), cli.bearer_token.clone())?;
        let mut tmdb = TmdbConfig::new(credentials);
        tmdb.language = cli.language.clone();

        let project_dirs = ProjectDirs::from("", "", "marquee");
        let cache_dir = if cli.no_disk_cache {
            None
        } else {
            project_dirs.as_ref().map(|dirs| dirs.cache_dir().to_path_buf())
        };
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| project_dirs.as_ref().map(|dirs| dirs.data_dir().to_path_buf()));

        Ok(Self {
            tmdb,
            memory_ttl: DEFAULT_TTL,
            disk_ttl: DEFAULT_DISK_TTL,
            cache_dir,
            data_dir,
        })
    }

    /// Location of the persisted watchlist
    pub fn my_list_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(MY_LIST_FILE))
    }

    /// Location of the log file
    pub fn log_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(LOG_FILE))
    }
}
