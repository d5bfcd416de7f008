//! Application configuration structures.

use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::EventSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing page, meeting location and reference timezone
    #[serde(default)]
    pub source: SourceConfig,

    /// HTTP client settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Page structure contract
    #[serde(default)]
    pub selectors: EventSelectors,

    /// Published event store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Calendar service settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Failure handling for a sync pass
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or the defaults if the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let listing = Url::parse(&self.source.listing_url)?;
        if !matches!(listing.scheme(), "http" | "https") || listing.host_str().is_none() {
            return Err(AppError::config(
                "source.listing_url must be an http(s) URL with a host",
            ));
        }
        Url::parse(&self.source.meeting_location_url)?;
        self.source.timezone()?;
        if self.source.topic_keyword.trim().is_empty() {
            return Err(AppError::config("source.topic_keyword is empty"));
        }
        if self.source.description_delimiter.is_empty() {
            return Err(AppError::config("source.description_delimiter is empty"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.storage.store_path.trim().is_empty() {
            return Err(AppError::config("storage.store_path is empty"));
        }
        if self.calendar.calendar_id.trim().is_empty() {
            return Err(AppError::config("calendar.calendar_id is empty"));
        }
        Url::parse(&self.calendar.api_base)?;
        self.selectors.validate()
    }
}

/// Where events come from and how they are presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Listing page URL
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Fixed location attached to every event
    #[serde(default = "defaults::meeting_location_url")]
    pub meeting_location_url: String,

    /// IANA name of the zone all times are normalized to
    #[serde(default = "defaults::reference_timezone")]
    pub reference_timezone: String,

    /// Keyword that sets the topic flag when found in a title
    #[serde(default = "defaults::topic_keyword")]
    pub topic_keyword: String,

    /// Description text from this marker onwards is dropped
    #[serde(default = "defaults::description_delimiter")]
    pub description_delimiter: String,
}

impl SourceConfig {
    /// Resolve the reference timezone.
    pub fn timezone(&self) -> Result<Tz> {
        self.reference_timezone.parse::<Tz>().map_err(|_| {
            AppError::config(format!(
                "Unknown timezone '{}' in source.reference_timezone",
                self.reference_timezone
            ))
        })
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            meeting_location_url: defaults::meeting_location_url(),
            reference_timezone: defaults::reference_timezone(),
            topic_keyword: defaults::topic_keyword(),
            description_delimiter: defaults::description_delimiter(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between detail page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// What to do when the store file exists but cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptStorePolicy {
    /// Abort the pass with a storage error
    #[default]
    Fail,
    /// Log an error and continue with an empty store
    Reset,
}

/// Published event store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding published events
    #[serde(default = "defaults::store_path")]
    pub store_path: String,

    #[serde(default)]
    pub on_corrupt: CorruptStorePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: defaults::store_path(),
            on_corrupt: CorruptStorePolicy::default(),
        }
    }
}

/// Calendar service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of the Calendar REST API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Target calendar identifier
    #[serde(default = "defaults::calendar_id")]
    pub calendar_id: String,

    /// Environment variable holding the OAuth access token
    #[serde(default = "defaults::access_token_env")]
    pub access_token_env: String,

    /// Use the calendar's default reminders for every event
    #[serde(default = "defaults::enabled")]
    pub use_default_reminders: bool,

    /// Derive event IDs from titles so re-submission is detected remotely
    #[serde(default = "defaults::enabled")]
    pub deterministic_ids: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            calendar_id: defaults::calendar_id(),
            access_token_env: defaults::access_token_env(),
            use_default_reminders: true,
            deterministic_ids: true,
        }
    }
}

/// How a single bad event affects the rest of the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole pass
    Abort,
    /// Log and continue with the remaining events
    #[default]
    Skip,
}

/// Failure handling for a sync pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub on_event_error: FailurePolicy,

    /// Stop the daemon when a pass fails instead of waiting for the next day
    #[serde(default = "defaults::enabled")]
    pub exit_on_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            on_event_error: FailurePolicy::default(),
            exit_on_error: true,
        }
    }
}

mod defaults {
    // Source defaults
    pub fn listing_url() -> String {
        "https://simons.berkeley.edu/programs-events/public-lectures#nav-upcoming".into()
    }
    pub fn meeting_location_url() -> String {
        "https://berkeley.zoom.us/j/95040632440".into()
    }
    pub fn reference_timezone() -> String {
        "America/Los_Angeles".into()
    }
    pub fn topic_keyword() -> String {
        "quantum".into()
    }
    pub fn description_delimiter() -> String {
        "===".into()
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; lecture-sync/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        250
    }

    // Storage defaults
    pub fn store_path() -> String {
        "jsons/previous_events.json".into()
    }

    // Calendar defaults
    pub fn api_base() -> String {
        "https://www.googleapis.com/calendar/v3".into()
    }
    pub fn calendar_id() -> String {
        "primary".into()
    }
    pub fn access_token_env() -> String {
        "GOOGLE_CALENDAR_ACCESS_TOKEN".into()
    }

    pub fn enabled() -> bool {
        true
    }
}
