// src/models/selectors.rs

//! CSS selectors for scraping the lecture listing and detail pages.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors describing where event data lives on the source site.
///
/// The listing page is expected to contain one `row_selector` element per
/// event. Inside a row, the first two `time_selector` matches carry the start
/// and end datetimes in their `time_attr` attribute, and the `title_selector`
/// element holds the title text plus a `link_selector` element whose
/// `link_attr` points at the detail page. The detail page holds a single
/// `description_selector` region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSelectors {
    /// Selector for each event row in the listing
    #[serde(default = "defaults::row")]
    pub row_selector: String,

    /// Selector for the start/end time elements within a row
    #[serde(default = "defaults::time")]
    pub time_selector: String,

    /// Attribute carrying the machine-readable datetime
    #[serde(default = "defaults::time_attr")]
    pub time_attr: String,

    /// Selector for the title element within a row
    #[serde(default = "defaults::title")]
    pub title_selector: String,

    /// Selector for the link element inside the title element
    #[serde(default = "defaults::link")]
    pub link_selector: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Selector for the description region on the detail page
    #[serde(default = "defaults::description")]
    pub description_selector: String,
}

impl Default for EventSelectors {
    fn default() -> Self {
        Self {
            row_selector: defaults::row(),
            time_selector: defaults::time(),
            time_attr: defaults::time_attr(),
            title_selector: defaults::title(),
            link_selector: defaults::link(),
            link_attr: defaults::link_attr(),
            description_selector: defaults::description(),
        }
    }
}

impl EventSelectors {
    /// Check that every selector string parses.
    pub fn validate(&self) -> Result<()> {
        for s in [
            &self.row_selector,
            &self.time_selector,
            &self.title_selector,
            &self.link_selector,
            &self.description_selector,
        ] {
            parse_selector(s)?;
        }
        if self.time_attr.trim().is_empty() || self.link_attr.trim().is_empty() {
            return Err(AppError::config("selectors: attribute names must not be empty"));
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into `AppError::Selector`.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    pub fn row() -> String {
        ".views-row".into()
    }
    pub fn time() -> String {
        ".datetime".into()
    }
    pub fn time_attr() -> String {
        "datetime".into()
    }
    pub fn title() -> String {
        ".card__title".into()
    }
    pub fn link() -> String {
        "a".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn description() -> String {
        ".event-series--event__main-content".into()
    }
}
