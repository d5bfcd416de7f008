// src/services/parser.rs

//! Page parsing for the lecture listing and detail pages.
//!
//! All knowledge of the source site's HTML structure lives behind the
//! [`PageParser`] trait, so a layout change only touches one adapter.

use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{CandidateEvent, Config, EventSelectors, parse_selector};
use crate::utils::time::parse_datetime;

/// Extracts structured event data from raw HTML.
pub trait PageParser: Send + Sync {
    /// Parse every event row on the listing page.
    ///
    /// Each row yields its own result so one malformed row does not hide the
    /// others.
    fn parse_listing(&self, html: &str) -> Vec<Result<CandidateEvent>>;

    /// Extract the description text from a detail page.
    fn parse_description(&self, html: &str) -> Result<String>;
}

/// [`PageParser`] driven by configurable CSS selectors.
pub struct CssPageParser {
    row: Selector,
    time: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
    selectors: EventSelectors,
    tz: Tz,
    delimiter: String,
}

impl CssPageParser {
    /// Compile the selectors up front.
    pub fn new(selectors: &EventSelectors, tz: Tz, delimiter: impl Into<String>) -> Result<Self> {
        Ok(Self {
            row: parse_selector(&selectors.row_selector)?,
            time: parse_selector(&selectors.time_selector)?,
            title: parse_selector(&selectors.title_selector)?,
            link: parse_selector(&selectors.link_selector)?,
            description: parse_selector(&selectors.description_selector)?,
            selectors: selectors.clone(),
            tz,
            delimiter: delimiter.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.selectors,
            config.source.timezone()?,
            config.source.description_delimiter.clone(),
        )
    }

    fn parse_row(&self, index: usize, row: &ElementRef) -> Result<CandidateEvent> {
        let context = format!("listing row {}", index + 1);

        let attr = self.selectors.time_attr.as_str();
        let mut times = row.select(&self.time);
        let start_raw = times
            .next()
            .ok_or_else(|| AppError::parse(&context, "missing start time"))?
            .value()
            .attr(attr)
            .ok_or_else(|| AppError::parse(&context, format!("start time has no '{attr}'")))?;
        let end_raw = times
            .next()
            .ok_or_else(|| AppError::parse(&context, "missing end time"))?
            .value()
            .attr(attr)
            .ok_or_else(|| AppError::parse(&context, format!("end time has no '{attr}'")))?;

        let start = parse_datetime(start_raw, self.tz)
            .map_err(|e| AppError::parse(&context, format!("start time: {e}")))?;
        let end = parse_datetime(end_raw, self.tz)
            .map_err(|e| AppError::parse(&context, format!("end time: {e}")))?;

        let title_elem = row
            .select(&self.title)
            .next()
            .ok_or_else(|| AppError::parse(&context, "missing title"))?;
        let title = title_elem.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            return Err(AppError::parse(&context, "empty title"));
        }

        let attr = self.selectors.link_attr.as_str();
        let detail_href = title_elem
            .select(&self.link)
            .find_map(|el| el.value().attr(attr))
            .or_else(|| title_elem.value().attr(attr))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .ok_or_else(|| AppError::parse(&context, format!("title '{title}' has no link")))?
            .to_string();

        Ok(CandidateEvent {
            title,
            start,
            end,
            detail_href,
        })
    }
}

impl PageParser for CssPageParser {
    fn parse_listing(&self, html: &str) -> Vec<Result<CandidateEvent>> {
        let document = Html::parse_document(html);
        document
            .select(&self.row)
            .enumerate()
            .map(|(index, row)| self.parse_row(index, &row))
            .collect()
    }

    fn parse_description(&self, html: &str) -> Result<String> {
        let document = Html::parse_document(html);
        let region = document.select(&self.description).next().ok_or_else(|| {
            AppError::parse(
                "detail page",
                format!(
                    "no element matches '{}'",
                    self.selectors.description_selector
                ),
            )
        })?;

        let text: String = region.text().collect();
        Ok(truncate_description(&text, &self.delimiter))
    }
}

/// Keep only the text before the first `delimiter`, trimmed.
pub fn truncate_description(text: &str, delimiter: &str) -> String {
    let text = text.trim();
    let kept = match text.split_once(delimiter) {
        Some((before, _)) => before,
        None => text,
    };
    kept.trim().to_string()
}
