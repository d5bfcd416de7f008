//! Service layer for the lecture sync pipeline.
//!
//! This module contains the collaborators a sync pass is assembled from:
//! - Page fetching (`EventFetcher`)
//! - HTML extraction (`PageParser`, `CssPageParser`)
//! - Calendar publishing (`CalendarPublisher`, `GoogleCalendarPublisher`, `LogPublisher`)

mod fetcher;
mod parser;
mod publisher;

pub use fetcher::EventFetcher;
pub use parser::{CssPageParser, PageParser, truncate_description};
pub use publisher::{
    CalendarPublisher, GoogleCalendarPublisher, LogPublisher, PublishStatus, event_id,
};
