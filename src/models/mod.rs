// src/models/mod.rs

//! Domain models for the lecture sync pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod event;
mod selectors;

// Re-export all public types
pub use config::{
    CalendarConfig, Config, CorruptStorePolicy, CrawlerConfig, FailurePolicy, PipelineConfig,
    SourceConfig, StorageConfig,
};
pub use event::{CandidateEvent, EventRecord, EventTemplate, EventTime, Reminders, is_on_topic};
pub use selectors::{EventSelectors, parse_selector};

/// Summary of a single sync pass.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Rows found on the listing page
    pub candidate_total: usize,
    /// Candidates dropped because they already started
    pub skipped_past: usize,
    /// Candidates dropped because their title was already published
    pub skipped_known: usize,
    /// Candidates dropped because of a per-event error
    pub failures: usize,
    /// Events stored and submitted to the calendar
    pub published: Vec<EventRecord>,
}
