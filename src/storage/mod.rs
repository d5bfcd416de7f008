//! Storage abstractions for the published event store.
//!
//! The store is a single JSON document: an array of event objects in the
//! calendar service's shape, one per event ever published. It is read in full
//! at the start of a pass and rewritten in full at the end.
//!
//! ```text
//! jsons/
//! └── previous_events.json   # [{"summary": "...", "start": {...}, ...}, ...]
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::EventRecord;

// Re-export for convenience
pub use local::JsonFileStore;

/// One entry of the store.
///
/// Only `summary` is required; any other fields are carried through
/// untouched when the store is rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishedEvent {
    pub summary: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PublishedEvent {
    pub fn from_record(record: &EventRecord) -> Result<Self> {
        Ok(serde_json::from_value(serde_json::to_value(record)?)?)
    }
}

/// Everything published so far, in publication order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct PublishedEventStore {
    events: Vec<PublishedEvent>,
}

impl PublishedEventStore {
    pub fn new(events: Vec<PublishedEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[PublishedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Titles of all published events.
    pub fn titles(&self) -> HashSet<&str> {
        self.events.iter().map(|e| e.summary.as_str()).collect()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.events.iter().any(|e| e.summary == title)
    }

    /// Append records whose titles are not stored yet.
    ///
    /// Returns the number of records added.
    pub fn append(&mut self, records: &[EventRecord]) -> Result<usize> {
        let mut added = 0;
        for record in records {
            if self.contains(&record.title) {
                continue;
            }
            self.events.push(PublishedEvent::from_record(record)?);
            added += 1;
        }
        Ok(added)
    }
}

/// Trait for published event store backends.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Read the full store.
    async fn load(&self) -> Result<PublishedEventStore>;

    /// Replace the persisted store with `store`.
    async fn save(&self, store: &PublishedEventStore) -> Result<()>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateEvent, EventTemplate, Reminders};
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    fn record(title: &str) -> EventRecord {
        EventTemplate {
            location: "https://zoom.example/j/1".to_string(),
            reminders: Reminders { use_default: true },
            topic_keyword: "quantum".to_string(),
        }
        .build(
            CandidateEvent {
                title: title.to_string(),
                start: Los_Angeles.with_ymd_and_hms(2030, 3, 5, 18, 0, 0).unwrap(),
                end: Los_Angeles.with_ymd_and_hms(2030, 3, 5, 19, 0, 0).unwrap(),
                detail_href: "/events/x".to_string(),
            },
            String::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_append_skips_known_titles() {
        let mut store = PublishedEventStore::default();
        assert_eq!(store.append(&[record("Talk A"), record("Talk B")]).unwrap(), 2);
        assert_eq!(store.append(&[record("Talk B"), record("Talk C")]).unwrap(), 1);

        let titles: Vec<_> = store.events().iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(titles, vec!["Talk A", "Talk B", "Talk C"]);
    }

    #[test]
    fn test_minimal_entries_are_accepted() {
        let store: PublishedEventStore =
            serde_json::from_str(r#"[{"summary": "Old Talk"}, {"summary": "Other", "legacy": 1}]"#)
                .unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.contains("Old Talk"));
        assert_eq!(store.events()[1].extra["legacy"], 1);
    }

    #[test]
    fn test_entries_without_summary_are_rejected() {
        let parsed: std::result::Result<PublishedEventStore, _> =
            serde_json::from_str(r#"[{"title": "No summary"}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_from_record_keeps_calendar_fields() {
        let entry = PublishedEvent::from_record(&record("Talk A")).unwrap();
        assert_eq!(entry.summary, "Talk A");
        assert_eq!(entry.extra["location"], "https://zoom.example/j/1");
        assert_eq!(entry.extra["start"]["timeZone"], "America/Los_Angeles");
    }
}
