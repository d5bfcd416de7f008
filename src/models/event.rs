//! Event data structures.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Config;

/// An event row scraped from the listing page, before its detail page is read.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateEvent {
    /// Trimmed title
    pub title: String,

    /// Start time in the reference timezone
    pub start: DateTime<Tz>,

    /// End time in the reference timezone
    pub end: DateTime<Tz>,

    /// Link to the detail page, usually relative to the site root
    pub detail_href: String,
}

/// A point in time as the calendar service expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// ISO-8601 datetime with offset
    pub date_time: DateTime<FixedOffset>,

    /// IANA timezone name
    pub time_zone: String,
}

impl EventTime {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self {
            date_time: at.fixed_offset(),
            time_zone: at.timezone().name().to_string(),
        }
    }
}

/// Reminder configuration attached to every event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
}

/// A fully extracted lecture event, ready to be stored and published.
///
/// Serializes to the calendar service's event shape, which is also the
/// shape kept in the published event store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    /// Event title, unique across everything ever published
    #[serde(rename = "summary")]
    pub title: String,

    /// Fixed meeting location
    pub location: String,

    /// Detail page text, truncated at the description delimiter
    pub description: String,

    pub start: EventTime,

    pub end: EventTime,

    pub reminders: Reminders,

    /// Title matched the configured topic keyword
    #[serde(skip)]
    pub on_topic: bool,
}

impl EventRecord {
    /// Start instant of the event.
    pub fn starts_at(&self) -> DateTime<FixedOffset> {
        self.start.date_time
    }
}

/// Fields shared by every event, taken from configuration.
#[derive(Debug, Clone)]
pub struct EventTemplate {
    pub location: String,
    pub reminders: Reminders,
    pub topic_keyword: String,
}

impl EventTemplate {
    pub fn from_config(config: &Config) -> Self {
        Self {
            location: config.source.meeting_location_url.clone(),
            reminders: Reminders {
                use_default: config.calendar.use_default_reminders,
            },
            topic_keyword: config.source.topic_keyword.clone(),
        }
    }

    /// Combine a listing candidate and its description into a record.
    ///
    /// Fails if the title is empty or the event does not end after it starts.
    pub fn build(&self, candidate: CandidateEvent, description: String) -> Result<EventRecord> {
        let title = candidate.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::parse("event record", "title is empty"));
        }
        if candidate.start >= candidate.end {
            return Err(AppError::parse(
                format!("event '{title}'"),
                format!(
                    "start {} is not before end {}",
                    candidate.start.to_rfc3339(),
                    candidate.end.to_rfc3339()
                ),
            ));
        }

        Ok(EventRecord {
            on_topic: is_on_topic(&title, &self.topic_keyword),
            title,
            location: self.location.clone(),
            description,
            start: EventTime::new(candidate.start),
            end: EventTime::new(candidate.end),
            reminders: self.reminders,
        })
    }
}

/// Case-insensitive keyword match against a title.
pub fn is_on_topic(title: &str, keyword: &str) -> bool {
    title.to_lowercase().contains(&keyword.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    fn template() -> EventTemplate {
        EventTemplate {
            location: "https://zoom.example/j/1".to_string(),
            reminders: Reminders { use_default: true },
            topic_keyword: "quantum".to_string(),
        }
    }

    fn candidate(title: &str, start_hour: u32, end_hour: u32) -> CandidateEvent {
        CandidateEvent {
            title: title.to_string(),
            start: Los_Angeles
                .with_ymd_and_hms(2030, 3, 5, start_hour, 0, 0)
                .unwrap(),
            end: Los_Angeles.with_ymd_and_hms(2030, 3, 5, end_hour, 0, 0).unwrap(),
            detail_href: "/events/talk".to_string(),
        }
    }

    #[test]
    fn test_topic_flag() {
        assert!(is_on_topic("A Quantum Talk", "quantum"));
        assert!(!is_on_topic("Algebra Talk", "quantum"));
    }

    #[test]
    fn test_build_sets_fixed_fields() {
        let record = template()
            .build(candidate("  A Quantum Talk ", 18, 19), "Abstract".to_string())
            .unwrap();

        assert_eq!(record.title, "A Quantum Talk");
        assert_eq!(record.location, "https://zoom.example/j/1");
        assert!(record.on_topic);
        assert_eq!(record.start.time_zone, "America/Los_Angeles");
    }

    #[test]
    fn test_build_rejects_inverted_times() {
        assert!(
            template()
                .build(candidate("Talk", 19, 18), String::new())
                .is_err()
        );
        assert!(
            template()
                .build(candidate("Talk", 18, 18), String::new())
                .is_err()
        );
    }

    #[test]
    fn test_build_rejects_blank_title() {
        assert!(
            template()
                .build(candidate("   ", 18, 19), String::new())
                .is_err()
        );
    }

    #[test]
    fn test_serializes_calendar_shape() {
        let record = template()
            .build(candidate("Algebra Talk", 18, 19), "Abstract".to_string())
            .unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["summary"], "Algebra Talk");
        assert_eq!(value["start"]["dateTime"], "2030-03-05T18:00:00-08:00");
        assert_eq!(value["start"]["timeZone"], "America/Los_Angeles");
        assert_eq!(value["reminders"]["useDefault"], true);
        assert!(value.get("on_topic").is_none());
    }
}
