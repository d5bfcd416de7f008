//! New-event filtering.
//!
//! An event is new when it has not started yet and its title has never been
//! published. Titles are the identity: two events with the same title are the
//! same event whatever their other fields say.
//!
//! An event that appears on the site and starts on the same day, before the
//! next daily run, is never picked up. This is an accepted boundary of the
//! once-a-day schedule.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::models::EventRecord;
use crate::storage::PublishedEventStore;

/// Why an event was or was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Upcoming and unseen
    Accept,
    /// Starts at or before "now"
    Past,
    /// Title already published or already accepted in this pass
    Known,
}

/// Filter holding the known titles and the reference "now".
#[derive(Debug, Clone)]
pub struct EventFilter {
    known: HashSet<String>,
    now: DateTime<FixedOffset>,
}

impl EventFilter {
    /// Create a filter seeded with every title in the store.
    pub fn new<Tz: TimeZone>(store: &PublishedEventStore, now: DateTime<Tz>) -> Self {
        Self {
            known: store.titles().into_iter().map(String::from).collect(),
            now: now.fixed_offset(),
        }
    }

    /// Judge an event without recording it.
    pub fn check(&self, title: &str, start: DateTime<FixedOffset>) -> Verdict {
        if start <= self.now {
            Verdict::Past
        } else if self.known.contains(title) {
            Verdict::Known
        } else {
            Verdict::Accept
        }
    }

    /// Judge an event and, if accepted, remember its title.
    pub fn admit(&mut self, title: &str, start: DateTime<FixedOffset>) -> Verdict {
        let verdict = self.check(title, start);
        if verdict == Verdict::Accept {
            self.known.insert(title.to_string());
        }
        verdict
    }

    /// Keep only new records, preserving their order.
    pub fn apply(&mut self, records: Vec<EventRecord>) -> Vec<EventRecord> {
        records
            .into_iter()
            .filter(|record| self.admit(&record.title, record.starts_at()) == Verdict::Accept)
            .collect()
    }
}

/// Convenience function returning the records that are new relative to `store`.
pub fn filter_new_events<Tz: TimeZone>(
    records: Vec<EventRecord>,
    store: &PublishedEventStore,
    now: DateTime<Tz>,
) -> Vec<EventRecord> {
    EventFilter::new(store, now).apply(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateEvent, EventTemplate, Reminders};
    use chrono::Duration;
    use chrono_tz::America::Los_Angeles;
    use chrono_tz::Tz;

    fn now() -> DateTime<Tz> {
        Los_Angeles.with_ymd_and_hms(2030, 3, 5, 12, 0, 0).unwrap()
    }

    fn record(title: &str, starts_in_hours: i64) -> EventRecord {
        let start = now() + Duration::hours(starts_in_hours);
        EventTemplate {
            location: "https://zoom.example/j/1".to_string(),
            reminders: Reminders { use_default: true },
            topic_keyword: "quantum".to_string(),
        }
        .build(
            CandidateEvent {
                title: title.to_string(),
                start,
                end: start + Duration::hours(1),
                detail_href: "/events/x".to_string(),
            },
            String::new(),
        )
        .unwrap()
    }

    fn titles(records: &[EventRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_excludes_past_and_current() {
        let store = PublishedEventStore::default();
        let result = filter_new_events(
            vec![record("Yesterday", -24), record("Now", 0), record("Tomorrow", 24)],
            &store,
            now(),
        );
        assert_eq!(titles(&result), vec!["Tomorrow"]);
    }

    #[test]
    fn test_excludes_known_titles_regardless_of_fields() {
        let mut store = PublishedEventStore::default();
        store.append(&[record("Talk A", 48)]).unwrap();

        // Same title, different start time
        let result = filter_new_events(
            vec![record("Talk A", 72), record("Talk B", 72)],
            &store,
            now(),
        );
        assert_eq!(titles(&result), vec!["Talk B"]);
    }

    #[test]
    fn test_preserves_order_and_drops_in_batch_duplicates() {
        let store = PublishedEventStore::default();
        let result = filter_new_events(
            vec![
                record("Talk C", 10),
                record("Talk A", 30),
                record("Talk C", 50),
                record("Talk B", 20),
            ],
            &store,
            now(),
        );
        assert_eq!(titles(&result), vec!["Talk C", "Talk A", "Talk B"]);
    }

    #[test]
    fn test_idempotent_after_store_update() {
        let events = vec![record("Talk A", 5), record("Past", -5), record("Talk B", 50)];
        let mut store = PublishedEventStore::default();

        let first = filter_new_events(events.clone(), &store, now());
        assert_eq!(first.len(), 2);
        store.append(&first).unwrap();

        let second = filter_new_events(events, &store, now());
        assert!(second.is_empty());
    }

    #[test]
    fn test_check_does_not_record() {
        let store = PublishedEventStore::default();
        let mut filter = EventFilter::new(&store, now());
        let start = (now() + Duration::hours(1)).fixed_offset();

        assert_eq!(filter.check("Talk", start), Verdict::Accept);
        assert_eq!(filter.check("Talk", start), Verdict::Accept);
        assert_eq!(filter.admit("Talk", start), Verdict::Accept);
        assert_eq!(filter.check("Talk", start), Verdict::Known);
    }
}
