// src/pipeline/sync.rs

//! One scrape-filter-store-publish pass.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::models::{CandidateEvent, Config, EventRecord, EventTemplate, FailurePolicy, SyncOutcome};
use crate::pipeline::filter::{EventFilter, Verdict};
use crate::services::{CalendarPublisher, EventFetcher, PageParser, PublishStatus};
use crate::storage::EventStore;

/// Collaborators a pass runs against.
pub struct SyncContext<'a> {
    pub config: &'a Config,
    pub fetcher: &'a EventFetcher,
    pub parser: &'a dyn PageParser,
    pub store: &'a dyn EventStore,
    pub publisher: &'a dyn CalendarPublisher,
    /// Write the updated store back (false for dry runs)
    pub persist: bool,
}

/// Run one pass of the pipeline with `now` as the reference time.
pub async fn run_sync(ctx: &SyncContext<'_>, now: DateTime<Tz>) -> Result<SyncOutcome> {
    let policy = ctx.config.pipeline.on_event_error;
    let template = EventTemplate::from_config(ctx.config);
    let mut outcome = SyncOutcome::default();

    let html = ctx.fetcher.fetch_listing().await?;
    let rows = ctx.parser.parse_listing(&html);
    outcome.candidate_total = rows.len();
    log::info!("Found {} events on the listing page", rows.len());

    let mut store = ctx.store.load().await?;
    log::info!(
        "Loaded {} previously published events from {}",
        store.len(),
        ctx.store.location()
    );

    // Cheap pre-filter so past and known events never cost a detail request.
    let mut filter = EventFilter::new(&store, now);
    let mut records = Vec::new();
    for row in rows {
        let candidate = match row {
            Ok(candidate) => candidate,
            Err(error) => {
                handle_event_error(policy, error, "malformed listing row", &mut outcome)?;
                continue;
            }
        };

        match filter.check(&candidate.title, candidate.start.fixed_offset()) {
            Verdict::Past => {
                log::debug!("Skipping past event '{}'", candidate.title);
                outcome.skipped_past += 1;
                continue;
            }
            Verdict::Known => {
                log::debug!("Skipping already published '{}'", candidate.title);
                outcome.skipped_known += 1;
                continue;
            }
            Verdict::Accept => {}
        }

        let subject = format!("'{}'", candidate.title);
        match build_record(ctx, &template, candidate).await {
            Ok(record) => records.push(record),
            Err(error) => handle_event_error(policy, error, &subject, &mut outcome)?,
        }
    }

    let built = records.len();
    let new_events = filter.apply(records);
    outcome.skipped_known += built - new_events.len();

    // Record only what the calendar accepted, so a failed submit is retried
    // on the next pass instead of being marked as known.
    let mut published = Vec::with_capacity(new_events.len());
    let mut publish_error = None;
    for event in new_events {
        match ctx.publisher.publish(&event).await {
            Ok(status) => {
                log_publish(&event, status);
                published.push(event);
            }
            Err(error) => {
                publish_error = Some(error);
                break;
            }
        }
    }

    store.append(&published)?;
    if ctx.persist {
        ctx.store.save(&store).await?;
    }
    if let Some(error) = publish_error {
        return Err(error);
    }

    log::info!(
        "Pass complete: {} new, {} past, {} known, {} failed",
        published.len(),
        outcome.skipped_past,
        outcome.skipped_known,
        outcome.failures
    );

    outcome.published = published;
    Ok(outcome)
}

fn log_publish(event: &EventRecord, status: PublishStatus) {
    let topic = if event.on_topic { " [topic]" } else { "" };
    match status {
        PublishStatus::Created => log::info!(
            "Published '{}' starting {}{}",
            event.title,
            event.start.date_time.to_rfc3339(),
            topic
        ),
        PublishStatus::AlreadyExists => {
            log::info!("'{}' was already in the calendar{}", event.title, topic)
        }
        PublishStatus::Skipped => {}
    }
}

/// Fetch the detail page and assemble the full record.
async fn build_record(
    ctx: &SyncContext<'_>,
    template: &EventTemplate,
    candidate: CandidateEvent,
) -> Result<EventRecord> {
    let html = ctx.fetcher.fetch_detail(&candidate.detail_href).await?;
    let description = ctx.parser.parse_description(&html)?;
    template.build(candidate, description)
}

/// Apply the per-event failure policy.
fn handle_event_error(
    policy: FailurePolicy,
    error: AppError,
    subject: &str,
    outcome: &mut SyncOutcome,
) -> Result<()> {
    match policy {
        FailurePolicy::Abort => Err(error),
        FailurePolicy::Skip => {
            log::warn!("Skipping {subject}: {error}");
            outcome.failures += 1;
            Ok(())
        }
    }
}
