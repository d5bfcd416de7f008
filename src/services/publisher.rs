// src/services/publisher.rs

//! Calendar publishing.
//!
//! The calendar service is an external collaborator; the pipeline only hands
//! it finished [`EventRecord`]s through the [`CalendarPublisher`] trait.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CalendarConfig, EventRecord};

/// Outcome of submitting one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    /// The calendar accepted a new event
    Created,
    /// The calendar already holds an event with the same ID
    AlreadyExists,
    /// Nothing was sent (dry run)
    Skipped,
}

/// Submits events to a calendar service.
#[async_trait]
pub trait CalendarPublisher: Send + Sync {
    /// Create one event in the calendar.
    async fn publish(&self, event: &EventRecord) -> Result<PublishStatus>;
}

/// Publisher for the Google Calendar v3 REST API.
///
/// Authentication is a bearer access token obtained out of band.
pub struct GoogleCalendarPublisher {
    client: Client,
    events_url: Url,
    access_token: String,
    deterministic_ids: bool,
}

impl GoogleCalendarPublisher {
    pub fn new(
        client: Client,
        calendar: &CalendarConfig,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let mut events_url = Url::parse(&calendar.api_base)?;
        events_url
            .path_segments_mut()
            .map_err(|_| AppError::config("calendar.api_base cannot be a base URL"))?
            .pop_if_empty()
            .push("calendars")
            .push(&calendar.calendar_id)
            .push("events");

        Ok(Self {
            client,
            events_url,
            access_token: access_token.into(),
            deterministic_ids: calendar.deterministic_ids,
        })
    }

    /// Read the access token from the environment variable named in config.
    pub fn from_env(client: Client, calendar: &CalendarConfig) -> Result<Self> {
        let token = std::env::var(&calendar.access_token_env).map_err(|_| {
            AppError::config(format!(
                "environment variable {} is not set",
                calendar.access_token_env
            ))
        })?;
        Self::new(client, calendar, token)
    }
}

#[async_trait]
impl CalendarPublisher for GoogleCalendarPublisher {
    async fn publish(&self, event: &EventRecord) -> Result<PublishStatus> {
        let mut body = serde_json::to_value(event)?;
        if self.deterministic_ids {
            body["id"] = serde_json::Value::String(event_id(&event.title));
        }

        let response = self
            .client
            .post(self.events_url.clone())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(PublishStatus::Created);
        }
        if status == StatusCode::CONFLICT && self.deterministic_ids {
            log::warn!("Calendar already holds '{}', skipping", event.title);
            return Ok(PublishStatus::AlreadyExists);
        }

        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(AppError::publish(
            &event.title,
            format!("HTTP {status} - {detail}"),
        ))
    }
}

/// Publisher that only logs what it would submit.
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl CalendarPublisher for LogPublisher {
    async fn publish(&self, event: &EventRecord) -> Result<PublishStatus> {
        log::info!(
            "[dry-run] {} ({} - {})",
            event.title,
            event.start.date_time.to_rfc3339(),
            event.end.date_time.to_rfc3339()
        );
        Ok(PublishStatus::Skipped)
    }
}

/// Stable calendar event ID derived from the title.
///
/// Lowercase hex is a subset of the base32hex alphabet the API accepts.
pub fn event_id(title: &str) -> String {
    hex::encode(Sha256::digest(title.as_bytes()))
}
