// src/services/fetcher.rs

//! Listing and detail page fetcher.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::Config;
use crate::utils::http::{create_client, fetch_text};
use crate::utils::{get_root, resolve_against_root};

/// Retrieves raw HTML for the listing page and per-event detail pages.
pub struct EventFetcher {
    client: Client,
    listing_url: String,
    root: String,
    delay: Duration,
}

impl EventFetcher {
    /// Create a fetcher with an HTTP client built from the crawler settings.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_client(&config.crawler)?;
        Self::with_client(client, config)
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(client: Client, config: &Config) -> Result<Self> {
        let root = get_root(&config.source.listing_url)?;
        Ok(Self {
            client,
            listing_url: config.source.listing_url.clone(),
            root,
            delay: Duration::from_millis(config.crawler.request_delay_ms),
        })
    }

    /// Site root that detail links are resolved against.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Fetch the listing page.
    pub async fn fetch_listing(&self) -> Result<String> {
        log::debug!("Fetching listing page {}", self.listing_url);
        fetch_text(&self.client, &self.listing_url).await
    }

    /// Fetch a detail page given its (usually relative) href.
    pub async fn fetch_detail(&self, href: &str) -> Result<String> {
        let url = resolve_against_root(&self.root, href)?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        log::debug!("Fetching detail page {url}");
        fetch_text(&self.client, &url).await
    }
}
