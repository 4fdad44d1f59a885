//! HTTP client for a running Herald server.

use anyhow::{bail, Context, Result};
use herald_core::{NewNotification, Notification};
use std::time::Duration;
use tracing::debug;

/// Default server URL.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Talks to the notification API of a Herald server.
#[derive(Clone)]
pub struct HeraldClient {
    client: reqwest::Client,
    base_url: String,
}

impl HeraldClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "HeraldClient initialized");
        Ok(Self { client, base_url })
    }

    fn url(&self) -> String {
        format!("{}/notifications", self.base_url)
    }

    /// Create a notification and return it as stored by the server.
    pub async fn create(&self, title: &str, body: &str) -> Result<Notification> {
        let url = self.url();
        debug!(url = %url, title = %title, "Sending notification");

        let response = self
            .client
            .post(&url)
            .json(&NewNotification::new(title, body))
            .send()
            .await
            .with_context(|| format!("Failed to reach {} (is `herald serve` running?)", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            bail!("Server rejected notification ({}): {}", status, text);
        }

        Ok(response.json().await?)
    }

    /// Fetch every notification in creation order.
    pub async fn list(&self) -> Result<Vec<Notification>> {
        let url = self.url();
        debug!(url = %url, "Listing notifications");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {} (is `herald serve` running?)", url))?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Fetch one notification, `None` if the server does not know the id.
    pub async fn get(&self, id: &str) -> Result<Option<Notification>> {
        let url = self.url();
        debug!(url = %url, id = %id, "Fetching notification");

        let response = self
            .client
            .get(&url)
            .query(&[("id", id)])
            .send()
            .await
            .with_context(|| format!("Failed to reach {} (is `herald serve` running?)", url))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }
}
