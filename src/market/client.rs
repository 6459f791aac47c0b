//! HTTP client for marketplace requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::market::marketplaces::Marketplace;
use crate::sources::SourceError;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Accept header for storefront HTML pages.
pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Accept header for JSON search APIs.
pub const ACCEPT_JSON: &str = "application/json, text/plain, */*";

/// Marketplace HTTP client with browser impersonation.
///
/// Every source adapter shares one client so cookies and connections are
/// reused across fallbacks.
pub struct MarketClient {
    client: Client,
    marketplace: Marketplace,
}

impl MarketClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            marketplace: config.marketplace,
        })
    }

    /// Performs a single GET and returns the body.
    ///
    /// Non-success statuses and anti-bot responses are mapped onto
    /// [`SourceError`] so callers can tell a dead source from an empty one.
    pub async fn get_text(&self, url: &str, accept: &str) -> Result<String, SourceError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", accept)
            .header("Accept-Language", self.marketplace.accept_language())
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 429 || status == 498 || status == 503 {
            warn!("Blocked or rate limited ({}) by {}", status, url);
            return Err(SourceError::Blocked(status.as_u16()));
        }

        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| SourceError::Transport(e.to_string()))
    }
}
