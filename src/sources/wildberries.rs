//! Wildberries search API source.

use super::{Source, SourceError};
use crate::market::client::ACCEPT_JSON;
use crate::market::{parser, Candidate, MarketClient, Marketplace};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const WILDBERRIES_SEARCH_BASE: &str = "https://search.wb.ru";

/// API versions tried in order; the newer mirror answers first.
pub const API_VERSIONS: [&str; 2] = ["v5", "v4"];

/// Moscow pickup region, used by the storefront when no region is chosen.
const DEFAULT_DEST: &str = "-1257786";

/// Queries one version of the Wildberries search API.
pub struct WildberriesSource {
    client: Arc<MarketClient>,
    base_url: String,
    version: String,
    name: String,
}

impl WildberriesSource {
    /// Creates a source for the given API version.
    pub fn new(client: Arc<MarketClient>, version: &str) -> Self {
        Self::with_base_url(client, version, WILDBERRIES_SEARCH_BASE.to_string())
    }

    /// Creates a source with a custom base URL (for testing).
    pub fn with_base_url(client: Arc<MarketClient>, version: &str, base_url: String) -> Self {
        Self {
            client,
            base_url,
            version: version.to_string(),
            name: format!("wildberries-{}", version),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/exactmatch/ru/common/{}/search?appType=1&curr=rub&dest={}&query={}&resultset=catalog&sort=popular&spp=30",
            self.base_url,
            self.version,
            DEFAULT_DEST,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl Source for WildberriesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn marketplace(&self) -> Marketplace {
        Marketplace::Wildberries
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Candidate>, SourceError> {
        info!("Searching Wildberries ({}): {}", self.version, query);
        let body = self.client.get_text(&self.search_url(query), ACCEPT_JSON).await?;
        parser::parse_wildberries(&body)
    }
}
