//! Ozon search page source.

use super::{Source, SourceError};
use crate::market::client::ACCEPT_HTML;
use crate::market::{parser, Candidate, MarketClient, Marketplace};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Scrapes the Ozon storefront search page.
pub struct OzonSource {
    client: Arc<MarketClient>,
    base_url: String,
}

impl OzonSource {
    /// Creates a source pointed at the live storefront.
    pub fn new(client: Arc<MarketClient>) -> Self {
        Self::with_base_url(client, Marketplace::Ozon.base_url())
    }

    /// Creates a source with a custom base URL (for testing).
    pub fn with_base_url(client: Arc<MarketClient>, base_url: String) -> Self {
        Self { client, base_url }
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search/?text={}&sorting=rating", self.base_url, urlencoding::encode(query))
    }
}

#[async_trait]
impl Source for OzonSource {
    fn name(&self) -> &str {
        "ozon"
    }

    fn marketplace(&self) -> Marketplace {
        Marketplace::Ozon
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Candidate>, SourceError> {
        info!("Searching Ozon: {}", query);
        let html = self.client.get_text(&self.search_url(query), ACCEPT_HTML).await?;
        parser::parse_ozon(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client() -> Arc<MarketClient> {
        let config = Config { marketplace: Marketplace::Ozon, ..Config::default() };
        Arc::new(MarketClient::new(&config).unwrap())
    }

    #[test]
    fn test_search_url() {
        let source = OzonSource::new(make_client());
        assert_eq!(
            source.search_url("lego"),
            "https://www.ozon.ru/search/?text=lego&sorting=rating"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_tiles() {
        let mock_server = MockServer::start().await;

        let html = r#"<html><body>
            <div class="tile-root">
              <a href="/product/lego-classic-555/"><span class="tsBody500Medium">LEGO Classic</span></a>
              <span class="tsHeadline500Medium">3 199 ₽</span>
            </div>
        </body></html>"#;

        Mock::given(method("GET"))
            .and(path("/search/"))
            .and(query_param("text", "lego"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let source = OzonSource::with_base_url(make_client(), mock_server.uri());
        let candidates = source.fetch("lego").await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "555");
        assert_eq!(candidates[0].price, Some(3199));
        assert_eq!(candidates[0].marketplace, Marketplace::Ozon);
    }

    #[tokio::test]
    async fn test_fetch_empty_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&mock_server)
            .await;

        let source = OzonSource::with_base_url(make_client(), mock_server.uri());
        assert!(source.fetch("lego").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let source = OzonSource::with_base_url(make_client(), mock_server.uri());
        assert!(matches!(source.fetch("lego").await.unwrap_err(), SourceError::Blocked(429)));
    }
}
