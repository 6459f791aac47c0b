//! Storefront link command implementation.

use crate::config::Config;
use crate::query::Query;
use anyhow::Result;

/// Builds the marketplace search page link for a query without fetching.
pub struct LinkCommand {
    config: Config,
}

impl LinkCommand {
    /// Creates a new link command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the search page link for the query.
    pub fn execute(&self, raw: &str) -> Result<String> {
        let query = Query::parse(raw)?;
        let query = if self.config.refine_queries { query.refined() } else { query };

        Ok(self.config.marketplace.search_link(query.as_str(), self.config.link_rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Marketplace;

    #[test]
    fn test_wildberries_link_with_rating() {
        let cmd = LinkCommand::new(Config::default());
        let link = cmd.execute("носки").unwrap();

        assert_eq!(
            link,
            "https://www.wildberries.ru/catalog/0/search.aspx?search=%D0%BD%D0%BE%D1%81%D0%BA%D0%B8&sort=popular&rating=4.7"
        );
    }

    #[test]
    fn test_wildberries_link_without_rating() {
        let config = Config { link_rating: None, ..Config::default() };
        let link = LinkCommand::new(config).execute("usb cable").unwrap();

        assert!(link.ends_with("search=usb%20cable&sort=popular"));
    }

    #[test]
    fn test_ozon_link() {
        let config = Config { marketplace: Marketplace::Ozon, ..Config::default() };
        let link = LinkCommand::new(config).execute("  чайник ").unwrap();

        assert!(link.starts_with("https://www.ozon.ru/search/?text="));
        assert!(link.ends_with("&sorting=rating"));
        assert!(!link.contains("rating=4.7"));
    }

    #[test]
    fn test_refined_link() {
        let config = Config { refine_queries: true, link_rating: None, ..Config::default() };
        let link = LinkCommand::new(config).execute("топ наушники").unwrap();

        assert!(link.contains(&*urlencoding::encode("наушники популярные")));
    }

    #[test]
    fn test_short_query_rejected() {
        let err = LinkCommand::new(Config::default()).execute("a").unwrap_err();
        assert!(err.to_string().contains("at least 2"));
    }
}
