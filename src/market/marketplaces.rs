//! Supported marketplaces with their domains and link shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marketplaces the bot can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    Wildberries,
    Ozon,
}

impl Marketplace {
    /// Returns the storefront domain.
    pub fn domain(&self) -> &'static str {
        match self {
            Marketplace::Wildberries => "wildberries.ru",
            Marketplace::Ozon => "ozon.ru",
        }
    }

    /// Returns the storefront base URL.
    pub fn base_url(&self) -> String {
        format!("https://www.{}", self.domain())
    }

    /// Human-readable name used in replies.
    pub fn display_name(&self) -> &'static str {
        match self {
            Marketplace::Wildberries => "Wildberries",
            Marketplace::Ozon => "Ozon",
        }
    }

    /// Both marketplaces price in roubles.
    pub fn currency(&self) -> &'static str {
        "RUB"
    }

    /// Returns the Accept-Language header value for requests.
    pub fn accept_language(&self) -> &'static str {
        "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7"
    }

    /// Returns the product page URL for a marketplace identifier.
    pub fn product_url(&self, id: &str) -> String {
        match self {
            Marketplace::Wildberries => format!("{}/catalog/{}/detail.aspx", self.base_url(), id),
            Marketplace::Ozon => format!("{}/product/{}/", self.base_url(), id),
        }
    }

    /// Builds the storefront search page link for a query.
    ///
    /// `min_rating` only applies to Wildberries, whose search page accepts a
    /// rating filter in the query string.
    pub fn search_link(&self, query: &str, min_rating: Option<f32>) -> String {
        let encoded = urlencoding::encode(query);
        match self {
            Marketplace::Wildberries => {
                let mut link = format!(
                    "{}/catalog/0/search.aspx?search={}&sort=popular",
                    self.base_url(),
                    encoded
                );
                if let Some(rating) = min_rating {
                    link.push_str(&format!("&rating={}", rating));
                }
                link
            }
            Marketplace::Ozon => {
                format!("{}/search/?text={}&sorting=rating", self.base_url(), encoded)
            }
        }
    }

    /// Returns all supported marketplaces.
    pub fn all() -> &'static [Marketplace] {
        &[Marketplace::Wildberries, Marketplace::Ozon]
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Marketplace::Wildberries => "wildberries",
            Marketplace::Ozon => "ozon",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Marketplace {
    type Err = MarketplaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wildberries" | "wb" | "вб" => Ok(Marketplace::Wildberries),
            "ozon" | "озон" => Ok(Marketplace::Ozon),
            _ => Err(MarketplaceParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketplaceParseError(String);

impl fmt::Display for MarketplaceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown marketplace '{}'. Valid marketplaces: wildberries, ozon", self.0)
    }
}

impl std::error::Error for MarketplaceParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketplace_parsing() {
        assert_eq!(Marketplace::from_str("wildberries").unwrap(), Marketplace::Wildberries);
        assert_eq!(Marketplace::from_str("WB").unwrap(), Marketplace::Wildberries);
        assert_eq!(Marketplace::from_str(" ozon ").unwrap(), Marketplace::Ozon);
        assert_eq!(Marketplace::from_str("Озон").unwrap(), Marketplace::Ozon);

        let err = Marketplace::from_str("amazon").unwrap_err();
        assert!(err.to_string().contains("Unknown marketplace 'amazon'"));
    }

    #[test]
    fn test_display_roundtrip() {
        for marketplace in Marketplace::all() {
            let parsed: Marketplace = marketplace.to_string().parse().unwrap();
            assert_eq!(&parsed, marketplace);
        }
    }

    #[test]
    fn test_product_url() {
        assert_eq!(
            Marketplace::Wildberries.product_url("123456"),
            "https://www.wildberries.ru/catalog/123456/detail.aspx"
        );
        assert_eq!(Marketplace::Ozon.product_url("987"), "https://www.ozon.ru/product/987/");
    }

    #[test]
    fn test_wildberries_search_link() {
        let link = Marketplace::Wildberries.search_link("наушники беспроводные", Some(4.7));
        assert!(link.starts_with("https://www.wildberries.ru/catalog/0/search.aspx?search="));
        assert!(link.contains("%D0%BD%D0%B0%D1%83%D1%88%D0%BD%D0%B8%D0%BA%D0%B8%20"));
        assert!(link.contains("&sort=popular"));
        assert!(link.ends_with("&rating=4.7"));

        let link = Marketplace::Wildberries.search_link("socks", None);
        assert!(!link.contains("rating"));
    }

    #[test]
    fn test_ozon_search_link_ignores_rating() {
        let link = Marketplace::Ozon.search_link("socks", Some(4.9));
        assert_eq!(link, "https://www.ozon.ru/search/?text=socks&sorting=rating");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Marketplace::Ozon).unwrap();
        assert_eq!(json, "\"ozon\"");
        let parsed: Marketplace = serde_json::from_str("\"wildberries\"").unwrap();
        assert_eq!(parsed, Marketplace::Wildberries);
    }
}
