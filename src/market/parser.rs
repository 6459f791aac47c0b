//! Parsers turning raw marketplace responses into candidate records.
//!
//! Response shapes drift between API versions and page layouts, so both
//! parsers skip records they cannot read instead of failing the whole batch.
//! A body that cannot be read at all is reported as [`SourceError::Malformed`].

use crate::market::marketplaces::Marketplace;
use crate::market::models::Candidate;
use crate::market::selectors::{errors, search};
use crate::sources::SourceError;
use scraper::{ElementRef, Html};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

/// Top-level Wildberries search response. Older API versions nest products
/// under `data`, newer ones put them at the top level.
#[derive(Debug, Deserialize)]
struct WbResponse {
    #[serde(default)]
    data: Option<WbData>,
    #[serde(default)]
    products: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct WbData {
    #[serde(default)]
    products: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WbProduct {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    sale_price_u: Option<u64>,
    #[serde(default)]
    sizes: Vec<WbSize>,
    #[serde(default)]
    feedbacks: Option<u32>,
    #[serde(default)]
    nm_feedbacks: Option<u32>,
    #[serde(default)]
    review_rating: Option<f32>,
    #[serde(default)]
    rating: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct WbSize {
    #[serde(default)]
    price: Option<WbSizePrice>,
}

#[derive(Debug, Deserialize)]
struct WbSizePrice {
    #[serde(default)]
    product: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
}

impl WbProduct {
    /// Price in kopecks, preferring the sale price.
    fn price_kopecks(&self) -> Option<u64> {
        self.sale_price_u.filter(|p| *p > 0).or_else(|| {
            self.sizes
                .iter()
                .filter_map(|s| s.price.as_ref())
                .find_map(|p| p.product.or(p.total).filter(|v| *v > 0))
        })
    }

    fn into_candidate(self) -> Candidate {
        let price = self.price_kopecks().map(|k| k / 100 + u64::from(k % 100 >= 50));
        let review_count = self.feedbacks.or(self.nm_feedbacks);
        let rating = self.review_rating.or(self.rating).filter(|r| *r > 0.0);

        let name = match &self.brand {
            Some(brand) if !brand.is_empty() && !self.name.contains(brand.as_str()) => {
                format!("{} / {}", brand, self.name.trim())
            }
            _ => self.name.trim().to_string(),
        };

        let mut candidate = Candidate::new(self.id.to_string(), name, Marketplace::Wildberries);
        candidate.price = price;
        candidate.review_count = review_count;
        candidate.rating = rating.map(|r| r.clamp(0.0, 5.0));
        candidate
    }
}

/// Parses a Wildberries search API response.
pub fn parse_wildberries(body: &str) -> Result<Vec<Candidate>, SourceError> {
    let response: WbResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;

    let raw = match (response.data, response.products) {
        (_, Some(products)) if !products.is_empty() => products,
        (Some(data), _) => data.products,
        (None, products) => products.unwrap_or_default(),
    };

    let total = raw.len();
    let candidates: Vec<Candidate> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<WbProduct>(value) {
            Ok(product) => Some(product.into_candidate()),
            Err(e) => {
                trace!("Skipping unreadable Wildberries record: {}", e);
                None
            }
        })
        .collect();

    debug!("Parsed {} of {} Wildberries records", candidates.len(), total);
    Ok(candidates)
}

/// Parses an Ozon search results page.
pub fn parse_ozon(html: &str) -> Result<Vec<Candidate>, SourceError> {
    let document = Html::parse_document(html);

    if document.select(&errors::CHALLENGE).next().is_some() {
        return Err(SourceError::Challenge);
    }

    let candidates: Vec<Candidate> =
        document.select(&search::TILE).filter_map(parse_ozon_tile).collect();

    debug!("Parsed {} Ozon tiles", candidates.len());
    Ok(candidates)
}

/// Parses a single Ozon product tile. Tiles without a product link are ads
/// or placeholders and are skipped.
fn parse_ozon_tile(tile: ElementRef) -> Option<Candidate> {
    let href = tile.select(&search::PRODUCT_LINK).find_map(|a| a.value().attr("href"))?;
    let id = ozon_id_from_href(href)?;

    let name = tile
        .select(&search::TITLE)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
        .unwrap_or_default();

    let price = tile
        .select(&search::PRICE)
        .find_map(|e| parse_rub_amount(&e.text().collect::<String>()));

    let mut rating = None;
    let mut review_count = None;
    for counter in tile.select(&search::COUNTERS) {
        let text = counter.text().collect::<String>();
        let text = text.trim();
        if text.contains("отзыв") {
            review_count =
                review_count.or_else(|| parse_rub_amount(text).and_then(|n| u32::try_from(n).ok()));
        } else if let Ok(stars) = text.replace(',', ".").parse::<f32>() {
            if (0.0..=5.0).contains(&stars) {
                rating = rating.or(Some(stars));
            }
        }
    }

    let mut candidate = Candidate::new(id, name, Marketplace::Ozon);
    candidate.price = price;
    candidate.rating = rating;
    candidate.review_count = review_count;
    Some(candidate)
}

/// Extracts the numeric product id from links like
/// `/product/kruzhka-keramicheskaya-123456789/?asb=...`.
pub fn ozon_id_from_href(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next()?;
    let slug = path.trim_end_matches('/').rsplit('/').next()?;
    let id = slug.rsplit('-').next()?;

    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id.to_string())
    } else {
        None
    }
}

/// Parses an amount such as "1 299 ₽" or "12 345" (with narrow or
/// non-breaking spaces) into whole units. Fractions after a comma are dropped.
pub fn parse_rub_amount(text: &str) -> Option<u64> {
    let whole = text.split([',', '.']).next()?;
    let digits: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
