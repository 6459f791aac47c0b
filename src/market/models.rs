//! Data models for marketplace candidates and ranked products.

use crate::market::marketplaces::Marketplace;
use serde::{Deserialize, Serialize};

/// Maximum number of characters of a product name shown to users.
pub const DISPLAY_NAME_CHARS: usize = 60;

/// A raw record returned by a source, before filtering and ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Marketplace product identifier
    pub id: String,
    /// Product name as reported by the source
    pub name: String,
    /// Price in whole currency units, if the source reported one
    pub price: Option<u64>,
    /// Star rating (0.0 - 5.0)
    pub rating: Option<f32>,
    /// Number of reviews
    pub review_count: Option<u32>,
    /// Product page URL
    pub link: String,
    /// Marketplace the record came from
    pub marketplace: Marketplace,
}

impl Candidate {
    /// Creates a candidate with only the identifying fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, marketplace: Marketplace) -> Self {
        let id = id.into();
        Self {
            link: marketplace.product_url(&id),
            id,
            name: name.into(),
            price: None,
            rating: None,
            review_count: None,
            marketplace,
        }
    }

    /// Sets the price.
    pub fn with_price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the review count.
    pub fn with_reviews(mut self, count: u32) -> Self {
        self.review_count = Some(count);
        self
    }

    /// Sets the star rating.
    pub fn with_rating(mut self, stars: f32) -> Self {
        self.rating = Some(stars.clamp(0.0, 5.0));
        self
    }

    /// Returns the price if it is usable for ranking (present and non-zero).
    pub fn usable_price(&self) -> Option<u64> {
        self.price.filter(|p| *p > 0)
    }

    /// Returns the review count, treating unknown as zero.
    pub fn reviews(&self) -> u32 {
        self.review_count.unwrap_or(0)
    }
}

/// A ranked product surfaced to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Marketplace product identifier
    pub id: String,
    /// Display name, truncated to [`DISPLAY_NAME_CHARS`]
    pub name: String,
    /// Price in whole currency units
    pub price: u64,
    /// Number of reviews (0 when unknown)
    pub review_count: u32,
    /// Star rating if known
    pub rating: Option<f32>,
    /// Product page URL
    pub link: String,
}

impl Product {
    /// Builds a product from a candidate. Returns `None` without a usable price.
    pub fn from_candidate(candidate: Candidate) -> Option<Self> {
        let price = candidate.usable_price()?;
        Some(Self {
            review_count: candidate.reviews(),
            id: candidate.id,
            name: truncate_name(&candidate.name, DISPLAY_NAME_CHARS),
            price,
            rating: candidate.rating,
            link: candidate.link,
        })
    }
}

/// Truncates a name to `max` characters, ending with an ellipsis when cut.
pub fn truncate_name(name: &str, max: usize) -> String {
    let name = name.trim();
    if name.chars().count() <= max {
        return name.to_string();
    }

    let kept: String = name.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Formats a price with thin grouping, e.g. `12 990`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}
