//! Candidate filtering system with composable filters.

pub mod price;
pub mod rating;
pub mod title;

use crate::config::Config;
use crate::market::Candidate;

pub use price::PriceFilter;
pub use rating::RatingFilter;
pub use title::TitleFilter;

/// Trait for filtering candidates.
pub trait Filter: Send + Sync {
    /// Returns true if the candidate passes the filter.
    fn matches(&self, candidate: &Candidate) -> bool;

    /// Returns a description of this filter.
    fn description(&self) -> String;
}

/// A chain of filters that must all pass.
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    /// Creates an empty filter chain.
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Builds the ranking policy from configuration: a usable price and a
    /// clean, bounded name are always required; the rest is optional.
    pub fn from_config(config: &Config) -> Self {
        FilterChainBuilder::new()
            .price(config.min_price, config.max_price)
            .title(title::MAX_NAME_CHARS, config.denylist.clone())
            .min_rating(config.min_rating)
            .build()
    }

    /// Adds a filter to the chain.
    pub fn add(&mut self, filter: impl Filter + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Checks if a candidate passes all filters.
    pub fn matches(&self, candidate: &Candidate) -> bool {
        self.filters.iter().all(|f| f.matches(candidate))
    }

    /// Filters a collection of candidates.
    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().filter(|c| self.matches(c)).collect()
    }

    /// Returns true if no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns descriptions of all filters.
    pub fn descriptions(&self) -> Vec<String> {
        self.filters.iter().map(|f| f.description()).collect()
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a FilterChain.
pub struct FilterChainBuilder {
    chain: FilterChain,
}

impl FilterChainBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self { chain: FilterChain::new() }
    }

    /// Requires a usable price, optionally bounded.
    pub fn price(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.chain.add(PriceFilter::new(min, max));
        self
    }

    /// Bounds name length and rejects denylisted substrings.
    pub fn title(mut self, max_chars: usize, denylist: Vec<String>) -> Self {
        self.chain.add(TitleFilter::new(max_chars, denylist));
        self
    }

    /// Adds a minimum rating filter.
    pub fn min_rating(mut self, min: Option<f32>) -> Self {
        if let Some(min) = min {
            self.chain.add(RatingFilter::new(min));
        }
        self
    }

    /// Builds the filter chain.
    pub fn build(self) -> FilterChain {
        self.chain
    }
}

impl Default for FilterChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Marketplace;

    fn make_candidate(name: &str, price: Option<u64>, rating: Option<f32>) -> Candidate {
        let mut candidate = Candidate::new("1", name, Marketplace::Wildberries);
        candidate.price = price;
        candidate.rating = rating;
        candidate
    }

    #[test]
    fn test_filter_chain_new() {
        let chain = FilterChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_filter_chain_empty_matches_all() {
        let chain = FilterChain::default();
        assert!(chain.matches(&make_candidate("Без цены", None, None)));
    }

    #[test]
    fn test_filter_chain() {
        let mut chain = FilterChain::new();
        chain.add(PriceFilter::range(100, 500));
        chain.add(RatingFilter::new(4.5));

        assert_eq!(chain.len(), 2);
        assert!(chain.matches(&make_candidate("Кружка", Some(300), Some(4.8))));
        assert!(!chain.matches(&make_candidate("Кружка", Some(50), Some(4.8))));
        assert!(!chain.matches(&make_candidate("Кружка", Some(300), Some(4.0))));
        assert!(!chain.matches(&make_candidate("Кружка", None, Some(4.8))));
    }

    #[test]
    fn test_filter_chain_apply() {
        let mut chain = FilterChain::new();
        chain.add(PriceFilter::required());

        let candidates = vec![
            make_candidate("a", Some(10), None),
            make_candidate("b", None, None),
            make_candidate("c", Some(30), None),
        ];

        let filtered = chain.apply(candidates);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1].name, "c");
    }

    #[test]
    fn test_filter_chain_descriptions() {
        let chain = FilterChainBuilder::new()
            .price(None, Some(3000))
            .title(100, vec!["доставка".to_string()])
            .min_rating(Some(4.7))
            .build();

        let descriptions = chain.descriptions();
        assert_eq!(descriptions.len(), 3);
        assert!(descriptions[0].contains("Price"));
        assert!(descriptions[1].contains("Name"));
        assert!(descriptions[2].contains("Rating"));
    }

    #[test]
    fn test_builder_skips_disabled_rating() {
        let chain = FilterChainBuilder::default().min_rating(None).build();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_from_config_defaults() {
        let chain = FilterChain::from_config(&Config::default());

        // price + title; rating is off by default
        assert_eq!(chain.len(), 2);
        assert!(chain.matches(&make_candidate("Наушники", Some(1500), None)));
        assert!(!chain.matches(&make_candidate("Наушники", None, None)));
        assert!(!chain.matches(&make_candidate("Бесплатная доставка", Some(1), None)));
    }

    #[test]
    fn test_from_config_with_presentation_filters() {
        let config = Config { min_rating: Some(4.9), max_price: Some(3000), ..Config::default() };
        let chain = FilterChain::from_config(&config);

        assert_eq!(chain.len(), 3);
        assert!(chain.matches(&make_candidate("Наушники", Some(2990), Some(4.9))));
        assert!(!chain.matches(&make_candidate("Наушники", Some(2990), Some(4.8))));
        assert!(!chain.matches(&make_candidate("Наушники", Some(3500), Some(5.0))));
    }
}
