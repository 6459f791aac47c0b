//! Price filter: requires a usable price, optionally within a range.

use super::Filter;
use crate::market::Candidate;

/// Filters candidates by price.
///
/// Candidates without a usable price never pass, with or without bounds.
pub struct PriceFilter {
    min: Option<u64>,
    max: Option<u64>,
}

impl PriceFilter {
    /// Creates a new price filter with optional min/max bounds.
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Creates a filter that only requires a usable price.
    pub fn required() -> Self {
        Self { min: None, max: None }
    }

    /// Creates a filter with both min and max.
    pub fn range(min: u64, max: u64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, candidate: &Candidate) -> bool {
        let Some(price) = candidate.usable_price() else {
            return false;
        };

        if let Some(min) = self.min {
            if price < min {
                return false;
            }
        }

        if let Some(max) = self.max {
            if price > max {
                return false;
            }
        }

        true
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Price: {} - {} ₽", min, max),
            (Some(min), None) => format!("Price: >= {} ₽", min),
            (None, Some(max)) => format!("Price: <= {} ₽", max),
            (None, None) => "Price: required".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Marketplace;

    fn make_candidate(price: Option<u64>) -> Candidate {
        let mut candidate = Candidate::new("1", "Товар", Marketplace::Wildberries);
        candidate.price = price;
        candidate
    }

    #[test]
    fn test_required_price() {
        let filter = PriceFilter::required();

        assert!(filter.matches(&make_candidate(Some(1))));
        assert!(!filter.matches(&make_candidate(None)));
        assert!(!filter.matches(&make_candidate(Some(0))));
    }

    #[test]
    fn test_price_range() {
        let filter = PriceFilter::range(1000, 3000);

        assert!(!filter.matches(&make_candidate(Some(999))));
        assert!(filter.matches(&make_candidate(Some(1000))));
        assert!(filter.matches(&make_candidate(Some(3000))));
        assert!(!filter.matches(&make_candidate(Some(3001))));
        assert!(!filter.matches(&make_candidate(None)));
    }

    #[test]
    fn test_price_max_only() {
        let filter = PriceFilter::new(None, Some(3000));
        assert!(filter.matches(&make_candidate(Some(10))));
        assert!(!filter.matches(&make_candidate(Some(5000))));
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(PriceFilter::range(1, 2).description(), "Price: 1 - 2 ₽");
        assert_eq!(PriceFilter::new(Some(5), None).description(), "Price: >= 5 ₽");
        assert_eq!(PriceFilter::new(None, Some(9)).description(), "Price: <= 9 ₽");
        assert_eq!(PriceFilter::required().description(), "Price: required");
    }
}
