//! Result ranking: filter, deduplicate, order, truncate.

use crate::filters::FilterChain;
use crate::market::{Candidate, Product};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

/// Hard cap on the number of results surfaced for one query.
pub const MAX_RESULTS: usize = 5;

/// Ranks raw candidates into at most [`MAX_RESULTS`] products.
///
/// Candidates failing `filters` are dropped, duplicates by product id keep
/// their first occurrence, and the rest are ordered by review count
/// (descending) then price (ascending). `limit` may lower the cap but never
/// raise it.
pub fn rank(candidates: Vec<Candidate>, filters: &FilterChain, limit: usize) -> Vec<Product> {
    let total = candidates.len();
    let mut seen = HashSet::new();

    let mut products: Vec<Product> = filters
        .apply(candidates)
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .filter_map(Product::from_candidate)
        .collect();

    products.sort_by_key(|p| (Reverse(p.review_count), p.price));
    products.truncate(limit.min(MAX_RESULTS));

    debug!("Ranked {} of {} candidates", products.len(), total);
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::market::Marketplace;

    fn candidate(id: &str, price: Option<u64>, reviews: Option<u32>) -> Candidate {
        let mut c = Candidate::new(id, format!("Товар {}", id), Marketplace::Wildberries);
        c.price = price;
        c.review_count = reviews;
        c
    }

    fn policy() -> FilterChain {
        FilterChain::from_config(&Config::default())
    }

    #[test]
    fn test_reviews_desc_then_price_asc() {
        let candidates = vec![
            candidate("a", Some(1000), Some(5)),
            candidate("b", Some(500), Some(5)),
            candidate("c", Some(2000), Some(50)),
        ];

        let ranked = rank(candidates, &policy(), MAX_RESULTS);
        let order: Vec<(u64, u32)> = ranked.iter().map(|p| (p.price, p.review_count)).collect();
        assert_eq!(order, vec![(2000, 50), (500, 5), (1000, 5)]);
    }

    #[test]
    fn test_never_more_than_five() {
        let candidates: Vec<Candidate> =
            (0..20).map(|i| candidate(&i.to_string(), Some(100 + i), Some(i as u32))).collect();

        assert_eq!(rank(candidates.clone(), &policy(), 100).len(), MAX_RESULTS);
        assert_eq!(rank(candidates, &policy(), 3).len(), 3);
    }

    #[test]
    fn test_missing_price_excluded() {
        let candidates = vec![
            candidate("priced", Some(100), Some(1)),
            candidate("unpriced", None, Some(1000)),
            candidate("free", Some(0), Some(1000)),
        ];

        let ranked = rank(candidates, &policy(), MAX_RESULTS);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "priced");
    }

    #[test]
    fn test_unknown_reviews_rank_last() {
        let candidates =
            vec![candidate("none", Some(10), None), candidate("some", Some(999), Some(1))];

        let ranked = rank(candidates, &policy(), MAX_RESULTS);
        assert_eq!(ranked[0].id, "some");
        assert_eq!(ranked[1].review_count, 0);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let candidates = vec![
            candidate("dup", Some(300), Some(10)),
            candidate("other", Some(200), Some(1)),
            candidate("dup", Some(100), Some(99)),
        ];

        let ranked = rank(candidates, &policy(), MAX_RESULTS);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "dup");
        assert_eq!(ranked[0].price, 300);
    }

    #[test]
    fn test_filtered_duplicate_does_not_shadow_valid_one() {
        // the unpriced copy is filtered before dedup, so the priced copy survives
        let candidates = vec![candidate("x", None, Some(5)), candidate("x", Some(100), Some(5))];

        let ranked = rank(candidates, &policy(), MAX_RESULTS);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].price, 100);
    }

    #[test]
    fn test_denylisted_names_dropped() {
        let mut boilerplate = candidate("ad", Some(1), Some(1_000_000));
        boilerplate.name = "Бесплатная доставка от 1 ₽".to_string();

        let ranked = rank(vec![boilerplate, candidate("ok", Some(10), Some(1))], &policy(), 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "ok");
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), &policy(), MAX_RESULTS).is_empty());
    }
}
