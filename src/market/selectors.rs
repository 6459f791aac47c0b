//! CSS selectors for Ozon search page parsing.
//!
//! Ozon ships obfuscated class names that rotate often, so the selectors
//! lean on stable structure (product links, `data-*` attributes) first and
//! typography classes second.
//!
//! **Update process**: When parsing fails, capture HTML sample,
//! update selectors, and add a test case to `parser.rs`.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for search results pages.
pub mod search {
    use super::*;

    /// Product tile container.
    pub static TILE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "div.tile-root, \
             div[data-widget='searchResultsV2'] div[data-index]",
        )
        .unwrap()
    });

    /// Link to the product page.
    pub static PRODUCT_LINK: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a[href*='/product/']").unwrap());

    /// Product name.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span.tsBody500Medium, \
             span.tile-hover-target, \
             a[href*='/product/'] span",
        )
        .unwrap()
    });

    /// Current price.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span.tsHeadline500Medium, \
             span[class*='price']",
        )
        .unwrap()
    });

    /// Rating and review counters, e.g. "4.8" and "1 234 отзыва".
    pub static COUNTERS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "span.tsBodyMBold span, \
             div.tsBodyMBold span",
        )
        .unwrap()
    });
}

/// Selectors for detecting anti-bot pages.
pub mod errors {
    use super::*;

    /// Challenge page shown instead of results.
    pub static CHALLENGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form#challenge-form, \
             div#captcha, \
             script[src*='challenge']",
        )
        .unwrap()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let _ = &*search::TILE;
        let _ = &*search::PRODUCT_LINK;
        let _ = &*search::TITLE;
        let _ = &*search::PRICE;
        let _ = &*search::COUNTERS;
        let _ = &*errors::CHALLENGE;
    }

    #[test]
    fn test_basic_selector_matching() {
        let html = Html::parse_document(
            r#"<div class="tile-root">
                <a href="/product/kruzhka-123/"><span class="tsBody500Medium">Кружка</span></a>
            </div>"#,
        );

        let tiles: Vec<_> = html.select(&search::TILE).collect();
        assert_eq!(tiles.len(), 1);

        let href = tiles[0]
            .select(&search::PRODUCT_LINK)
            .next()
            .and_then(|a| a.value().attr("href"));
        assert_eq!(href, Some("/product/kruzhka-123/"));
    }
}
