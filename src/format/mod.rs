//! Output formatting for ranked products (table, JSON, markdown).

use crate::config::OutputFormat;
use crate::market::models::{group_thousands, truncate_name};
use crate::market::Product;

const TABLE_NAME_CHARS: usize = 50;
const MARKDOWN_NAME_CHARS: usize = 40;

/// Formats products for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats multiple products.
    pub fn format_products(&self, products: &[Product]) -> String {
        if products.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_products(products),
            OutputFormat::Table => self.table_products(products),
            OutputFormat::Markdown => self.markdown_products(products),
        }
    }

    /// Formats the storefront search link shown under the results.
    pub fn format_link(&self, link: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::json!({ "search_link": link }).to_string()
            }
            OutputFormat::Table => format!("Search page: {}", link),
            OutputFormat::Markdown => format!("[Open search page]({})", link),
        }
    }

    fn json_products(&self, products: &[Product]) -> String {
        serde_json::to_string_pretty(products).unwrap_or_else(|_| "[]".to_string())
    }

    fn table_products(&self, products: &[Product]) -> String {
        let rank_width = 3;
        let price_width = 10;
        let reviews_width = 8;
        let rating_width = 6;
        let name_width = TABLE_NAME_CHARS;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<rank_width$}  {:>price_width$}  {:>reviews_width$}  {:>rating_width$}  {}",
            "#", "Price ₽", "Reviews", "Rating", "Name"
        ));
        lines.push(format!(
            "{:-<rank_width$}  {:-<price_width$}  {:-<reviews_width$}  {:-<rating_width$}  {:-<name_width$}",
            "", "", "", "", ""
        ));

        for (idx, product) in products.iter().enumerate() {
            let rating_str = match product.rating {
                Some(r) => format!("{:.1}", r),
                None => "N/A".to_string(),
            };

            lines.push(format!(
                "{:<rank_width$}  {:>price_width$}  {:>reviews_width$}  {:>rating_width$}  {}",
                idx + 1,
                group_thousands(product.price),
                product.review_count,
                rating_str,
                truncate_name(&product.name, name_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", products.len()));

        lines.join("\n")
    }

    fn markdown_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Price | Reviews | Rating | Name |".to_string());
        lines.push("|---|-------|---------|--------|------|".to_string());

        for (idx, product) in products.iter().enumerate() {
            let rating_str = match product.rating {
                Some(r) => format!("{:.1}", r),
                None => "N/A".to_string(),
            };

            // pipes would break the table row
            let name = truncate_name(&product.name, MARKDOWN_NAME_CHARS).replace('|', "/");

            lines.push(format!(
                "| {} | {} ₽ | {} | {} | [{}]({}) |",
                idx + 1,
                group_thousands(product.price),
                product.review_count,
                rating_str,
                name,
                product.link
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", products.len()));

        lines.join("\n")
    }
}
