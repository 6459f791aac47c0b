//! Search command implementation.

use crate::config::Config;
use crate::filters::FilterChain;
use crate::format::Formatter;
use crate::market::{MarketClient, Product};
use crate::query::{Query, QueryError};
use crate::ranking;
use crate::sources::{ChainOutcome, SourceChain, SourceFailure};
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Successful result of a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Ranked products, best first.
    Found { query: String, products: Vec<Product>, link: String },
    /// A source answered but nothing survived ranking.
    Empty { query: String, link: String },
}

impl SearchOutcome {
    /// Returns the storefront search link for the query.
    pub fn link(&self) -> &str {
        match self {
            SearchOutcome::Found { link, .. } | SearchOutcome::Empty { link, .. } => link,
        }
    }

    /// Returns the ranked products (empty for [`SearchOutcome::Empty`]).
    pub fn products(&self) -> &[Product] {
        match self {
            SearchOutcome::Found { products, .. } => products,
            SearchOutcome::Empty { .. } => &[],
        }
    }
}

/// Why a search produced no outcome.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("no source could be reached for '{query}'")]
    Unavailable { query: String, link: String, reasons: Vec<SourceFailure> },
}

/// Executes a product search.
pub struct SearchCommand {
    config: Config,
    chain: SourceChain,
    filters: FilterChain,
}

impl SearchCommand {
    /// Creates a search command backed by the configured marketplace.
    pub fn new(config: Config) -> Result<Self> {
        let client = MarketClient::new(&config).context("Failed to create HTTP client")?;
        let chain = SourceChain::for_config(&config, Arc::new(client));
        Ok(Self::with_chain(config, chain))
    }

    /// Creates a search command with a provided source chain (for testing).
    pub fn with_chain(config: Config, chain: SourceChain) -> Self {
        let filters = FilterChain::from_config(&config);
        Self { config, chain, filters }
    }

    /// Returns the configuration this command runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validates the query, asks the sources and ranks what they return.
    pub async fn run(&self, raw: &str) -> Result<SearchOutcome, SearchError> {
        let query = Query::parse(raw)?;
        let query = if self.config.refine_queries {
            let refined = query.refined();
            debug!("Refined '{}' to '{}'", query, refined);
            refined
        } else {
            query
        };

        info!("Searching {} for: {}", self.config.marketplace, query);

        if !self.filters.is_empty() {
            debug!("Active filters: {}", self.filters.descriptions().join(", "));
        }

        let link = self.config.marketplace.search_link(query.as_str(), self.config.link_rating);
        let query = query.as_str().to_string();

        match self.chain.search(&query).await {
            ChainOutcome::Found { source, candidates } => {
                let products =
                    ranking::rank(candidates, &self.filters, self.config.result_limit());

                if products.is_empty() {
                    info!("Nothing from {} survived ranking", source);
                    Ok(SearchOutcome::Empty { query, link })
                } else {
                    info!("Found {} products via {}", products.len(), source);
                    Ok(SearchOutcome::Found { query, products, link })
                }
            }
            ChainOutcome::Empty => {
                info!("No products found");
                Ok(SearchOutcome::Empty { query, link })
            }
            ChainOutcome::Failed(reasons) => {
                warn!("All {} sources failed", reasons.len());
                Err(SearchError::Unavailable { query, link, reasons })
            }
        }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, raw: &str) -> Result<String> {
        let formatter = Formatter::new(self.config.format);

        match self.run(raw).await {
            Ok(outcome) => Ok(format!(
                "{}\n\n{}",
                formatter.format_products(outcome.products()),
                formatter.format_link(outcome.link())
            )),
            Err(SearchError::Unavailable { query, link, reasons }) => {
                let reasons: Vec<String> =
                    reasons.iter().map(|f| format!("{}: {}", f.source, f.error)).collect();
                bail!(
                    "Search for '{}' failed ({}). Try manually: {}",
                    query,
                    reasons.join("; "),
                    link
                )
            }
            Err(e) => Err(e.into()),
        }
    }
}
