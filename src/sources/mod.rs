//! Source adapters: one outbound request per adapter, tried in order.
//!
//! Each adapter reports a typed [`SourceOutcome`]; [`SourceChain`] walks the
//! adapters and stops at the first one that finds candidates.

pub mod ozon;
pub mod wildberries;

use crate::config::Config;
use crate::market::{Candidate, MarketClient, Marketplace};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use ozon::OzonSource;
pub use wildberries::WildberriesSource;

/// Why a single source could not produce candidates.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("blocked by marketplace (status {0})")]
    Blocked(u16),
    #[error("anti-bot challenge page returned")]
    Challenge,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("response could not be parsed: {0}")]
    Malformed(String),
}

impl SourceError {
    /// True when the source could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, SourceError::Transport(_) | SourceError::Timeout)
    }
}

/// Trait for marketplace search sources - enables mocking for tests.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short identifier used in logs and failure reports.
    fn name(&self) -> &str;

    /// Marketplace this source searches.
    fn marketplace(&self) -> Marketplace;

    /// Issues one request for the query and returns the raw candidates.
    async fn fetch(&self, query: &str) -> Result<Vec<Candidate>, SourceError>;
}

/// Outcome of asking a single source.
#[derive(Debug)]
pub enum SourceOutcome {
    /// The source answered with at least one candidate.
    Found(Vec<Candidate>),
    /// The source answered, but with nothing.
    Empty,
    /// The source could not be used.
    Failed(SourceError),
}

impl From<Result<Vec<Candidate>, SourceError>> for SourceOutcome {
    fn from(result: Result<Vec<Candidate>, SourceError>) -> Self {
        match result {
            Ok(candidates) if candidates.is_empty() => SourceOutcome::Empty,
            Ok(candidates) => SourceOutcome::Found(candidates),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

/// A failed attempt, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

/// Combined outcome of walking the chain.
#[derive(Debug)]
pub enum ChainOutcome {
    /// A source found candidates.
    Found { source: String, candidates: Vec<Candidate> },
    /// At least one source was reachable and none found anything.
    Empty,
    /// Every source failed.
    Failed(Vec<SourceFailure>),
}

/// Ordered list of sources tried in sequence.
pub struct SourceChain {
    sources: Vec<Arc<dyn Source>>,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl SourceChain {
    /// Creates an empty chain with no pause between sources.
    pub fn new() -> Self {
        Self { sources: Vec::new(), delay_ms: 0, delay_jitter_ms: 0 }
    }

    /// Builds the default chain for the configured marketplace.
    pub fn for_config(config: &Config, client: Arc<MarketClient>) -> Self {
        let mut chain = Self::new().with_delay(config.delay_ms, config.delay_jitter_ms);

        match config.marketplace {
            Marketplace::Wildberries => {
                for version in wildberries::API_VERSIONS {
                    chain.add(WildberriesSource::new(client.clone(), version));
                }
            }
            Marketplace::Ozon => {
                chain.add(OzonSource::new(client));
            }
        }

        chain
    }

    /// Sets the pause taken before falling back to the next source.
    pub fn with_delay(mut self, delay_ms: u64, jitter_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self.delay_jitter_ms = jitter_ms;
        self
    }

    /// Appends a source to the chain.
    pub fn add(&mut self, source: impl Source + 'static) -> &mut Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are configured.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns source names in the order they are tried.
    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Asks each source in order until one finds candidates.
    pub async fn search(&self, query: &str) -> ChainOutcome {
        let mut failures = Vec::new();
        let mut reachable = false;

        for (idx, source) in self.sources.iter().enumerate() {
            if idx > 0 {
                self.pause().await;
            }

            debug!("Trying source {} ({})", source.name(), source.marketplace());

            match SourceOutcome::from(source.fetch(query).await) {
                SourceOutcome::Found(candidates) => {
                    info!("Source {} returned {} candidates", source.name(), candidates.len());
                    return ChainOutcome::Found { source: source.name().to_string(), candidates };
                }
                SourceOutcome::Empty => {
                    debug!("Source {} returned nothing", source.name());
                    reachable = true;
                }
                SourceOutcome::Failed(error) => {
                    warn!("Source {} failed: {}", source.name(), error);
                    failures.push(SourceFailure { source: source.name().to_string(), error });
                }
            }
        }

        if reachable {
            ChainOutcome::Empty
        } else {
            ChainOutcome::Failed(failures)
        }
    }

    async fn pause(&self) {
        if self.delay_ms == 0 && self.delay_jitter_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms before next source", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

impl Default for SourceChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scripted source for tests.
    pub struct MockSource {
        pub name: String,
        pub result: Result<Vec<Candidate>, SourceError>,
        pub calls: Arc<AtomicU32>,
    }

    impl MockSource {
        pub fn found(name: &str, candidates: Vec<Candidate>) -> Self {
            Self { name: name.to_string(), result: Ok(candidates), calls: Arc::default() }
        }

        pub fn empty(name: &str) -> Self {
            Self::found(name, Vec::new())
        }

        pub fn failing(name: &str, error: SourceError) -> Self {
            Self { name: name.to_string(), result: Err(error), calls: Arc::default() }
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Source for MockSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn marketplace(&self) -> Marketplace {
            Marketplace::Wildberries
        }

        async fn fetch(&self, _query: &str) -> Result<Vec<Candidate>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }
}
