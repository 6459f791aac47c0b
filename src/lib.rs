//! market-scout - Telegram shopping assistant for Russian marketplaces
//!
//! Searches Wildberries or Ozon for a free-text query and answers with at
//! most five products, ranked by review count and then price.

pub mod bot;
pub mod commands;
pub mod config;
pub mod filters;
pub mod format;
pub mod health;
pub mod market;
pub mod query;
pub mod ranking;
pub mod sources;
pub mod store;

pub use config::Config;
pub use market::{Candidate, Marketplace, Product};
pub use query::{Query, QueryError};
pub use ranking::{rank, MAX_RESULTS};
