//! Marketplace-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod marketplaces;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::MarketClient;
pub use marketplaces::Marketplace;
pub use models::{Candidate, Product};
