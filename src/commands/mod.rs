//! CLI command implementations.

pub mod link;
pub mod search;

pub use link::LinkCommand;
pub use search::{SearchCommand, SearchError, SearchOutcome};
