//! Product name filtering: length bound and denylisted substrings.

use super::Filter;
use crate::market::Candidate;

/// Names longer than this are usually keyword-stuffed listings.
pub const MAX_NAME_CHARS: usize = 150;

/// Delivery-notice boilerplate that some sources inject as fake listings.
pub const DEFAULT_DENYLIST: &[&str] = &["доставка", "доставим", "самовывоз", "курьером"];

/// Filters candidates by their display name.
pub struct TitleFilter {
    max_chars: usize,
    /// Substrings that must NOT appear in the name (lowercase).
    denylist: Vec<String>,
}

impl TitleFilter {
    /// Creates a new title filter.
    pub fn new(max_chars: usize, denylist: Vec<String>) -> Self {
        Self {
            max_chars,
            denylist: denylist
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }
}

/// Returns the built-in denylist as owned strings.
pub fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect()
}

impl Filter for TitleFilter {
    fn matches(&self, candidate: &Candidate) -> bool {
        let name = candidate.name.trim();

        if name.is_empty() || name.chars().count() > self.max_chars {
            return false;
        }

        let name = name.to_lowercase();
        !self.denylist.iter().any(|needle| name.contains(needle.as_str()))
    }

    fn description(&self) -> String {
        if self.denylist.is_empty() {
            format!("Name: <= {} chars", self.max_chars)
        } else {
            format!("Name: <= {} chars, without: {}", self.max_chars, self.denylist.join(", "))
        }
    }
}
