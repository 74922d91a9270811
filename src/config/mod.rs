//! Configuration for `QueryPipeline`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How text values are ordered when sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCollation {
    /// Case-folded comparison, ties broken lowercase first
    #[default]
    Locale,
    /// Plain byte-wise comparison
    Ordinal,
}

/// Configuration for the `QueryPipeline`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when a page request does not name one
    pub default_page_size: usize,
    /// Upper bound applied to requested page sizes
    pub max_page_size: usize,
    /// Ordering used for text fields
    pub collation: TextCollation,
    /// Strip surrounding whitespace from search text before matching
    pub trim_search_text: bool,
    /// Emit a debug log line per executed query
    pub log_queries: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            collation: TextCollation::Locale,
            trim_search_text: true,
            log_queries: true,
        }
    }
}

impl QueryConfig {
    /// Create a new instance with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, filling unspecified keys with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the default page size
    #[must_use]
    pub const fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    /// Set the text collation
    #[must_use]
    pub const fn with_collation(mut self, collation: TextCollation) -> Self {
        self.collation = collation;
        self
    }

    /// Clamp a requested page size into `1..=max_page_size`
    #[must_use]
    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}
