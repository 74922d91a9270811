//! User-controlled query parameters

use serde::{Deserialize, Serialize};

use crate::filter::{FilterSet, FilterValue};
use crate::query::page::PageRequest;
use crate::sort::{SortDirection, SortSpec};

/// Search text, filters, sort and page held by a screen
///
/// Criteria never touch records; they only parameterize a derived view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    /// Free text matched against the searchable fields
    pub search_text: String,
    /// Field constraints
    pub filters: FilterSet,
    /// Field to order by, the schema default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    /// Direction of the order
    ///
    /// Without a `sort_key` this flips the schema's default sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    /// Page to cut from the view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRequest>,
}

impl Criteria {
    /// Create empty criteria that match every record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Constrain a field
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.set(field, value);
        self
    }

    /// Order by a field
    #[must_use]
    pub fn sort_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = Some(direction);
        self
    }

    /// The sort to apply, falling back to `default` for missing parts
    #[must_use]
    pub fn sort_spec(&self, default: Option<&SortSpec>) -> Option<SortSpec> {
        match (&self.sort_key, default) {
            (Some(key), _) => Some(SortSpec::new(
                key.clone(),
                self.sort_direction.unwrap_or_default(),
            )),
            (None, Some(default)) => Some(SortSpec::new(
                default.key.clone(),
                self.sort_direction.unwrap_or(default.direction),
            )),
            (None, None) => None,
        }
    }

    /// Request one page of the view
    #[must_use]
    pub const fn page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }
}
