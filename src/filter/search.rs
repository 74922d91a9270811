//! Free-text search across declared fields
//!
//! A record matches when any declared field, or the named field of any item
//! in a declared nested collection, contains the query ignoring case.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::filter::RecordFilter;
use crate::record::FieldSource;
use crate::schema::FieldValue;

/// A field read by free-text search
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    /// A text or enum field of the record
    Field(String),
    /// A text field of every item of a nested collection
    Nested {
        /// The collection field on the record
        collection: String,
        /// The field on each item
        field: String,
    },
}

impl SearchField {
    /// Search a field of the record
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Search a field of each nested item
    pub fn nested(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Nested {
            collection: collection.into(),
            field: field.into(),
        }
    }

    /// The record-level field this search reads
    #[must_use]
    pub fn root(&self) -> &str {
        match self {
            Self::Field(name) => name,
            Self::Nested { collection, .. } => collection,
        }
    }

    fn contains(&self, source: &dyn FieldSource, needle: &str) -> bool {
        match self {
            Self::Field(name) => source
                .field(name)
                .is_some_and(|value| text_contains(&value, needle)),
            Self::Nested { collection, field } => match source.field(collection) {
                Some(FieldValue::Collection(items)) => items.iter().any(|item| {
                    item.get(field.as_str())
                        .is_some_and(|value| text_contains(value, needle))
                }),
                _ => false,
            },
        }
    }
}

fn text_contains(value: &FieldValue, needle: &str) -> bool {
    value
        .as_str()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}

/// A case-insensitive substring search over a fixed list of fields
#[derive(Debug, Clone)]
pub struct TextSearch {
    needle: String,
    fields: SmallVec<[SearchField; 4]>,
}

impl TextSearch {
    /// Create a search for `query` over `fields`
    #[must_use]
    pub fn new(query: &str, fields: &[SearchField]) -> Self {
        Self {
            needle: query.to_lowercase(),
            fields: fields.iter().cloned().collect(),
        }
    }

    /// The normalized query
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// An empty query matches every record
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Check if a record matches
    #[must_use]
    pub fn matches(&self, source: &dyn FieldSource) -> bool {
        self.is_empty()
            || self
                .fields
                .iter()
                .any(|field| field.contains(source, &self.needle))
    }
}

impl RecordFilter for TextSearch {
    fn matches(&self, record: &dyn FieldSource) -> bool {
        Self::matches(self, record)
    }

    fn required_fields(&self) -> HashSet<String> {
        self.fields.iter().map(|f| f.root().to_string()).collect()
    }
}
