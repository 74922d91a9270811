//! Record filtering
//!
//! This module provides the predicate builder, the free-text search matcher
//! and the expression tree they share. All of them are pure functions of a
//! single record.

use std::collections::HashSet;
use std::fmt::Debug;

use crate::record::FieldSource;

pub mod expr;
pub mod predicate;
pub mod search;

pub use expr::{Expr, FieldRef, field};
pub use predicate::{FilterSet, FilterValue, Predicate};
pub use search::{SearchField, TextSearch};

/// A pure boolean test over one record
pub trait RecordFilter: Debug {
    /// Check if the record passes
    fn matches(&self, record: &dyn FieldSource) -> bool;

    /// Returns the set of fields this filter reads
    fn required_fields(&self) -> HashSet<String>;
}

/// A filter that passes only records every inner filter passes
#[derive(Debug, Default)]
pub struct AndFilter<'a> {
    filters: Vec<&'a dyn RecordFilter>,
}

impl<'a> AndFilter<'a> {
    /// Create a new AND filter
    #[must_use]
    pub fn new(filters: Vec<&'a dyn RecordFilter>) -> Self {
        Self { filters }
    }
}

impl RecordFilter for AndFilter<'_> {
    fn matches(&self, record: &dyn FieldSource) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }

    fn required_fields(&self) -> HashSet<String> {
        self.filters
            .iter()
            .flat_map(|filter| filter.required_fields())
            .collect()
    }
}
