//! Query pipeline
//!
//! Composes text search, field filters and sorting into one deterministic
//! transformation from a base collection to an ordered view. Criteria are
//! validated once in [`QueryPipeline::prepare`]; applying the prepared query
//! cannot fail.

use std::collections::BTreeMap;

use log::debug;

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::filter::{AndFilter, Predicate, RecordFilter, TextSearch};
use crate::query::criteria::Criteria;
use crate::query::page::{Page, PageRequest};
use crate::record::FieldSource;
use crate::schema::CollectionSchema;
use crate::sort::Comparator;
use crate::summary::category_counts;

/// Runs criteria against collections described by one schema
#[derive(Debug, Clone)]
pub struct QueryPipeline<'s> {
    schema: &'s CollectionSchema,
    config: QueryConfig,
}

impl<'s> QueryPipeline<'s> {
    /// Create a pipeline with the default configuration
    #[must_use]
    pub fn new(schema: &'s CollectionSchema) -> Self {
        Self::with_config(schema, QueryConfig::default())
    }

    /// Create a pipeline with a custom configuration
    #[must_use]
    pub const fn with_config(schema: &'s CollectionSchema, config: QueryConfig) -> Self {
        Self { schema, config }
    }

    /// The schema queries are validated against
    #[must_use]
    pub const fn schema(&self) -> &'s CollectionSchema {
        self.schema
    }

    /// The pipeline configuration
    #[must_use]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Validate criteria and compile them into a reusable query
    ///
    /// # Errors
    /// `InvalidSortKey`, `InvalidFilterField` or `InvalidFilterValue` when
    /// the criteria do not fit the schema.
    pub fn prepare(&self, criteria: &Criteria) -> Result<PreparedQuery> {
        let text = if self.config.trim_search_text {
            criteria.search_text.trim()
        } else {
            criteria.search_text.as_str()
        };
        let search = TextSearch::new(text, self.schema.searchable());
        let predicate = Predicate::build(self.schema, &criteria.filters)?;

        let comparator = criteria
            .sort_spec(self.schema.default_sort())
            .map(|spec| Comparator::build(self.schema, &spec, self.config.collation))
            .transpose()?;

        Ok(PreparedQuery {
            collection: self.schema.name().to_string(),
            search,
            predicate,
            comparator,
            page: criteria.page,
            config: self.config.clone(),
        })
    }

    /// Prepare and apply criteria in one step
    pub fn run<'a, R: FieldSource>(
        &self,
        records: &'a [R],
        criteria: &Criteria,
    ) -> Result<View<'a, R>> {
        Ok(self.prepare(criteria)?.apply(records))
    }

    /// Prepare and apply criteria, then cut the requested page
    ///
    /// Criteria without a page request yield the first page.
    pub fn run_page<'a, R: FieldSource>(
        &self,
        records: &'a [R],
        criteria: &Criteria,
    ) -> Result<Page<&'a R>> {
        Ok(self.prepare(criteria)?.apply_page(records))
    }

    /// Count base records per value of a filterable field
    ///
    /// Used for the badges next to filter options, so it ignores the
    /// current criteria.
    pub fn facet_counts<R: FieldSource>(
        &self,
        records: &[R],
        field: &str,
    ) -> Result<BTreeMap<String, usize>> {
        if !self.schema.is_filterable(field) {
            return Err(QueryError::InvalidFilterField {
                collection: self.schema.name().to_string(),
                field: field.to_string(),
            });
        }
        Ok(category_counts(records, field))
    }
}

/// Criteria compiled against a schema
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    collection: String,
    search: TextSearch,
    predicate: Predicate,
    comparator: Option<Comparator>,
    page: Option<PageRequest>,
    config: QueryConfig,
}

impl PreparedQuery {
    /// The compiled field filters
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The compiled text search
    #[must_use]
    pub const fn search(&self) -> &TextSearch {
        &self.search
    }

    /// The comparator, if the view is sorted
    #[must_use]
    pub const fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Search and field filters combined, in evaluation order
    #[must_use]
    pub fn filter(&self) -> AndFilter<'_> {
        AndFilter::new(vec![&self.search as &dyn RecordFilter, &self.predicate])
    }

    /// Check if a single record passes search and filters
    #[must_use]
    pub fn matches(&self, record: &dyn FieldSource) -> bool {
        self.filter().matches(record)
    }

    /// Derive the ordered view of a base collection
    ///
    /// Search runs first, then field filters, then a stable sort. The base
    /// collection is never modified.
    pub fn apply<'a, R: FieldSource>(&self, records: &'a [R]) -> View<'a, R> {
        let filter = self.filter();
        let mut matched: Vec<&'a R> = records
            .iter()
            .filter(|record| filter.matches(*record))
            .collect();

        if let Some(comparator) = &self.comparator {
            comparator.sort(&mut matched);
        }

        if self.config.log_queries {
            debug!(
                "Query on '{}' matched {} of {} records (search: {:?}, sort: {:?})",
                self.collection,
                matched.len(),
                records.len(),
                self.search.needle(),
                self.comparator
                    .as_ref()
                    .map(|c| format!("{} {}", c.key(), c.direction()))
            );
        }

        View {
            records: matched,
            total: records.len(),
        }
    }

    /// Derive the view and cut the requested page
    pub fn apply_page<'a, R: FieldSource>(&self, records: &'a [R]) -> Page<&'a R> {
        let request = self.page.unwrap_or_default();
        self.apply(records).paginate(request, &self.config)
    }
}

/// An ordered, derived selection of base records
///
/// A view borrows from the collection it was computed from and is never
/// updated; recompute it when the collection or criteria change.
#[derive(Debug)]
pub struct View<'a, R> {
    records: Vec<&'a R>,
    total: usize,
}

impl<R> Clone for View<'_, R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            total: self.total,
        }
    }
}

impl<'a, R> View<'a, R> {
    /// Records in view order
    #[must_use]
    pub fn records(&self) -> &[&'a R] {
        &self.records
    }

    /// Iterate over records in view order
    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.records.iter().copied()
    }

    /// Number of records in the view
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the base collection the view was derived from
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Take the records out of the view
    #[must_use]
    pub fn into_records(self) -> Vec<&'a R> {
        self.records
    }

    /// Cut one page out of the view
    ///
    /// The page size is clamped to `1..=config.max_page_size`.
    #[must_use]
    pub fn paginate(self, request: PageRequest, config: &QueryConfig) -> Page<&'a R> {
        let size = config.clamp_page_size(request.page_size);
        Page::slice(self.records, request.page, size)
    }
}

impl<'a, R> IntoIterator for View<'a, R> {
    type Item = &'a R;
    type IntoIter = std::vec::IntoIter<&'a R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
