//! Per-screen query state
//!
//! A `Screen` owns what one dashboard screen holds: its schema, the base
//! collection and the current criteria. Views and summaries are derived on
//! demand and never cached.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::actions::{ActionGateway, Review, Reviewable, apply_review};
use crate::collection::RecordCollection;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::export::export_json;
use crate::query::{Criteria, Page, QueryPipeline, View};
use crate::record::Record;
use crate::schema::CollectionSchema;
use crate::summary::{Summary, summarize};

/// Schema, base collection and criteria of one screen
#[derive(Debug, Clone)]
pub struct Screen<R> {
    schema: CollectionSchema,
    config: QueryConfig,
    collection: RecordCollection<R>,
    criteria: Criteria,
}

impl<R: Record> Screen<R> {
    /// Create a screen over a set of records
    pub fn new(schema: CollectionSchema, records: Vec<R>) -> Result<Self> {
        Ok(Self {
            schema,
            config: QueryConfig::default(),
            collection: RecordCollection::new(records)?,
            criteria: Criteria::default(),
        })
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// The screen's schema
    #[must_use]
    pub const fn schema(&self) -> &CollectionSchema {
        &self.schema
    }

    /// The base collection
    #[must_use]
    pub const fn collection(&self) -> &RecordCollection<R> {
        &self.collection
    }

    /// The current criteria
    #[must_use]
    pub const fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    fn pipeline(&self) -> QueryPipeline<'_> {
        QueryPipeline::with_config(&self.schema, self.config.clone())
    }

    /// Replace the criteria after checking them against the schema
    ///
    /// Invalid criteria leave the current ones in place.
    pub fn set_criteria(&mut self, criteria: Criteria) -> Result<()> {
        self.pipeline().prepare(&criteria)?;
        self.criteria = criteria;
        Ok(())
    }

    /// Replace the base collection, e.g. after a reload
    pub fn set_records(&mut self, records: Vec<R>) -> Result<()> {
        self.collection = RecordCollection::new(records)?;
        Ok(())
    }

    /// Derive the current view
    pub fn view(&self) -> Result<View<'_, R>> {
        self.pipeline().run(self.collection.records(), &self.criteria)
    }

    /// Derive the requested page of the current view
    pub fn page(&self) -> Result<Page<&R>> {
        self.pipeline()
            .run_page(self.collection.records(), &self.criteria)
    }

    /// Evaluate the stat cards over the base collection
    #[must_use]
    pub fn summary(&self) -> Summary {
        summarize(&self.schema, self.collection.records())
    }

    /// Per-value counts of a filterable field over the base collection
    pub fn facets(&self, field: &str) -> Result<BTreeMap<String, usize>> {
        self.pipeline()
            .facet_counts(self.collection.records(), field)
    }

    /// Export the current view
    pub fn export(&self, fields: &[&str]) -> Result<Value> {
        let view = self.view()?;
        export_json(&self.schema, &view, fields)
    }
}

impl<R: Record + Reviewable + Clone> Screen<R> {
    /// Review one record through a gateway
    ///
    /// The status must be one of the schema's `status` tags; the gateway is
    /// not called otherwise. The collection is replaced only when the
    /// gateway accepts the action.
    pub fn review<G>(&mut self, id: &str, review: &Review, gateway: &G) -> Result<()>
    where
        G: ActionGateway + ?Sized,
    {
        review.validate(&self.schema)?;
        self.collection = apply_review(
            &self.collection,
            self.schema.name(),
            id,
            review,
            gateway,
        )?;
        Ok(())
    }
}
