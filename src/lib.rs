//! A Rust library for filtering, searching, sorting and summarizing
//! in-memory record collections driven by per-collection schemas.

extern crate self as record_query;

pub mod actions;
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod query;
pub mod record;
pub mod schema;
pub mod screen;
pub mod screens;
pub mod sort;
pub mod summary;

// Re-export the most common types for easier use
// Core types
pub use config::{QueryConfig, TextCollation};
pub use error::{ActionError, QueryError, Result};
pub use record::{DynamicRecord, FieldSource, Record, load_records, parse_records};
pub use schema::{
    CollectionSchema, FieldDefinition, FieldMap, FieldType, FieldValue, ToFieldValue,
};

// Derive macros
pub use record_query_macros::{FieldSource, Record};

// Query pipeline
pub use filter::{Expr, FilterSet, FilterValue, Predicate, SearchField, TextSearch, field};
pub use query::{Criteria, Page, PageRequest, PreparedQuery, QueryPipeline, View};
pub use sort::{Comparator, SortDirection, SortSpec};
pub use summary::{AggregateSpec, Reducer, Summary, SummaryValue, category_counts, summarize};

// Collections and actions
pub use actions::{ActionGateway, ActionRequest, Actor, LocalGateway, Review, Reviewable};
pub use collection::RecordCollection;
pub use export::export_json;
pub use screen::Screen;
