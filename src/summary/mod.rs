//! Stat-card aggregates over a base collection

pub mod aggregator;

pub use aggregator::{
    AggregateSpec, Reducer, Summary, SummaryAggregator, SummaryValue, category_counts, summarize,
    summarize_with,
};
