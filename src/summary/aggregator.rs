//! Summary aggregator
//!
//! Evaluates stat-card aggregates over the full base collection. Current
//! search and filter criteria never influence a summary.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;
use serde::ser::SerializeMap;

use crate::error::{QueryError, Result};
use crate::filter::expr::Expr;
use crate::record::FieldSource;
use crate::schema::{CollectionSchema, FieldType};

/// How an aggregate folds the selected records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reducer {
    /// Number of selected records
    Count,
    /// Sum of a numeric field
    Sum,
    /// Mean of a numeric field over records that carry it
    Average,
    /// Percentage of all records the predicate selects
    Rate,
    /// Label of the record with the largest value of a field
    MaxBy {
        /// Field whose value names the winning record
        label_field: String,
    },
}

/// One stat-card aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSpec {
    /// Key of the result in the summary
    pub label: String,
    /// Field read by sum, average and max-by
    pub field: Option<String>,
    /// Records taken into account; all when absent
    pub filter: Option<Expr>,
    /// Fold applied to the selected records
    pub reducer: Reducer,
}

impl AggregateSpec {
    fn new(label: impl Into<String>, field: Option<String>, reducer: Reducer) -> Self {
        Self {
            label: label.into(),
            field,
            filter: None,
            reducer,
        }
    }

    /// Count records
    pub fn count(label: impl Into<String>) -> Self {
        Self::new(label, None, Reducer::Count)
    }

    /// Sum a numeric field
    pub fn sum(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(label, Some(field.into()), Reducer::Sum)
    }

    /// Average a numeric field
    pub fn average(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(label, Some(field.into()), Reducer::Average)
    }

    /// Percentage of records matching a predicate
    pub fn rate(label: impl Into<String>, predicate: Expr) -> Self {
        Self::new(label, None, Reducer::Rate).matching(predicate)
    }

    /// Label of the record with the largest `field`
    pub fn max_by(
        label: impl Into<String>,
        field: impl Into<String>,
        label_field: impl Into<String>,
    ) -> Self {
        Self::new(
            label,
            Some(field.into()),
            Reducer::MaxBy {
                label_field: label_field.into(),
            },
        )
    }

    /// Restrict the aggregate to records matching a predicate
    #[must_use]
    pub fn matching(mut self, predicate: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Check that the aggregate can be evaluated on a schema
    pub fn validate(&self, schema: &CollectionSchema) -> Result<()> {
        if let Some(filter) = &self.filter {
            filter.validate(schema)?;
        }

        match &self.reducer {
            Reducer::Count => Ok(()),
            Reducer::Rate => match &self.filter {
                Some(_) => Ok(()),
                None => Err(self.invalid("rate needs a predicate")),
            },
            Reducer::Sum | Reducer::Average => self.check_numeric(schema, false),
            Reducer::MaxBy { label_field } => {
                schema.require_field(label_field)?;
                self.check_numeric(schema, true)
            }
        }
    }

    fn check_numeric(&self, schema: &CollectionSchema, allow_dates: bool) -> Result<()> {
        let Some(name) = &self.field else {
            return Err(self.invalid("reducer needs a field"));
        };
        let field_type = schema.require_field(name)?.field_type;
        match field_type {
            FieldType::Number | FieldType::Collection => Ok(()),
            FieldType::Date if allow_dates => Ok(()),
            other => Err(self.invalid(&format!("field '{name}' is {other}, not numeric"))),
        }
    }

    fn invalid(&self, reason: &str) -> QueryError {
        QueryError::InvalidAggregate {
            label: self.label.clone(),
            reason: reason.to_string(),
        }
    }

    fn selects(&self, record: &dyn FieldSource) -> bool {
        self.filter
            .as_ref()
            .is_none_or(|filter| filter.evaluate(record))
    }

    /// The numeric field of a record; NaN and infinities count as absent
    fn numeric(&self, record: &dyn FieldSource) -> Option<f64> {
        self.field
            .as_deref()
            .and_then(|name| record.field(name))
            .and_then(|value| value.as_number())
            .filter(|value| value.is_finite())
    }

    /// Evaluate this aggregate over a collection
    ///
    /// Empty input yields the neutral value of the reducer: zero for
    /// numbers and `None` for max-by.
    pub fn evaluate<R: FieldSource>(&self, records: &[R]) -> SummaryValue {
        let selected = records.iter().filter(|record| self.selects(*record));

        match &self.reducer {
            Reducer::Count => SummaryValue::Count(selected.count()),
            Reducer::Sum => {
                SummaryValue::Number(selected.filter_map(|record| self.numeric(record)).sum())
            }
            Reducer::Average => {
                let (sum, n) = selected
                    .filter_map(|record| self.numeric(record))
                    .fold((0.0, 0_usize), |(sum, n), value| (sum + value, n + 1));
                SummaryValue::Number(if n == 0 { 0.0 } else { sum / n as f64 })
            }
            Reducer::Rate => {
                if records.is_empty() {
                    SummaryValue::Number(0.0)
                } else {
                    let hits = selected.count();
                    SummaryValue::Number(hits as f64 * 100.0 / records.len() as f64)
                }
            }
            Reducer::MaxBy { label_field } => {
                let mut best: Option<(f64, &R)> = None;
                for record in selected {
                    let Some(value) = self.numeric(record) else {
                        continue;
                    };
                    if best.is_none_or(|(max, _)| value > max) {
                        best = Some((value, record));
                    }
                }
                SummaryValue::Label(
                    best.and_then(|(_, record)| record.field(label_field))
                        .map(|value| value.label()),
                )
            }
        }
    }
}

/// Result of one aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryValue {
    /// A record count
    Count(usize),
    /// A sum, average or rate
    Number(f64),
    /// The winner of a max-by, `None` on empty input
    Label(Option<String>),
}

impl SummaryValue {
    /// Numeric view of counts and numbers
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Count(n) => Some(*n as f64),
            Self::Number(n) => Some(*n),
            Self::Label(_) => None,
        }
    }
}

/// Aggregate results in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    entries: Vec<(String, SummaryValue)>,
}

impl Summary {
    /// Get the result for a label
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&SummaryValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    /// Iterate over results in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of results
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no aggregate was evaluated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Summary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Evaluates a fixed list of aggregates
#[derive(Debug, Clone, Copy)]
pub struct SummaryAggregator<'s> {
    specs: &'s [AggregateSpec],
}

impl<'s> SummaryAggregator<'s> {
    /// Aggregate with explicit specs
    #[must_use]
    pub const fn new(specs: &'s [AggregateSpec]) -> Self {
        Self { specs }
    }

    /// Aggregate with the stat cards a schema declares
    #[must_use]
    pub fn for_schema(schema: &'s CollectionSchema) -> Self {
        Self::new(schema.aggregates())
    }

    /// Evaluate every aggregate over the base collection
    pub fn summarize<R: FieldSource>(&self, records: &[R]) -> Summary {
        let entries = self
            .specs
            .iter()
            .map(|spec| (spec.label.clone(), spec.evaluate(records)))
            .collect();
        log::debug!(
            "Summarized {} records into {} aggregates",
            records.len(),
            self.specs.len()
        );
        Summary { entries }
    }
}

/// Evaluate the aggregates a schema declares
pub fn summarize<R: FieldSource>(schema: &CollectionSchema, records: &[R]) -> Summary {
    SummaryAggregator::for_schema(schema).summarize(records)
}

/// Evaluate explicit aggregates
pub fn summarize_with<R: FieldSource>(specs: &[AggregateSpec], records: &[R]) -> Summary {
    SummaryAggregator::new(specs).summarize(records)
}

/// Count records per value of a field
///
/// Records without the field are skipped.
pub fn category_counts<R: FieldSource>(records: &[R], field: &str) -> BTreeMap<String, usize> {
    records
        .iter()
        .filter_map(|record| record.field(field))
        .map(|value| value.label())
        .counts()
        .into_iter()
        .collect()
}
