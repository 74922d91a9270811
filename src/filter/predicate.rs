//! Predicate builder
//!
//! Turns the filter selections of a screen (one entry per field, `All`
//! meaning no constraint) into a single predicate. Values are checked and
//! coerced against the schema once, when the predicate is built.

use std::collections::BTreeMap;
use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::filter::RecordFilter;
use crate::filter::expr::Expr;
use crate::record::FieldSource;
use crate::schema::{CollectionSchema, FieldDefinition, FieldType, FieldValue};

/// The accepted value(s) of one filter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    /// No constraint
    #[default]
    All,
    /// Field equals the value
    Equals(FieldValue),
    /// Field equals any of the values; an empty set is no constraint
    OneOf(Vec<FieldValue>),
    /// Field is at least the value (numbers and dates)
    AtLeast(FieldValue),
    /// Field is at most the value (numbers and dates)
    AtMost(FieldValue),
    /// Field lies in the inclusive range (numbers and dates)
    Between(FieldValue, FieldValue),
}

impl FilterValue {
    /// Whether this filter constrains anything
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::All => false,
            Self::OneOf(values) => !values.is_empty(),
            _ => true,
        }
    }
}

impl From<&str> for FilterValue {
    /// Select-box semantics: `"all"` is no constraint, anything else is equality
    fn from(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Equals(FieldValue::text(value))
        }
    }
}

/// Filter selections keyed by field name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, FilterValue>);

impl FilterSet {
    /// Create an empty filter set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a filter, builder style
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(field, value);
        self
    }

    /// Add or replace a filter
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        self.0.insert(field.into(), value.into());
    }

    /// Remove a filter
    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    /// Get the filter on a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.0.get(field)
    }

    /// Iterate over all entries, including `All`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over entries that constrain something
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter().filter(|(_, value)| value.is_active())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no entries are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A validated conjunction of field constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    expr: Expr,
}

impl Predicate {
    /// A predicate that accepts every record
    #[must_use]
    pub const fn accept_all() -> Self {
        Self {
            expr: Expr::AlwaysTrue,
        }
    }

    /// Build a predicate from filter selections
    ///
    /// # Errors
    /// `InvalidFilterField` for a field the schema does not declare
    /// filterable, `InvalidFilterValue` for values that do not fit the field.
    pub fn build(schema: &CollectionSchema, filters: &FilterSet) -> Result<Self> {
        let mut constraints = Vec::new();

        for (name, value) in filters.iter() {
            if !schema.is_filterable(name) {
                return Err(QueryError::InvalidFilterField {
                    collection: schema.name().to_string(),
                    field: name.to_string(),
                });
            }
            if !value.is_active() {
                continue;
            }

            let definition = schema.require_field(name)?;
            constraints.push(constraint_for(definition, value)?);
        }

        let expr = match constraints.len() {
            0 => Expr::AlwaysTrue,
            1 => constraints.remove(0),
            _ => Expr::And(constraints),
        };

        Ok(Self { expr })
    }

    /// The compiled expression
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Whether this predicate accepts every record
    #[must_use]
    pub fn accepts_everything(&self) -> bool {
        self.expr == Expr::AlwaysTrue
    }

    /// Check if a record satisfies every constraint
    #[must_use]
    pub fn matches(&self, record: &dyn FieldSource) -> bool {
        self.expr.evaluate(record)
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl RecordFilter for Predicate {
    fn matches(&self, record: &dyn FieldSource) -> bool {
        Self::matches(self, record)
    }

    fn required_fields(&self) -> HashSet<String> {
        self.expr.required_fields()
    }
}

fn constraint_for(definition: &FieldDefinition, value: &FilterValue) -> Result<Expr> {
    let name = definition.name.clone();
    match value {
        FilterValue::All => Ok(Expr::AlwaysTrue),
        FilterValue::Equals(v) => equals(definition, v),
        FilterValue::OneOf(values) => {
            if values.iter().any(|v| calendar_day(definition, v).is_some()) {
                let options = values
                    .iter()
                    .map(|v| equals(definition, v))
                    .collect::<Result<_>>()?;
                return Ok(Expr::Or(options));
            }
            Ok(Expr::In(
                name,
                values
                    .iter()
                    .map(|v| resolve(definition, v))
                    .collect::<Result<_>>()?,
            ))
        }
        FilterValue::AtLeast(v) => Ok(Expr::GtEq(name, resolve_ordered(definition, v)?)),
        FilterValue::AtMost(v) => Ok(Expr::LtEq(name, upper_bound(definition, v)?)),
        FilterValue::Between(low, high) => {
            let low = resolve_ordered(definition, low)?;
            let high = upper_bound(definition, high)?;
            let inverted = match (&low, &high) {
                (FieldValue::Number(a), FieldValue::Number(b)) => a > b,
                (FieldValue::Date(a), FieldValue::Date(b)) => a > b,
                _ => false,
            };
            if inverted {
                return Err(invalid(definition, format!("range {low} .. {high} is empty")));
            }
            Ok(Expr::And(vec![
                Expr::GtEq(name.clone(), low),
                Expr::LtEq(name, high),
            ]))
        }
    }
}

/// Equality, widened to the whole day for a bare `YYYY-MM-DD` on a date field
fn equals(definition: &FieldDefinition, value: &FieldValue) -> Result<Expr> {
    let name = definition.name.clone();
    match calendar_day(definition, value) {
        Some((start, end)) => Ok(Expr::And(vec![
            Expr::GtEq(name.clone(), FieldValue::Date(start)),
            Expr::LtEq(name, FieldValue::Date(end)),
        ])),
        None => Ok(Expr::Eq(name, resolve(definition, value)?)),
    }
}

/// Inclusive upper bound; a bare day includes everything on that day
fn upper_bound(definition: &FieldDefinition, value: &FieldValue) -> Result<FieldValue> {
    if let Some((_, end)) = calendar_day(definition, value) {
        return Ok(FieldValue::Date(end));
    }
    resolve_ordered(definition, value)
}

/// First and last instant of a day given as text without a time
fn calendar_day(
    definition: &FieldDefinition,
    value: &FieldValue,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if definition.field_type != FieldType::Date {
        return None;
    }
    let FieldValue::Text(text) = value else {
        return None;
    };
    let day = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
    let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)?;
    Some((day.and_time(NaiveTime::MIN), day.and_time(last)))
}

fn resolve(definition: &FieldDefinition, value: &FieldValue) -> Result<FieldValue> {
    let resolved = value.coerce_to(definition.field_type).ok_or_else(|| {
        invalid(
            definition,
            format!("{value} is not a valid {} value", definition.field_type),
        )
    })?;

    if let FieldValue::Enum(tag) = &resolved {
        if !definition.accepts_tag(tag) {
            return Err(invalid(
                definition,
                format!("'{tag}' is not one of {:?}", definition.tags),
            ));
        }
    }

    Ok(resolved)
}

fn resolve_ordered(definition: &FieldDefinition, value: &FieldValue) -> Result<FieldValue> {
    if !definition.field_type.is_ordered_scalar() {
        return Err(invalid(
            definition,
            format!("range filters need a number or date field, not {}", definition.field_type),
        ));
    }
    resolve(definition, value)
}

fn invalid(definition: &FieldDefinition, reason: String) -> QueryError {
    QueryError::InvalidFilterValue {
        field: definition.name.clone(),
        reason,
    }
}
