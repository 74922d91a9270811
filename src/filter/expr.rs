//! Expression-based record predicates
//!
//! This module provides a composable predicate tree evaluated against a
//! single record. The predicate builder compiles user filters into it and
//! aggregate specs use it to select the records they count.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::filter::RecordFilter;
use crate::record::FieldSource;
use crate::schema::{CollectionSchema, FieldValue};

/// Represents a predicate over one record
///
/// Every comparison fails when the field is absent on the record.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field equals a value
    Eq(String, FieldValue),

    /// Field is present and differs from a value
    NotEq(String, FieldValue),

    /// Field equals one of a set of values
    In(String, Vec<FieldValue>),

    /// Field is greater than or equal to a value
    GtEq(String, FieldValue),

    /// Field is less than or equal to a value
    LtEq(String, FieldValue),

    /// Field text contains a substring, ignoring case
    Contains(String, String),

    /// Field is present
    IsPresent(String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

impl Expr {
    /// Combine with another expression using AND, flattening nested ANDs
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::AlwaysTrue, other) | (other, Self::AlwaysTrue) => other,
            (Self::And(mut lhs), Self::And(rhs)) => {
                lhs.extend(rhs);
                Self::And(lhs)
            }
            (Self::And(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::And(lhs)
            }
            (lhs, rhs) => Self::And(vec![lhs, rhs]),
        }
    }

    /// Combine with another expression using OR
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Or(mut lhs), rhs) => {
                lhs.push(rhs);
                Self::Or(lhs)
            }
            (lhs, rhs) => Self::Or(vec![lhs, rhs]),
        }
    }

    /// Negate this expression
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Returns a set of all field names required by this expression
    #[must_use]
    pub fn required_fields(&self) -> HashSet<String> {
        let mut fields = HashSet::new();
        self.collect_required_fields(&mut fields);
        fields
    }

    /// Helper method to collect field names
    fn collect_required_fields(&self, fields: &mut HashSet<String>) {
        match self {
            Self::Eq(name, _)
            | Self::NotEq(name, _)
            | Self::In(name, _)
            | Self::GtEq(name, _)
            | Self::LtEq(name, _)
            | Self::Contains(name, _)
            | Self::IsPresent(name) => {
                fields.insert(name.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_fields(fields);
                }
            }
            Self::Not(expr) => expr.collect_required_fields(fields),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }

    /// Check that every referenced field is declared by the schema
    pub fn validate(&self, schema: &CollectionSchema) -> Result<()> {
        for name in self.required_fields() {
            schema.require_field(&name)?;
        }
        Ok(())
    }

    /// Evaluate this expression against a record
    #[must_use]
    pub fn evaluate(&self, source: &dyn FieldSource) -> bool {
        match self {
            Self::AlwaysTrue => true,
            Self::AlwaysFalse => false,
            Self::And(exprs) => exprs.iter().all(|expr| expr.evaluate(source)),
            Self::Or(exprs) => exprs.iter().any(|expr| expr.evaluate(source)),
            Self::Not(expr) => !expr.evaluate(source),
            Self::Eq(name, expected) => source
                .field(name)
                .is_some_and(|actual| values_equal(&actual, expected)),
            Self::NotEq(name, expected) => source
                .field(name)
                .is_some_and(|actual| !values_equal(&actual, expected)),
            Self::In(name, accepted) => source.field(name).is_some_and(|actual| {
                accepted.iter().any(|expected| values_equal(&actual, expected))
            }),
            Self::GtEq(name, bound) => source
                .field(name)
                .and_then(|actual| compare_scalars(&actual, bound))
                .is_some_and(Ordering::is_ge),
            Self::LtEq(name, bound) => source
                .field(name)
                .and_then(|actual| compare_scalars(&actual, bound))
                .is_some_and(Ordering::is_le),
            Self::Contains(name, needle) => source.field(name).is_some_and(|actual| {
                actual
                    .as_str()
                    .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase()))
            }),
            Self::IsPresent(name) => source.field(name).is_some(),
        }
    }
}

impl RecordFilter for Expr {
    fn matches(&self, record: &dyn FieldSource) -> bool {
        self.evaluate(record)
    }

    fn required_fields(&self) -> HashSet<String> {
        Self::required_fields(self)
    }
}

/// Equality across value kinds
///
/// Text and enum values compare by their string so a select value typed as
/// text matches an enum tag.
#[must_use]
pub fn values_equal(actual: &FieldValue, expected: &FieldValue) -> bool {
    match (actual, expected) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
        (FieldValue::Date(a), FieldValue::Date(b)) => a == b,
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
        (FieldValue::Collection(_), _) | (_, FieldValue::Collection(_)) => false,
        _ => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

/// Ordering between two scalars of a comparable kind
fn compare_scalars(actual: &FieldValue, bound: &FieldValue) -> Option<Ordering> {
    match (actual, bound) {
        (FieldValue::Number(a), FieldValue::Number(b)) => Some(a.total_cmp(b)),
        (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
        _ => match (actual.as_str(), bound.as_str()) {
            (Some(a), Some(b)) => Some(a.cmp(b)),
            _ => None,
        },
    }
}

/// Start an expression on a field
#[must_use]
pub fn field(name: &str) -> FieldRef {
    FieldRef {
        name: name.to_string(),
    }
}

/// Builder returned by [`field`]
#[derive(Debug, Clone)]
pub struct FieldRef {
    name: String,
}

impl FieldRef {
    /// Field equals a value; string literals compare against text and enum tags
    pub fn eq(self, value: impl Into<FieldValue>) -> Expr {
        Expr::Eq(self.name, value.into())
    }

    /// Field is present and not equal to a value
    pub fn ne(self, value: impl Into<FieldValue>) -> Expr {
        Expr::NotEq(self.name, value.into())
    }

    /// Field equals one of the given values
    pub fn one_of<I, V>(self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Expr::In(self.name, values.into_iter().map(Into::into).collect())
    }

    /// Field is at least a value
    pub fn at_least(self, value: impl Into<FieldValue>) -> Expr {
        Expr::GtEq(self.name, value.into())
    }

    /// Field is at most a value
    pub fn at_most(self, value: impl Into<FieldValue>) -> Expr {
        Expr::LtEq(self.name, value.into())
    }

    /// Field text contains a substring, ignoring case
    pub fn contains(self, needle: impl Into<String>) -> Expr {
        Expr::Contains(self.name, needle.into())
    }

    /// Field is present
    #[must_use]
    pub fn is_present(self) -> Expr {
        Expr::IsPresent(self.name)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<chrono::NaiveDate> for FieldValue {
    fn from(value: chrono::NaiveDate) -> Self {
        Self::date(value)
    }
}

impl From<chrono::NaiveDateTime> for FieldValue {
    fn from(value: chrono::NaiveDateTime) -> Self {
        Self::Date(value)
    }
}
