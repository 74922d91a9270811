//! Comparator builder
//!
//! Produces a total order over records for one whitelisted sort key. Sorting
//! is stable, so records with equal keys keep their input order in either
//! direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::TextCollation;
use crate::error::{QueryError, Result};
use crate::record::FieldSource;
use crate::schema::{CollectionSchema, FieldValue};

/// Sort direction
///
/// Deserializes from any spelling `FromStr` accepts, so `"DESC"` and
/// `"descending"` both read as `Descending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending ordering
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// A sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to order by
    #[serde(rename = "sortKey")]
    pub key: String,
    /// Direction of the order
    #[serde(rename = "sortDirection", default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Create a sort spec
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Ascending order on a field
    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Descending order on a field
    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Descending)
    }
}

/// A total order over records for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    key: String,
    direction: SortDirection,
    collation: TextCollation,
}

impl Comparator {
    /// Build a comparator for a sort spec
    ///
    /// # Errors
    /// `InvalidSortKey` when the key is not declared sortable.
    pub fn build(
        schema: &CollectionSchema,
        spec: &SortSpec,
        collation: TextCollation,
    ) -> Result<Self> {
        if !schema.is_sortable(&spec.key) {
            return Err(QueryError::InvalidSortKey {
                collection: schema.name().to_string(),
                key: spec.key.clone(),
            });
        }

        Ok(Self {
            key: spec.key.clone(),
            direction: spec.direction,
            collation,
        })
    }

    /// The field this comparator orders by
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The direction of the order
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Compare two records
    #[must_use]
    pub fn compare(&self, a: &dyn FieldSource, b: &dyn FieldSource) -> Ordering {
        self.compare_keys(a.field(&self.key).as_ref(), b.field(&self.key).as_ref())
    }

    fn compare_keys(&self, a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
        self.direction
            .apply(compare_values(a, b, self.collation))
    }

    /// Stable sort of record references
    ///
    /// Each key is read once, then the references are reordered.
    pub fn sort<R: FieldSource>(&self, records: &mut Vec<&R>) {
        let mut keyed: Vec<(Option<FieldValue>, &R)> = records
            .iter()
            .map(|record| (record.field(&self.key), *record))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| self.compare_keys(a.as_ref(), b.as_ref()));

        records.clear();
        records.extend(keyed.into_iter().map(|(_, record)| record));
    }
}

/// Ascending order between two possibly absent values
///
/// Absent values order after present ones. Values of different kinds order
/// by kind so the result is still a total order.
#[must_use]
pub fn compare_values(
    a: Option<&FieldValue>,
    b: Option<&FieldValue>,
    collation: TextCollation,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_present(a, b, collation),
    }
}

fn compare_present(a: &FieldValue, b: &FieldValue, collation: TextCollation) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Boolean(x), FieldValue::Boolean(y)) => x.cmp(y),
        (FieldValue::Collection(x), FieldValue::Collection(y)) => x.len().cmp(&y.len()),
        (FieldValue::Enum(x), FieldValue::Enum(y)) => x.cmp(y),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => collate(x, y, collation),
            _ => kind_rank(a).cmp(&kind_rank(b)),
        },
    }
}

const fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Boolean(_) => 0,
        FieldValue::Number(_) => 1,
        FieldValue::Date(_) => 2,
        FieldValue::Text(_) | FieldValue::Enum(_) => 3,
        FieldValue::Collection(_) => 4,
    }
}

/// Compare two strings under a collation
///
/// `Locale` compares case-folded text first, so "apple" < "Banana" < "cherry",
/// and breaks ties lowercase first ("a" < "A"), the way browser
/// `localeCompare` orders plain Latin text.
#[must_use]
pub fn collate(a: &str, b: &str, collation: TextCollation) -> Ordering {
    match collation {
        TextCollation::Ordinal => a.cmp(b),
        TextCollation::Locale => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| lowercase_first(a, b))
            .then_with(|| a.cmp(b)),
    }
}

fn lowercase_first(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        if x.is_lowercase() && y.is_uppercase() {
            return Ordering::Less;
        }
        if x.is_uppercase() && y.is_lowercase() {
            return Ordering::Greater;
        }
    }
    Ordering::Equal
}
