//! Field values carried by records.
//!
//! Every record exposes its fields as `FieldValue`s so the query pipeline can
//! filter, search, sort and aggregate without knowing the concrete record type.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::schema::field::FieldType;

/// Fields of one nested collection item, keyed by field name
pub type FieldMap = BTreeMap<String, FieldValue>;

/// Date formats accepted when a date arrives as text, tried in order
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// One tag out of a fixed set, e.g. a status
    Enum(String),
    /// A point in time (UTC, without offset)
    Date(NaiveDateTime),
    /// A numeric value
    Number(f64),
    /// A flag
    Boolean(bool),
    /// Nested items such as participants or uploaded files
    Collection(Vec<FieldMap>),
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create an enum tag value
    pub fn tag(value: impl Into<String>) -> Self {
        Self::Enum(value.into())
    }

    /// Create a date value at midnight of the given day
    #[must_use]
    pub fn date(date: NaiveDate) -> Self {
        Self::Date(date.and_time(NaiveTime::MIN))
    }

    /// The semantic type of this value
    #[must_use]
    pub const fn kind(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Enum(_) => FieldType::Enum,
            Self::Date(_) => FieldType::Date,
            Self::Number(_) => FieldType::Number,
            Self::Boolean(_) => FieldType::Boolean,
            Self::Collection(_) => FieldType::Collection,
        }
    }

    /// Borrow the string of a text or enum value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by sums, averages and max-by
    ///
    /// Collections count their items so "total participants" style
    /// aggregates work without a separate counter field.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Collection(items) => Some(items.len() as f64),
            Self::Date(dt) => Some(dt.and_utc().timestamp_millis() as f64),
            _ => None,
        }
    }

    /// The date of a date value
    #[must_use]
    pub const fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Label used for category counts and max-by results
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Build a value from untyped JSON
    ///
    /// Strings become text; callers that know the field type coerce afterwards
    /// with [`FieldValue::coerce_to`].
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::Object(map) => Some(
                        map.iter()
                            .filter_map(|(k, v)| Self::from_json(v).map(|v| (k.clone(), v)))
                            .collect::<FieldMap>(),
                    ),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::Collection),
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
        }
    }

    /// Convert this value to the given field type
    ///
    /// Strings coming from select boxes and JSON are parsed into enum tags,
    /// dates, numbers and booleans. Returns `None` when no sensible
    /// conversion exists.
    #[must_use]
    pub fn coerce_to(&self, target: FieldType) -> Option<Self> {
        if self.kind() == target {
            return Some(self.clone());
        }

        match (self, target) {
            (Self::Text(s) | Self::Enum(s), FieldType::Text) => Some(Self::Text(s.clone())),
            (Self::Text(s) | Self::Enum(s), FieldType::Enum) => Some(Self::Enum(s.clone())),
            (Self::Text(s), FieldType::Date) => parse_date(s).map(Self::Date),
            (Self::Text(s), FieldType::Number) => s.trim().parse().ok().map(Self::Number),
            (Self::Text(s), FieldType::Boolean) => match s.trim() {
                "true" => Some(Self::Boolean(true)),
                "false" => Some(Self::Boolean(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Enum(s) => write!(f, "{s}"),
            Self::Date(dt) if dt.time() == NaiveTime::MIN => write!(f, "{}", dt.format("%Y-%m-%d")),
            Self::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Collection(items) => write!(f, "{}", items.len()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unsupported field value: {value}")))
    }
}

/// Parse a date or timestamp string
///
/// Accepts RFC 3339 timestamps (converted to UTC), ISO date-times without an
/// offset and plain `YYYY-MM-DD` dates (midnight).
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Conversion of Rust field types into `FieldValue`
///
/// `None` means the field is absent on this record.
pub trait ToFieldValue {
    /// Convert to a field value
    fn to_field_value(&self) -> Option<FieldValue>;
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> Option<FieldValue> {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(ToFieldValue::to_field_value)
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Text(self.to_string()))
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Text(self.clone()))
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Boolean(*self))
    }
}

impl ToFieldValue for NaiveDate {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::date(*self))
    }
}

impl ToFieldValue for NaiveDateTime {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Date(*self))
    }
}

impl ToFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Date(self.naive_utc()))
    }
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(self.clone())
    }
}

macro_rules! impl_numeric_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToFieldValue for $ty {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_field_value(&self) -> Option<FieldValue> {
                    Some(FieldValue::Number(*self as f64))
                }
            }
        )*
    };
}

impl_numeric_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
