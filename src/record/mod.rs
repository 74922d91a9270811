//! Record traits
//!
//! The query pipeline reads records only through these traits, so any
//! struct can take part by deriving them or implementing them by hand.

pub mod dynamic;

pub use dynamic::{DynamicRecord, load_records, parse_records};

use crate::schema::value::{FieldMap, FieldValue};

/// String-keyed access to the fields of a record or nested item
pub trait FieldSource {
    /// Get a field value by name; `None` when the field is absent
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Names of the fields this source exposes
    fn field_names(&self) -> Vec<&str>;

    /// Collect every present field into a map
    fn to_field_map(&self) -> FieldMap {
        self.field_names()
            .into_iter()
            .filter_map(|name| self.field(name).map(|value| (name.to_string(), value)))
            .collect()
    }
}

/// One entity of a collection managed by a screen
///
/// The identifier is assigned at creation, never changes and is unique
/// within its collection.
pub trait Record: FieldSource {
    /// Get the unique identifier for this record
    fn id(&self) -> &str;
}

impl FieldSource for FieldMap {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}
