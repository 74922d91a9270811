//! Schema-driven records
//!
//! `DynamicRecord` stores its fields in a map and is built from JSON by
//! coercing each value to the type the schema declares. Screens that load
//! their data from a file or an API payload use it instead of a dedicated
//! struct.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::actions::{Review, Reviewable};
use crate::error::{QueryError, Result};
use crate::record::{FieldSource, Record};
use crate::schema::{CollectionSchema, FieldDefinition, FieldMap, FieldType, FieldValue};

/// Field names written by a review
pub const STATUS_FIELD: &str = "status";
/// Name of the reviewer written by a review
pub const REVIEWED_BY_FIELD: &str = "reviewedBy";
/// Time of the decision written by a review
pub const REVIEWED_AT_FIELD: &str = "reviewedAt";
/// Optional reviewer notes written by a review
pub const REVIEW_NOTES_FIELD: &str = "reviewNotes";

/// A record whose fields live in a map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicRecord {
    id: String,
    #[serde(flatten)]
    fields: FieldMap,
}

impl DynamicRecord {
    /// Create a record with no fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: FieldMap::new(),
        }
    }

    /// Add a field, builder style
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Set or replace a field
    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Remove a field
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Borrow all fields
    #[must_use]
    pub const fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Build a record from a JSON object, coercing values by the schema
    ///
    /// Keys the schema does not declare are ignored; `null` and missing keys
    /// leave the field absent.
    pub fn from_json(value: &Value, schema: &CollectionSchema) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(QueryError::InvalidRecord(format!(
                "expected a JSON object, got {value}"
            )));
        };

        let id = match object.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(QueryError::InvalidRecord(
                    "record has no usable 'id'".to_string(),
                ));
            }
        };

        let mut fields = FieldMap::new();
        for definition in schema.fields() {
            let Some(raw) = object.get(&definition.name) else {
                continue;
            };
            let coerced = coerce_json(definition, raw).map_err(|reason| {
                QueryError::InvalidRecord(format!(
                    "record '{id}', field '{}': {reason}",
                    definition.name
                ))
            })?;
            if let Some(value) = coerced {
                fields.insert(definition.name.clone(), value);
            }
        }

        Ok(Self { id, fields })
    }
}

impl FieldSource for DynamicRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    fn to_field_map(&self) -> FieldMap {
        self.fields.clone()
    }
}

impl Record for DynamicRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Reviewable for DynamicRecord {
    fn apply_review(&self, review: &Review) -> Self {
        let mut updated = self.clone();
        updated.set_field(STATUS_FIELD, FieldValue::tag(review.status.clone()));
        updated.set_field(REVIEWED_BY_FIELD, FieldValue::text(review.actor.name.clone()));
        updated.set_field(REVIEWED_AT_FIELD, FieldValue::Date(review.decided_at.naive_utc()));
        match &review.notes {
            Some(notes) => updated.set_field(REVIEW_NOTES_FIELD, FieldValue::text(notes.clone())),
            None => {
                updated.remove_field(REVIEW_NOTES_FIELD);
            }
        }
        updated
    }
}

fn coerce_json(
    definition: &FieldDefinition,
    raw: &Value,
) -> std::result::Result<Option<FieldValue>, String> {
    if raw.is_null() {
        return Ok(None);
    }

    if definition.field_type == FieldType::Collection {
        let Value::Array(items) = raw else {
            return Err(format!("expected an array, got {raw}"));
        };
        let mut coerced = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(object) = item else {
                return Err(format!("expected nested objects, got {item}"));
            };
            let mut entry = FieldMap::new();
            for child in &definition.children {
                if let Some(value) = object.get(&child.name) {
                    if let Some(value) = coerce_json(child, value)? {
                        entry.insert(child.name.clone(), value);
                    }
                }
            }
            coerced.push(entry);
        }
        return Ok(Some(FieldValue::Collection(coerced)));
    }

    let value = FieldValue::from_json(raw)
        .and_then(|value| value.coerce_to(definition.field_type))
        .ok_or_else(|| format!("expected {}, got {raw}", definition.field_type))?;

    if let FieldValue::Enum(tag) = &value {
        if !definition.accepts_tag(tag) {
            return Err(format!("'{tag}' is not one of {:?}", definition.tags));
        }
    }

    Ok(Some(value))
}

/// Parse a JSON array of records
pub fn parse_records(json: &str, schema: &CollectionSchema) -> Result<Vec<DynamicRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(QueryError::InvalidRecord(
            "expected a JSON array of records".to_string(),
        ));
    };

    items
        .iter()
        .map(|item| DynamicRecord::from_json(item, schema))
        .collect()
}

/// Load a JSON array of records from a file
pub fn load_records(path: &Path, schema: &CollectionSchema) -> Result<Vec<DynamicRecord>> {
    let json = std::fs::read_to_string(path)?;
    let records = parse_records(&json, schema)?;
    log::info!(
        "Loaded {} '{}' records from {}",
        records.len(),
        schema.name(),
        path.display()
    );
    Ok(records)
}
