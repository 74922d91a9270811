//! JSON export of a view

use serde_json::{Map, Value};

use crate::error::Result;
use crate::query::View;
use crate::record::Record;
use crate::schema::CollectionSchema;

/// Export the records of a view with a chosen set of fields
///
/// Each record becomes an object with its `id` and the requested fields, in
/// view order. Fields a record lacks are written as `null`.
///
/// # Errors
/// `UnknownField` when a requested field is not declared by the schema.
pub fn export_json<R: Record>(
    schema: &CollectionSchema,
    view: &View<'_, R>,
    fields: &[&str],
) -> Result<Value> {
    for name in fields {
        schema.require_field(name)?;
    }

    let rows = view
        .iter()
        .map(|record| {
            let mut row = Map::with_capacity(fields.len() + 1);
            row.insert("id".to_string(), Value::String(record.id().to_string()));
            for name in fields {
                let value = record
                    .field(name)
                    .map(serde_json::to_value)
                    .transpose()?
                    .unwrap_or(Value::Null);
                row.insert((*name).to_string(), value);
            }
            Ok(Value::Object(row))
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("Exported {} '{}' records", rows.len(), schema.name());
    Ok(Value::Array(rows))
}
