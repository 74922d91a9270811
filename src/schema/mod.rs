//! Schema declarations for record collections
//!
//! This module provides the field values records expose, the per-field type
//! declarations and the per-collection schema that ties search, filter,
//! sort and aggregate declarations together.

pub mod collection;
pub mod field;
pub mod value;

pub use collection::{CollectionSchema, CollectionSchemaBuilder};
pub use field::{FieldDefinition, FieldType};
pub use value::{FieldMap, FieldValue, ToFieldValue, parse_date};
