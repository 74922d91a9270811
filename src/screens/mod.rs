//! Schemas of the dashboard screens
//!
//! Each screen module declares its fields and stat cards once. The query
//! pipeline, summary aggregator and actions are shared.

pub mod chats;
pub mod events;
pub mod registrations;
pub mod vendors;

use crate::error::{QueryError, Result};
use crate::schema::CollectionSchema;

/// Names accepted by [`schema_for`]
pub const SCREEN_NAMES: &[&str] = &[
    registrations::NAME,
    events::NAME,
    chats::NAME,
    vendors::NAME,
];

/// Look up a screen schema by name
pub fn schema_for(name: &str) -> Result<CollectionSchema> {
    match name {
        registrations::NAME => registrations::schema(),
        events::NAME => events::schema(),
        chats::NAME => chats::schema(),
        vendors::NAME => vendors::schema(),
        other => Err(QueryError::Schema(format!(
            "unknown screen '{other}', expected one of {SCREEN_NAMES:?}"
        ))),
    }
}
