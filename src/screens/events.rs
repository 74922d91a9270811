//! Calendar event moderation

use crate::error::Result;
use crate::filter::field;
use crate::schema::{CollectionSchema, FieldDefinition};
use crate::sort::SortSpec;
use crate::summary::AggregateSpec;

/// Collection name
pub const NAME: &str = "events";

/// Event categories
pub const CATEGORIES: [&str; 5] = ["sport", "culture", "education", "social", "meeting"];

/// Moderation states of an event
pub const STATUSES: [&str; 4] = ["pending", "approved", "rejected", "cancelled"];

/// Events published to association calendars
pub fn schema() -> Result<CollectionSchema> {
    CollectionSchema::builder(NAME)
        .field(FieldDefinition::text("title"))
        .field(FieldDefinition::text("organizer"))
        .field(FieldDefinition::text("location"))
        .field(FieldDefinition::enumeration("category", CATEGORIES))
        .field(FieldDefinition::enumeration("status", STATUSES))
        .field(FieldDefinition::date("date"))
        .field(FieldDefinition::number("attendees"))
        .field(FieldDefinition::boolean("isPublic"))
        .field(FieldDefinition::text("reviewedBy"))
        .field(FieldDefinition::date("reviewedAt"))
        .field(FieldDefinition::text("reviewNotes"))
        .searchable("title")
        .searchable("organizer")
        .searchable("location")
        .filterable("category")
        .filterable("status")
        .filterable("isPublic")
        .filterable("date")
        .sortable("date")
        .sortable("title")
        .sortable("attendees")
        .default_sort(SortSpec::ascending("date"))
        .aggregate(AggregateSpec::count("total"))
        .aggregate(AggregateSpec::count("pending").matching(field("status").eq("pending")))
        .aggregate(AggregateSpec::sum("totalAttendees", "attendees"))
        .aggregate(AggregateSpec::average("averageAttendance", "attendees"))
        .build()
}
