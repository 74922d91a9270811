//! Group chat moderation

use crate::error::Result;
use crate::filter::field;
use crate::schema::{CollectionSchema, FieldDefinition};
use crate::sort::SortSpec;
use crate::summary::AggregateSpec;

/// Collection name
pub const NAME: &str = "chats";

/// States of a group chat
pub const STATUSES: [&str; 3] = ["active", "archived", "suspended"];

/// Association group chats and their participants
pub fn schema() -> Result<CollectionSchema> {
    CollectionSchema::builder(NAME)
        .field(FieldDefinition::text("groupName"))
        .field(FieldDefinition::text("association"))
        .field(FieldDefinition::enumeration("status", STATUSES))
        .field(FieldDefinition::number("messageCount"))
        .field(FieldDefinition::number("reportedMessages"))
        .field(FieldDefinition::date("lastActivity"))
        .field(FieldDefinition::collection(
            "participants",
            vec![
                FieldDefinition::text("name"),
                FieldDefinition::enumeration("role", ["admin", "member"]),
                FieldDefinition::boolean("online"),
            ],
        ))
        .field(FieldDefinition::text("reviewedBy"))
        .field(FieldDefinition::date("reviewedAt"))
        .field(FieldDefinition::text("reviewNotes"))
        .searchable("groupName")
        .searchable("association")
        .searchable_nested("participants", "name")
        .filterable("status")
        .filterable("reportedMessages")
        .sortable("lastActivity")
        .sortable("messageCount")
        .sortable("groupName")
        .default_sort(SortSpec::descending("lastActivity"))
        .aggregate(AggregateSpec::count("total"))
        .aggregate(AggregateSpec::count("active").matching(field("status").eq("active")))
        .aggregate(AggregateSpec::sum("totalMessages", "messageCount"))
        .aggregate(AggregateSpec::sum("totalParticipants", "participants"))
        .aggregate(AggregateSpec::count("withReports").matching(field("reportedMessages").at_least(1)))
        .aggregate(AggregateSpec::max_by("mostActive", "messageCount", "groupName"))
        .build()
}
