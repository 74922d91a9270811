//! Association registration review

use crate::error::Result;
use crate::filter::field;
use crate::schema::{CollectionSchema, FieldDefinition};
use crate::sort::SortSpec;
use crate::summary::AggregateSpec;

/// Collection name
pub const NAME: &str = "registrations";

/// Review states of a registration
pub const STATUSES: [&str; 3] = ["pending", "approved", "rejected"];

/// Registration requests submitted by associations
pub fn schema() -> Result<CollectionSchema> {
    CollectionSchema::builder(NAME)
        .field(FieldDefinition::text("associationName").with_label("Association"))
        .field(FieldDefinition::text("contactPerson"))
        .field(FieldDefinition::text("email"))
        .field(FieldDefinition::text("region"))
        .field(FieldDefinition::enumeration("status", STATUSES))
        .field(FieldDefinition::date("submittedAt").with_label("Submitted"))
        .field(FieldDefinition::number("memberCount"))
        .field(FieldDefinition::collection(
            "documents",
            vec![
                FieldDefinition::text("name"),
                FieldDefinition::boolean("verified"),
            ],
        ))
        .field(FieldDefinition::text("reviewedBy"))
        .field(FieldDefinition::date("reviewedAt"))
        .field(FieldDefinition::text("reviewNotes"))
        .searchable("associationName")
        .searchable("contactPerson")
        .searchable("email")
        .filterable("status")
        .filterable("region")
        .sortable("submittedAt")
        .sortable("associationName")
        .sortable("status")
        .default_sort(SortSpec::descending("submittedAt"))
        .aggregate(AggregateSpec::count("total"))
        .aggregate(AggregateSpec::count("pending").matching(field("status").eq("pending")))
        .aggregate(AggregateSpec::count("approved").matching(field("status").eq("approved")))
        .aggregate(AggregateSpec::count("rejected").matching(field("status").eq("rejected")))
        .build()
}
