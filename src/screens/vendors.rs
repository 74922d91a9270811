//! Marketplace vendor management

use crate::error::Result;
use crate::filter::field;
use crate::schema::{CollectionSchema, FieldDefinition};
use crate::sort::SortSpec;
use crate::summary::AggregateSpec;

/// Collection name
pub const NAME: &str = "vendors";

/// Account states of a vendor
pub const STATUSES: [&str; 4] = ["pending", "approved", "suspended", "rejected"];

/// Vendors selling through the association marketplace
pub fn schema() -> Result<CollectionSchema> {
    CollectionSchema::builder(NAME)
        .field(FieldDefinition::text("name"))
        .field(FieldDefinition::text("owner"))
        .field(FieldDefinition::text("email"))
        .field(FieldDefinition::text("category"))
        .field(FieldDefinition::enumeration("status", STATUSES))
        .field(FieldDefinition::number("rating"))
        .field(FieldDefinition::number("totalSales"))
        .field(FieldDefinition::date("joinedAt"))
        .field(FieldDefinition::boolean("verified"))
        .field(FieldDefinition::collection(
            "products",
            vec![
                FieldDefinition::text("name"),
                FieldDefinition::number("price"),
            ],
        ))
        .field(FieldDefinition::text("reviewedBy"))
        .field(FieldDefinition::date("reviewedAt"))
        .field(FieldDefinition::text("reviewNotes"))
        .searchable("name")
        .searchable("owner")
        .searchable("email")
        .searchable_nested("products", "name")
        .filterable("status")
        .filterable("category")
        .filterable("rating")
        .filterable("verified")
        .sortable("name")
        .sortable("rating")
        .sortable("totalSales")
        .sortable("joinedAt")
        .default_sort(SortSpec::descending("totalSales"))
        .aggregate(AggregateSpec::count("total"))
        .aggregate(AggregateSpec::count("approved").matching(field("status").eq("approved")))
        .aggregate(AggregateSpec::sum("totalSales", "totalSales"))
        .aggregate(AggregateSpec::average("averageRating", "rating"))
        .aggregate(AggregateSpec::rate("verifiedRate", field("verified").eq(true)))
        .aggregate(AggregateSpec::max_by("topSeller", "totalSales", "name"))
        .build()
}
