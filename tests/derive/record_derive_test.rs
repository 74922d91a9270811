use std::fmt;

use chrono::NaiveDate;
use record_query::{
    CollectionSchema, Criteria, FieldDefinition, FieldSource, FieldValue, QueryPipeline, Record,
    SortDirection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    Approved,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

#[derive(Debug, Clone, FieldSource)]
struct Document {
    name: String,
    verified: bool,
}

#[derive(Debug, Clone, Record)]
struct Registration {
    id: String,

    #[field(name = "associationName")]
    association_name: String,

    #[field(kind = "enum")]
    status: Status,

    #[field(name = "submittedAt")]
    submitted_at: NaiveDate,

    #[field(name = "memberCount")]
    member_count: Option<u32>,

    #[field(kind = "nested")]
    documents: Vec<Document>,

    #[field(skip)]
    #[allow(dead_code)]
    internal_notes: String,
}

#[derive(Debug, Clone, Record)]
#[record(id = "code")]
struct Region {
    code: String,
    name: String,
}

fn registration(id: &str, name: &str, status: Status, day: u32, documents: &[&str]) -> Registration {
    Registration {
        id: id.to_string(),
        association_name: name.to_string(),
        status,
        submitted_at: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        member_count: (day % 2 == 0).then_some(day * 3),
        documents: documents
            .iter()
            .map(|name| Document {
                name: (*name).to_string(),
                verified: true,
            })
            .collect(),
        internal_notes: String::new(),
    }
}

fn schema() -> CollectionSchema {
    CollectionSchema::builder("registrations")
        .field(FieldDefinition::text("associationName"))
        .field(FieldDefinition::enumeration("status", ["pending", "approved"]))
        .field(FieldDefinition::date("submittedAt"))
        .field(FieldDefinition::number("memberCount"))
        .field(FieldDefinition::collection(
            "documents",
            vec![FieldDefinition::text("name"), FieldDefinition::boolean("verified")],
        ))
        .searchable("associationName")
        .searchable_nested("documents", "name")
        .filterable("status")
        .sortable("submittedAt")
        .build()
        .unwrap()
}

#[test]
fn test_derived_accessors() {
    let record = registration("r1", "Garden Club", Status::Pending, 8, &["statutes.pdf"]);

    assert_eq!(record.id(), "r1");
    assert_eq!(record.field("associationName"), Some(FieldValue::text("Garden Club")));
    assert_eq!(record.field("status"), Some(FieldValue::tag("pending")));
    assert_eq!(record.field("memberCount"), Some(FieldValue::Number(24.0)));
    assert!(record.field("internal_notes").is_none());
    assert!(record.field("association_name").is_none());

    let Some(FieldValue::Collection(documents)) = record.field("documents") else {
        panic!("documents should be nested");
    };
    assert_eq!(documents[0].get("verified"), Some(&FieldValue::Boolean(true)));

    let names = record.field_names();
    assert!(names.contains(&"submittedAt"));
    assert!(!names.contains(&"internal_notes"));
}

#[test]
fn test_absent_option_field() {
    let record = registration("r2", "Chess Society", Status::Approved, 9, &[]);
    assert!(record.field("memberCount").is_none());
    assert!(!record.to_field_map().contains_key("memberCount"));
}

#[test]
fn test_custom_id_field() {
    let region = Region {
        code: "DK-84".to_string(),
        name: "Capital".to_string(),
    };
    assert_eq!(region.id(), "DK-84");
    assert_eq!(region.field("name"), Some(FieldValue::text("Capital")));
}

#[test]
fn test_typed_records_in_pipeline() {
    let schema = schema();
    let records = vec![
        registration("r1", "Garden Club", Status::Pending, 8, &["minutes.pdf"]),
        registration("r2", "Chess Society", Status::Approved, 12, &[]),
        registration("r3", "Rowing Union", Status::Pending, 10, &["statutes.pdf"]),
    ];
    let pipeline = QueryPipeline::new(&schema);

    let view = pipeline
        .run(
            &records,
            &Criteria::new()
                .filter("status", "pending")
                .sort_by("submittedAt", SortDirection::Descending),
        )
        .unwrap();
    let ids: Vec<&str> = view.iter().map(Record::id).collect();
    assert_eq!(ids, vec!["r3", "r1"]);

    let view = pipeline
        .run(&records, &Criteria::new().search("STATUTES"))
        .unwrap();
    let ids: Vec<&str> = view.iter().map(Record::id).collect();
    assert_eq!(ids, vec!["r3"]);
}
