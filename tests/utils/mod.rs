use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use record_query::screens::{chats, registrations, vendors};
use record_query::{CollectionSchema, DynamicRecord, FieldMap, FieldValue, parse_records};
use serde_json::json;

/// Words used to build random association names
const WORDS: &[&str] = &[
    "Youth", "Senior", "Football", "Choir", "Garden", "Chess", "Rowing", "Parents", "Nordic",
    "Harbour", "Development", "Culture", "Science", "Dance", "Hiking",
];

/// Suffixes used to build random association names
const SUFFIXES: &[&str] = &["Association", "Club", "Society", "Union"];

/// Regions of the registration fixtures
pub const REGIONS: &[&str] = &["North", "South", "Capital", "Central"];

/// Schema of the registration review screen
#[must_use]
pub fn registration_schema() -> CollectionSchema {
    registrations::schema().expect("registration schema is valid")
}

/// The three registrations used by the example scenarios
#[must_use]
pub fn three_registrations() -> Vec<DynamicRecord> {
    let json = json!([
        {
            "id": "reg-1",
            "associationName": "Youth Development Association",
            "contactPerson": "Sofie Holm",
            "email": "sofie@youthdev.org",
            "region": "North",
            "status": "pending",
            "submittedAt": "2024-01-10T09:15:00Z",
            "memberCount": 45,
            "documents": [{ "name": "statutes.pdf", "verified": true }]
        },
        {
            "id": "reg-2",
            "associationName": "Harbour Rowing Club",
            "contactPerson": "Jonas Berg",
            "email": "jonas@harbourrowing.dk",
            "region": "Capital",
            "status": "approved",
            "submittedAt": "2024-01-15T14:00:00Z",
            "memberCount": 120,
            "documents": []
        },
        {
            "id": "reg-3",
            "associationName": "Senior Chess Society",
            "contactPerson": "Ida Lund",
            "email": "ida@seniorchess.dk",
            "region": "South",
            "status": "rejected",
            "submittedAt": "2024-01-08",
            "memberCount": 18,
            "documents": [{ "name": "minutes.pdf", "verified": false }]
        }
    ]);

    parse_records(&json.to_string(), &registration_schema()).expect("fixture records are valid")
}

/// Group chats whose members are only findable through `participants`
#[must_use]
pub fn two_chats() -> Vec<DynamicRecord> {
    let json = json!([
        {
            "id": "chat-1",
            "groupName": "Board members",
            "association": "Harbour Rowing Club",
            "status": "active",
            "messageCount": 310,
            "reportedMessages": 0,
            "lastActivity": "2024-02-01T18:30:00Z",
            "participants": [
                { "name": "Jonas Berg", "role": "admin", "online": true },
                { "name": "Mette Krog", "role": "member", "online": false }
            ]
        },
        {
            "id": "chat-2",
            "groupName": "Tournament planning",
            "association": "Senior Chess Society",
            "status": "archived",
            "messageCount": 42,
            "reportedMessages": 2,
            "lastActivity": "2024-01-20T08:00:00Z",
            "participants": [
                { "name": "Ida Lund", "role": "admin", "online": false }
            ]
        }
    ]);

    let schema = chats::schema().expect("chat schema is valid");
    parse_records(&json.to_string(), &schema).expect("fixture records are valid")
}

/// Vendors with nested product listings
#[must_use]
pub fn two_vendors() -> Vec<DynamicRecord> {
    let json = json!([
        {
            "id": "vendor-1",
            "name": "Nordic Sports Supply",
            "owner": "Anna Vik",
            "email": "anna@nordicsports.dk",
            "category": "Sports",
            "status": "approved",
            "rating": 4.6,
            "joinedAt": "2023-11-02",
            "verified": true,
            "products": [
                { "name": "Rowing gloves", "price": 149.0 },
                { "name": "Team jersey", "price": 299.0 }
            ]
        },
        {
            "id": "vendor-2",
            "name": "Board Game Corner",
            "owner": "Per Dahl",
            "email": "per@gamecorner.dk",
            "category": "Games",
            "status": "pending",
            "rating": 4.1,
            "joinedAt": "2024-01-05",
            "verified": false,
            "products": [
                { "name": "Tournament chess set", "price": 450.0 }
            ]
        }
    ]);

    let schema = vendors::schema().expect("vendor schema is valid");
    parse_records(&json.to_string(), &schema).expect("fixture records are valid")
}

/// Seeded random registrations
///
/// Statuses, regions and member counts repeat often so sorts see ties, and
/// some records lack optional fields.
#[must_use]
pub fn random_registrations(seed: u64, count: usize) -> Vec<DynamicRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    (0..count)
        .map(|i| {
            let name = format!(
                "{} {} {}",
                WORDS[rng.random_range(0..WORDS.len())],
                WORDS[rng.random_range(0..WORDS.len())],
                SUFFIXES[rng.random_range(0..SUFFIXES.len())]
            );
            let status = registrations::STATUSES[rng.random_range(0..registrations::STATUSES.len())];
            let region = REGIONS[rng.random_range(0..REGIONS.len())];
            let submitted = start + Duration::days(rng.random_range(0..20));

            let mut record = DynamicRecord::new(format!("reg-{i}"))
                .with_field("associationName", FieldValue::text(name))
                .with_field("status", FieldValue::tag(status))
                .with_field("region", FieldValue::text(region))
                .with_field("submittedAt", FieldValue::date(submitted));

            if rng.random_bool(0.8) {
                record.set_field(
                    "memberCount",
                    FieldValue::Number(f64::from(rng.random_range(5_u32..60))),
                );
            }
            if rng.random_bool(0.5) {
                let mut document = FieldMap::new();
                document.insert("name".to_string(), FieldValue::text("statutes.pdf"));
                record.set_field("documents", FieldValue::Collection(vec![document]));
            }
            record
        })
        .collect()
}

/// Identifiers of records in order
#[must_use]
pub fn ids<'a>(records: impl IntoIterator<Item = &'a DynamicRecord>) -> Vec<String> {
    use record_query::Record;

    records.into_iter().map(|r| r.id().to_string()).collect()
}
