use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use record_query::screens::{chats, events};
use record_query::summary::summarize_with;
use record_query::{
    AggregateSpec, Criteria, DynamicRecord, Screen, SummaryValue, field, parse_records, summarize,
};

use crate::utils::{random_registrations, registration_schema, three_registrations};

#[test]
fn test_status_counts() {
    let summary = summarize(&registration_schema(), &three_registrations());

    assert_eq!(summary.get("total"), Some(&SummaryValue::Count(3)));
    assert_eq!(summary.get("pending"), Some(&SummaryValue::Count(1)));
    assert_eq!(summary.get("approved"), Some(&SummaryValue::Count(1)));
    assert_eq!(summary.get("rejected"), Some(&SummaryValue::Count(1)));
}

#[test]
fn test_explicit_count_spec() {
    let specs = [AggregateSpec::count("pending").matching(field("status").eq("pending"))];
    let summary = summarize_with(&specs, &three_registrations());

    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        serde_json::json!({ "pending": 1 })
    );
}

#[test]
fn test_empty_collection_neutral_values() {
    let schema = events::schema().unwrap();
    let summary = summarize::<DynamicRecord>(&schema, &[]);

    assert_eq!(summary.get("averageAttendance"), Some(&SummaryValue::Number(0.0)));
    assert_eq!(summary.get("totalAttendees"), Some(&SummaryValue::Number(0.0)));
    assert_eq!(summary.get("total"), Some(&SummaryValue::Count(0)));

    let chats = chats::schema().unwrap();
    let summary = summarize::<DynamicRecord>(&chats, &[]);
    assert_eq!(summary.get("mostActive"), Some(&SummaryValue::Label(None)));
}

#[test]
fn test_chat_stat_cards() {
    let schema = chats::schema().unwrap();
    let records = parse_records(
        &serde_json::json!([
            {
                "id": "c1",
                "groupName": "Board",
                "status": "active",
                "messageCount": 240,
                "reportedMessages": 0,
                "participants": [{ "name": "Ana", "role": "admin" }, { "name": "Bo", "role": "member" }]
            },
            {
                "id": "c2",
                "groupName": "Parents",
                "status": "archived",
                "messageCount": 35,
                "reportedMessages": 2,
                "participants": [{ "name": "Cy", "role": "member" }]
            }
        ])
        .to_string(),
        &schema,
    )
    .unwrap();

    let summary = summarize(&schema, &records);
    assert_eq!(summary.get("active"), Some(&SummaryValue::Count(1)));
    assert_eq!(summary.get("totalMessages"), Some(&SummaryValue::Number(275.0)));
    assert_eq!(summary.get("totalParticipants"), Some(&SummaryValue::Number(3.0)));
    assert_eq!(summary.get("withReports"), Some(&SummaryValue::Count(1)));
    assert_eq!(
        summary.get("mostActive"),
        Some(&SummaryValue::Label(Some("Board".to_string())))
    );
}

#[test]
fn test_summary_ignores_criteria() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut screen = Screen::new(registration_schema(), random_registrations(5, 40)).unwrap();
    let baseline = screen.summary();

    for needle in ["youth", "club", "zzz"] {
        let mut criteria = Criteria::new().search(needle);
        if rng.random_bool(0.5) {
            criteria = criteria.filter("status", "approved");
        }
        screen.set_criteria(criteria).unwrap();
        assert_eq!(screen.summary(), baseline);
    }
}
