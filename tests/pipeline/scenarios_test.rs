use record_query::screens::{chats, vendors};
use record_query::{
    Criteria, DynamicRecord, FieldSource, FilterValue, PageRequest, QueryError, QueryPipeline,
    SortDirection,
};

use crate::utils::{ids, registration_schema, three_registrations, two_chats, two_vendors};

#[test]
fn test_status_filter_selects_pending() {
    let schema = registration_schema();
    let records = three_registrations();
    let view = QueryPipeline::new(&schema)
        .run(&records, &Criteria::new().filter("status", "pending"))
        .unwrap();

    assert_eq!(ids(view), vec!["reg-1"]);
}

#[test]
fn test_all_sentinel_is_no_constraint() {
    let schema = registration_schema();
    let records = three_registrations();
    let criteria = Criteria::new().filter("status", "all").filter("region", FilterValue::All);
    let view = QueryPipeline::new(&schema).run(&records, &criteria).unwrap();

    assert_eq!(view.len(), 3);
}

#[test]
fn test_search_is_case_insensitive() {
    let schema = registration_schema();
    let records = three_registrations();
    let view = QueryPipeline::new(&schema)
        .run(&records, &Criteria::new().search("youth"))
        .unwrap();

    assert_eq!(ids(view), vec!["reg-1"]);
}

#[test]
fn test_sort_by_submission_descending() {
    let schema = registration_schema();
    let records = three_registrations();
    let view = QueryPipeline::new(&schema)
        .run(
            &records,
            &Criteria::new().sort_by("submittedAt", SortDirection::Descending),
        )
        .unwrap();

    let days: Vec<String> = view
        .iter()
        .map(|r| {
            r.field("submittedAt")
                .and_then(|v| v.as_date())
                .map(|d| d.date().to_string())
                .unwrap()
        })
        .collect();
    assert_eq!(days, vec!["2024-01-15", "2024-01-10", "2024-01-08"]);
}

#[test]
fn test_criteria_from_json() {
    let schema = registration_schema();
    let records = three_registrations();
    let criteria: Criteria = serde_json::from_value(serde_json::json!({
        "sortKey": "submittedAt",
        "sortDirection": "desc",
        "filters": { "status": { "op": "oneOf", "value": ["pending", "rejected"] } }
    }))
    .unwrap();
    let view = QueryPipeline::new(&schema).run(&records, &criteria).unwrap();

    assert_eq!(ids(view), vec!["reg-1", "reg-3"]);
}

#[test]
fn test_sort_direction_from_json_is_case_insensitive() {
    let schema = registration_schema();
    let records = three_registrations();
    let criteria: Criteria = serde_json::from_value(serde_json::json!({
        "sortKey": "associationName",
        "sortDirection": "DESC"
    }))
    .unwrap();
    let view = QueryPipeline::new(&schema).run(&records, &criteria).unwrap();

    assert_eq!(ids(view), vec!["reg-1", "reg-3", "reg-2"]);
}

#[test]
fn test_malformed_sort_in_json_is_an_error() {
    let sideways = serde_json::from_value::<Criteria>(serde_json::json!({
        "sortKey": "associationName",
        "sortDirection": "sideways"
    }));
    assert!(sideways.is_err());

    let numeric_key = serde_json::from_value::<Criteria>(serde_json::json!({
        "sortKey": 7,
        "sortDirection": "asc"
    }));
    assert!(numeric_key.is_err());
}

#[test]
fn test_direction_without_key_flips_default_sort() {
    let schema = registration_schema();
    let records = three_registrations();
    let criteria: Criteria =
        serde_json::from_value(serde_json::json!({ "sortDirection": "asc" })).unwrap();
    let view = QueryPipeline::new(&schema).run(&records, &criteria).unwrap();

    assert_eq!(ids(view), vec!["reg-3", "reg-1", "reg-2"]);
}

#[test]
fn test_search_finds_chat_by_participant_name() {
    let schema = chats::schema().unwrap();
    let records = two_chats();
    let pipeline = QueryPipeline::new(&schema);

    let view = pipeline.run(&records, &Criteria::new().search("mette")).unwrap();
    assert_eq!(ids(view), vec!["chat-1"]);

    let view = pipeline
        .run(&records, &Criteria::new().search("IDA").filter("status", "archived"))
        .unwrap();
    assert_eq!(ids(view), vec!["chat-2"]);

    let view = pipeline.run(&records, &Criteria::new().search("admin")).unwrap();
    assert!(view.is_empty(), "participant roles are not searchable");
}

#[test]
fn test_search_finds_vendor_by_product_name() {
    let schema = vendors::schema().unwrap();
    let records = two_vendors();
    let view = QueryPipeline::new(&schema)
        .run(&records, &Criteria::new().search("gloves"))
        .unwrap();

    assert_eq!(ids(view), vec!["vendor-1"]);
}

#[test]
fn test_empty_collection_gives_empty_view() {
    let schema = registration_schema();
    let records: Vec<DynamicRecord> = Vec::new();
    let criteria = Criteria::new()
        .search("youth")
        .filter("status", "pending")
        .sort_by("associationName", SortDirection::Ascending)
        .page(PageRequest::new(3));
    let pipeline = QueryPipeline::new(&schema);

    assert!(pipeline.run(&records, &criteria).unwrap().is_empty());
    let page = pipeline.run_page(&records, &criteria).unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
}

#[test]
fn test_configuration_errors() {
    let schema = registration_schema();
    let records = three_registrations();
    let pipeline = QueryPipeline::new(&schema);

    let err = pipeline
        .run(&records, &Criteria::new().sort_by("email", SortDirection::Ascending))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidSortKey { ref key, .. } if key == "email"));
    assert!(!err.is_retryable());

    let err = pipeline
        .run(&records, &Criteria::new().filter("memberCount", "10"))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidFilterField { .. }));

    let err = pipeline
        .run(&records, &Criteria::new().filter("status", "archived"))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidFilterValue { .. }));
}

#[test]
fn test_no_matches_is_not_an_error() {
    let schema = registration_schema();
    let records = three_registrations();
    let view = QueryPipeline::new(&schema)
        .run(&records, &Criteria::new().search("no such association"))
        .unwrap();

    assert!(view.is_empty());
    assert_eq!(view.total(), 3);
}
