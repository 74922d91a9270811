use std::cell::Cell;

use chrono::{TimeZone, Utc};
use record_query::{
    ActionError, ActionGateway, ActionRequest, Actor, Criteria, FieldSource, FieldValue,
    LocalGateway, QueryError, Review, Screen, SummaryValue,
};

use crate::utils::{ids, registration_schema, three_registrations};

/// Gateway that fails a fixed number of times before accepting
struct FlakyGateway {
    failures_left: Cell<u32>,
}

impl ActionGateway for FlakyGateway {
    fn submit(&self, _request: &ActionRequest) -> Result<(), ActionError> {
        let left = self.failures_left.get();
        if left == 0 {
            return Ok(());
        }
        self.failures_left.set(left - 1);
        Err(ActionError::Unavailable("connection reset".to_string()))
    }
}

fn reviewer() -> Actor {
    Actor::new("admin-2", "Karen Dahl")
}

#[test]
fn test_approval_updates_summary_but_not_old_views() {
    let mut screen = Screen::new(registration_schema(), three_registrations()).unwrap();
    screen
        .set_criteria(Criteria::new().filter("status", "pending"))
        .unwrap();

    let before = screen.collection().clone();
    let stale = ids(screen.view().unwrap());
    assert_eq!(stale, vec!["reg-1"]);

    let decided_at = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
    let review = Review::new("approved", reviewer()).at(decided_at);
    screen.review("reg-1", &review, &LocalGateway).unwrap();

    let summary = screen.summary();
    assert_eq!(summary.get("pending"), Some(&SummaryValue::Count(0)));
    assert_eq!(summary.get("approved"), Some(&SummaryValue::Count(2)));

    // The earlier view is a value; only a new query reflects the change
    assert_eq!(stale, vec!["reg-1"]);
    assert!(screen.view().unwrap().is_empty());

    let approved = screen.collection().get("reg-1").unwrap();
    assert_eq!(approved.field("status"), Some(FieldValue::tag("approved")));
    assert_eq!(approved.field("reviewedBy"), Some(FieldValue::text("Karen Dahl")));

    assert_eq!(
        before.get("reg-1").and_then(|r| r.field("status")),
        Some(FieldValue::tag("pending"))
    );
}

#[test]
fn test_failed_action_keeps_collection_and_can_retry() {
    let mut screen = Screen::new(registration_schema(), three_registrations()).unwrap();
    let gateway = FlakyGateway {
        failures_left: Cell::new(1),
    };
    let review = Review::new("rejected", reviewer()).with_notes("missing statutes");

    let err = screen.review("reg-2", &review, &gateway).unwrap_err();
    assert!(matches!(err, QueryError::Action(ActionError::Unavailable(_))));
    assert!(err.is_retryable());
    assert_eq!(
        screen.collection().get("reg-2").and_then(|r| r.field("status")),
        Some(FieldValue::tag("approved"))
    );

    screen.review("reg-2", &review, &gateway).unwrap();
    let rejected = screen.collection().get("reg-2").unwrap();
    assert_eq!(rejected.field("status"), Some(FieldValue::tag("rejected")));
    assert_eq!(
        rejected.field("reviewNotes"),
        Some(FieldValue::text("missing statutes"))
    );
}

#[test]
fn test_unknown_record_is_not_found() {
    let mut screen = Screen::new(registration_schema(), three_registrations()).unwrap();
    let err = screen
        .review("reg-9", &Review::new("approved", reviewer()), &LocalGateway)
        .unwrap_err();
    assert!(matches!(err, QueryError::RecordNotFound(id) if id == "reg-9"));
}

#[test]
fn test_invalid_criteria_keep_previous() {
    let mut screen = Screen::new(registration_schema(), three_registrations()).unwrap();
    screen.set_criteria(Criteria::new().search("club")).unwrap();

    assert!(screen.set_criteria(Criteria::new().filter("email", "x")).is_err());
    assert_eq!(screen.criteria().search_text, "club");
    assert_eq!(ids(screen.view().unwrap()), vec!["reg-2"]);
}

#[test]
fn test_export_and_facets() {
    let screen = Screen::new(registration_schema(), three_registrations()).unwrap();

    let facets = screen.facets("region").unwrap();
    assert_eq!(facets.get("Capital"), Some(&1));

    let exported = screen.export(&["associationName", "status"]).unwrap();
    let rows = exported.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    // Default sort is newest submission first
    assert_eq!(rows[0]["id"], "reg-2");
    assert_eq!(rows[0]["status"], "approved");
}

#[test]
fn test_review_to_undeclared_status_is_refused() {
    let mut screen = Screen::new(registration_schema(), three_registrations()).unwrap();
    let gateway = FlakyGateway {
        failures_left: Cell::new(1),
    };

    let err = screen
        .review("reg-1", &Review::new("archived", reviewer()), &gateway)
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidRecord(_)));
    assert!(!err.is_retryable());
    assert_eq!(gateway.failures_left.get(), 1, "gateway must not be called");
    assert_eq!(
        screen.collection().get("reg-1").and_then(|r| r.field("status")),
        Some(FieldValue::tag("pending"))
    );

    screen
        .set_criteria(Criteria::new().filter("status", "pending"))
        .unwrap();
    assert_eq!(ids(screen.view().unwrap()), vec!["reg-1"]);
}
