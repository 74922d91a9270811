use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use record_query::sort::compare_values;
use record_query::{
    Criteria, FieldSource, FilterValue, QueryPipeline, Record, SortDirection, TextCollation,
};

use crate::utils::{REGIONS, ids, random_registrations, registration_schema};

const SEEDS: [u64; 4] = [1, 7, 42, 2024];

fn random_criteria(rng: &mut StdRng) -> Criteria {
    let mut criteria = Criteria::new();
    if rng.random_bool(0.5) {
        let needle = ["youth", "CLUB", "ch", "z", ""][rng.random_range(0..5)];
        criteria = criteria.search(needle);
    }
    if rng.random_bool(0.5) {
        criteria = criteria.filter("region", REGIONS[rng.random_range(0..REGIONS.len())]);
    }
    if rng.random_bool(0.3) {
        criteria = criteria.filter(
            "status",
            FilterValue::OneOf(vec!["pending".into(), "approved".into()]),
        );
    }
    let key = ["submittedAt", "associationName", "status"][rng.random_range(0..3)];
    let direction = if rng.random_bool(0.5) {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    criteria.sort_by(key, direction)
}

#[test]
fn test_pipeline_is_idempotent() {
    let schema = registration_schema();
    let pipeline = QueryPipeline::new(&schema);

    for seed in SEEDS {
        let records = random_registrations(seed, 60);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            let criteria = random_criteria(&mut rng);
            let first = ids(pipeline.run(&records, &criteria).unwrap());
            let second = ids(pipeline.run(&records, &criteria).unwrap());
            assert_eq!(first, second, "criteria {criteria:?}");
        }
    }
}

#[test]
fn test_view_never_exceeds_collection() {
    let schema = registration_schema();
    let pipeline = QueryPipeline::new(&schema);

    for seed in SEEDS {
        let records = random_registrations(seed, 40);
        let mut rng = StdRng::seed_from_u64(seed + 100);
        for _ in 0..20 {
            let view = pipeline.run(&records, &random_criteria(&mut rng)).unwrap();
            assert!(view.len() <= records.len());
            assert_eq!(view.total(), records.len());
        }
    }
}

#[test]
fn test_search_finds_every_substring() {
    let schema = registration_schema();
    let pipeline = QueryPipeline::new(&schema);
    let records = random_registrations(9, 50);
    let mut rng = StdRng::seed_from_u64(9);

    for record in &records {
        let Some(name) = record.field("associationName").and_then(|v| v.as_str().map(str::to_string))
        else {
            continue;
        };
        let chars: Vec<char> = name.chars().collect();
        let start = rng.random_range(0..chars.len());
        let end = rng.random_range(start + 1..=chars.len());
        let mut needle: String = chars[start..end].iter().collect();
        if rng.random_bool(0.5) {
            needle = needle.to_uppercase();
        }
        if needle.trim().is_empty() {
            continue;
        }
        // Surrounding whitespace is trimmed before matching
        let needle = needle.trim().to_string();

        let view = pipeline
            .run(&records, &Criteria::new().search(needle.clone()))
            .unwrap();
        assert!(
            view.iter().any(|r| r.id() == record.id()),
            "'{needle}' should find {}",
            record.id()
        );
    }
}

#[test]
fn test_sort_is_stable_in_both_directions() {
    let schema = registration_schema();
    let pipeline = QueryPipeline::new(&schema);

    for seed in SEEDS {
        let records = random_registrations(seed, 80);
        let position = |id: &str| records.iter().position(|r| r.id() == id).unwrap();

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let view = pipeline
                .run(&records, &Criteria::new().sort_by("status", direction))
                .unwrap();
            for pair in view.records().windows(2) {
                if pair[0].field("status") == pair[1].field("status") {
                    assert!(
                        position(pair[0].id()) < position(pair[1].id()),
                        "ties keep input order ({direction})"
                    );
                }
            }
        }
    }
}

#[test]
fn test_ascending_sort_is_ordered() {
    let schema = registration_schema();
    let pipeline = QueryPipeline::new(&schema);

    for seed in SEEDS {
        let records = random_registrations(seed, 60);
        for key in ["submittedAt", "associationName", "status"] {
            let view = pipeline
                .run(&records, &Criteria::new().sort_by(key, SortDirection::Ascending))
                .unwrap();
            for pair in view.records().windows(2) {
                let ordering = compare_values(
                    pair[0].field(key).as_ref(),
                    pair[1].field(key).as_ref(),
                    TextCollation::Locale,
                );
                assert_ne!(ordering, Ordering::Greater, "{key} out of order");
            }
        }
    }
}
