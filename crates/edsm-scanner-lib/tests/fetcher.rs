//! Integration tests for the bounded detail fetcher.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{system, MockLookup, ProgressRecorder};
use edsm_scanner_lib::{DetailFetcher, Error, SystemRef};

fn references(count: u64) -> Vec<SystemRef> {
    (1..=count)
        .map(|i| system(i, &format!("S{i}"), i as f64, 0.0, 0.0))
        .collect()
}

#[test]
fn fetches_in_input_order_within_limit() {
    let lookup = MockLookup::new().with_detail_delay(Duration::from_millis(20));
    let progress = Arc::new(ProgressRecorder::default());
    let refs = references(5);

    let details = DetailFetcher::new(&lookup)
        .with_observer(progress.clone())
        .fetch_all(&refs, 2)
        .expect("all fetches succeed");

    let names: Vec<_> = details.iter().map(|d| d.system.name.as_str()).collect();
    assert_eq!(names, vec!["S1", "S2", "S3", "S4", "S5"]);
    assert!(details.iter().all(|d| d.url == format!("mock://{}", d.system.name)));

    assert!(lookup.peak_in_flight() <= 2);
    assert_eq!(lookup.detail_calls(), 5);

    let mut updates = progress.updates();
    updates.sort_unstable();
    assert_eq!(updates, vec![1, 2, 3, 4, 5]);
    assert_eq!(progress.finished(), vec![(5, 5)]);
}

#[test]
fn one_failure_fails_the_batch_after_all_fetches_finish() {
    let lookup = MockLookup::new().failing_details("S3");
    let progress = Arc::new(ProgressRecorder::default());
    let refs = references(5);

    let error = DetailFetcher::new(&lookup)
        .with_observer(progress.clone())
        .fetch_all(&refs, 2)
        .expect_err("S3 fails");

    match &error {
        Error::DetailFetchFailed { name, source } => {
            assert_eq!(name, "S3");
            assert!(matches!(**source, Error::Lookup { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(lookup.detail_calls(), 5);
    assert_eq!(progress.updates().len(), 5);
    assert_eq!(progress.finished(), vec![(5, 5)]);
}

#[test]
fn earliest_failing_reference_is_reported() {
    let lookup = MockLookup::new()
        .failing_details("S4")
        .failing_details("S2")
        .with_detail_delay(Duration::from_millis(5));
    let refs = references(6);

    let error = DetailFetcher::new(&lookup)
        .fetch_all(&refs, 6)
        .expect_err("S2 and S4 fail");

    assert!(matches!(error, Error::DetailFetchFailed { ref name, .. } if name == "S2"));
    assert_eq!(lookup.detail_calls(), 6);
}

#[test]
fn wide_limit_still_caps_in_flight_calls() {
    let lookup = MockLookup::new().with_detail_delay(Duration::from_millis(10));
    let refs = references(12);

    let details = DetailFetcher::new(&lookup)
        .fetch_all(&refs, 3)
        .expect("all fetches succeed");

    assert_eq!(details.len(), 12);
    assert!(lookup.peak_in_flight() <= 3);
    assert!(lookup.peak_in_flight() >= 1);
}

#[test]
fn empty_input_still_finishes() {
    let lookup = MockLookup::new();
    let progress = Arc::new(ProgressRecorder::default());

    let details = DetailFetcher::new(&lookup)
        .with_observer(progress.clone())
        .fetch_all(&[], 5)
        .expect("nothing to fetch");

    assert!(details.is_empty());
    assert_eq!(lookup.detail_calls(), 0);
    assert!(progress.updates().is_empty());
    assert_eq!(progress.finished(), vec![(0, 0)]);
}

#[test]
fn zero_limit_runs_one_at_a_time() {
    let lookup = MockLookup::new().with_detail_delay(Duration::from_millis(5));
    let refs = references(4);

    let details = DetailFetcher::new(&lookup)
        .fetch_all(&refs, 0)
        .expect("all fetches succeed");

    assert_eq!(details.len(), 4);
    assert_eq!(lookup.peak_in_flight(), 1);
}

#[test]
fn shared_lookup_through_arc() {
    let lookup = Arc::new(MockLookup::new());
    let refs = references(3);

    let details = DetailFetcher::new(Arc::clone(&lookup))
        .fetch_all_default(&refs)
        .expect("all fetches succeed");

    assert_eq!(details.len(), 3);
    assert_eq!(lookup.detail_calls(), 3);
}
