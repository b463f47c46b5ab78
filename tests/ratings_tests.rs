use scalewise::config::{RatingsConfig, RouteBlend};
use scalewise::constants::LATEST_RATINGS_POINTER;
use scalewise::data::parse_incidents;
use scalewise::models::{CityState, RiskLevel, RouteKey};
use scalewise::ratings::{RatingsArtifact, RatingsStore, RiskRatingBuilder};
use std::fs;
use time::macros::datetime;

mod common;
use common::create_test_incident;

fn sample_incidents() -> Vec<scalewise::models::IncidentRecord> {
    vec![
        create_test_incident(("Memphis", "TN"), ("St. Louis", "MO"), "Acme Freight", 900.0, "overweight"),
        create_test_incident(("Memphis", "TN"), ("St. Louis", "MO"), "Acme Freight", 600.0, "overweight"),
        create_test_incident(("Memphis", "TN"), ("St. Louis", "MO"), "Bolt Logistics", 0.0, "overweight"),
        create_test_incident(("Dallas", "TX"), ("Tulsa", "OK"), "Bolt Logistics", 150.0, "shortage"),
        create_test_incident(("Omaha", "NE"), ("Denver", "CO"), "Careful Carriers", 0.0, "shortage"),
    ]
}

fn build(blend: RouteBlend) -> scalewise::ratings::RatingBuild {
    RiskRatingBuilder::new(RatingsConfig {
        route_blend: blend,
        ..RatingsConfig::default()
    })
    .build(&sample_incidents())
}

#[test]
fn test_irrelevant_incidents_are_filtered() {
    let build = build(RouteBlend::TwoFactor);
    assert_eq!(build.total_incidents, 5);
    assert_eq!(build.relevant_incidents, 4);
    assert!(build
        .tables
        .liable_parties
        .iter()
        .all(|r| r.key.name != "Careful Carriers"));
}

#[test]
fn test_scores_are_bounded_and_sorted() {
    for blend in [RouteBlend::TwoFactor, RouteBlend::WithLossLocation] {
        let build = build(blend);
        for table_scores in [
            build.tables.routes.iter().map(|r| r.risk_score).collect::<Vec<_>>(),
            build.tables.liable_parties.iter().map(|r| r.risk_score).collect(),
            build.tables.loss_locations.iter().map(|r| r.risk_score).collect(),
        ] {
            assert!(table_scores.iter().all(|s| (0.0..=1.0).contains(s)));
            assert!(table_scores.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}

#[test]
fn test_busiest_route_is_high_risk() {
    let build = build(RouteBlend::TwoFactor);
    let top = &build.tables.routes[0];
    assert_eq!(
        top.key,
        RouteKey::new(CityState::new("Memphis", "TN"), CityState::new("St. Louis", "MO"))
    );
    assert_eq!(top.incident_count, 3);
    assert_eq!(top.total_penalties, 1500.0);
    assert_eq!(top.risk_rating, RiskLevel::High);
    assert_eq!(build.tables.routes[1].risk_score, 0.0);
}

#[test]
fn test_single_group_normalizes_to_zero() {
    let incidents = vec![create_test_incident(
        ("Memphis", "TN"),
        ("St. Louis", "MO"),
        "Acme Freight",
        400.0,
        "overweight",
    )];
    let build = RiskRatingBuilder::new(RatingsConfig::default()).build(&incidents);
    assert_eq!(build.tables.routes.len(), 1);
    assert_eq!(build.tables.routes[0].risk_score, 0.0);
    assert_eq!(build.tables.routes[0].risk_rating, RiskLevel::Low);
}

#[test]
fn test_empty_history_builds_empty_tables() {
    let (incidents, _) = parse_incidents("[]").unwrap();
    let build = RiskRatingBuilder::new(RatingsConfig::default()).build(&incidents);
    assert!(build.tables.is_empty());
}

#[test]
fn test_publish_then_load_latest() {
    let dir = tempfile::tempdir().unwrap();
    let store = RatingsStore::new(dir.path());
    assert!(store.load_latest().unwrap().is_none());

    let stamp = datetime!(2024-05-01 12:00:00 UTC);
    let artifact = RatingsArtifact::from_build(build(RouteBlend::WithLossLocation), stamp);
    let path = store.publish(&artifact, stamp).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "risk_ratings_20240501_120000.json"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(LATEST_RATINGS_POINTER)).unwrap(),
        "risk_ratings_20240501_120000.json"
    );

    let loaded = store.load_latest().unwrap().unwrap();
    assert_eq!(loaded, artifact);
    assert_eq!(loaded.route_blend, RouteBlend::WithLossLocation);
    assert_eq!(loaded.generated_at, "2024-05-01T12:00:00Z");
}

#[test]
fn test_pointer_wins_over_newer_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = RatingsStore::new(dir.path());

    let older = datetime!(2024-01-01 00:00:00 UTC);
    let newer = datetime!(2024-06-01 00:00:00 UTC);
    store
        .publish(&RatingsArtifact::from_build(build(RouteBlend::TwoFactor), newer), newer)
        .unwrap();
    // Republishing an older stamp moves the pointer back
    store
        .publish(&RatingsArtifact::from_build(build(RouteBlend::WithLossLocation), older), older)
        .unwrap();

    let latest = store.resolve_latest().unwrap().unwrap();
    assert!(latest.ends_with("risk_ratings_20240101_000000.json"));
}

#[test]
fn test_stale_pointer_falls_back_to_newest_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = RatingsStore::new(dir.path());

    for stamp in [
        datetime!(2024-02-01 08:00:00 UTC),
        datetime!(2024-03-01 08:00:00 UTC),
    ] {
        store
            .publish(&RatingsArtifact::from_build(build(RouteBlend::TwoFactor), stamp), stamp)
            .unwrap();
    }
    fs::write(
        dir.path().join(LATEST_RATINGS_POINTER),
        "risk_ratings_19990101_000000.json",
    )
    .unwrap();

    let latest = store.resolve_latest().unwrap().unwrap();
    assert!(latest.ends_with("risk_ratings_20240301_080000.json"));

    fs::remove_file(dir.path().join(LATEST_RATINGS_POINTER)).unwrap();
    let latest = store.resolve_latest().unwrap().unwrap();
    assert!(latest.ends_with("risk_ratings_20240301_080000.json"));
}

#[test]
fn test_missing_directory_means_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let store = RatingsStore::new(dir.path().join("does-not-exist"));
    assert!(store.load_latest().unwrap().is_none());
}

#[test]
fn test_corrupt_artifact_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("risk_ratings_20240101_000000.json"), "{ truncated").unwrap();
    let store = RatingsStore::new(dir.path());
    assert!(store.load_latest().is_err());
}
