use async_trait::async_trait;
use scalewise::config::{DetourCostConfig, FacilitySearchConfig, RecommendationConfig};
use scalewise::models::{
    CityState, Coordinates, Facility, IncidentRecord, PartyKey, RatingTables, RiskLevel,
    RiskRating, RouteKey,
};
use scalewise::services::assessment::AssessmentService;
use scalewise::services::facility_finder::FacilityFinder;
use scalewise::services::geocoder::Geocoder;
use scalewise::services::recommendation::RecommendationEngine;
use scalewise::services::risk_evaluator::RiskEvaluator;
use scalewise::{AppError, AppState, RatingsSource};
use std::collections::HashMap;
use std::sync::Arc;

/// Geocoder answering from a fixed table. "Offline, XX" simulates an outage.
pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
}

impl StubGeocoder {
    #[allow(dead_code)]
    pub fn new() -> Self {
        let places = [
            ("dyersburg, tn", (36.0, -89.0)),
            ("st. louis, mo", (38.0, -90.5)),
            ("sikeston, mo", (36.88, -89.58)),
        ]
        .into_iter()
        .map(|(name, (lat, lng))| (name.to_string(), Coordinates { lat, lng }))
        .collect();
        StubGeocoder { places }
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, query: &str) -> scalewise::Result<Option<Coordinates>> {
        let key = query.trim().to_lowercase();
        if key == "offline, xx" {
            return Err(AppError::Geocoding("connection refused".to_string()));
        }
        Ok(self.places.get(&key).copied())
    }

    fn backend_name(&self) -> &'static str {
        "stub"
    }
}

#[allow(dead_code)]
pub fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).unwrap()
}

#[allow(dead_code)]
pub fn create_test_facility(id: &str, state: &str, city: &str, lat: f64, lng: f64) -> Facility {
    Facility::new(
        id,
        state,
        city,
        format!("Test Scale {}", id),
        format!("{} Interstate Dr", id),
        coords(lat, lng),
    )
}

/// Catalog around the Dyersburg, TN -> St. Louis, MO corridor.
#[allow(dead_code)]
pub fn test_catalog() -> Vec<Facility> {
    vec![
        create_test_facility("1001", "TN", "Ridgely", 36.2, -89.3),
        create_test_facility("2002", "MO", "Sikeston", 36.88, -89.58),
        // ~300 miles west of the corridor
        create_test_facility("3003", "OK", "Muskogee", 36.0, -95.0),
        create_test_facility("4004", "AR", "Jonesboro", 35.5, -90.0),
    ]
}

#[allow(dead_code)]
pub fn create_test_rating<K>(key: K, risk_score: f64, incident_count: u64) -> RiskRating<K> {
    RiskRating {
        key,
        incident_count,
        total_penalties: 500.0 * incident_count as f64,
        avg_gross_weight: Some(80_500.0),
        count_norm: risk_score,
        penalties_norm: risk_score,
        loss_location_risk: None,
        risk_score,
        risk_rating: RiskLevel::from_score(risk_score),
    }
}

#[allow(dead_code)]
pub fn test_tables() -> RatingTables {
    RatingTables {
        routes: vec![create_test_rating(
            RouteKey::new(CityState::new("Dyersburg", "TN"), CityState::new("St. Louis", "MO")),
            0.9,
            12,
        )],
        liable_parties: vec![
            create_test_rating(PartyKey::new("Acme Freight"), 0.8, 9),
            create_test_rating(PartyKey::new("Careful Carriers"), 0.1, 1),
        ],
        loss_locations: vec![],
    }
}

#[allow(dead_code)]
pub fn create_test_incident(
    from: (&str, &str),
    to: (&str, &str),
    party: &str,
    expense: f64,
    cause: &str,
) -> IncidentRecord {
    IncidentRecord {
        loss_location: CityState::new(from.0, from.1),
        ship_from: CityState::new(from.0, from.1),
        ship_to: CityState::new(to.0, to.1),
        liable_party: party.to_string(),
        total_expense: expense,
        total_incurred: expense,
        gross_weight: Some(80_000.0),
        cause: cause.to_string(),
    }
}

#[allow(dead_code)]
pub fn test_finder() -> FacilityFinder {
    FacilityFinder::new(FacilitySearchConfig::default(), DetourCostConfig::default())
}

#[allow(dead_code)]
pub fn test_service(tables: RatingTables) -> AssessmentService {
    AssessmentService::new(
        Arc::new(test_catalog()),
        RiskEvaluator::new(Arc::new(tables)),
        test_finder(),
        RecommendationEngine::new(RecommendationConfig::default()),
        Arc::new(StubGeocoder::new()),
        None,
    )
}

#[allow(dead_code)]
pub fn test_state(tables: RatingTables) -> Arc<AppState> {
    Arc::new(AppState {
        assessments: test_service(tables),
        ratings_source: RatingsSource::empty(),
        geocode_cache: None,
    })
}
