use crate::constants::MAX_ISOCHRONE_MINUTES;
use crate::models::{Coordinates, Facility, RiskLevel, RouteKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Money and distance involved in visiting one facility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostBreakdown {
    pub direct_distance_miles: f64,
    pub via_distance_miles: f64,
    pub detour_distance_miles: f64,
    pub detour_time_hours: f64,
    pub facility_fee: f64,
    pub driver_cost: f64,
    pub mileage_cost: f64,
    pub total_cost: f64,
}

/// A facility that survived the corridor filter, with its derived metrics.
/// Lives only for the duration of one search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetourCandidate {
    pub facility: Facility,
    pub path_deviation: f64,
    pub origin_distance_miles: f64,
    pub cost: CostBreakdown,
    pub score: f64,
}

impl DetourCandidate {
    pub fn detour_cost(&self) -> f64 {
        self.cost.total_cost
    }
}

/// Which pool produced the winning candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchPool {
    OriginState,
    FullCatalog,
}

/// Winning facility for a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacilitySelection {
    pub candidate: DetourCandidate,
    pub pool: SearchPool,
    pub deviation_cap: f64,
    pub candidates_considered: usize,
}

impl FacilitySelection {
    pub fn facility(&self) -> &Facility {
        &self.candidate.facility
    }

    pub fn detour_cost(&self) -> f64 {
        self.candidate.detour_cost()
    }

    pub fn coordinates(&self) -> Coordinates {
        self.candidate.facility.coordinates
    }
}

/// Scale / don't-scale decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub should_scale: bool,
    pub confidence: RiskLevel,
    pub reason: String,
}

/// Outcome of a single risk table lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskLookup {
    pub risk_score: f64,
    pub risk_rating: RiskLevel,
    /// False when the table had no history for the key
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_penalties: Option<f64>,
}

impl RiskLookup {
    /// No history: assume low risk.
    pub fn no_history() -> Self {
        RiskLookup {
            risk_score: 0.0,
            risk_rating: RiskLevel::Low,
            matched: false,
            incident_count: None,
            total_penalties: None,
        }
    }
}

/// Route and liable-party risk for one shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskProfile {
    pub route: RiskLookup,
    pub liable_party: RiskLookup,
}

// Request/Response types for API endpoints

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    /// "City, ST"
    pub ship_from: String,
    /// "City, ST"
    pub ship_to: String,
    pub liable_party: String,
    /// Drive-time polygon around the origin; omitted when not requested
    #[serde(default)]
    pub isochrone_minutes: Option<u32>,
}

impl AssessmentRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.ship_from.trim().is_empty()
            || self.ship_to.trim().is_empty()
            || self.liable_party.trim().is_empty()
        {
            return Err("ship_from, ship_to and liable_party are required".to_string());
        }
        if let Some(minutes) = self.isochrone_minutes {
            if minutes == 0 || minutes > MAX_ISOCHRONE_MINUTES {
                return Err(format!(
                    "isochrone_minutes must be between 1 and {}",
                    MAX_ISOCHRONE_MINUTES
                ));
            }
        }
        Ok(())
    }
}

/// Origin/destination after parsing and geocoding.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedShipment {
    pub route_key: RouteKey,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub liable_party: String,
}

impl ResolvedShipment {
    pub fn origin_state(&self) -> &str {
        &self.route_key.ship_from.state
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: Uuid,
    pub shipment: ResolvedShipment,
    pub risk: RiskProfile,
    /// None when no facility lies inside the corridor
    pub facility: Option<FacilitySelection>,
    pub recommendation: Recommendation,
    /// Catalog rows inside the origin isochrone, when one was fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facilities_in_range: Option<Vec<Facility>>,
    /// Isochrone polygon as GeoJSON geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isochrone: Option<geojson::Geometry>,
}

/// A location string that could not be turned into coordinates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnresolvedLocation {
    pub field: String,
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    Assessed(Box<Assessment>),
    Unresolved { unresolved: Vec<UnresolvedLocation> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct BestFacilityRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    #[serde(default)]
    pub route_risk: f64,
    #[serde(default)]
    pub origin_state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestFacilityResponse {
    pub selection: Option<FacilitySelection>,
}
