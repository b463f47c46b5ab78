use crate::constants::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use crate::models::CityState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical risk band. Also used as the confidence label of a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Fixed cut points: >= 0.7 High, >= 0.4 Medium, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(format!("Invalid risk level: '{}'", s)),
        }
    }
}

/// Origin/destination grouping key (ship-from city/state, ship-to city/state).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub ship_from: CityState,
    pub ship_to: CityState,
}

impl RouteKey {
    pub fn new(ship_from: CityState, ship_to: CityState) -> Self {
        RouteKey { ship_from, ship_to }
    }

    pub fn matches(&self, other: &RouteKey) -> bool {
        self.ship_from.matches(&other.ship_from) && self.ship_to.matches(&other.ship_to)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.ship_from, self.ship_to)
    }
}

/// Liable party grouping key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartyKey {
    pub name: String,
}

impl PartyKey {
    pub fn new(name: impl Into<String>) -> Self {
        PartyKey { name: name.into() }
    }
}

/// Aggregated, normalized risk for one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskRating<K> {
    pub key: K,
    pub incident_count: u64,
    pub total_penalties: f64,
    /// Absent when no incident in the group carried a gross weight
    pub avg_gross_weight: Option<f64>,
    pub count_norm: f64,
    pub penalties_norm: f64,
    /// Mean loss-location risk of the group's incidents, when blended in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_location_risk: Option<f64>,
    pub risk_score: f64,
    pub risk_rating: RiskLevel,
}

/// All rating tables produced by one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingTables {
    pub routes: Vec<RiskRating<RouteKey>>,
    pub liable_parties: Vec<RiskRating<PartyKey>>,
    pub loss_locations: Vec<RiskRating<CityState>>,
}

impl RatingTables {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.liable_parties.is_empty() && self.loss_locations.is_empty()
    }
}
