use crate::models::location::eq_ignore_case;
use crate::models::{RatingTables, RiskLookup, RiskProfile, RiskRating, RouteKey};
use std::sync::Arc;

/// Read-only lookups against the latest rating tables.
///
/// A key with no history resolves to risk 0.0 / Low rather than an error.
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    tables: Arc<RatingTables>,
}

impl RiskEvaluator {
    pub fn new(tables: Arc<RatingTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &RatingTables {
        &self.tables
    }

    /// Tables are sorted by descending risk, so the first case-insensitive
    /// match is the riskiest spelling of the key.
    pub fn route_risk(&self, route: &RouteKey) -> RiskLookup {
        let lookup = self
            .tables
            .routes
            .iter()
            .find(|rating| rating.key.matches(route))
            .map(to_lookup)
            .unwrap_or_else(RiskLookup::no_history);

        tracing::debug!(
            route = %route,
            matched = lookup.matched,
            risk_score = lookup.risk_score,
            "Route risk for {}: {:.3} ({})",
            route, lookup.risk_score, lookup.risk_rating
        );
        lookup
    }

    pub fn liable_party_risk(&self, liable_party: &str) -> RiskLookup {
        let lookup = self
            .tables
            .liable_parties
            .iter()
            .find(|rating| eq_ignore_case(&rating.key.name, liable_party))
            .map(to_lookup)
            .unwrap_or_else(RiskLookup::no_history);

        tracing::debug!(
            liable_party,
            matched = lookup.matched,
            risk_score = lookup.risk_score,
            "Liable party risk for '{}': {:.3} ({})",
            liable_party, lookup.risk_score, lookup.risk_rating
        );
        lookup
    }

    pub fn profile(&self, route: &RouteKey, liable_party: &str) -> RiskProfile {
        RiskProfile {
            route: self.route_risk(route),
            liable_party: self.liable_party_risk(liable_party),
        }
    }
}

fn to_lookup<K>(rating: &RiskRating<K>) -> RiskLookup {
    RiskLookup {
        risk_score: rating.risk_score,
        risk_rating: rating.risk_rating,
        matched: true,
        incident_count: Some(rating.incident_count),
        total_penalties: Some(rating.total_penalties),
    }
}
