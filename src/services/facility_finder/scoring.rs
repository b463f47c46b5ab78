use crate::config::FacilitySearchConfig;

/// Inputs for scoring one surviving candidate.
pub struct ScoringContext {
    pub path_deviation: f64,
    pub detour_cost: f64,
    pub origin_distance_miles: f64,
    pub route_risk: f64,
}

/// Lower is better:
/// deviation * 100 + cost / 50 + proximity, where proximity is waived for
/// facilities near the origin on high-risk routes.
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    config: FacilitySearchConfig,
}

impl CandidateScorer {
    pub fn new(config: FacilitySearchConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, context: &ScoringContext) -> f64 {
        context.path_deviation * self.config.deviation_weight
            + context.detour_cost / self.config.cost_divisor
            + self.proximity_term(context.route_risk, context.origin_distance_miles)
    }

    /// High-risk routes strongly prefer weighing early, so facilities within
    /// the early radius carry no proximity penalty at all.
    fn proximity_term(&self, route_risk: f64, origin_distance_miles: f64) -> f64 {
        if route_risk >= self.config.early_weigh_risk_threshold
            && origin_distance_miles <= self.config.early_weigh_radius_miles
        {
            0.0
        } else {
            origin_distance_miles / self.config.proximity_divisor
        }
    }
}
